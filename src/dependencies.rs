use std::sync::OnceLock;

use sqlx::PgPool;

use crate::{config::Config, database, services::response::ServiceError};

pub fn config() -> Result<&'static Config, ServiceError> {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	let config = match CONFIG.get() {
		None => {
			let config = Config::new()?;

			CONFIG.get_or_init(|| config)
		}
		Some(config) => config,
	};
	Ok(config)
}

pub async fn connection_pool() -> Result<&'static PgPool, ServiceError> {
	static POOL: OnceLock<PgPool> = OnceLock::new();

	let p = match POOL.get() {
		None => {
			let settings = &config()?.database;
			let pool = database::connect(&settings.url(), settings.max_connections).await?;
			POOL.get_or_init(|| pool)
		}
		Some(pool) => pool,
	};
	Ok(p)
}

/// Client used for the startup seed.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ServiceError> {
	let client = reqwest::Client::builder()
		.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
		.timeout(std::time::Duration::from_secs(timeout_secs))
		.build()?;
	Ok(client)
}
