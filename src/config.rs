use std::str::FromStr;

use crate::{
	domain::MissingRecord,
	services::response::{ResponseFormat, ServiceError},
};

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	pub database: DatabaseSettings,
	pub allow_origins: String,
	pub response_format: ResponseFormat,
	pub missing_record: MissingRecord,
	pub seed: Option<SeedSettings>,
}

pub struct DatabaseSettings {
	/// Takes precedence over the individual fields when set.
	pub url: Option<String>,
	pub host: String,
	pub port: u16,
	pub name: String,
	pub user: String,
	pub password: String,
	pub max_connections: u32,
}

impl DatabaseSettings {
	pub fn url(&self) -> String {
		match &self.url {
			Some(url) => url.clone(),
			None => format!("postgres://{}:{}@{}:{}/{}", self.user, self.password, self.host, self.port, self.name),
		}
	}
}

#[derive(Clone, Debug)]
pub struct SeedSettings {
	pub source_url: String,
	pub user_id: u64,
	pub concurrency: usize,
	pub timeout_secs: u64,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ServiceError> {
		let log_level = lookup("LOG_LEVEL").unwrap_or("warn".to_string());
		let server_ip_port = lookup("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let allow_origins = lookup("ALLOW_ORIGINS").unwrap_or("http://localhost:3000,http://localhost:3001".to_string());
		let response_format = parse_or(&lookup, "RESPONSE_FORMAT", ResponseFormat::default())?;
		let missing_record = parse_or(&lookup, "MISSING_RECORD", MissingRecord::default())?;

		let url = lookup("DATABASE_URL");
		let required = |key: &str| -> Result<String, ServiceError> {
			match (&url, lookup(key)) {
				(_, Some(value)) => Ok(value),
				(Some(_), None) => Ok(String::new()),
				(None, None) => Err(ServiceError::Config(format!("{key} must be set"))),
			}
		};
		let database = DatabaseSettings {
			host: required("DB_HOST")?,
			port: parse_or(&lookup, "DB_PORT", 5432)?,
			name: required("DB_NAME")?,
			user: required("DB_USER")?,
			password: required("DB_PASSWORD")?,
			max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 30)?,
			url,
		};

		let seed = if flag_or(&lookup, "SEED_ENABLED", false)? {
			let concurrency: usize = parse_or(&lookup, "SEED_CONCURRENCY", 4)?;
			Some(SeedSettings {
				source_url: lookup("SEED_SOURCE_URL").unwrap_or("https://jsonplaceholder.typicode.com".to_string()),
				user_id: parse_or(&lookup, "SEED_USER_ID", 7)?,
				concurrency: concurrency.max(1),
				timeout_secs: parse_or(&lookup, "SEED_TIMEOUT_SECS", 10)?,
			})
		} else {
			None
		};

		Ok(Config {
			log_level,
			server_ip_port,
			database,
			allow_origins,
			response_format,
			missing_record,
			seed,
		})
	}
}

fn parse_or<T>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &str,
	default: T,
) -> Result<T, ServiceError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match lookup(key) {
		None => Ok(default),
		Some(raw) => raw.trim().parse::<T>().map_err(|err| ServiceError::Config(format!("{key}: {err}"))),
	}
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, in any case.
fn flag_or(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &str,
	default: bool,
) -> Result<bool, ServiceError> {
	let Some(raw) = lookup(key) else {
		return Ok(default);
	};
	match raw.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" | "" => Ok(false),
		other => Err(ServiceError::Config(format!("{key}: `{other}` is not a boolean"))),
	}
}
