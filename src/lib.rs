pub mod adapters;
pub mod config;
pub mod database;
pub mod dependencies;
pub mod domain;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::{
	http::{HeaderValue, Method},
	Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
	config::Config,
	routes::create_routes,
	services::{response::ServiceError, seeder::Seeder},
	state::AppState,
};

/// Router with CORS and request tracing applied.
pub fn app(
	state: AppState,
	config: &Config,
) -> Router {
	let origins: Vec<HeaderValue> = config.allow_origins.split(',').filter_map(|origin| origin.trim().parse().ok()).collect();

	let cors = CorsLayer::new()
		.allow_origin(origins)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

	create_routes(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

/// Connects, recreates the schema, seeds if configured, then serves until Ctrl-C.
pub async fn run(config: &'static Config) -> Result<(), ServiceError> {
	tracing::info!("Connections Are Being Pooled...");
	let pool = dependencies::connection_pool().await?;
	database::reset_schema(pool).await?;

	let state = AppState::postgres(pool.clone())
		.with_format(config.response_format)
		.with_missing(config.missing_record);

	if let Some(settings) = &config.seed {
		let seeder = Seeder::new(
			dependencies::http_client(settings.timeout_secs)?,
			settings.clone(),
			Arc::clone(&state.posts),
			Arc::clone(&state.comments),
		);
		let report = seeder.run().await?;
		tracing::info!(
			"Seed finished: {} post(s), {} comment(s) in {} ms",
			report.posts,
			report.comments,
			(report.end_time - report.start_time).num_milliseconds()
		);
	}

	let listener = tokio::net::TcpListener::bind(&config.server_ip_port).await?;
	tracing::info!("Start Web Server on {}...", config.server_ip_port);

	axum::serve(listener, app(state, config)).with_graceful_shutdown(shutdown_signal()).await?;
	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal : {}", err);
		std::future::pending::<()>().await;
	}
	tracing::info!("Shutting down");
}
