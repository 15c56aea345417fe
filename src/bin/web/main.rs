use std::process::ExitCode;

use post_comment::dependencies::config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
	println!("Environment Variable Is Being Set...");
	let config = match config() {
		Ok(config) => config,
		Err(err) => {
			eprintln!("{err}");
			return ExitCode::FAILURE;
		}
	};

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("{},post_comment=info,tower_http=debug,axum::rejection=trace", config.log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	match post_comment::run(config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!("Fatal : {}", err);
			ExitCode::FAILURE
		}
	}
}
