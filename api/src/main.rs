use actix_web::{web, HttpServer};
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

mod app;
mod config;
mod dto;
mod handlers;
mod middleware;
mod routes;

use sd_core::services::clock::SystemClock;
use sd_core::services::otp::{Notifier, OtpIssuer, OtpServiceConfig, OtpVerifier};
use sd_core::services::rate_limit::RateLimiterTrait;
use sd_infra::database::{create_pool, MySqlOtpRepository};
use sd_infra::notifier::create_notifier;
use sd_infra::rate_limit::SlidingWindowRateLimiter;

use app::create_app;
use config::Config;
use routes::otp::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting SignupDesk API Server");

    // Load configuration
    let config = Config::from_env();
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    // Wire up infrastructure
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let repository = Arc::new(MySqlOtpRepository::new(pool));
    let notifier: Arc<Box<dyn Notifier>> = Arc::new(create_notifier(&config.notifier));
    let clock = Arc::new(SystemClock);

    // Wire up the OTP services
    let issuer = Arc::new(OtpIssuer::new(
        repository.clone(),
        notifier,
        clock.clone(),
        OtpServiceConfig::default(),
    ));
    let verifier = Arc::new(OtpVerifier::new(repository, clock.clone()));
    let rate_limiter: Arc<dyn RateLimiterTrait> = Arc::new(SlidingWindowRateLimiter::new(
        config.rate_limit.clone(),
        clock,
    ));

    let app_state = web::Data::new(AppState { issuer, verifier });

    HttpServer::new(move || create_app(app_state.clone(), rate_limiter.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
