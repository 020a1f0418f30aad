//! Installment plan HTTP server
//!
//! Axum-based JSON API that checkout pages call to list the pay-over-time
//! plans for a cart, and to turn a chosen plan into the payload the
//! billing-plan provider expects.

mod handlers;
mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use installment_core::{EngineConfig, PlanBuilder};

use crate::handlers::{health_check, quote_plans, select_plan};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = EngineConfig::from_env()?;
    tracing::info!(
        fee = %config.rates.fee_percent,
        tax = %config.rates.tax_percent,
        single_payment_fee = %config.rates.single_payment_fee_percent,
        "Loaded installment rates"
    );
    if !config.yearless_vendors.is_empty() {
        tracing::info!("Year-less date vendors: {}", config.yearless_vendors.len());
    }
    let defaults: Vec<String> = config.default_plans.iter().map(ToString::to_string).collect();
    tracing::info!("Default plans: {}", defaults.join(" "));

    let state = AppState::new(PlanBuilder::new(config));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("installment-server running on http://{}", addr);
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  POST /api/plans         - Quote installment plans");
    tracing::info!("  POST /api/plans/select  - Billing plan for a chosen schedule");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Build the router
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/plans", post(quote_plans))
        .route("/api/plans/select", post(select_plan))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
