mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::external::finnhub::FinnhubProvider;
use crate::logging::LoggingConfig;
use crate::services::news_service::NewsProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(&LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let market_data = external::market_data_provider(config.provider)?;
    info!("📊 Using market data provider: {}", config.provider);

    let news_provider: Option<Arc<dyn NewsProvider>> = match FinnhubProvider::from_env() {
        Ok(provider) => {
            info!("📰 Using news provider: Finnhub");
            Some(Arc::new(provider))
        }
        Err(e) => {
            warn!("📰 News endpoint disabled: {}", e);
            None
        }
    };

    let state = AppState {
        market_data,
        news_provider,
        news_config: config.news,
        include_profile: config.include_profile,
    };
    let app = app::create_app(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Stockchart backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
