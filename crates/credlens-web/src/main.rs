use std::net::SocketAddr;
use std::sync::Arc;

use credlens_extract::ExtractClient;
use credlens_report::ReportClient;
use credlens_web::config::Config;
use credlens_web::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Both directories must exist before the first request arrives.
    std::fs::create_dir_all(&config.upload_dir)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let extractor = ExtractClient::new(
        config.extract_base_url.clone(),
        config.extract_client_id.clone(),
        config.extract_client_secret.clone(),
        config.extract_timeout,
    )?;
    let reporter = ReportClient::new(
        config.report_base_url.clone(),
        config.report_api_key.clone(),
        config.report_model.clone(),
        config.report_timeout,
    )?;

    let port = config.port;
    let state = Arc::new(AppState {
        config,
        extractor: Arc::new(extractor),
        reporter: Arc::new(reporter),
    });

    let app = credlens_web::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
