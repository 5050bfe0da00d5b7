use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use intake_api::config::ApiConfig;
use intake_api::state::AppState;
use intake_api::submission::S3FormRepository;
use intake_notify::ResendClient;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env();
    if config.resend.api_key.is_none() {
        tracing::warn!("RESEND_API_KEY is not set; notifications will fail");
    }

    let s3 = intake_storage::client::build_client().await;
    let state = AppState::new(
        Arc::new(S3FormRepository {
            client: s3,
            bucket: config.bucket.clone(),
        }),
        Arc::new(ResendClient::new(config.resend.clone())),
    );
    let app = intake_api::router(state);

    if config.lambda {
        lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
    } else {
        let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
        tracing::info!(addr = %config.listen_addr, "listening");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
