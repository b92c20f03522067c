use s3relay_core::RelayConfig;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize the application (settings store, services, routes)
    let (state, app) = s3relay_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    s3relay_api::setup::server::start_server(&config, state, app).await?;

    Ok(())
}
