use imagehub_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Initialize the application (database, storage, services, routes)
    let (_state, router) = imagehub_api::setup::initialize_app(config.clone()).await?;

    imagehub_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
