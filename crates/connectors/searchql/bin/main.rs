use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use searchql::routes::create_router;
use searchql::state;
use searchql_configuration::environment::ProcessEnvironment;

#[derive(Parser)]
struct ServerOptions {
    /// Directory holding configuration.json
    #[arg(long, value_name = "CONFIGURATION_DIR", env = "SEARCHQL_CONFIGURATION_DIR")]
    configuration_dir: String,
    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let options = ServerOptions::parse();

    let parsed = searchql_configuration::parse_configuration(&options.configuration_dir).await?;
    let configuration = searchql_configuration::make_runtime_configuration(parsed, ProcessEnvironment)?;

    let mut metrics_registry = prometheus::Registry::new();
    let state = Arc::new(state::create_state(&configuration, &mut metrics_registry)?);
    let router = create_router(state, metrics_registry);

    let address: SocketAddr = format!("0.0.0.0:{}", options.port).parse()?;
    tracing::info!("Starting server on {}", address);

    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}
