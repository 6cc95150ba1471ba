use messages2cli::config::{wants_help, ProxyConfig, USAGE};
use messages2cli::server::Server;
use messages2cli::util::init_tracing;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if wants_help(&args) {
        println!("{USAGE}");
        return Ok(());
    }

    init_tracing();

    let config = ProxyConfig::from_env_and_args(&args)?;
    tracing::info!(
        program = %config.program.display(),
        timeout_secs = config.timeout.as_secs(),
        "generator configured"
    );

    let server = Server::from_config(&config).await?;
    println!(
        "Use api_base='http://{}' in your requests. Press Ctrl+C to stop.",
        server.local_addr()
    );
    server.run().await
}
