use clap::Parser;
use rtid_node::cli;
use rtid_node::config::NodeConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();
    let config = NodeConfig::load_or_default(cli.config.as_deref());

    // RUST_LOG wins over the configured level. Logs go to stderr so JSON
    // output on stdout stays parseable.
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config.and_then(|config| cli::run(cli, config)) {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
