use tracing_subscriber::{EnvFilter, fmt};
use tracing::{debug, error};

use stockdash::cli;
use stockdash::config::ClientConfig;
use stockdash::error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match cli::parse_args(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}\n\n{}", e, cli::usage("stockdash"));
            std::process::exit(64);
        }
    };
    let config = ClientConfig::from_env();
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    debug!(target: "stockdash::cli", "stockdash starting: RUST_LOG='{}', api='{}'", rust_log, config.api_url);

    if let Err(e) = cli::run(parsed, config).await {
        if e.downcast_ref::<AppError>().map_or(false, |a| a.is_authentication_required()) {
            error!(target: "stockdash::cli", "session expired or invalid; log in again");
            std::process::exit(2);
        }
        return Err(e);
    }
    Ok(())
}
