use clap::Parser;
use tagforge::{init_logging, run, DriverOptions};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = DriverOptions::parse();

    init_logging()?;
    info!(
        "tagforge {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATE")
    );

    run(&options).await?;
    Ok(())
}
