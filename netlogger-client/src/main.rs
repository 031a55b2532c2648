use anyhow::{Context, Result};
use std::collections::BTreeMap;

use netlogger_client::{ClientConfig, FetchOutcome, NetLoggerClient};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::load_or_default(CONFIG_PATH)?;

    let _logging_guard = netlogger_client::logging::init_logging(&config)?;

    tracing::info!("NetLogger client starting against {}", config.base_url);

    let mut client = NetLoggerClient::new(&config).context("Failed to build NetLogger client")?;

    let nets = match client.get_active_nets().await? {
        FetchOutcome::Data(nets) => nets,
        FetchOutcome::NoData(reason) => {
            tracing::warn!("No active nets: {}", reason);
            return Ok(());
        }
    };

    let mut per_server: BTreeMap<&str, usize> = BTreeMap::new();
    for net in &nets {
        *per_server.entry(net.server.as_str()).or_default() += 1;
    }
    for (server, count) in &per_server {
        tracing::info!("{}: {} active nets", server, count);
    }

    let json = serde_json::to_string_pretty(&nets).context("Failed to serialize nets")?;
    println!("{}", json);

    Ok(())
}
