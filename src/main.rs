use std::path::Path;

use color_eyre::eyre::bail;
use log::{error, info};
use tracing::instrument;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use adsl_exchange::record::Record;
use adsl_exchange::{ExchangeClient, LookupConfig};

const OUT_FILE: &str = "result/exchanges.csv";

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    init_tracing();
    color_eyre::install()?;

    run().await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .init();
}

async fn run() -> color_eyre::Result<()> {
    let addresses = std::env::args().skip(1).collect::<Vec<_>>();
    if addresses.is_empty() {
        bail!("usage: adsl-exchange <address>...");
    }

    let client = ExchangeClient::with_config(LookupConfig::from_env())?;
    let records = lookup_addresses(&client, &addresses).await;

    info!("finished looking up, [{}/{}] addresses resolved", records.len(), addresses.len());
    info!("saving records to [{}]", OUT_FILE);
    save_records(records.into_iter().flatten().collect(), OUT_FILE)?;
    Ok(())
}

/// look up every address in turn; failures are logged and skipped
async fn lookup_addresses(client: &ExchangeClient, addresses: &[String]) -> Vec<Vec<Record>> {
    let total = addresses.len();
    let mut records = Vec::with_capacity(total);
    for (idx, address) in addresses.iter().enumerate() {
        info!("[{}/{total}] looking up [{}]", idx + 1, address);
        match lookup_address(client, address).await {
            Ok(rows) => records.push(rows),
            Err(e) => error!("cannot look up [{}]: {}", address, e),
        }
    }
    records
}

#[instrument(skip(client))]
async fn lookup_address(client: &ExchangeClient, address: &str) -> color_eyre::Result<Vec<Record>> {
    let info = client.lookup(address).await?;
    Ok(Record::from_lookup(address, info))
}

/// write result to CSV file
fn save_records(records: Vec<Record>, save_path: impl AsRef<Path>) -> color_eyre::Result<()> {
    if let Some(parent) = save_path.as_ref().parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(save_path)?;
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
