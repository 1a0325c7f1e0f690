use omni_client::OmniClient;
use omni_core::{OmniConfig, TablePath};

pub async fn show(config: &OmniConfig, path: &str) -> anyhow::Result<()> {
    let table = TablePath::parse(path)?;
    let schema = OmniClient::new(config)?.schema(&table).await?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

pub fn forget(config: &OmniConfig, path: &str) -> anyhow::Result<()> {
    let table = TablePath::parse(path)?;
    let client = OmniClient::new(config)?;
    if client.store().remove(&table)? {
        println!("✓ Forgot cached schema for {table}");
    } else {
        println!("No cached schema for {table} in {}", config.cache_dir().display());
    }
    Ok(())
}
