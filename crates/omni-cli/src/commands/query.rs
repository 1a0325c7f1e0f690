use omni_client::OmniClient;
use omni_core::{OmniConfig, RequestDescriptor, ResultSet, TablePath};
use tracing::info;

use super::parse_columns;

pub async fn get(
    config: &OmniConfig,
    path: &str,
    filter: &str,
    columns: Vec<String>,
) -> anyhow::Result<()> {
    let request = RequestDescriptor::read(TablePath::parse(path)?)
        .filter(filter)
        .projection(columns);
    let rows = OmniClient::new(config)?.send(request).await?;
    info!(table = path, rows = rows.len(), "select complete");
    print_rows(&rows)
}

pub async fn insert(
    config: &OmniConfig,
    path: &str,
    set: &[String],
    json: Option<&str>,
) -> anyhow::Result<()> {
    let mut request = RequestDescriptor::insert(TablePath::parse(path)?);
    request.columns = parse_columns(set, json)?;
    let rows = OmniClient::new(config)?.send(request).await?;
    println!("✓ Inserted into {path}");
    if !rows.is_empty() {
        print_rows(&rows)?;
    }
    Ok(())
}

pub async fn update(
    config: &OmniConfig,
    path: &str,
    filter: &str,
    set: &[String],
    json: Option<&str>,
) -> anyhow::Result<()> {
    let mut request = RequestDescriptor::update(TablePath::parse(path)?, filter);
    request.columns = parse_columns(set, json)?;
    let rows = OmniClient::new(config)?.send(request).await?;
    println!("✓ Updated {path} where {filter}");
    if !rows.is_empty() {
        print_rows(&rows)?;
    }
    Ok(())
}

pub async fn delete(config: &OmniConfig, path: &str, filter: &str) -> anyhow::Result<()> {
    let request = RequestDescriptor::delete(TablePath::parse(path)?, filter);
    OmniClient::new(config)?.send(request).await?;
    println!("✓ Deleted from {path} where {filter}");
    Ok(())
}

fn print_rows(rows: &ResultSet) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}
