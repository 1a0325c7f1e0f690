pub mod query;
pub mod schema;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use omni_core::{ColumnValue, OmniConfig, ResponseMode};

/// Server and cache settings. Flags override values from `--config`.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// omni.toml with url, user, password, timeout_secs, cache_dir, response_mode
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// REST API base URL, e.g. http://host:8080/objectserver/restapi
    #[arg(long, global = true)]
    url: Option<String>,
    #[arg(long, global = true)]
    user: Option<String>,
    #[arg(long, global = true)]
    password: Option<String>,
    /// Request timeout in seconds (0 = wait indefinitely)
    #[arg(long, global = true)]
    timeout: Option<f64>,
    /// Directory for cached column types
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
    /// Fail on responses that are neither rows nor an exception
    #[arg(long, global = true)]
    strict: bool,
}

impl ConnectionArgs {
    pub fn resolve(&self) -> anyhow::Result<OmniConfig> {
        let mut config = match (&self.config, &self.url) {
            (Some(path), _) => OmniConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            (None, Some(url)) => OmniConfig::new(url, "", ""),
            (None, None) => bail!("no server configured: pass --url or --config"),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(secs) = self.timeout {
            let timeout = Duration::try_from_secs_f64(secs)
                .context("--timeout must be a non-negative number of seconds")?;
            config = config.with_timeout(timeout);
        }
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if self.strict {
            config = config.with_response_mode(ResponseMode::Strict);
        }
        Ok(config)
    }
}

/// Collect write values from `--json` and `--set` (the latter wins).
///
/// `--set` values stay strings; integer and timestamp columns parse them
/// during synthesis, string columns take them verbatim.
pub fn parse_columns(
    set: &[String],
    json: Option<&str>,
) -> anyhow::Result<BTreeMap<String, ColumnValue>> {
    let mut columns = BTreeMap::new();

    if let Some(json) = json {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("--json must be a JSON object")?;
        for (name, value) in object {
            columns.insert(name, ColumnValue::from(value));
        }
    }

    for assignment in set {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("expected COLUMN=VALUE, got {assignment:?}");
        };
        if name.is_empty() {
            bail!("empty column name in {assignment:?}");
        }
        columns.insert(name.to_string(), ColumnValue::from(value));
    }

    if columns.is_empty() {
        bail!("no column values given: use --set COLUMN=VALUE or --json");
    }
    Ok(columns)
}
