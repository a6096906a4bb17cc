//! Logging bootstrap
//!
//! Levels come from a JSON mapping file when `LOG_CFG` points at one (or a
//! `logging.json` exists in the working directory); otherwise the standard
//! `RUST_LOG` filter applies, falling back to `info`.
//!
//! Config file shape:
//!
//! ```json
//! {
//!   "level": "info",
//!   "targets": { "stratus_cloud_ibm": "debug" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

const LOG_CFG_ENV: &str = "LOG_CFG";
const DEFAULT_CONFIG_PATH: &str = "logging.json";
const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Default, Deserialize)]
struct LogConfig {
    level: Option<String>,
    #[serde(default)]
    targets: HashMap<String, String>,
}

impl LogConfig {
    /// Render the config as an `EnvFilter` directive string,
    /// e.g. `info,stratus_cloud_ibm=debug`.
    fn directives(&self) -> String {
        let mut directives = vec![
            self.level
                .clone()
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
        ];
        let mut targets: Vec<_> = self.targets.iter().collect();
        targets.sort();
        for (target, level) in targets {
            directives.push(format!("{target}={level}"));
        }
        directives.join(",")
    }
}

pub fn init() {
    let filter = match load_config() {
        Some(config) => EnvFilter::new(config.directives()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    };

    // stdout is reserved for command output (the `resources` JSON dump);
    // logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Option<LogConfig> {
    let path = std::env::var(LOG_CFG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let path = Path::new(&path);
    if !path.exists() {
        return None;
    }

    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("ignoring invalid logging config {}: {e}", path.display());
            None
        }
    }
}
