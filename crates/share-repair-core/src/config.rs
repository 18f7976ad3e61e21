use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_DATABASE_PATH: &str = "share_repair.db";

/// Storage identifier prefixes scanned by the owner pass, in scan order.
pub const DEFAULT_STORAGE_PREFIXES: [&str; 2] = ["home::", "object::user:"];

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: String,
    pub storage_prefixes: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            storage_prefixes: DEFAULT_STORAGE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("database_path", DEFAULT_DATABASE_PATH)?
        .set_default("storage_prefixes", DEFAULT_STORAGE_PREFIXES.to_vec())?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("SHARE_REPAIR")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("storage_prefixes"),
        )
        .build()?;
    let config = builder.try_deserialize::<AppConfig>()?;
    Ok(config.normalized())
}

impl AppConfig {
    /// Drop blank and repeated prefixes while keeping the configured order.
    pub fn normalized(mut self) -> Self {
        let mut seen: Vec<String> = Vec::new();
        for prefix in self.storage_prefixes.drain(..) {
            let prefix = prefix.trim().to_string();
            if prefix.is_empty() || seen.contains(&prefix) {
                continue;
            }
            seen.push(prefix);
        }
        self.storage_prefixes = seen;
        self
    }
}
