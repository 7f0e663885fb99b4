use serde::Deserialize;

/// Application configuration. Loaded from environment variables with
/// the prefix `MEDIAPLAN__`; every field has a working default so the
/// demo runs with no configuration at all.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding catalog files and the event log.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Catalog CSV files, concatenated before unification.
    #[serde(default = "default_catalog_files")]
    pub catalog_files: Vec<String>,
    /// Append-only JSONL event log.
    #[serde(default = "default_event_log")]
    pub event_log: String,
    /// Budget assigned to a plan line when the user gives none.
    #[serde(default = "default_budget")]
    pub default_budget: f64,
}

fn default_data_dir() -> String {
    "data".to_string()
}
fn default_catalog_files() -> Vec<String> {
    vec![
        "data/inventario_on.csv".to_string(),
        "data/inventario_off.csv".to_string(),
    ]
}
fn default_event_log() -> String {
    "data/events_log.jsonl".to_string()
}
fn default_budget() -> f64 {
    10_000.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_files: default_catalog_files(),
            event_log: default_event_log(),
            default_budget: default_budget(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MEDIAPLAN")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.data_dir, "data");
        assert_eq!(cfg.catalog_files.len(), 2);
        assert_eq!(cfg.event_log, "data/events_log.jsonl");
        assert!((cfg.default_budget - 10_000.0).abs() < f64::EPSILON);
    }
}
