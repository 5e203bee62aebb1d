//! Application configuration. Storage paths and listing options.

use serde::Deserialize;
use std::path::PathBuf;

/// Courses ending within this many days are flagged as ending soon.
pub const DEFAULT_ENDING_SOON_DAYS: i64 = 7;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Base directory for exports and the default snapshot. Read from ROOM_BOOKING_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// JSON snapshot file. When unset the store lives in memory only. Read from ROOM_BOOKING_SNAPSHOT_PATH.
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Ending-soon window in days (default 7). Read from ROOM_BOOKING_ENDING_SOON_DAYS.
    #[serde(default)]
    pub ending_soon_days: Option<i64>,

    /// Default CSV path offered by export/import prompts. Read from ROOM_BOOKING_EXPORT_PATH.
    #[serde(default)]
    pub export_path: Option<String>,

    /// Import registers unknown teachers/rooms instead of rejecting the row (default true).
    /// Read from ROOM_BOOKING_CREATE_MISSING.
    #[serde(default)]
    pub create_missing: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("ROOM_BOOKING").try_parsing(true));
        if let Ok(path) = std::env::var("ROOM_BOOKING_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the data directory. Defaults to `./data`.
    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("./data"))
    }

    /// Returns the snapshot path, if persistence is enabled.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_path.as_deref().map(PathBuf::from)
    }

    /// Returns the ending-soon window. Negative values fall back to the default.
    pub fn ending_soon_days_or_default(&self) -> i64 {
        self.ending_soon_days
            .filter(|d| *d >= 0)
            .unwrap_or(DEFAULT_ENDING_SOON_DAYS)
    }

    /// Returns the CSV path for export/import. Defaults to `<data_dir>/courses.csv`.
    pub fn export_path_or_default(&self) -> PathBuf {
        self.export_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("courses.csv"))
    }

    pub fn create_missing_or_default(&self) -> bool {
        self.create_missing.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.ending_soon_days_or_default(), DEFAULT_ENDING_SOON_DAYS);
        assert_eq!(
            cfg.export_path_or_default(),
            PathBuf::from("./data/courses.csv")
        );
        assert!(cfg.snapshot_path().is_none());
        assert!(cfg.create_missing_or_default());
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig {
            data_dir: Some("/srv/booking".into()),
            ending_soon_days: Some(-2),
            create_missing: Some(false),
            ..Default::default()
        };
        assert_eq!(
            cfg.export_path_or_default(),
            PathBuf::from("/srv/booking/courses.csv")
        );
        assert_eq!(cfg.ending_soon_days_or_default(), DEFAULT_ENDING_SOON_DAYS);
        assert!(!cfg.create_missing_or_default());
    }
}
