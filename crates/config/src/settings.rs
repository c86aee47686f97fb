// Application settings
// Loaded from ~/.config/dowell/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Grid
    #[serde(rename = "grid.defaultRows")]
    pub default_rows: usize,

    #[serde(rename = "grid.defaultColumns")]
    pub default_columns: usize,

    // Workbook
    #[serde(rename = "workbook.author")]
    pub author: String,

    // Storage
    #[serde(rename = "storage.databasePath")]
    pub database_path: Option<PathBuf>,

    // Find
    #[serde(rename = "find.matchCase")]
    pub match_case: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_rows: 10,
            default_columns: 10,
            author: "DoWell User".to_string(),
            database_path: None,
            match_case: false,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dowell");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file();
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&strip_comments(&contents)) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing settings.json: {}", e);
                    eprintln!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Database file to open: the configured path, or the platform
    /// data directory default.
    pub fn database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dowell")
                .join("dowell.db"),
        }
    }

    /// Create default settings file with comments
    fn create_default_file(&self) {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Grid dimensions for new worksheets
    "grid.defaultRows": 10,
    "grid.defaultColumns": 10,

    // Author recorded on new workbooks
    "workbook.author": "DoWell User",

    // Database location (null = platform data dir)
    "storage.databasePath": null,

    // Find
    "find.matchCase": false
}
"#;

        if let Err(e) = fs::write(&path, default_config) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }
}

/// Strip comments (lines starting with //) before JSON parsing
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_rows, 10);
        assert_eq!(settings.default_columns, 10);
        assert_eq!(settings.author, "DoWell User");
        assert!(settings.database_path.is_none());
        assert!(!settings.match_case);
    }

    #[test]
    fn test_dotted_keys_parse() {
        let settings: Settings = serde_json::from_str(
            r#"{"grid.defaultRows": 25, "workbook.author": "Alice"}"#,
        )
        .unwrap();
        assert_eq!(settings.default_rows, 25);
        assert_eq!(settings.default_columns, 10);
        assert_eq!(settings.author, "Alice");
    }

    #[test]
    fn test_comment_lines_are_stripped() {
        let contents = r#"{
    // how many rows new sheets get
    "grid.defaultRows": 12,
    "find.matchCase": true
}"#;
        let settings: Settings =
            serde_json::from_str(&strip_comments(contents)).unwrap();
        assert_eq!(settings.default_rows, 12);
        assert!(settings.match_case);
    }

    #[test]
    fn test_database_path_override() {
        let settings = Settings {
            database_path: Some(PathBuf::from("/tmp/dowell-test.db")),
            ..Settings::default()
        };
        assert_eq!(
            settings.database_path(),
            PathBuf::from("/tmp/dowell-test.db")
        );
    }

    #[test]
    fn test_default_database_path_ends_with_db_file() {
        let settings = Settings::default();
        let path = settings.database_path();
        assert!(path.ends_with("dowell/dowell.db"));
    }
}
