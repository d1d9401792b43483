use std::path::PathBuf;

use crate::fpl_fetch::FPL_API_BASE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Fake,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// FPL_API_BASE
    pub api_base: String,
    /// FPL_EXPORT_DIR, where CSV/XLSX exports are written.
    pub export_dir: PathBuf,
    /// FPL_SOURCE: `live` (default) or `fake` for the built-in demo data.
    pub source: SourceKind,
    /// FPL_LOG, a tracing filter directive.
    pub log_filter: String,
    /// FPL_LOG_FILE; the TUI only logs when this is set.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Loads `.env.local` and `.env` (if present) and reads the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let source = match non_empty("FPL_SOURCE").map(|v| v.to_ascii_lowercase()) {
            Some(v) if v == "fake" => SourceKind::Fake,
            _ => SourceKind::Live,
        };

        Self {
            api_base: non_empty("FPL_API_BASE").unwrap_or_else(|| FPL_API_BASE.to_string()),
            export_dir: non_empty("FPL_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            source,
            log_filter: non_empty("FPL_LOG").unwrap_or_else(|| "info".to_string()),
            log_file: non_empty("FPL_LOG_FILE").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.api_base, FPL_API_BASE);
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert_eq!(cfg.source, SourceKind::Live);
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let cfg = config_from(&[
            ("FPL_API_BASE", "http://localhost:9000/api"),
            ("FPL_SOURCE", "FAKE"),
            ("FPL_EXPORT_DIR", "  "),
            ("FPL_LOG_FILE", "/tmp/fpl.log"),
        ]);
        assert_eq!(cfg.api_base, "http://localhost:9000/api");
        assert_eq!(cfg.source, SourceKind::Fake);
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/fpl.log")));
    }
}
