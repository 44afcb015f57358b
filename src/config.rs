use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `key = value` or `[Section]`, got {text:?}")]
    Malformed { line: usize, text: String },
}

/// Key/value configuration with an optional global block and `[Section]`s.
///
/// ```text
/// # comment
/// app = "demo"
///
/// [Logging]
/// level = info
/// ```
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut globals = HashMap::new();
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_section: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim();
                sections.entry(name.to_string()).or_default();
                current_section = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Malformed {
                    line: idx + 1,
                    text: line.to_string(),
                });
            };
            let key = key.trim().to_string();
            let value = value.trim().trim_matches('"').to_string();

            match &current_section {
                None => {
                    globals.insert(key, value);
                }
                Some(sec) => {
                    sections.entry(sec.clone()).or_default().insert(key, value);
                }
            }
        }
        Ok(Config { globals, sections })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn section(&self, section: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(section)
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_globals_sections_and_comments() {
        let cfg = Config::parse(
            "# top\napp = \"demo\"\n\n[Logging]\nlevel = debug\nempty =\n[Levels]\nhttp=warn\n",
        )
        .unwrap();

        assert_eq!(cfg.get_global("app"), Some("demo"));
        assert_eq!(cfg.get("Logging", "level"), Some("debug"));
        assert_eq!(cfg.get("Logging", "empty"), Some(""));
        assert_eq!(cfg.get_non_empty("Logging", "empty"), None);
        assert_eq!(cfg.get("Levels", "http"), Some("warn"));
        assert_eq!(cfg.get_or_default("Levels", "app", "x"), "demo");
        assert_eq!(cfg.get_or_default("Levels", "nope", "x"), "x");
    }

    #[test]
    fn empty_section_is_still_listed() {
        let cfg = Config::parse("[Levels]\n").unwrap();
        assert!(cfg.section("Levels").is_some_and(HashMap::is_empty));
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let err = Config::parse("[Logging]\nlevel = info\njunk\n").unwrap_err();
        match err {
            ConfigError::Malformed { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "junk");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[Logging]\nlevel = error").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.get("Logging", "level"), Some("error"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load("/definitely/not/here.conf").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
