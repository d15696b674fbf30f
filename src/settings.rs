//! Settings infrastructure for templsp.
//!
//! Settings live in a `templsp.toml` file next to (or above) the workspace and
//! configure which tagged literals are templates and how they are analyzed.
//!
//! ```toml
//! [templates]
//! tags = ["html", "svg"]
//!
//! [analysis]
//! globals = ["window", "console"]
//! unknown_events = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

/// File name searched for by [`discover_settings`].
pub const SETTINGS_FILE: &str = "templsp.toml";

/// Root settings structure loaded from templsp.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub templates: TemplateSettings,
    pub analysis: AnalysisSettings,
}

/// Which literals are templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Tag names that mark a template literal as a template.
    pub tags: Vec<String>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            tags: vec!["html".to_string()],
        }
    }
}

/// How template contents are analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Names that resolve in template expressions without a declaration.
    pub globals: Vec<String>,

    /// Report listeners for events outside the built-in set (default: true).
    pub unknown_events: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            globals: Vec::new(),
            unknown_events: true,
        }
    }
}

/// Load settings from a templsp.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse settings, using defaults");
                Settings::default()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read settings, using defaults");
            Settings::default()
        }
    }
}

/// Discover templsp.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found file. If not found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    return (load_settings(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a unique temp directory for test isolation.
    fn make_test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("templsp-test")
            .join(name)
            .join(format!("{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup_test_dir(dir: &Path) {
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.templates.tags, vec!["html"]);
        assert!(settings.analysis.globals.is_empty());
        assert!(settings.analysis.unknown_events);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings: Settings = toml::from_str("[analysis]\nglobals = [\"window\"]\n").unwrap();
        assert_eq!(settings.templates.tags, vec!["html"]);
        assert_eq!(settings.analysis.globals, vec!["window"]);
        assert!(settings.analysis.unknown_events);
    }

    #[test]
    fn full_file() {
        let settings: Settings = toml::from_str(
            r#"
[templates]
tags = ["html", "svg"]

[analysis]
globals = ["console"]
unknown_events = false
"#,
        )
        .unwrap();
        assert_eq!(settings.templates.tags, vec!["html", "svg"]);
        assert!(!settings.analysis.unknown_events);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = make_test_dir("invalid");
        let path = dir.join(SETTINGS_FILE);
        std::fs::write(&path, "[templates]\ntags = 3\n").unwrap();

        assert_eq!(load_settings(&path), Settings::default());

        cleanup_test_dir(&dir);
    }

    #[test]
    fn discover_settings_in_current_dir() {
        let dir = make_test_dir("discover-current");
        std::fs::write(dir.join(SETTINGS_FILE), "[templates]\ntags = [\"svg\"]\n").unwrap();

        let (settings, settings_dir) = discover_settings(&dir);
        assert_eq!(settings_dir, dir);
        assert_eq!(settings.templates.tags, vec!["svg"]);

        cleanup_test_dir(&dir);
    }

    #[test]
    fn discover_settings_in_parent_dir() {
        let parent = make_test_dir("discover-parent");
        let child = parent.join("subdir");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(parent.join(SETTINGS_FILE), "[analysis]\nglobals = [\"a\"]\n").unwrap();

        let (settings, settings_dir) = discover_settings(&child);
        assert_eq!(settings_dir, parent);
        assert_eq!(settings.analysis.globals, vec!["a"]);

        cleanup_test_dir(&parent);
    }

    #[test]
    fn discover_settings_in_child_dir() {
        let parent = make_test_dir("discover-child");
        let child = parent.join("config");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(child.join(SETTINGS_FILE), "[analysis]\nunknown_events = false\n").unwrap();

        let (settings, settings_dir) = discover_settings(&parent);
        assert_eq!(settings_dir, child);
        assert!(!settings.analysis.unknown_events);

        cleanup_test_dir(&parent);
    }

    #[test]
    fn discover_settings_not_found() {
        let dir = make_test_dir("discover-none");

        let (settings, settings_dir) = discover_settings(&dir);
        assert_eq!(settings_dir, dir);
        assert_eq!(settings, Settings::default());

        cleanup_test_dir(&dir);
    }

    #[test]
    fn discover_settings_parent_preferred_over_child() {
        let parent = make_test_dir("discover-priority");
        let child = parent.join("nested");
        std::fs::create_dir_all(&child).unwrap();

        std::fs::write(parent.join(SETTINGS_FILE), "[templates]\ntags = [\"parent\"]\n").unwrap();
        std::fs::write(child.join(SETTINGS_FILE), "[templates]\ntags = [\"child\"]\n").unwrap();

        let (settings, settings_dir) = discover_settings(&parent);
        assert_eq!(settings_dir, parent);
        assert_eq!(settings.templates.tags, vec!["parent"]);

        cleanup_test_dir(&parent);
    }
}
