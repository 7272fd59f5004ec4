//! Project configuration loaded from `kelp.toml`.

use kelp_syntax::{EntryPoint, ParseOptions, WhitespacePolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

pub(crate) const CONFIG_FILES: &[&str] = &["kelp.toml", ".kelp.toml"];

/// Effective CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Config file path (if found).
    pub config_path: Option<PathBuf>,
    /// Entry point used when neither `--script` nor the file extension
    /// decides.
    pub mode: EntryPoint,
    /// Trivia that separates statements.
    pub separator_policy: WhitespacePolicy,
}

impl Config {
    /// Load configuration from `explicit`, or from the first config file
    /// found in `root`. Problems are logged and the defaults are used.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Self {
        let config_path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(root),
        };
        let Some(path) = config_path else {
            return Config::default();
        };
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Failed to read kelp config at {}: {err}", path.display());
                return Config::default();
            }
        };
        Config::from_contents(Some(path), &contents)
    }

    pub fn from_contents(config_path: Option<PathBuf>, contents: &str) -> Self {
        let mut config = Config {
            config_path,
            ..Config::default()
        };
        let parsed: ConfigFile = match toml::from_str(contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                if let Some(path) = &config.config_path {
                    warn!("Failed to parse kelp config at {}: {err}", path.display());
                } else {
                    warn!("Failed to parse kelp config: {err}");
                }
                return config;
            }
        };

        if let Some(mode) = parsed.parser.mode {
            config.mode = mode.into();
        }
        if let Some(policy) = parsed.parser.separator_policy {
            config.separator_policy = policy.into();
        }
        config
    }

    /// Parse options for one file.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default().with_separator_policy(self.separator_policy)
    }

    /// Picks the entry point for `path`: `--script`, then a `.kts`
    /// extension, then the configured mode.
    pub fn entry_point(&self, path: &Path, script: bool) -> EntryPoint {
        if script || path.extension().is_some_and(|ext| ext == "kts") {
            EntryPoint::Script
        } else {
            self.mode
        }
    }
}

pub(crate) fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    parser: ParserSection,
}

#[derive(Debug, Default, Deserialize)]
struct ParserSection {
    mode: Option<ModeSetting>,
    separator_policy: Option<SeparatorSetting>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ModeSetting {
    File,
    Script,
}

impl From<ModeSetting> for EntryPoint {
    fn from(mode: ModeSetting) -> Self {
        match mode {
            ModeSetting::File => EntryPoint::File,
            ModeSetting::Script => EntryPoint::Script,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum SeparatorSetting {
    Newline,
    NewlineOrComment,
    Any,
}

impl From<SeparatorSetting> for WhitespacePolicy {
    fn from(setting: SeparatorSetting) -> Self {
        match setting {
            SeparatorSetting::Newline => WhitespacePolicy::Newline,
            SeparatorSetting::NewlineOrComment => WhitespacePolicy::NewlineOrComment,
            SeparatorSetting::Any => WhitespacePolicy::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_section() {
        let config = Config::from_contents(
            None,
            "[parser]\nmode = \"script\"\nseparator_policy = \"newline-or-comment\"\n",
        );
        assert_eq!(config.mode, EntryPoint::Script);
        assert_eq!(config.separator_policy, WhitespacePolicy::NewlineOrComment);
        assert_eq!(
            config.parse_options().separator_policy,
            WhitespacePolicy::NewlineOrComment
        );
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = Config::from_contents(None, "# nothing here\n");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let path = PathBuf::from("kelp.toml");
        let config = Config::from_contents(Some(path.clone()), "[parser]\nmode = \"module\"\n");
        assert_eq!(config.mode, EntryPoint::File);
        assert_eq!(config.separator_policy, WhitespacePolicy::Newline);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_entry_point_selection() {
        let config = Config::default();
        assert_eq!(config.entry_point(Path::new("a.kt"), false), EntryPoint::File);
        assert_eq!(config.entry_point(Path::new("a.kt"), true), EntryPoint::Script);
        assert_eq!(config.entry_point(Path::new("build.kts"), false), EntryPoint::Script);

        let config = Config {
            mode: EntryPoint::Script,
            ..Config::default()
        };
        assert_eq!(config.entry_point(Path::new("a.kt"), false), EntryPoint::Script);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!("kelp-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("kelp.toml"), "[parser]\nseparator_policy = \"any\"\n").unwrap();

        let config = Config::load(&dir, None);
        assert_eq!(config.separator_policy, WhitespacePolicy::Any);
        assert_eq!(config.config_path, Some(dir.join("kelp.toml")));

        let missing = Config::load(&dir, Some(&dir.join("absent.toml")));
        assert_eq!(missing, Config::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
