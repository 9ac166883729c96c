//! Preferences: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, positional `DIR`, `--theme`)
//! 2. `$NOTETREE_CONFIG` environment variable (path to config file)
//! 3. Project-local `.notetree.toml` in the current working directory
//! 4. Global `~/.config/notetree/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory whose notes are shown (overridden by CLI positional arg).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<String>,
}

/// How notes are edited.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// "builtin" ($VISUAL / $EDITOR in the terminal) or "external".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Program used in external mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    /// Arguments for the external program; `%file%` is replaced by the note path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// How the notes folder is opened.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OpenerConfig {
    /// "system" (platform file manager) or "custom".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Program used in custom mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,
    /// Arguments for the custom program; `%path%` is replaced by the folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

/// Tree panel settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Use nerd font icons (false = ASCII fallback).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_icons: Option<bool>,
}

/// Preview panel settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Whether the preview panel is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Syntax highlighting theme (syntect theme name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syntax_theme: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark" or "light".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub editor: EditorConfig,
    pub opener: OpenerConfig,
    pub tree: TreeConfig,
    pub preview: PreviewConfig,
    pub theme: ThemeConfig,
}

/// Resolved editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Suspend the TUI and run `$VISUAL` / `$EDITOR` on the note.
    Builtin,
    /// Run the configured binary.
    External,
}

/// Resolved folder opener mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Platform opener (`xdg-open`, `open`, `explorer`).
    System,
    /// Run the configured binary.
    Custom,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Folder created under the user's documents directory by default.
pub const DEFAULT_BASE_DIR_NAME: &str = "TomboData";
/// Default external editor arguments.
pub const DEFAULT_EDITOR_ARGS: &str = "%file%";
/// Default custom opener arguments.
pub const DEFAULT_OPENER_ARGS: &str = "%path%";
/// Default syntect theme.
pub const DEFAULT_SYNTAX_THEME: &str = "base16-ocean.dark";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that one is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. $NOTETREE_CONFIG environment variable
    if let Ok(env_path) = std::env::var("NOTETREE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. Project-local `.notetree.toml` in CWD
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".notetree.toml"));
    }

    // 3. Global config
    if let Some(path) = global_config_path() {
        paths.push(path);
    }

    paths
}

/// `~/.config/notetree/config.toml` (platform equivalent).
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("notetree").join("config.toml"))
}

/// `<documents>/TomboData`, falling back to the home directory.
pub fn default_base_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_BASE_DIR_NAME)
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning logged).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                base_directory: other
                    .general
                    .base_directory
                    .clone()
                    .or(self.general.base_directory),
            },
            editor: EditorConfig {
                mode: other.editor.mode.clone().or(self.editor.mode),
                binary: other.editor.binary.clone().or(self.editor.binary),
                args: other.editor.args.clone().or(self.editor.args),
            },
            opener: OpenerConfig {
                mode: other.opener.mode.clone().or(self.opener.mode),
                binary: other.opener.binary.clone().or(self.opener.binary),
                args: other.opener.args.clone().or(self.opener.args),
            },
            tree: TreeConfig {
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
            },
            preview: PreviewConfig {
                enabled: other.preview.enabled.or(self.preview.enabled),
                syntax_theme: other
                    .preview
                    .syntax_theme
                    .clone()
                    .or(self.preview.syntax_theme),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        // Start with built-in defaults (all None).
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        let paths = candidate_paths();
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        // Explicit --config file has higher priority than candidates.
        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        // CLI flag overrides are highest priority.
        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    /// A config with every field set to its effective default.
    pub fn with_defaults() -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                base_directory: Some(default_base_directory().to_string_lossy().into_owned()),
            },
            editor: EditorConfig {
                mode: Some("builtin".to_string()),
                binary: None,
                args: Some(DEFAULT_EDITOR_ARGS.to_string()),
            },
            opener: OpenerConfig {
                mode: Some("system".to_string()),
                binary: None,
                args: Some(DEFAULT_OPENER_ARGS.to_string()),
            },
            tree: TreeConfig {
                use_icons: Some(true),
            },
            preview: PreviewConfig {
                enabled: Some(true),
                syntax_theme: Some(DEFAULT_SYNTAX_THEME.to_string()),
            },
            theme: ThemeConfig {
                scheme: Some("dark".to_string()),
            },
        }
    }

    /// Write this config to `path` unless a file is already there.
    ///
    /// Returns `true` if a file was written.
    pub fn write_if_missing(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(true)
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Directory whose notes are browsed.
    pub fn base_directory(&self) -> PathBuf {
        self.general
            .base_directory
            .as_deref()
            // Rebuilding from components drops trailing separators.
            .map(|dir| Path::new(dir).components().collect::<PathBuf>())
            .unwrap_or_else(default_base_directory)
    }

    /// Editor mode; anything other than "external" means builtin.
    pub fn edit_mode(&self) -> EditMode {
        match self.editor.mode.as_deref() {
            Some("external") => EditMode::External,
            _ => EditMode::Builtin,
        }
    }

    /// External editor program, if configured and non-blank.
    pub fn editor_binary(&self) -> Option<&str> {
        self.editor
            .binary
            .as_deref()
            .filter(|b| !b.trim().is_empty())
    }

    /// External editor argument template.
    pub fn editor_args(&self) -> &str {
        self.editor.args.as_deref().unwrap_or(DEFAULT_EDITOR_ARGS)
    }

    /// Opener mode; anything other than "custom" means system.
    pub fn open_mode(&self) -> OpenMode {
        match self.opener.mode.as_deref() {
            Some("custom") => OpenMode::Custom,
            _ => OpenMode::System,
        }
    }

    /// Custom opener program, if configured and non-blank.
    pub fn opener_binary(&self) -> Option<&str> {
        self.opener
            .binary
            .as_deref()
            .filter(|b| !b.trim().is_empty())
    }

    /// Custom opener argument template.
    pub fn opener_args(&self) -> &str {
        self.opener.args.as_deref().unwrap_or(DEFAULT_OPENER_ARGS)
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    /// Whether the preview panel is enabled.
    pub fn preview_enabled(&self) -> bool {
        self.preview.enabled.unwrap_or(true)
    }

    /// Syntax highlighting theme name.
    pub fn syntax_theme_name(&self) -> &str {
        self.preview
            .syntax_theme
            .as_deref()
            .unwrap_or(DEFAULT_SYNTAX_THEME)
    }

    /// Theme scheme: "dark" or "light".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.base_directory(), default_base_directory());
        assert_eq!(cfg.edit_mode(), EditMode::Builtin);
        assert_eq!(cfg.editor_binary(), None);
        assert_eq!(cfg.editor_args(), "%file%");
        assert_eq!(cfg.open_mode(), OpenMode::System);
        assert_eq!(cfg.opener_binary(), None);
        assert_eq!(cfg.opener_args(), "%path%");
        assert!(cfg.use_icons());
        assert!(cfg.preview_enabled());
        assert_eq!(cfg.syntax_theme_name(), "base16-ocean.dark");
        assert_eq!(cfg.theme_scheme(), "dark");
    }

    #[test]
    fn test_default_base_directory_name() {
        assert!(default_base_directory().ends_with("TomboData"));
    }

    #[test]
    fn test_base_directory_drops_trailing_separator() {
        let cfg = AppConfig {
            general: GeneralConfig {
                base_directory: Some("notes/".into()),
            },
            ..Default::default()
        };
        assert_eq!(cfg.base_directory(), PathBuf::from("notes"));

        let cfg = AppConfig {
            general: GeneralConfig {
                base_directory: Some("/home/me/notes//".into()),
            },
            ..Default::default()
        };
        assert_eq!(cfg.base_directory(), PathBuf::from("/home/me/notes"));
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
base_directory = "/home/me/notes"

[editor]
mode = "external"
binary = "code"
args = "--wait %file%"

[opener]
mode = "custom"
binary = "nautilus"
args = "%path%"

[tree]
use_icons = false

[preview]
enabled = false
syntax_theme = "Solarized (dark)"

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.base_directory(), PathBuf::from("/home/me/notes"));
        assert_eq!(cfg.edit_mode(), EditMode::External);
        assert_eq!(cfg.editor_binary(), Some("code"));
        assert_eq!(cfg.editor_args(), "--wait %file%");
        assert_eq!(cfg.open_mode(), OpenMode::Custom);
        assert_eq!(cfg.opener_binary(), Some("nautilus"));
        assert!(!cfg.use_icons());
        assert!(!cfg.preview_enabled());
        assert_eq!(cfg.syntax_theme_name(), "Solarized (dark)");
        assert_eq!(cfg.theme_scheme(), "light");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[editor]
mode = "external"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.edit_mode(), EditMode::External);
        // Everything else should be defaults
        assert_eq!(cfg.editor_args(), "%file%");
        assert_eq!(cfg.open_mode(), OpenMode::System);
    }

    #[test]
    fn test_unknown_modes_fall_back() {
        let toml = r#"
[editor]
mode = "emacs-please"

[opener]
mode = "whatever"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.edit_mode(), EditMode::Builtin);
        assert_eq!(cfg.open_mode(), OpenMode::System);
    }

    #[test]
    fn test_blank_binary_is_none() {
        let cfg: AppConfig = toml::from_str("[editor]\nbinary = \"  \"\n").expect("parse");
        assert_eq!(cfg.editor_binary(), None);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            editor: EditorConfig {
                mode: Some("external".into()),
                binary: Some("vim".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let over = AppConfig {
            editor: EditorConfig {
                binary: Some("hx".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.edit_mode(), EditMode::External); // from base
        assert_eq!(merged.editor_binary(), Some("hx")); // overridden
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            tree: TreeConfig {
                use_icons: Some(false),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert!(!merged.use_icons());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
base_directory = "/from/file"

[theme]
scheme = "light"
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                base_directory: Some("/from/cli".into()),
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        // CLI override wins
        assert_eq!(cfg.base_directory(), PathBuf::from("/from/cli"));
        // File value preserved (not overridden by CLI)
        assert_eq!(cfg.theme_scheme(), "light");
    }

    #[test]
    fn test_write_if_missing_round_trips_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let defaults = AppConfig::with_defaults();

        assert!(defaults.write_if_missing(&path).expect("write"));
        let loaded = load_file(&path).expect("reload");
        assert_eq!(loaded.base_directory(), defaults.base_directory());
        assert_eq!(loaded.editor.mode.as_deref(), Some("builtin"));
        assert_eq!(loaded.opener.mode.as_deref(), Some("system"));
        assert_eq!(loaded.editor.binary, None);
    }

    #[test]
    fn test_write_if_missing_keeps_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[theme]\nscheme = \"light\"\n").expect("write");

        assert!(!AppConfig::with_defaults().write_if_missing(&path).expect("write"));
        let loaded = load_file(&path).expect("reload");
        assert_eq!(loaded.theme_scheme(), "light");
    }
}
