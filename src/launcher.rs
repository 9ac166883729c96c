//! Editor and folder-opener invocation.
//!
//! Command construction is pure so it can be checked without spawning
//! anything; [`spawn_detached`] and [`run_in_terminal`] do the actual work.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::config::{AppConfig, EditMode, OpenMode};
use crate::error::{AppError, Result};

/// Placeholder replaced by the note path in editor arguments.
pub const FILE_PLACEHOLDER: &str = "%file%";
/// Placeholder replaced by the folder path in opener arguments.
pub const PATH_PLACEHOLDER: &str = "%path%";

/// A program and its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// How an editor command has to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorLaunch {
    /// Takes over the terminal; the TUI must be suspended around it.
    InTerminal(LaunchCommand),
    /// Runs on its own; the TUI keeps going.
    Detached(LaunchCommand),
}

/// Split a whitespace-separated argument template and substitute
/// `placeholder` with `value` in every token.
///
/// Substitution happens after splitting, so a value containing spaces stays
/// a single argument.
pub fn expand_args(template: &str, placeholder: &str, value: &str) -> Vec<String> {
    template
        .split_whitespace()
        .map(|token| token.replace(placeholder, value))
        .collect()
}

/// Terminal editor command line from `$VISUAL`, then `$EDITOR`, then `vi`.
pub fn terminal_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// The platform's "open this with the default app" program.
pub fn system_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Build the command that edits `file` according to the preferences.
///
/// `terminal_editor` is the `$VISUAL`/`$EDITOR` command line used in
/// builtin mode; it may carry its own arguments.
pub fn editor_command(config: &AppConfig, terminal_editor: &str, file: &Path) -> Result<EditorLaunch> {
    let file = file.to_string_lossy();
    match config.edit_mode() {
        EditMode::Builtin => {
            let mut parts = terminal_editor.split_whitespace().map(str::to_string);
            let program = parts
                .next()
                .ok_or_else(|| AppError::Launch("no terminal editor set".into()))?;
            let mut args: Vec<String> = parts.collect();
            args.push(file.into_owned());
            Ok(EditorLaunch::InTerminal(LaunchCommand { program, args }))
        }
        EditMode::External => {
            let program = config
                .editor_binary()
                .ok_or_else(|| AppError::Launch("no external editor configured".into()))?;
            Ok(EditorLaunch::Detached(LaunchCommand {
                program: program.to_string(),
                args: expand_args(config.editor_args(), FILE_PLACEHOLDER, &file),
            }))
        }
    }
}

/// Build the command that opens the folder `dir` according to the preferences.
pub fn opener_command(config: &AppConfig, dir: &Path) -> Result<LaunchCommand> {
    let dir = dir.to_string_lossy();
    match config.open_mode() {
        OpenMode::System => Ok(LaunchCommand {
            program: system_opener().to_string(),
            args: vec![dir.into_owned()],
        }),
        OpenMode::Custom => {
            let program = config
                .opener_binary()
                .ok_or_else(|| AppError::Launch("no folder opener configured".into()))?;
            Ok(LaunchCommand {
                program: program.to_string(),
                args: expand_args(config.opener_args(), PATH_PLACEHOLDER, &dir),
            })
        }
    }
}

/// Start `cmd` without waiting for it and without sharing the terminal.
pub fn spawn_detached(cmd: &LaunchCommand) -> Result<()> {
    cmd.to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| AppError::Launch(format!("{}: {}", cmd.program, e)))?;
    tracing::info!(program = %cmd.program, args = ?cmd.args, "spawned detached process");
    Ok(())
}

/// Run `cmd` in the current terminal and wait for it to exit.
pub fn run_in_terminal(cmd: &LaunchCommand) -> Result<ExitStatus> {
    let status = cmd
        .to_command()
        .status()
        .map_err(|e| AppError::Launch(format!("{}: {}", cmd.program, e)))?;
    tracing::info!(program = %cmd.program, code = ?status.code(), "terminal editor exited");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EditorConfig, OpenerConfig};

    fn external_editor(binary: Option<&str>, args: Option<&str>) -> AppConfig {
        AppConfig {
            editor: EditorConfig {
                mode: Some("external".into()),
                binary: binary.map(String::from),
                args: args.map(String::from),
            },
            ..Default::default()
        }
    }

    #[test]
    fn expand_args_substitutes_in_every_token() {
        assert_eq!(
            expand_args("--wait %file% --line=1", "%file%", "/n/a.md"),
            vec!["--wait", "/n/a.md", "--line=1"]
        );
        assert_eq!(
            expand_args("--goto=%file%:1", "%file%", "/n/a.md"),
            vec!["--goto=/n/a.md:1"]
        );
    }

    #[test]
    fn expand_args_keeps_spaced_value_whole() {
        assert_eq!(
            expand_args("%path%", "%path%", "/my notes/work"),
            vec!["/my notes/work"]
        );
    }

    #[test]
    fn expand_args_empty_template() {
        assert!(expand_args("   ", "%file%", "/x").is_empty());
    }

    #[test]
    fn builtin_editor_appends_file() {
        let cfg = AppConfig::default();
        let launch = editor_command(&cfg, "nvim -u NONE", Path::new("/n/a.md")).unwrap();
        assert_eq!(
            launch,
            EditorLaunch::InTerminal(LaunchCommand {
                program: "nvim".into(),
                args: vec!["-u".into(), "NONE".into(), "/n/a.md".into()],
            })
        );
    }

    #[test]
    fn builtin_editor_blank_is_error() {
        let cfg = AppConfig::default();
        let err = editor_command(&cfg, "  ", Path::new("/n/a.md")).unwrap_err();
        assert!(matches!(err, AppError::Launch(_)));
    }

    #[test]
    fn external_editor_uses_template() {
        let cfg = external_editor(Some("code"), Some("--wait %file%"));
        let launch = editor_command(&cfg, "vi", Path::new("/n/a.md")).unwrap();
        assert_eq!(
            launch,
            EditorLaunch::Detached(LaunchCommand {
                program: "code".into(),
                args: vec!["--wait".into(), "/n/a.md".into()],
            })
        );
    }

    #[test]
    fn external_editor_default_args_is_file() {
        let cfg = external_editor(Some("gedit"), None);
        match editor_command(&cfg, "vi", Path::new("/n/a.md")).unwrap() {
            EditorLaunch::Detached(cmd) => assert_eq!(cmd.args, vec!["/n/a.md"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn external_editor_without_binary_is_error() {
        let cfg = external_editor(None, None);
        assert!(editor_command(&cfg, "vi", Path::new("/n/a.md")).is_err());
    }

    #[test]
    fn system_opener_gets_folder() {
        let cmd = opener_command(&AppConfig::default(), Path::new("/n")).unwrap();
        assert_eq!(cmd.program, system_opener());
        assert_eq!(cmd.args, vec!["/n"]);
    }

    #[test]
    fn custom_opener_uses_template() {
        let cfg = AppConfig {
            opener: OpenerConfig {
                mode: Some("custom".into()),
                binary: Some("nautilus".into()),
                args: Some("--new-window %path%".into()),
            },
            ..Default::default()
        };
        let cmd = opener_command(&cfg, Path::new("/n")).unwrap();
        assert_eq!(cmd.program, "nautilus");
        assert_eq!(cmd.args, vec!["--new-window", "/n"]);
    }

    #[test]
    fn custom_opener_without_binary_is_error() {
        let cfg = AppConfig {
            opener: OpenerConfig {
                mode: Some("custom".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            opener_command(&cfg, Path::new("/n")),
            Err(AppError::Launch(_))
        ));
    }

    #[test]
    fn spawn_missing_program_is_launch_error() {
        let cmd = LaunchCommand {
            program: "/definitely/not/a/real/program".into(),
            args: Vec::new(),
        };
        assert!(matches!(spawn_detached(&cmd), Err(AppError::Launch(_))));
    }
}
