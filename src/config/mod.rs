//! Configuration management for Pushgate
//!
//! Settings are layered with figment (embedded defaults, user config,
//! repository config, `--config`, `PUSHGATE_` environment variables) and
//! extracted into the typed [`PushGateConfig`].

mod loader;

use serde::{Deserialize, Deserializer};
use std::path::{Component, PathBuf};

use crate::error::{PushGateError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct PushGateConfig {
    pub workspace: WorkspaceConfig,
    pub gates: GatesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    /// Prebuilt artifact tree, relative to the repository root
    #[serde(deserialize_with = "scalar_path")]
    pub artifact_dir: PathBuf,

    /// Whether a missing artifact tree aborts the run
    #[serde(default = "default_require_artifacts")]
    pub require_artifacts: bool,
}

fn default_require_artifacts() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatesConfig {
    pub test: CommandGateConfig,
    pub format: CommandGateConfig,
    pub lint: LintGateConfig,
}

/// A gate decided purely by the exit status of a shell command
#[derive(Debug, Clone, Deserialize)]
pub struct CommandGateConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub command: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LintGateConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub command: String,

    #[serde(default)]
    pub oracle: LintOracle,

    /// Diagnostic line count that means "no findings" for [`LintOracle::LineCount`]
    #[serde(default = "default_expected_lines")]
    pub expected_lines: usize,
}

fn default_expected_lines() -> usize {
    2
}

/// How the lint gate decides that there were no findings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LintOracle {
    /// The captured diagnostic stream has exactly `expected_lines` lines
    #[default]
    LineCount,
    /// Cargo JSON messages on stdout contain no warning or error
    Json,
}

/// Any scalar a config layer may produce for a string setting
///
/// Environment values are typed by figment, so `PUSHGATE_GATES__TEST__COMMAND=true`
/// arrives as a boolean.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::String(s) => s,
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn scalar_path<'de, D>(deserializer: D) -> std::result::Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_string(deserializer).map(PathBuf::from)
}

impl PushGateConfig {
    /// Reject settings that would make the pipeline misbehave
    pub fn validate(&self) -> Result<()> {
        let artifact_dir = &self.workspace.artifact_dir;
        let escapes = artifact_dir
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if artifact_dir.as_os_str().is_empty() || escapes {
            return Err(PushGateError::Config(format!(
                "workspace.artifact_dir must be a relative path inside the repository, got '{}'",
                artifact_dir.display()
            )));
        }

        for (name, command) in [
            ("gates.test.command", &self.gates.test.command),
            ("gates.format.command", &self.gates.format.command),
            ("gates.lint.command", &self.gates.lint.command),
        ] {
            if command.trim().is_empty() {
                return Err(PushGateError::Config(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PushGateConfig {
        PushGateConfig {
            workspace: WorkspaceConfig {
                artifact_dir: PathBuf::from("target"),
                require_artifacts: true,
            },
            gates: GatesConfig {
                test: CommandGateConfig {
                    command: "cargo test".into(),
                },
                format: CommandGateConfig {
                    command: "cargo fmt".into(),
                },
                lint: LintGateConfig {
                    command: "cargo clippy".into(),
                    oracle: LintOracle::LineCount,
                    expected_lines: 2,
                },
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_absolute_artifact_dir_is_rejected() {
        let mut config = config();
        config.workspace.artifact_dir = PathBuf::from("/var/cache/target");
        assert!(matches!(config.validate(), Err(PushGateError::Config(_))));
    }

    #[test]
    fn test_parent_artifact_dir_is_rejected() {
        let mut config = config();
        config.workspace.artifact_dir = PathBuf::from("../target");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_command_is_rejected() {
        let mut config = config();
        config.gates.format.command = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gates.format.command"));
    }

    #[test]
    fn test_string_settings_accept_scalars() {
        let gate: CommandGateConfig = serde_json::from_str(r#"{"command": true}"#).unwrap();
        assert_eq!(gate.command, "true");
        let gate: CommandGateConfig = serde_json::from_str(r#"{"command": 123}"#).unwrap();
        assert_eq!(gate.command, "123");

        let workspace: WorkspaceConfig =
            serde_json::from_str(r#"{"artifact_dir": 2024}"#).unwrap();
        assert_eq!(workspace.artifact_dir, PathBuf::from("2024"));
        assert!(workspace.require_artifacts);
    }

    #[test]
    fn test_non_scalar_command_is_rejected() {
        let parsed = serde_json::from_str::<CommandGateConfig>(r#"{"command": ["cargo", "test"]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_oracle_names_are_kebab_case() {
        let oracle: LintOracle = serde_json::from_str("\"line-count\"").unwrap();
        assert_eq!(oracle, LintOracle::LineCount);
        let oracle: LintOracle = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(oracle, LintOracle::Json);
    }
}
