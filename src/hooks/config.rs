// ⚙️ Hook Configuration - Commands as Data
// Every field defaults to the stock uv/ruff/mypy/pytest toolchain, so an empty
// (or absent) config file reproduces the standard behavior.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a hook config file
pub const CONFIG_ENV_VAR: &str = "MFSIGNAL_HOOK_CONFIG";

/// Placeholder in command arguments replaced by the edited file path
pub const FILE_PLACEHOLDER: &str = "{file}";

// ============================================================================
// COMMAND SPEC
// ============================================================================

/// External command line: program plus arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        CommandSpec {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Arguments with `{file}` substituted
    pub fn args_for(&self, file_path: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, file_path))
            .collect()
    }
}

// ============================================================================
// HOOK CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Only files with this suffix trigger the tool hooks
    pub watched_extension: String,

    /// Import sorting, run before the formatter (result ignored)
    pub import_sort: CommandSpec,

    pub formatter: CommandSpec,

    pub type_checker: CommandSpec,

    pub test_runner: CommandSpec,

    /// Case-insensitive regexes for package-manager commands to block
    pub blocked_patterns: Vec<String>,
}

impl Default for HookConfig {
    fn default() -> Self {
        HookConfig {
            watched_extension: ".py".to_string(),
            import_sort: CommandSpec::new(
                "uv",
                &["run", "ruff", "check", "--select", "I", "--fix", FILE_PLACEHOLDER],
            ),
            formatter: CommandSpec::new("uv", &["run", "ruff", "format", FILE_PLACEHOLDER]),
            type_checker: CommandSpec::new("uv", &["run", "mypy", "--strict", "."]),
            test_runner: CommandSpec::new(
                "uv",
                &[
                    "run",
                    "pytest",
                    "--cov=.",
                    "--cov-report=xml",
                    "--cov-report=term-missing",
                    ".",
                ],
            ),
            blocked_patterns: default_blocked_patterns(),
        }
    }
}

fn default_blocked_patterns() -> Vec<String> {
    [
        r"\bpip\s+(install|uninstall|freeze|list|show|download)",
        r"\bpip3\s+(install|uninstall|freeze|list|show|download)",
        r"\bpipx\s+(install|uninstall|run)",
        r"\bconda\s+(install|remove|create|update)",
        r"\bpoetry\s+(add|remove|install|update)",
        r"\bpython\s+-m\s+pip\b",
        r"\bpython3\s+-m\s+pip\b",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl HookConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read hook config: {:?}", path.as_ref()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse hook config JSON: {:?}", path.as_ref()))
    }

    /// Load config from an explicit path, else `MFSIGNAL_HOOK_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => {
                log::debug!("loading hook config from {:?}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Whether the edited file should trigger the tool hooks
    pub fn watches(&self, file_path: &str) -> bool {
        file_path.ends_with(&self.watched_extension)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commands() {
        let config = HookConfig::default();

        assert_eq!(config.formatter.program, "uv");
        assert_eq!(
            config.formatter.args_for("src/app.py"),
            vec!["run", "ruff", "format", "src/app.py"]
        );
        assert_eq!(
            config.import_sort.args_for("a.py"),
            vec!["run", "ruff", "check", "--select", "I", "--fix", "a.py"]
        );
        assert_eq!(
            config.type_checker.args_for("ignored.py"),
            vec!["run", "mypy", "--strict", "."]
        );
        assert_eq!(config.blocked_patterns.len(), 7);
    }

    #[test]
    fn test_watches_extension() {
        let config = HookConfig::default();

        assert!(config.watches("main.py"));
        assert!(config.watches("/abs/path/tests/test_amc.py"));
        assert!(!config.watches("README.md"));
        assert!(!config.watches("script.pyc"));
        assert!(!config.watches(""));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{
            "watched_extension": ".rs",
            "formatter": { "program": "rustfmt", "args": ["{file}"] }
        }"#;

        let config: HookConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.watched_extension, ".rs");
        assert_eq!(config.formatter, CommandSpec::new("rustfmt", &["{file}"]));
        assert_eq!(config.type_checker, HookConfig::default().type_checker);
        assert_eq!(config.blocked_patterns, default_blocked_patterns());
    }

    #[test]
    fn test_from_file_missing() {
        let result = HookConfig::from_file("/nonexistent/mfsignal-hooks.json");

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read hook config"));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = env::temp_dir().join(format!("mfsignal-hook-config-{}.json", std::process::id()));
        let mut config = HookConfig::default();
        config.watched_extension = ".pyi".to_string();
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = HookConfig::load(Some(path.as_path())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }
}
