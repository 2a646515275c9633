// 🚫 Package Manager Guard - uv only
// Blocks Bash commands that reach for pip, pip3, pipx, conda or poetry.

use super::{HookConfig, HookInput, HookResponse};
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

/// Only commands run through this tool are inspected
const SHELL_TOOL: &str = "Bash";

const BLOCKED_ADVICE: &[&str] = &[
    "BLOCKED: Use 'uv' instead of other package managers.",
    "Examples:",
    "  uv add <package>        # Add a dependency",
    "  uv remove <package>     # Remove a dependency",
    "  uv pip install <pkg>    # If you need pip compatibility",
    "  uv run <command>        # Run with project dependencies",
];

/// Compiled, case-insensitive set of blocked command patterns
#[derive(Debug, Clone)]
pub struct PackageManagerGuard {
    patterns: Vec<Regex>,
}

impl PackageManagerGuard {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p.as_ref())
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("invalid blocked pattern: {}", p.as_ref()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PackageManagerGuard { patterns })
    }

    pub fn from_config(config: &HookConfig) -> Result<Self> {
        Self::new(config.blocked_patterns.as_slice())
    }

    /// First pattern the command matches, if any
    pub fn offending_pattern(&self, command: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(command))
            .map(|re| re.as_str())
    }

    pub fn is_blocked(&self, command: &str) -> bool {
        self.offending_pattern(command).is_some()
    }
}

/// Hook body: allow non-Bash tools, block matching commands
pub fn check(config: &HookConfig, input: &HookInput) -> Result<HookResponse> {
    if input.tool_name() != Some(SHELL_TOOL) {
        return Ok(HookResponse::allow());
    }

    let guard = PackageManagerGuard::from_config(config)?;
    let command = input.command()?;

    match guard.offending_pattern(command) {
        Some(pattern) => {
            log::info!("blocked {:?} (matched {})", command, pattern);
            Ok(BLOCKED_ADVICE
                .iter()
                .fold(HookResponse::block(), |response, line| response.println(line)))
        }
        None => Ok(HookResponse::allow()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
