// 🪝 Agent Hooks - stdin JSON in, exit code out
//
// A coding agent calls a hook around each tool use. The hook reads one JSON
// object from stdin and answers through its exit status:
//   0 = allow, 1 = internal error, 2 = block
//
// Tool hooks (format / type-check / test) shell out to external programs and
// relay their output. The enforce-uv hook blocks package-manager commands.

pub mod config;
pub mod enforce_uv;
pub mod tools;

pub use config::{CommandSpec, HookConfig, CONFIG_ENV_VAR};
pub use enforce_uv::PackageManagerGuard;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, Read, Write};
use std::process::Command;

// ============================================================================
// HOOK INPUT
// ============================================================================

/// Payload the agent writes to the hook's stdin
///
/// Kept as raw JSON: each hook reads only the fields it needs, so a field of
/// unexpected type fails just the hooks that look at it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookInput {
    payload: Map<String, Value>,
}

impl HookInput {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value =
            serde_json::from_reader(reader).context("Failed to parse hook input JSON")?;
        match value {
            Value::Object(payload) => Ok(HookInput { payload }),
            other => bail!("hook input must be a JSON object, got {}", other),
        }
    }

    /// Name of the tool being used; `None` when absent or not a string
    pub fn tool_name(&self) -> Option<&str> {
        self.payload.get("tool_name").and_then(Value::as_str)
    }

    /// File written or edited by the tool (empty when absent)
    pub fn file_path(&self) -> Result<&str> {
        self.tool_input_str("file_path")
    }

    /// Shell command about to run through the Bash tool (empty when absent)
    pub fn command(&self) -> Result<&str> {
        self.tool_input_str("command")
    }

    fn tool_input_str(&self, field: &str) -> Result<&str> {
        let tool_input = match self.payload.get("tool_input") {
            None => return Ok(""),
            Some(Value::Object(tool_input)) => tool_input,
            Some(other) => bail!("tool_input must be an object, got {}", other),
        };

        match tool_input.get(field) {
            None => Ok(""),
            Some(Value::String(text)) => Ok(text.as_str()),
            Some(other) => bail!("tool_input.{} must be a string, got {}", field, other),
        }
    }
}

// ============================================================================
// HOOK KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HookKind {
    /// Sort imports and format the edited file
    Format,

    /// Type-check the project
    TypeCheck,

    /// Run the test suite with coverage
    Test,

    /// Block package managers other than uv
    EnforceUv,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::Format => "format",
            HookKind::TypeCheck => "type-check",
            HookKind::Test => "test",
            HookKind::EnforceUv => "enforce-uv",
        }
    }

    /// Prefix of the diagnostic printed when the hook itself fails
    pub fn error_prefix(&self) -> &'static str {
        match self {
            HookKind::Format => "Error formatting Python file",
            HookKind::TypeCheck => "Error running mypy",
            HookKind::Test => "Error running pytest",
            HookKind::EnforceUv => "Error in enforce_uv hook",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// HOOK RESPONSE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Allow,
    Error,
    Block,
}

impl HookOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            HookOutcome::Allow => 0,
            HookOutcome::Error => 1,
            HookOutcome::Block => 2,
        }
    }
}

/// Decision plus the text destined for stdout / stderr
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookResponse {
    pub outcome: HookOutcome,
    pub stdout: String,
    pub stderr: String,
}

impl HookResponse {
    pub fn allow() -> Self {
        HookResponse {
            outcome: HookOutcome::Allow,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn block() -> Self {
        HookResponse {
            outcome: HookOutcome::Block,
            ..Self::allow()
        }
    }

    pub fn error(message: String) -> Self {
        HookResponse {
            outcome: HookOutcome::Error,
            ..Self::allow()
        }
        .eprintln(&message)
    }

    /// Append a line to stdout
    pub fn println(mut self, line: &str) -> Self {
        self.stdout.push_str(line);
        self.stdout.push('\n');
        self
    }

    /// Append a line to stderr
    pub fn eprintln(mut self, line: &str) -> Self {
        self.stderr.push_str(line);
        self.stderr.push('\n');
        self
    }

    /// Write buffered output and return the exit code
    pub fn emit<O: Write, E: Write>(&self, mut out: O, mut err: E) -> io::Result<i32> {
        out.write_all(self.stdout.as_bytes())?;
        out.flush()?;
        err.write_all(self.stderr.as_bytes())?;
        err.flush()?;
        Ok(self.outcome.exit_code())
    }
}

// ============================================================================
// COMMAND RUNNER
// ============================================================================

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the hooks and the processes they spawn
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands as real child processes, capturing their output
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        log::debug!("running {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to run {}", program))?;

        log::debug!("{} exited with {}", program, output.status);

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Run one hook against the JSON read from `input`
///
/// Any failure (bad JSON, a tool that cannot be spawned, an invalid pattern)
/// becomes an `Error` response carrying the hook's diagnostic prefix.
pub fn run_hook<R: Read>(
    kind: HookKind,
    config: &HookConfig,
    runner: &dyn CommandRunner,
    input: R,
) -> HookResponse {
    match dispatch(kind, config, runner, input) {
        Ok(response) => response,
        Err(e) => {
            log::debug!("{} hook failed: {:?}", kind, e);
            HookResponse::error(format!("{}: {:#}", kind.error_prefix(), e))
        }
    }
}

fn dispatch<R: Read>(
    kind: HookKind,
    config: &HookConfig,
    runner: &dyn CommandRunner,
    input: R,
) -> Result<HookResponse> {
    let input = HookInput::from_reader(input)?;

    match kind {
        HookKind::Format => tools::format_file(config, runner, &input),
        HookKind::TypeCheck => tools::type_check(config, runner, &input),
        HookKind::Test => tools::run_tests(config, runner, &input),
        HookKind::EnforceUv => enforce_uv::check(config, &input),
    }
}

// ============================================================================
// TESTS
// ============================================================================
