// 🧰 Tool Hooks - formatter, type checker, test runner
// Each runs only when the edited file matches the watched extension, and
// always allows the edit: tool failures are relayed, never turned into a block.

use super::{CommandOutput, CommandRunner, CommandSpec, HookConfig, HookInput, HookResponse};
use anyhow::Result;

/// Sort imports, then format the edited file
pub fn format_file(
    config: &HookConfig,
    runner: &dyn CommandRunner,
    input: &HookInput,
) -> Result<HookResponse> {
    let file_path = input.file_path()?;
    if !config.watches(file_path) {
        return Ok(HookResponse::allow());
    }

    // Import sorting result is not reported; the formatter pass below is
    run(runner, &config.import_sort, file_path)?;

    let result = run(runner, &config.formatter, file_path)?;
    if result.success {
        return Ok(HookResponse::allow().println(&format!("✓ Formatted {} with ruff", file_path)));
    }

    let mut response = HookResponse::allow();
    if !result.stderr.is_empty() {
        response = response.eprintln(&result.stderr);
    }
    if !result.stdout.is_empty() {
        response = response.println(&result.stdout);
    }
    Ok(response)
}

pub fn type_check(
    config: &HookConfig,
    runner: &dyn CommandRunner,
    input: &HookInput,
) -> Result<HookResponse> {
    run_project_tool(
        config,
        runner,
        input,
        &config.type_checker,
        "✓ mypy type check passed",
    )
}

pub fn run_tests(
    config: &HookConfig,
    runner: &dyn CommandRunner,
    input: &HookInput,
) -> Result<HookResponse> {
    run_project_tool(config, runner, input, &config.test_runner, "✓ All tests passed")
}

/// Project-wide tool triggered by an edit to a watched file
fn run_project_tool(
    config: &HookConfig,
    runner: &dyn CommandRunner,
    input: &HookInput,
    command: &CommandSpec,
    success_message: &str,
) -> Result<HookResponse> {
    let file_path = input.file_path()?;
    if !config.watches(file_path) {
        return Ok(HookResponse::allow());
    }

    let result = run(runner, command, file_path)?;
    if result.success {
        return Ok(HookResponse::allow().println(success_message));
    }

    Ok(relay(HookResponse::allow(), &result))
}

fn run(runner: &dyn CommandRunner, command: &CommandSpec, file_path: &str) -> Result<CommandOutput> {
    runner.run(&command.program, &command.args_for(file_path))
}

fn relay(mut response: HookResponse, result: &CommandOutput) -> HookResponse {
    if !result.stdout.is_empty() {
        response = response.println(&result.stdout);
    }
    if !result.stderr.is_empty() {
        response = response.eprintln(&result.stderr);
    }
    response
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::tests::FakeRunner;
    use crate::hooks::{run_hook, HookKind, HookOutcome};

    fn edit_payload(file_path: &str) -> String {
        format!(
            r#"{{"tool_name": "Write", "tool_input": {{"file_path": "{}"}}}}"#,
            file_path
        )
    }

    fn failed(stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_non_python_file_is_skipped() {
        let runner = FakeRunner::new(Vec::new());

        for kind in [HookKind::Format, HookKind::TypeCheck, HookKind::Test] {
            let response = run_hook(
                kind,
                &HookConfig::default(),
                &runner,
                edit_payload("README.md").as_bytes(),
            );
            assert_eq!(response, HookResponse::allow());
        }

        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_file_path_is_skipped() {
        let runner = FakeRunner::new(Vec::new());
        let response = run_hook(
            HookKind::Format,
            &HookConfig::default(),
            &runner,
            r#"{"tool_name": "Write"}"#.as_bytes(),
        );

        assert_eq!(response, HookResponse::allow());
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_tool_hooks_ignore_command_field() {
        let runner = FakeRunner::new(Vec::new());
        let payload = r#"{"tool_name": null, "tool_input": {"file_path": "main.py", "command": 7}}"#;

        let response = run_hook(HookKind::TypeCheck, &HookConfig::default(), &runner, payload.as_bytes());

        assert_eq!(response.outcome, HookOutcome::Allow);
        assert_eq!(response.stdout, "✓ mypy type check passed\n");
    }

    #[test]
    fn test_wrong_typed_file_path_is_internal_error() {
        let runner = FakeRunner::new(Vec::new());
        let payload = r#"{"tool_name": "Write", "tool_input": {"file_path": 5}}"#;

        let response = run_hook(HookKind::Format, &HookConfig::default(), &runner, payload.as_bytes());

        assert_eq!(response.outcome, HookOutcome::Error);
        assert!(response
            .stderr
            .starts_with("Error formatting Python file: tool_input.file_path must be a string"));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_format_success() {
        let runner = FakeRunner::new(Vec::new());
        let response = run_hook(
            HookKind::Format,
            &HookConfig::default(),
            &runner,
            edit_payload("data/amc.py").as_bytes(),
        );

        assert_eq!(response.outcome, HookOutcome::Allow);
        assert_eq!(response.stdout, "✓ Formatted data/amc.py with ruff\n");
        assert_eq!(
            runner.programs(),
            vec![
                "uv run ruff check --select I --fix data/amc.py",
                "uv run ruff format data/amc.py",
            ]
        );
    }

    #[test]
    fn test_format_ignores_import_sort_failure() {
        let runner = FakeRunner::new(vec![
            failed("", "import sort exploded"),
            CommandOutput {
                success: true,
                ..CommandOutput::default()
            },
        ]);
        let response = run_hook(
            HookKind::Format,
            &HookConfig::default(),
            &runner,
            edit_payload("main.py").as_bytes(),
        );

        assert_eq!(response.stdout, "✓ Formatted main.py with ruff\n");
        assert_eq!(response.stderr, "");
    }

    #[test]
    fn test_format_failure_relays_output() {
        let runner = FakeRunner::new(vec![
            CommandOutput::default(),
            failed("1 file failed", "error: Failed to parse main.py"),
        ]);
        let response = run_hook(
            HookKind::Format,
            &HookConfig::default(),
            &runner,
            edit_payload("main.py").as_bytes(),
        );

        assert_eq!(response.outcome, HookOutcome::Allow);
        assert_eq!(response.stdout, "1 file failed\n");
        assert_eq!(response.stderr, "error: Failed to parse main.py\n");
    }

    #[test]
    fn test_type_check_runs_on_project() {
        let runner = FakeRunner::new(Vec::new());
        let response = run_hook(
            HookKind::TypeCheck,
            &HookConfig::default(),
            &runner,
            edit_payload("data/amc.py").as_bytes(),
        );

        assert_eq!(response.stdout, "✓ mypy type check passed\n");
        assert_eq!(runner.programs(), vec!["uv run mypy --strict ."]);
    }

    #[test]
    fn test_type_check_failure_relays_output() {
        let runner = FakeRunner::new(vec![failed(
            "main.py:1: error: Missing return type",
            "",
        )]);
        let response = run_hook(
            HookKind::TypeCheck,
            &HookConfig::default(),
            &runner,
            edit_payload("main.py").as_bytes(),
        );

        assert_eq!(response.outcome, HookOutcome::Allow);
        assert_eq!(response.stdout, "main.py:1: error: Missing return type\n");
        assert_eq!(response.stderr, "");
    }

    #[test]
    fn test_test_runner_command() {
        let runner = FakeRunner::new(Vec::new());
        let response = run_hook(
            HookKind::Test,
            &HookConfig::default(),
            &runner,
            edit_payload("tests/test_amc.py").as_bytes(),
        );

        assert_eq!(response.stdout, "✓ All tests passed\n");
        assert_eq!(
            runner.programs(),
            vec!["uv run pytest --cov=. --cov-report=xml --cov-report=term-missing ."]
        );
    }

    #[test]
    fn test_spawn_failure_is_internal_error() {
        let runner = FakeRunner::failing();
        let response = run_hook(
            HookKind::Test,
            &HookConfig::default(),
            &runner,
            edit_payload("main.py").as_bytes(),
        );

        assert_eq!(response.outcome, HookOutcome::Error);
        assert!(response.stderr.starts_with("Error running pytest: "));
        assert_eq!(response.stdout, "");
    }

    #[test]
    fn test_custom_extension_and_command() {
        let mut config = HookConfig::default();
        config.watched_extension = ".rs".to_string();
        config.formatter = CommandSpec::new("rustfmt", &["--edition", "2021", "{file}"]);

        let runner = FakeRunner::new(Vec::new());
        run_hook(HookKind::Format, &config, &runner, edit_payload("src/lib.rs").as_bytes());

        assert_eq!(runner.programs()[1], "rustfmt --edition 2021 src/lib.rs");
    }
}
