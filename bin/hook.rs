// mfsignal - Agent Hook Runner
// Reads the hook payload from stdin and exits 0 (allow), 1 (error) or 2 (block)

use clap::Parser;
use mfsignal::{run_hook, HookConfig, HookKind, SystemRunner};
use std::io;
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser)]
#[command(name = "mfsignal-hook", version, about = "Agent hooks for the mfsignal workspace")]
struct Args {
    /// Hook to run
    #[arg(value_enum)]
    hook: HookKind,

    /// JSON config file (defaults to $MFSIGNAL_HOOK_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let config = match HookConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", args.hook.error_prefix(), e);
            exit(1);
        }
    };

    let response = run_hook(args.hook, &config, &SystemRunner, io::stdin().lock());

    match response.emit(io::stdout().lock(), io::stderr().lock()) {
        Ok(code) => exit(code),
        Err(e) => {
            log::error!("failed to write hook output: {}", e);
            exit(1);
        }
    }
}
