use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;

// Use library instead of local modules
use mfsignal::{write_greeting, AmcRegistry};

#[derive(Parser)]
#[command(name = "mfsignal", version, about = "Mutual fund AMC table and tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the AMC table
    Amc {
        #[command(subcommand)]
        command: AmcCommand,
    },

    /// Compare the AMC table against AMFI's current list
    #[cfg(feature = "sync")]
    Sync {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AmcCommand {
    /// List every AMC, ordered by id
    List {
        /// Write CSV (id,code,name) instead of a table
        #[arg(long)]
        csv: bool,
    },

    /// Look up one AMC by code (AXIS_MUTUAL_FUND) or id (53)
    Get { key: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => write_greeting(io::stdout().lock())?,
        Some(Commands::Amc { command }) => run_amc(command)?,
        #[cfg(feature = "sync")]
        Some(Commands::Sync { json }) => run_sync(json)?,
    }

    Ok(())
}

fn run_amc(command: AmcCommand) -> Result<()> {
    let registry = AmcRegistry::new()?;

    match command {
        AmcCommand::List { csv: true } => registry.write_csv(io::stdout().lock())?,
        AmcCommand::List { csv: false } => {
            for amc in registry.all() {
                println!("{:>4}  {:<36}  {}", amc.id(), amc.code(), amc.name());
            }
            println!("\n{} AMCs", registry.count());
        }
        AmcCommand::Get { key } => {
            let amc = registry.resolve(&key)?;
            println!("{}  {}  {}", amc.id(), amc.code(), amc.name());
        }
    }

    Ok(())
}

#[cfg(feature = "sync")]
fn run_sync(json: bool) -> Result<()> {
    let registry = AmcRegistry::new()?;
    let client = mfsignal::AmfiClient::new()?;
    let report = client.check(&registry)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("🔄 AMFI sync check ({})", report.checked_at.format("%Y-%m-%d %H:%M UTC"));
        println!("{}", report.render());
    }

    if !report.is_in_sync() {
        if !json {
            eprintln!("❌ AMC table is out of date");
        }
        std::process::exit(1);
    }

    if !json {
        println!("✅ AMC table covers every AMFI AMC");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_selects_greeting() {
        let cli = Cli::try_parse_from(["mfsignal"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_amc_get_parses_key() {
        let cli = Cli::try_parse_from(["mfsignal", "amc", "get", "53"]).unwrap();

        match cli.command {
            Some(Commands::Amc {
                command: AmcCommand::Get { key },
            }) => assert_eq!(key, "53"),
            _ => panic!("expected `amc get`"),
        }
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["mfsignal", "greet"]).is_err());
    }
}
