use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use period_diary::{logging, Diary, SystemClock, Vault};

#[derive(Parser)]
#[command(name = "period-diary", version, about = "Private, on-device period diary")]
struct Cli {
    /// Vault file (defaults to the platform data directory)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Passphrase protecting the vault
    #[arg(long, env = "PERIOD_DIARY_PASSPHRASE", global = true, hide_env_values = true)]
    passphrase: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty diary
    Setup,
    /// Mark today as the first day of a period
    Mark,
    /// Replace all marked days (YYYY-MM-DD)
    Edit { days: Vec<String> },
    /// Countdown, phase and ovulation for today
    Status,
    /// Averages and past cycles
    Details,
    /// Calendar highlights and bounds
    Calendar,
    /// Show or change settings
    Settings {
        #[arg(long)]
        max_cycles: Option<usize>,
        #[arg(long, value_enum)]
        fertility: Option<Toggle>,
    },
    /// Print the configuration as JSON
    Export,
    /// Replace everything with an exported configuration
    Import { file: PathBuf },
    /// Delete all data permanently
    Wipe,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> CliResult {
    let vault = match cli.vault {
        Some(path) => Vault::at(path),
        None => Vault::default_location()?,
    };
    let mut diary = Diary::new(vault);

    if let Commands::Wipe = cli.command {
        diary.wipe()?;
        println!("all data wiped");
        return Ok(());
    }

    let passphrase = cli
        .passphrase
        .ok_or("a passphrase is required (--passphrase or PERIOD_DIARY_PASSPHRASE)")?;

    if let Commands::Setup = cli.command {
        diary.setup(passphrase)?;
        println!("diary created");
        return Ok(());
    }

    if !diary.unlock(passphrase)? {
        return Err("wrong passphrase".into());
    }

    let clock = SystemClock;
    match cli.command {
        Commands::Mark => print_json(&diary.mark_period_today(&clock)?.to_vec()),
        Commands::Edit { days } => {
            let cycles = diary.save_calendar_edit_keys(&days[..], &clock)?.to_vec();
            print_json(&cycles)
        }
        Commands::Status => print_json(&diary.home(&clock)?),
        Commands::Details => print_json(&diary.details(&clock)?),
        Commands::Calendar => print_json(&diary.calendar(&clock)?),
        Commands::Settings {
            max_cycles,
            fertility,
        } => {
            if let Some(requested) = max_cycles {
                diary.set_max_displayed_cycles(requested)?;
            }
            if let Some(toggle) = fertility {
                diary.set_show_fertility(matches!(toggle, Toggle::On))?;
            }
            print_json(diary.settings()?)
        }
        Commands::Export => {
            println!("{}", diary.export_json()?);
            Ok(())
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(file)?;
            diary.import_json(&json)?;
            println!("configuration imported");
            Ok(())
        }
        Commands::Setup | Commands::Wipe => Ok(()),
    }
}

fn main() {
    logging::init_logging();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
