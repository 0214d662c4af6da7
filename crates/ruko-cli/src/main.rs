use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ruko_cli::{
    load_level_file, load_program, render_diagnostics, render_levels, render_outcome,
    render_outline, render_trace, CliError, LevelSummary,
};
use ruko_types::level::Level;

#[derive(Parser)]
#[command(name = "ruko", version, about = "Run Ruko block programs from the terminal")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in levels
    Levels {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a program against a level without running it
    Check {
        /// Program file (JSON)
        program: PathBuf,

        #[command(flatten)]
        level: LevelArgs,

        /// Print the block tree before the diagnostics
        #[arg(long)]
        outline: bool,
    },

    /// Run a program against a level
    Run {
        /// Program file (JSON)
        program: PathBuf,

        #[command(flatten)]
        level: LevelArgs,

        /// Print every trace event
        #[arg(long)]
        trace: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct LevelArgs {
    /// Built-in level id (1-15)
    #[arg(long)]
    level: Option<u32>,

    /// Level description file (.json or .toml)
    #[arg(long)]
    level_file: Option<PathBuf>,
}

impl LevelArgs {
    fn load(&self) -> Result<Level, CliError> {
        if let Some(path) = &self.level_file {
            return load_level_file(path);
        }
        Ok(ruko_levels::level(self.level.unwrap_or_default())?)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

/// Exit code 0 on success, 1 when the program has errors or misses the goal.
fn run(command: Command) -> Result<i32, CliError> {
    match command {
        Command::Levels { json } => {
            let levels = ruko_levels::levels();
            if json {
                let rows: Vec<LevelSummary<'_>> = levels.iter().map(LevelSummary::of).collect();
                println!("{}", to_json(&rows));
            } else {
                print!("{}", render_levels(&levels));
            }
            Ok(0)
        }
        Command::Check {
            program,
            level,
            outline,
        } => {
            let level = level.load()?;
            let program = load_program(&program)?;
            if outline {
                print!("{}", render_outline(&program));
            }
            let errors = ruko_check::check_program(&program, &level);
            print!("{}", render_diagnostics(&errors));
            Ok(if errors.has_errors() { 1 } else { 0 })
        }
        Command::Run {
            program,
            level,
            trace,
            json,
        } => {
            let level = level.load()?;
            let program = load_program(&program)?;

            let errors = ruko_check::check_program(&program, &level);
            if errors.has_errors() {
                eprint!("{}", render_diagnostics(&errors));
                return Ok(1);
            }

            let report = ruko_eval::execute(&program, &level)?;
            if json {
                println!("{}", to_json(&report));
            } else {
                if trace {
                    print!("{}", render_trace(&program, &report.trace));
                }
                println!("level {}: {}", level.id, level.name);
                print!("{}", render_outcome(&level.world, &report.outcome));
            }
            Ok(if report.outcome.is_success() { 0 } else { 1 })
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}
