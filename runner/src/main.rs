use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use processor::input::{read_processes, read_scheduler_config};
use processor::{format_logs, Sim, Summary};
use scheduler::{Algorithm, Policy, SchedulerConfig};
use tracing::{error, info, Level};

/// Replay a process workload under one or more CPU scheduling policies.
#[derive(Parser, Debug)]
#[command(name = "scheduler-sim", version)]
struct Cli {
    /// Process file: one process per line, the arrival time followed by
    /// alternating CPU and I/O durations
    processes: PathBuf,

    /// Scheduler file: the algorithm on the first line, then `option = value` lines
    #[arg(short, long = "scheduler")]
    schedulers: Vec<PathBuf>,

    /// Algorithm to run with its default options (FCFS, SPN, ...)
    #[arg(short, long = "algorithm")]
    algorithms: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// The configurations to run, in command line order.
///
/// Without any, the workload is replayed under FCFS and then SPN.
fn configs(cli: &Cli) -> Result<Vec<SchedulerConfig>, Box<dyn Error>> {
    let mut configs: Vec<SchedulerConfig> = Vec::new();
    for path in &cli.schedulers {
        info!("Loading scheduler from: {}", path.display());
        configs.push(read_scheduler_config(path)?);
    }
    for id in &cli.algorithms {
        configs.push(id.parse::<Algorithm>()?.into());
    }
    if configs.is_empty() {
        configs.push(Algorithm::Fcfs.into());
        configs.push(Algorithm::Spn.into());
    }
    Ok(configs)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    info!("Loading processes from: {}", cli.processes.display());
    let processes = read_processes(&cli.processes).map_err(|e| {
        format!("Failed to load processes from '{}': {}", cli.processes.display(), e)
    })?;
    info!("{} processes loaded", processes.len());

    let mut reports = Vec::new();
    for config in configs(cli)? {
        let policy = Policy::from_config(&config)?;
        info!("Running {}", config.algorithm);
        let logs = Sim::new(processes.clone(), policy).run()?;
        let summary = Summary::new(&processes, &logs);
        info!("{} done at time {}", config.algorithm, summary.makespan);

        match cli.format {
            Format::Text => {
                println!("===== {} =====", config.algorithm);
                print!("{}", format_logs(&logs));
                println!("{}\n", summary);
            }
            Format::Json => reports.push(serde_json::json!({
                "scheduler": config,
                "trace": logs,
                "summary": summary,
            })),
        }
    }

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        Format::Text => println!("Sim Done"),
    }
    Ok(())
}

#[cfg(test)]
mod tests;
