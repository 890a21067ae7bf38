mod config;
mod panel;
mod script;
mod sync;
mod track;
mod web;

use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use crate::config::Config;
use crate::script::{Runner, Script, Step};

#[derive(Parser)]
#[command(name = "trackmap")]
#[command(about = "Map track and time cursor synchronisation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a replay script
    Validate { script: String },
    /// Replay a script and print every render request
    Replay {
        script: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Serve the panel over HTTP
    Serve {
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { script } => validate(&script),
        Commands::Replay { script, config } => replay(&script, config.as_deref()),
        Commands::Serve { config } => serve(config.as_deref()),
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match path {
        None => Some(Config::default()),
        Some(path) => match Config::from_file(path) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                None
            }
        },
    }
}

fn load_script(path: &str) -> Option<Script> {
    let yaml = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return None;
        }
    };

    match Script::from_str(&yaml) {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(script) = load_script(path) else {
        return ExitCode::FAILURE;
    };

    println!("Script is valid ({} steps)", script.steps.len());
    for (i, step) in script.steps.iter().enumerate() {
        println!("  {}: {}{}", i + 1, step.name(), step_detail(step));
    }
    ExitCode::SUCCESS
}

fn replay(path: &str, config: Option<&str>) -> ExitCode {
    let (Some(script), Some(config)) = (load_script(path), load_config(config)) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let reports = runtime.block_on(Runner::new(script, config.panel).run());
    let mut failed = false;
    for report in &reports {
        failed |= report.error.is_some();
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Error encoding step {}: {}", report.index, e),
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn serve(config: Option<&str>) -> ExitCode {
    let Some(config) = load_config(config) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn step_detail(step: &Step) -> String {
    match step {
        Step::Data(payload) => format!(" ({} channels)", payload.series.len()),
        Step::Hover(expr) => format!(" @ {:?}", expr),
        Step::BoxSelect(b) => format!(
            " [{}, {}] .. [{}, {}]",
            b.south, b.west, b.north, b.east
        ),
        Step::Clear | Step::Options(_) | Step::Teardown => String::new(),
    }
}
