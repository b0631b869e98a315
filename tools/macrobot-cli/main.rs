use clap::{Parser, Subcommand};
use macrobot::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Validate and dry-run MacroBot macro files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a macro file and report its structure
    Validate {
        /// Path to the macro JSON file
        macro_path: String,
    },
    /// Run a macro with the dry-run backend, logging every action
    Run {
        /// Path to the macro JSON file
        macro_path: String,
        /// Start node to run from (defaults to the file's start node)
        #[arg(short, long)]
        start: Option<String>,
        /// Optional settings JSON file
        #[arg(short, long)]
        config: Option<String>,
        /// Stop the run after this many seconds
        #[arg(long)]
        stop_after: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Validate { macro_path } => validate(&macro_path),
        Command::Run {
            macro_path,
            start,
            config,
            stop_after,
        } => run(&macro_path, start.as_deref(), config.as_deref(), stop_after),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_document(macro_path: &str, start: Option<&str>) -> GraphDocument {
    let mut definition = MacroDefinition::from_file(macro_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", macro_path, e)));
    if let Some(start) = start {
        definition.start_node_id = start.to_string();
    }
    Compiler::builder(definition)
        .build()
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid macro: {}", e)))
}

fn validate(macro_path: &str) {
    let compile_start = Instant::now();
    let document = load_document(macro_path, None);
    let compile_duration = compile_start.elapsed();

    let exec_edges = document
        .connections()
        .iter()
        .filter(|c| c.flow == Flow::Exec)
        .count();
    println!("Macro '{}' is valid.", macro_path);
    println!("  -> Start node:       {}", document.start_node_id());
    println!("  -> Nodes:            {}", document.node_count());
    println!("  -> Exec connections: {}", exec_edges);
    println!(
        "  -> Data connections: {}",
        document.connections().len() - exec_edges
    );
    println!("  -> Compiled in {:?}", compile_duration);
}

fn run(macro_path: &str, start: Option<&str>, config_path: Option<&str>, stop_after: Option<f64>) {
    let settings = match config_path {
        Some(path) => Settings::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load settings: {}", e))),
        None => Settings::default(),
    };

    let document = load_document(macro_path, start);

    let controller = Arc::new(RunController::new(
        Arc::new(DryRunBackend),
        Arc::new(NoopObserver),
        settings.engine,
    ));

    let run_start = Instant::now();
    controller
        .start(Arc::new(document))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to start macro: {}", e)));

    if let Some(seconds) = stop_after.filter(|s| s.is_finite() && *s >= 0.0) {
        let stopper = Arc::clone(&controller);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs_f64(seconds));
            stopper.stop();
        });
    }

    match controller.wait() {
        Ok(Some(outcome)) => println!("\nMacro {:?} after {:?}", outcome, run_start.elapsed()),
        Ok(None) => println!("\nNo macro was running"),
        Err(e) => exit_with_error(&format!("Macro failed: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
