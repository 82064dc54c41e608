//! Math client CLI
//!
//! Spawns a `math-worker`, runs one operation (or lists the tools) and prints
//! the outcome. Exits with status 1 when the outcome is an error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;

use math_mcp_server::core::{Config, init_logging};
use math_mcp_server::presentation::{self, Operation};

#[derive(Parser)]
#[command(name = "math-client", version, about = "Call the math worker's tools")]
struct Cli {
    /// Worker executable to spawn (overrides MATH_WORKER_PATH)
    #[arg(long, global = true)]
    worker: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Perform one operation, e.g. `calc divide 10 4`
    Calc {
        /// add, subtract, multiply, divide, sqrt or to_integer
        operation: String,

        /// First operand
        #[arg(allow_negative_numbers = true)]
        a: f64,

        /// Second operand (binary operations only)
        #[arg(allow_negative_numbers = true)]
        b: Option<f64>,
    },

    /// List the worker's tools and their parameters
    Tools,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    init_logging(&config.logging);
    if let Some(worker) = cli.worker {
        config.client.worker_path = worker;
    }
    info!("Worker executable: {}", config.client.worker_path.display());

    match cli.command {
        Command::Calc { operation, a, b } => {
            let outcome = match operation.parse::<Operation>() {
                Ok(operation) => {
                    presentation::perform_operation(&config.client, operation, a, b).await
                }
                Err(e) => {
                    eprintln!("Available operations:");
                    for operation in Operation::ALL {
                        eprintln!("  {:<12}{}", operation.name(), operation.description());
                    }
                    Err(e)
                }
            };
            println!("{}", presentation::render(&outcome));
            if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Tools => match presentation::available_tools(&config.client).await {
            Ok(tools) => {
                for tool in tools {
                    let params: Vec<&str> = tool.parameters.iter().map(|p| p.name.as_str()).collect();
                    println!(
                        "{}({}): {}",
                        tool.name,
                        params.join(", "),
                        tool.description.unwrap_or_default()
                    );
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("Error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}
