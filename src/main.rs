mod application;
mod cli;
mod cli_handlers;
mod core;
mod modules;
mod ui;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let command = match cli_handlers::from_cli(cli) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = command.execute() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
