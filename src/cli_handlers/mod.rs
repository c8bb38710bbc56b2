mod run;
mod themes;
mod tracks;

pub use run::RunCommand;
pub use themes::ThemesCommand;
pub use tracks::TracksCommand;

use crate::cli::{Cli, Commands};
use crate::modules::catalog::Catalog;
use anyhow::Result;
use std::time::Duration;

/// Every CLI command implements this trait.
///
/// Commands own their arguments and are consumed on execution — they run exactly once.
pub trait CliCommand {
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Converts parsed arguments into a boxed [`CliCommand`] ready to execute.
///
/// The catalog is resolved here once, so `main.rs` never needs to know
/// about concrete command types or catalog sources.
pub fn from_cli(cli: Cli) -> Result<Box<dyn CliCommand>> {
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_toml_file(path)?,
        None => Catalog::default(),
    };

    Ok(match cli.command {
        None => Box::new(RunCommand {
            catalog,
            slide_duration: Duration::from_millis(cli.slide_duration),
        }),
        Some(Commands::Themes) => Box::new(ThemesCommand { catalog }),
        Some(Commands::Tracks { theme }) => Box::new(TracksCommand { catalog, theme }),
    })
}
