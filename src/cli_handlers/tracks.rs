use crate::cli_handlers::CliCommand;
use crate::modules::catalog::Catalog;
use anyhow::{Result, bail};

pub struct TracksCommand {
    pub catalog: Catalog,
    pub theme: String,
}

impl CliCommand for TracksCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        // Unlike navigation, listing an unknown theme is a user error and
        // should say so instead of falling back to the first theme.
        let Some(theme) = self.catalog.themes().iter().find(|t| t.id == self.theme) else {
            bail!("unknown theme: {}", self.theme);
        };

        println!("{}", theme);
        for track in &theme.tracks {
            println!("  {:02} — {}  [{}]", track.id, track.name, track.file.display());
        }
        Ok(())
    }
}
