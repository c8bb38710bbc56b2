use crate::cli_handlers::CliCommand;
use crate::modules::catalog::Catalog;
use anyhow::Result;

pub struct ThemesCommand {
    pub catalog: Catalog,
}

impl CliCommand for ThemesCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        for theme in self.catalog.themes() {
            println!("{:<14} {}", theme.id, theme);
        }
        Ok(())
    }
}
