use crate::application::app::Application;
use crate::cli_handlers::CliCommand;
use crate::modules::catalog::Catalog;
use crate::modules::playback::rodio_device::RodioDevice;
use crate::modules::playback::service::AudioPlayerService;
use crate::modules::storage::json_backend::JsonStorageBackend;
use crate::ui::tui::TuiRenderer;
use anyhow::Result;
use std::time::Duration;

/// Default command: the interactive story player.
pub struct RunCommand {
    pub catalog: Catalog,
    pub slide_duration: Duration,
}

impl CliCommand for RunCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let device = RodioDevice::new()?;
        let player = AudioPlayerService::new(Box::new(device));
        let storage = JsonStorageBackend::new()?;
        let renderer = TuiRenderer::new(self.catalog.clone());

        let mut app = Application::new(self.catalog, player, self.slide_duration)
            .with_storage_backend(Box::new(storage))
            .with_ui_renderer(Box::new(renderer));

        app.init()?;
        let result = app.run();

        // Restore the terminal even when the loop errored out.
        app.cleanup()?;
        result
    }
}
