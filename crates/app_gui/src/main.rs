use arecanut_core::AppConfig;
use eframe::NativeOptions;

mod app;

use app::UiApp;

fn main() {
    tracing_subscriber::fmt::init();
    let config = AppConfig::load();
    tracing::info!(endpoint = ?config.endpoint, "Starting ArecaScan {}", env!("ARECASCAN_VERSION"));

    let options = NativeOptions::default();
    if let Err(e) = eframe::run_native(
        "Arecanut Disease Detection",
        options,
        Box::new(
            move |cc: &eframe::CreationContext<'_>| -> Result<
                Box<dyn eframe::App>,
                Box<dyn std::error::Error + Send + Sync>,
            > {
                let app = UiApp::new(cc, config)?;
                Ok(Box::new(app))
            },
        ),
    ) {
        tracing::error!("Application stopped with error: {e}");
    }
}
