//! Hookline Studio - preview trimming GUI application
//!
//! ## Command line
//!
//! `hookline-studio [FILE|DIR]...` lists the given audio files (directories
//! are scanned one level deep). Without arguments the configured music
//! directory is scanned.

use std::path::PathBuf;

use hookline_studio::ui::StudioApp;

fn title(_app: &StudioApp) -> String {
    String::from("hookline-studio - Preview Trimming")
}

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let inputs: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    log::info!("hookline-studio starting up ({} inputs)", inputs.len());

    iced::application(
        move || StudioApp::new(inputs.clone()),
        StudioApp::update,
        StudioApp::view,
    )
    .title(title)
    .window_size(iced::Size::new(1000.0, 720.0))
    .theme(StudioApp::theme)
    .subscription(StudioApp::subscription)
    .run()
}
