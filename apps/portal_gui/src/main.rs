//! Desktop front end for the document-generation portal. A background worker
//! thread owns the portal controller and its tokio runtime; the UI thread
//! talks to it over bounded channels.

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
const SERVER_URL_ENV: &str = "PORTAL_SERVER_URL";

#[derive(Parser, Debug)]
#[command(about = "Desktop client for the document-generation portal")]
struct Args {
    /// Base URL of the portal backend.
    #[arg(long)]
    server_url: Option<String>,
}

fn resolve_server_url(flag: Option<String>, env: Option<String>) -> String {
    flag.or(env)
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let server_url = resolve_server_url(args.server_url, std::env::var(SERVER_URL_ENV).ok());
    tracing::info!(server_url, "starting portal gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Document Portal")
            .with_inner_size([1080.0, 760.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Document Portal",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::PortalGuiApp::new(cmd_tx, ui_rx)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_url_defaults_when_nothing_is_set() {
        assert_eq!(resolve_server_url(None, None), DEFAULT_SERVER_URL);
    }

    #[test]
    fn flag_beats_environment() {
        let url = resolve_server_url(
            Some("http://portal.internal:9000".to_string()),
            Some("http://ignored:1".to_string()),
        );
        assert_eq!(url, "http://portal.internal:9000");
    }

    #[test]
    fn trailing_slashes_and_blank_values_are_normalized() {
        assert_eq!(
            resolve_server_url(None, Some("http://localhost:8000/".to_string())),
            "http://localhost:8000"
        );
        assert_eq!(resolve_server_url(Some("   ".to_string()), None), DEFAULT_SERVER_URL);
    }
}
