mod api;
mod app;
mod config;
mod util;

use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::config::{AppConfig, ChangeType, ViewKind};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the analysis backend.
    #[arg(long, default_value = "http://localhost:8000")]
    api_base: String,

    /// Tab shown on startup.
    #[arg(long, value_enum, default_value_t = ViewKind::File)]
    view: ViewKind,

    /// Open the function graph on this function's call chain.
    #[arg(long)]
    function: Option<String>,

    /// Prefill the blast-radius file path.
    #[arg(long)]
    file: Option<String>,

    #[arg(long, value_enum, default_value_t = ChangeType::Modify)]
    change_type: ChangeType,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> AppConfig {
        AppConfig {
            api_base: self.api_base,
            request_timeout: Duration::from_secs(self.timeout_secs.max(1)),
            initial_view: self.view,
            initial_function: self.function.filter(|name| !name.trim().is_empty()),
            initial_file: self.file.filter(|path| !path.trim().is_empty()),
            change_type: self.change_type,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Args::parse().into_config();
    let api = ApiClient::new(&config.api_base, config.request_timeout)
        .context("failed to set up the backend client")?;
    info!(base = api.base_url(), view = ?config.initial_view, "starting viewer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "archgraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::ArchGraphApp::new(cc, config, api)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Args::parse_from(["archgraph-viewer"]).into_config();

        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.initial_view, ViewKind::File);
        assert_eq!(config.change_type, ChangeType::Modify);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.initial_function.is_none());
    }

    #[test]
    fn blast_radius_flags_prefill_the_query() {
        let config = Args::parse_from([
            "archgraph-viewer",
            "--view",
            "blast-radius",
            "--file",
            "src/core.js",
            "--change-type",
            "delete",
            "--function",
            " ",
        ])
        .into_config();

        assert_eq!(config.initial_view, ViewKind::BlastRadius);
        assert_eq!(config.initial_file.as_deref(), Some("src/core.js"));
        assert_eq!(config.change_type, ChangeType::Delete);
        assert!(config.initial_function.is_none());
    }
}
