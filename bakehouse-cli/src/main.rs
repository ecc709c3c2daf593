#![doc = include_str!("../../docs/en/cli_usage.md")]

use std::{
    env,
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "http")]
use bakehouse::api::HttpGateway;
use bakehouse::{Bakehouse, api::Gateway, api::MemoryGateway, config::Settings};

#[derive(Debug, Parser)]
#[command(
    name = "bakehouse",
    version,
    about = "bakehouse: manage clients, ingredients, products, recipes and orders from the terminal"
)]
struct Cli {
    /// Base URL of the REST backend
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,

    /// Settings file (defaults to ./bakehouse.toml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rows per page in the record list and items grid
    #[arg(long = "page-size", value_name = "N")]
    page_size: Option<usize>,

    /// Append logs to this file; RUST_LOG sets the level
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Use an in-memory backend seeded with sample records
    #[arg(long = "demo")]
    demo: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let cwd = env::current_dir().wrap_err("cannot read the working directory")?;
    let settings = resolve_settings(&cli, &cwd)?;
    if let Some(path) = settings.log_file.as_deref() {
        init_logging(path)?;
    }
    tracing::info!(api_url = %settings.api_url, demo = cli.demo, "starting");

    let gateway = build_gateway(&settings, cli.demo)?;
    Bakehouse::new(gateway)
        .with_options(settings.ui_options())
        .run()
        .map_err(|err| eyre!("{err:#}"))
}

fn resolve_settings(cli: &Cli, cwd: &Path) -> Result<Settings> {
    let mut settings =
        Settings::discover(cli.config.as_deref(), cwd).map_err(|err| eyre!("{err:#}"))?;
    if let Some(url) = &cli.api_url {
        settings.api_url = url.clone();
    }
    if let Some(size) = cli.page_size {
        if size == 0 {
            return Err(eyre!("--page-size must be at least 1"));
        }
        settings.page_size = size;
    }
    if let Some(path) = &cli.log_file {
        settings.log_file = Some(path.clone());
    }
    Ok(settings)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install logger: {err}"))
}

fn build_gateway(settings: &Settings, demo: bool) -> Result<Arc<dyn Gateway>> {
    if demo {
        return Ok(Arc::new(MemoryGateway::demo()));
    }
    #[cfg(feature = "http")]
    {
        Ok(Arc::new(HttpGateway::new(settings.api_url.clone())))
    }
    #[cfg(not(feature = "http"))]
    {
        let _ = settings;
        Err(eyre!(
            "this build has no HTTP support; rebuild with the 'http' feature or pass --demo"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("bakehouse.toml"),
            "page_size = 9\napi_url = \"http://a\"\n",
        )
        .expect("write");
        let cli = Cli::parse_from(["bakehouse", "--api-url", "http://b"]);
        let settings = resolve_settings(&cli, dir.path()).expect("settings");
        assert_eq!(settings.api_url, "http://b");
        assert_eq!(settings.page_size, 9);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cli = Cli::parse_from(["bakehouse", "--page-size", "0"]);
        assert!(resolve_settings(&cli, dir.path()).is_err());
    }
}
