// Copyright 2026 Crosscheck Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::Parser;
use crosscheck::acquisition::HttpClient;
use crosscheck::config::{self, CheckConfig};
use crosscheck::renderer::chromium::ChromiumRenderer;
use crosscheck::{report, run_check, CheckError};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "crosscheck",
    about = "Compare a rendered article section with its API extract by unique word count",
    version
)]
struct Cli {
    /// Wiki base URL
    #[arg(long, default_value = config::DEFAULT_SITE)]
    site: String,

    /// Article title as used in URLs
    #[arg(long, default_value = config::DEFAULT_PAGE_TITLE)]
    page: String,

    /// Section title to compare
    #[arg(long, default_value = config::DEFAULT_SECTION)]
    section: String,

    /// Phrase to delete before counting. Repeat to give several; replaces the default list.
    #[arg(long = "blacklist")]
    blacklist: Vec<String>,

    /// Page load and request timeout in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Browser executable (otherwise CROSSCHECK_CHROMIUM_PATH or discovery)
    #[arg(long)]
    chromium_path: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "crosscheck=info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> CheckConfig {
        let blacklist = if self.blacklist.is_empty() {
            CheckConfig::default().blacklist
        } else {
            self.blacklist
        };
        CheckConfig {
            site: self.site,
            page_title: self.page,
            section: self.section,
            blacklist,
            timeout_ms: self.timeout,
            headless: !self.headful,
            chromium_path: self.chromium_path,
        }
    }
}

async fn execute(config: &CheckConfig, json: bool) -> Result<(), CheckError> {
    let fetcher = HttpClient::new(config.timeout_ms)?;
    let renderer = ChromiumRenderer::launch(config.chromium_path.as_deref(), config.headless).await?;

    let cmp = run_check(config, &renderer, &fetcher).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        report::write_json(&mut out, &cmp)?;
    } else {
        report::write_plain(&mut out, &cmp)?;
    }

    cmp.verify()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let config = cli.into_config();
    info!(
        page = %config.page_title,
        section = %config.section,
        "starting crosscheck v{}",
        env!("CARGO_PKG_VERSION")
    );

    // 0 = sizes equal, 1 = sizes differ, 2 = could not compare
    if let Err(e) = execute(&config, json).await {
        if e.is_environment() {
            error!("{e}");
        }
        eprintln!("  Error: {e}");
        std::process::exit(e.exit_code());
    }

    Ok(())
}
