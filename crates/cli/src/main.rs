mod echo;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use fullfeed_core::{
    HN_RSS_FEED, HN_SITE, UpgradeConfig, Upgrader, build_client, extract_from_bytes, fetch_bytes, fetch_feed,
    fetch_file, fetch_stdin, parse_feed,
};
use owo_colors::OwoColorize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::echo::{
    format_size, print_banner, print_detail, print_info, print_step, print_success, print_timing, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rewrite an RSS feed so every item carries the full text of the page it links to
#[derive(Parser, Debug)]
#[command(name = "fullfeed")]
#[command(author = "fullfeed contributors")]
#[command(version)]
#[command(about = "Full-text RSS for link aggregators", long_about = None)]
struct Args {
    /// Feed URL, local feed file, or "-" for stdin
    #[arg(value_name = "INPUT", default_value = HN_RSS_FEED)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Maximum number of pages fetched at once
    #[arg(short = 'j', long, default_value = "8", value_name = "N")]
    concurrency: usize,

    /// Directory for cached page fragments
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Do not read or write the fragment cache
    #[arg(long, conflicts_with = "cache_dir")]
    no_cache: bool,

    /// Treat INPUT as a single HTML page and print its main content
    #[arg(long)]
    page: bool,

    /// Source URL for file or stdin input, used to resolve links and skip same-site entries
    #[arg(long, value_name = "URL", value_parser = parse_base_url)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where INPUT points
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Url(String),
    File(String),
    Stdin,
}

impl Source {
    fn from_input(input: &str) -> Self {
        if input == "-" {
            Self::Stdin
        } else if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_string())
        } else {
            Self::File(input.to_string())
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Url(url) => format!("Fetching {}", url.bright_white().underline()),
            Self::File(path) => format!("Reading file {}", path.bright_white()),
            Self::Stdin => "Reading from stdin".to_string(),
        }
    }
}

fn parse_base_url(value: &str) -> Result<String, String> {
    Url::parse(value).map(|_| value.to_string()).map_err(|e| format!("invalid URL {}: {}", value, e))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,fullfeed_core=debug,fullfeed=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn upgrade_config(args: &Args) -> UpgradeConfig {
    let mut builder = UpgradeConfig::builder().concurrency(args.concurrency).timeout(args.timeout);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }
    if args.no_cache {
        builder = builder.no_cache();
    } else if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    builder.build()
}

fn read_local(source: &Source) -> anyhow::Result<Vec<u8>> {
    match source {
        Source::File(path) => fetch_file(path).with_context(|| format!("Failed to read file: {}", path)),
        Source::Stdin => fetch_stdin().context("Failed to read from stdin"),
        Source::Url(url) => anyhow::bail!("{} is not a local source", url),
    }
}

/// Extract the main content of one page.
async fn run_page(args: &Args, source: &Source, config: &UpgradeConfig) -> anyhow::Result<String> {
    if args.verbose {
        print_step(1, 2, &source.describe());
    }

    let (bytes, base_url) = match source {
        Source::Url(url) => {
            let client = build_client(&config.fetch).context("Failed to build HTTP client")?;
            let bytes = fetch_bytes(&client, url, &config.fetch).await.context("Failed to fetch page")?;
            (bytes, args.base_url.clone().unwrap_or_else(|| url.clone()))
        }
        local => (read_local(local)?, args.base_url.clone().unwrap_or_default()),
    };

    debug!(bytes = bytes.len(), base_url = %base_url, "extracting page");
    if args.verbose {
        print_detail("Size", &format_size(bytes.len()));
        if base_url.is_empty() {
            print_warning("No --base-url given, relative links are left as they are");
        }
        print_step(2, 2, "Extracting main content");
    }

    extract_from_bytes(&bytes, &base_url).context("Failed to extract content")
}

/// Upgrade a whole feed.
async fn run_feed(args: &Args, source: &Source, config: UpgradeConfig) -> anyhow::Result<String> {
    if args.verbose {
        print_step(1, 3, &source.describe());
    }

    let (feed, base_url) = match source {
        Source::Url(url) => {
            let feed = fetch_feed(url, &config.fetch).await.context("Failed to retrieve feed")?;
            (feed, args.base_url.clone().unwrap_or_else(|| url.clone()))
        }
        local => {
            let bytes = read_local(local)?;
            let feed = parse_feed(&bytes).context("Failed to parse feed")?;
            (feed, args.base_url.clone().unwrap_or_else(|| HN_SITE.to_string()))
        }
    };

    if args.verbose {
        print_detail("Channel", &feed.channel.title);
        print_detail("Entries", &feed.len().to_string());
        match &config.cache_dir {
            Some(dir) => print_info(&format!("Caching fragments in {}", dir.display())),
            None => print_info("Fragment cache disabled"),
        }
    }
    if feed.is_empty() {
        print_warning("Feed has no entries");
    }

    if args.verbose {
        print_step(2, 3, &format!("Upgrading entries ({} at a time)", config.concurrency));
    }

    info!(entries = feed.len(), base_url = %base_url, concurrency = config.concurrency, "upgrading feed");
    let upgrader = Arc::new(Upgrader::new(config).context("Failed to build HTTP client")?);
    let rss = upgrader.upgrade_parsed(feed, &base_url).await.context("Failed to render feed")?;

    if args.verbose {
        print_step(3, 3, "Writing output");
    }
    Ok(rss)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();
    let source = Source::from_input(&args.input);
    let config = upgrade_config(&args);

    let output = if args.page {
        run_page(&args, &source, &config).await?
    } else {
        run_feed(&args, &source, config).await?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    if args.verbose {
        print_timing("Total", started.elapsed());
    }

    Ok(())
}
