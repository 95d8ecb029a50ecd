use anyhow::{Context as AnyhowContext, Result};
use bangs_index::{build_index, load_source, verify, BangIndex, DuplicatePolicy};
use bangs_redirect::{Redirector, Resolution, Template};
use clap::{Args, Parser, Subcommand};
use config::{ConfigOverrides, ServeConfig};
use http_api::{build_router, AppState, BUNDLED_HOME_PAGE};
use metrics::Metrics;
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod http_api;
mod metrics;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "bangs")]
#[command(about = "Compile and serve !bang search redirects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a bang list (JSON) into index and payload files
    Build(BuildArgs),

    /// Resolve one query and print the redirect URL
    Resolve(ResolveArgs),

    /// Check a compiled index for ordering and bounds problems
    Inspect(InspectArgs),

    /// Serve redirects over HTTP (GET /?q=...)
    ServeHttp(ServeArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Bang list: JSON array of {"t": trigger, "u": template}; `-` for stdin
    #[arg(long, default_value = "bangs.json")]
    source: PathBuf,

    /// Output index file
    #[arg(long, default_value = "bangs.idx")]
    index: PathBuf,

    /// Output payload file
    #[arg(long, default_value = "bangs.dat")]
    payload: PathBuf,

    /// Fail on duplicate triggers instead of keeping the first
    #[arg(long)]
    strict: bool,

    /// Output build stats as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone, Default)]
struct SettingsArgs {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compiled index file (default: bangs.idx)
    #[arg(long)]
    index: Option<PathBuf>,

    /// Compiled payload file (default: bangs.dat)
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Template used when no bang matches; must contain <q>
    #[arg(long)]
    default_template: Option<String>,
}

impl SettingsArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            index: self.index.clone(),
            payload: self.payload.clone(),
            default_template: self.default_template.clone(),
            ..ConfigOverrides::default()
        }
    }
}

#[derive(Args)]
struct ResolveArgs {
    /// Raw query, e.g. "golang !gh"
    query: String,

    /// Per-query fallback template (query appended unless it has <q>)
    #[arg(long)]
    fallback: Option<String>,

    /// URL-encode the query before substitution
    #[arg(long)]
    encode: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Args)]
struct InspectArgs {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:8080
    #[arg(long)]
    bind: Option<String>,

    /// HTML page served for empty queries
    #[arg(long)]
    home_page: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Build(args) => run_build(args)?,
        Commands::Resolve(args) => run_resolve(args)?,
        Commands::Inspect(args) => run_inspect(args)?,
        Commands::ServeHttp(args) => serve_http(args).await?,
    }

    Ok(())
}

fn run_build(args: BuildArgs) -> Result<()> {
    let records = load_source(&args.source)?;
    let policy = if args.strict {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::KeepFirst
    };
    let built = build_index(&records, policy)?;
    built
        .write(&args.index, &args.payload)
        .context("Failed to write compiled index")?;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&built.stats)?)?;
    } else {
        let stats = &built.stats;
        print_stdout(&format!(
            "{} entries ({} duplicates dropped, {} without placeholder)\n{}: {} bytes\n{}: {} bytes",
            stats.entries,
            stats.duplicates_dropped,
            stats.templates_without_placeholder,
            args.index.display(),
            stats.index_bytes,
            args.payload.display(),
            stats.payload_bytes
        ))?;
    }
    Ok(())
}

fn load_redirector(config: &ServeConfig) -> Result<Redirector> {
    let default = config
        .default_template()
        .context("Invalid default template")?;
    let index = BangIndex::load(&config.index, &config.payload)?;
    Ok(Redirector::new(index, default))
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    let config =
        ServeConfig::resolve(args.settings.config.as_deref(), &args.settings.overrides())?;
    let redirector = load_redirector(&config)?;
    let fallback = args
        .fallback
        .as_deref()
        .map(Template::fallback)
        .transpose()
        .context("Invalid fallback template")?;

    match redirector.resolve(&args.query, fallback.as_ref()) {
        Resolution::DefaultPage => print_stdout("default page")?,
        Resolution::Redirect(target) => {
            log::debug!("Outcome: {}", target.outcome.as_str());
            let url = if args.encode {
                target.compose_with(|q| urlencoding::encode(q))
            } else {
                target.compose_with(Cow::Borrowed)
            };
            print_stdout(&url)?;
        }
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let config =
        ServeConfig::resolve(args.settings.config.as_deref(), &args.settings.overrides())?;
    let index = BangIndex::load(&config.index, &config.payload)?;
    let report = verify(&index.view());

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)?;
    } else {
        print_stdout(&format!(
            "rows: {}\npayload bytes: {} ({} referenced)",
            report.rows, report.payload_bytes, report.referenced_bytes
        ))?;
        for problem in report.problems() {
            eprintln!("problem: {problem}");
        }
    }

    if !report.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}

async fn serve_http(args: ServeArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        bind: args.bind.clone(),
        home_page: args.home_page.clone(),
        ..args.settings.overrides()
    };
    let config = ServeConfig::resolve(args.settings.config.as_deref(), &overrides)?;
    let redirector = load_redirector(&config)?;

    let home_page = match &config.home_page {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read home page {}", path.display()))?,
        None => BUNDLED_HOME_PAGE.to_string(),
    };

    let metrics = Metrics::new()?;
    metrics.set_index_size(redirector.index().rows(), redirector.index().payload_len());

    let state = Arc::new(AppState {
        redirector,
        metrics,
        home_page,
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    log::info!("Serving bang redirects on http://{}/", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
