use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use api_ingress::{ApiIngress, ApiIngressConfig};
use doctor_directory::config::DoctorDirectoryConfig;
use doctor_directory::DoctorDirectory;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Adds `mode=rwc` so a missing database file is created.
/// - Normalizes backslashes into forward slashes.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database dir {}", dir.display()))?;
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.contains("mode=") => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Clinic Server - doctor directory and appointment booking
#[derive(Parser)]
#[command(name = "clinic-server")]
#[command(about = "Clinic Server - doctor directory and appointment booking")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Clinic Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config),
    }
}

/// Host and port from the `server` section win over `api_ingress.bind_addr`.
fn ingress_config(config: &AppConfig) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config(api_ingress::NAME)?;
    cfg.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    if config.server.timeout_sec > 0 {
        cfg.request_timeout_secs = config.server.timeout_sec;
    }
    Ok(cfg)
}

async fn connect_db(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConnection> {
    let base_dir = PathBuf::from(&config.server.home_dir);
    let db_config = config.database.clone().unwrap_or(DatabaseConfig {
        url: MEMORY_DSN.to_string(),
        max_conns: None,
        busy_timeout_ms: None,
    });

    let dsn = if args.mock {
        MEMORY_DSN.to_string()
    } else {
        let backend = detect_from_dsn(&db_config)?;
        let raw = db_config.url.trim().to_owned();
        if backend == "sqlite" {
            absolutize_sqlite_dsn(&raw, &base_dir)?
        } else {
            raw
        }
    };

    let busy_timeout = Duration::from_millis(u64::from(db_config.busy_timeout_ms.unwrap_or(5000)));
    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy_timeout));
    // In-memory SQLite must stay on a single connection; sea-orm only does that when unset.
    if dsn != MEMORY_DSN {
        opts.max_connections(db_config.max_conns.unwrap_or(10));
    }

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to {dsn}"))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let db = connect_db(&config, &args).await?;

    let directory = DoctorDirectory::default();
    directory.migrate(&db).await?;
    let directory_cfg: DoctorDirectoryConfig = config.module_config(DoctorDirectory::NAME)?;
    directory.init(directory_cfg, db).await?;

    let ingress = ApiIngress::new(ingress_config(&config)?);
    let app = directory.register_rest(axum::Router::new())?;
    let router = ingress.build_router(app, Some(DoctorDirectory::openapi()));

    let cancel = CancellationToken::new();
    let signals = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = modkit::runtime::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handler failed");
            }
            cancel.cancel();
        })
    };

    let result = ingress.serve(router, cancel.clone()).await;
    cancel.cancel();
    signals.abort();
    tracing::info!("Clinic Server stopped");
    result
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let _: DoctorDirectoryConfig = config.module_config(DoctorDirectory::NAME)?;
    let _ = ingress_config(config)?;
    if let Some(db) = &config.database {
        detect_from_dsn(db)?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}
