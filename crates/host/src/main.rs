use std::net::TcpListener;
use std::path::PathBuf;

use anyhow::Context;
use sensus_web_host::config::Config;
use sensus_web_host::server::{self, AppState};
use sensus_web_host::store;
use sensus_web_watchlist::render_outcome;
use tokio::signal;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("sensus-web - NATO watchlist page host");
    println!();
    println!("USAGE:");
    println!("    sensus-web [COMMAND] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    serve            Start server (default)");
    println!("    render [DB]      Print the rendered watchlist HTML to stdout");
    println!("    init-db [DB]     Create the watchlist table if it does not exist");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version");
    println!();
    println!("CONFIG:");
    println!("    ~/.config/sensus-web/config.toml");
    println!();
    println!("DB defaults to data.database_path from the config file.");
}

fn print_connection_info(bind: &str, http_port: u16, database: &std::path::Path) {
    eprintln!();
    eprintln!("  \x1b[1;36msensus-web\x1b[0m v{VERSION}");
    eprintln!("  \x1b[1;32m[http]\x1b[0m   Serving at port \x1b[1;96m{http_port}\x1b[0m");
    eprintln!("  \x1b[1;32m[data]\x1b[0m   {}", database.display());
    eprintln!();
    eprintln!("  \x1b[1;37m>\x1b[0m Open: \x1b[4;96mhttp://{bind}:{http_port}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mPress Ctrl+C to stop\x1b[0m");
    eprintln!();
}

/// Graceful start: Check if port is available
fn check_port_available(bind: &str, port: u16) -> bool {
    TcpListener::bind(format!("{bind}:{port}")).is_ok()
}

/// Graceful start: Find available port starting from default
fn find_available_port(bind: &str, start: u16) -> Option<u16> {
    (start..start.saturating_add(10)).find(|&port| check_port_available(bind, port))
}

/// Database path from the command line, else from config
fn database_arg(args: &[String], config: &Config) -> PathBuf {
    args.get(2)
        .map_or_else(|| config.data.database_path.clone(), PathBuf::from)
}

/// Handle 'sensus-web render [DB]'
fn handle_render_command(args: &[String], config: &Config) {
    let path = database_arg(args, config);
    let outcome = store::latest_outcome(&path, &config.watchlist.country);
    println!("{}", render_outcome(&outcome));
}

/// Handle 'sensus-web init-db [DB]'
fn handle_init_db_command(args: &[String], config: &Config) -> anyhow::Result<()> {
    let path = database_arg(args, config);
    store::create_database(&path)?;
    tracing::info!(path = %path.display(), "Watchlist table ready");
    Ok(())
}

async fn shutdown_signal() {
    // Wait for Ctrl+C or SIGTERM
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down");
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let bind = config.server.bind.clone();

    // === GRACEFUL START ===
    let http_port = if check_port_available(&bind, config.server.http_port) {
        config.server.http_port
    } else {
        tracing::warn!(port = config.server.http_port, "Port in use, finding alternative");
        find_available_port(&bind, config.server.http_port.saturating_add(1)).with_context(|| {
            format!(
                "No available HTTP ports in range {}-{}",
                config.server.http_port,
                config.server.http_port.saturating_add(10)
            )
        })?
    };

    if !config.data.database_path.exists() {
        tracing::warn!(
            path = %config.data.database_path.display(),
            "Database file not found; the page will show the error message"
        );
    }

    print_connection_info(&bind, http_port, &config.data.database_path);

    let app = server::router(AppState::new(config));

    let http_addr = format!("{bind}:{http_port}");
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {http_addr}"))?;
    tracing::info!(addr = %http_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging (tracing)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map_or("serve", String::as_str);

    match command {
        "--version" | "-v" => {
            println!("sensus-web {VERSION}");
            return Ok(());
        }
        "--help" | "-h" => {
            print_help();
            return Ok(());
        }
        _ => {}
    }

    // === LOAD CONFIGURATION ===
    Config::create_default_if_missing();
    let config = Config::load();
    tracing::debug!(path = %Config::default_config_path().display(), "Config loaded");

    match command {
        "render" => {
            handle_render_command(&args, &config);
            Ok(())
        }
        "init-db" => handle_init_db_command(&args, &config),
        "serve" => serve(config).await,
        other => {
            print_help();
            anyhow::bail!("Unknown command: {other}")
        }
    }
}
