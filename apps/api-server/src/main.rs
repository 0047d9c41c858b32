//! api-server — HTTP API for the Address Book workspace.
//!
//! Exposes create/list/get/update/delete for address records under
//! `/addresses/` and supports local dev with:
//! - Storage: SQLite file (default, `sqlite` feature) or in-memory.
//! - Logging: console (pretty or JSON) plus an append-only log file.
//! - CORS: Configurable via CORS_ALLOW_ORIGIN (origin string) for browser clients.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! cargo run -p api-server
//!
//! # throwaway in-memory store, JSON logs, no log file
//! STORAGE_PROVIDER=memory LOG_FORMAT=json LOG_FILE= cargo run -p api-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.
//!

mod addresses;
mod config;
mod error;
mod repo;

use std::fs::{File, OpenOptions};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use domain::service::AddressService;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::StartupError;
use crate::repo::AnyRepo;

#[derive(Clone)]
struct AppState {
    addresses: Arc<AddressService<AnyRepo>>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(err = %e, "api-server failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = config::Config::from_env()?;

    init_tracing(&cfg)?;
    cfg.warn_if_ephemeral();
    info!("{}", domain::about());

    // The store handle is built once here and shared with every request.
    let repo = build_repo(&cfg)?;
    let state = AppState {
        addresses: Arc::new(AddressService::new(repo)),
    };

    let app = build_app(state, &cfg);

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    info!(%addr, "api-server listening");
    axum::serve(listener, app)
        .await
        .map_err(StartupError::Serve)
}

fn build_app(state: AppState, cfg: &config::Config) -> Router {
    // Request ID header name
    let x_request_id = HeaderName::from_static("x-request-id");

    let app = addresses::router()
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .with_state(state);

    // CORS - already validated in Config::from_env()
    let cors = if cfg.cors_allow_origin == HeaderValue::from_static("*") {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([cfg.cors_allow_origin.clone()]))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    };
    app.layer(cors)
}

fn init_tracing(cfg: &config::Config) -> Result<(), StartupError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer(cfg.log_file.as_deref())?);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .try_init()?;
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .try_init()?;
        }
    }
    Ok(())
}

type FileLayer<S> = fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, Mutex<File>>;

/// Plain-text copy of every event, appended across restarts. `None` disables it.
fn file_layer<S>(path: Option<&Path>) -> Result<Option<FileLayer<S>>, StartupError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let log_err = |source: std::io::Error| StartupError::LogFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(log_err)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_err)?;
    Ok(Some(
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(file)),
    ))
}

// Construct a repository instance based on config and feature flags.
fn build_repo(cfg: &config::Config) -> Result<AnyRepo, StartupError> {
    match cfg.storage_provider {
        #[cfg(feature = "sqlite")]
        config::StorageProvider::Sqlite => {
            let repo = sqlite_adapter::SqliteRepo::new(&cfg.db_path)?;
            info!(path = %repo.path().display(), "using sqlite storage");
            Ok(AnyRepo::Sqlite(repo))
        }
        #[cfg(not(feature = "sqlite"))]
        config::StorageProvider::Sqlite => {
            tracing::warn!(
                path = %cfg.db_path.display(),
                "built without the `sqlite` feature; using in-memory storage"
            );
            Ok(AnyRepo::memory())
        }
        config::StorageProvider::Memory => Ok(AnyRepo::memory()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;

    #[test]
    fn file_layer_appends_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");

        let mut sizes = Vec::new();
        for run in 0..2u32 {
            let layer = file_layer(Some(path.as_path())).unwrap();
            let subscriber = tracing_subscriber::registry().with(layer);
            tracing::subscriber::with_default(subscriber, || {
                info!(run, "address created");
            });
            sizes.push(std::fs::metadata(&path).unwrap().len());
        }
        assert!(sizes[0] > 0);
        assert!(sizes[1] > sizes[0], "second run must append, not truncate");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("address created").count(), 2);
        assert!(!contents.contains('\u{1b}'), "log file must not carry ANSI escapes");
    }

    #[test]
    fn empty_log_file_setting_disables_file_layer() {
        let cfg = config::Config::from_lookup(|key| (key == "LOG_FILE").then(String::new)).unwrap();
        assert_eq!(cfg.log_file, None);
        assert!(file_layer::<Registry>(cfg.log_file.as_deref()).unwrap().is_none());
    }
}
