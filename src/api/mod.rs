mod docs;
mod handlers;
mod pages;
mod routes;
mod state;

#[cfg(test)]
mod routes_test;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use routes::create_router;
pub use state::AppState;

/// Server startup errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(shebang::api::bind),
        help("Is another portal already running? Pick a different port with --port")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(shebang::api::serve))]
    Serve(#[source] std::io::Error),
}

/// Portal server configuration.
///
/// Every on-disk location is derived from `root`:
///
/// ```text
/// root/
///   docs/                      Markdown served under /docs
///   web/                       page shells (index.html, features.html, ...)
///   web/data/                  JSON data + active_project.txt
///   projects/<id>/.shebang/    per-project config, board and metrics
///   templates/project/.shebang template files for new projects
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Process root all paths are resolved against
    pub root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Defaults overridden by `SHEBANG_ROOT`, `SHEBANG_HOST` and
    /// `SHEBANG_PORT`. Unparseable values are ignored.
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(root) = env::var("SHEBANG_ROOT") {
            config.root = PathBuf::from(root);
        }
        if let Some(host) = env::var("SHEBANG_HOST").ok().and_then(|h| h.parse().ok()) {
            config.host = host;
        }
        if let Some(port) = env::var("SHEBANG_PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join("docs")
    }

    pub fn web_dir(&self) -> PathBuf {
        self.root.join("web")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.web_dir().join("data")
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root.join("templates").join("project").join(".shebang")
    }

    /// Plain-text file holding the active project id.
    pub fn active_pointer(&self) -> PathBuf {
        self.data_dir().join("active_project.txt")
    }
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shebang=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the portal server with the given configuration
pub async fn run(config: Config) -> Result<(), ApiError> {
    init_tracing();

    let addr = config.addr();
    let state = AppState::new(config);
    info!(
        root = %state.config().root.display(),
        active_project = %state.projects().active_project(),
        "Opening portal"
    );

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;

    let base = format!("http://{}", addr);
    info!("Portal listening on {}", base);
    info!("  Dashboard:     {}/", base);
    info!("  Features:      {}/features", base);
    info!("  Git History:   {}/git-history", base);
    info!("  Documentation: {}/docs", base);
    info!("  Roadmap:       {}/docs/ROADMAP.md", base);

    axum::serve(listener, app).await.map_err(ApiError::Serve)?;
    Ok(())
}
