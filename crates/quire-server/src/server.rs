//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use quire_build::reload::RELOAD_PATH;
use quire_build::{BuildError, BuildOptions, Config, StaticBuilder};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{ReloadHub, ReloadMessage};

/// Quiet period after a change before rebuilding, so bursts of writes
/// (editor save, compiler output) produce a single build.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Project configuration to build with
    pub config: Config,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            config: Config::default(),
            port: 8000,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    AddressError(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error(transparent)]
    BuildError(#[from] BuildError),

    #[error("Build task failed: {0}")]
    TaskError(String),
}

/// Shared server state.
struct ServerState {
    hub: ReloadHub,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Build the site, then serve it until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = parse_addr(&self.config.host, self.config.port)?;

        let config = Arc::new(self.config.config);
        let hub = ReloadHub::new();

        // A broken toolchain on startup is fatal; later it only fails the rebuild
        rebuild(Arc::clone(&config), &hub).await?;

        let dist_dir = config.build.dist_dir.clone();
        std::fs::create_dir_all(&dist_dir).map_err(|e| {
            BuildError::WriteError(format!("{}: {}", dist_dir.display(), e))
        })?;

        let (watcher, mut rx) = watch_site(&config)?;

        let watch_hub = hub.clone();
        let watch_config = Arc::clone(&config);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                tracing::info!("Changed: {}", event.path().display());

                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                if let Err(e) = rebuild(Arc::clone(&watch_config), &watch_hub).await {
                    tracing::error!("Rebuild failed: {}", e);
                }
            }
            // Keep watcher alive
            drop(watcher);
        });

        let state = Arc::new(ServerState { hub });
        let app = Router::new()
            .route(RELOAD_PATH, get(ws_handler))
            .fallback_service(ServeDir::new(&dist_dir))
            .with_state(state);

        tracing::info!("Serving {} at http://{}", dist_dir.display(), addr);
        listen(app, addr, self.config.open).await
    }
}

/// Serve an already built site as is: no watcher, no rebuilds, no reload
/// endpoint.
pub async fn serve_dir(dir: &Path, host: &str, port: u16, open: bool) -> Result<(), ServerError> {
    let addr = parse_addr(host, port)?;

    if !dir.join("index.html").is_file() {
        tracing::warn!("{} has no index.html", dir.display());
    }

    let app = Router::new().fallback_service(ServeDir::new(dir));

    tracing::info!("Previewing {} at http://{}", dir.display(), addr);
    listen(app, addr, open).await
}

fn parse_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", host, port)
        .parse()
        .map_err(|_| ServerError::AddressError(format!("{}:{}", host, port)))
}

async fn listen(app: Router, addr: SocketAddr, open: bool) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

    if open {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::BindError(addr, e.to_string()))
}

/// Watch the site's sources, ignoring everything the build writes itself so
/// a rebuild never triggers another one.
fn watch_site(
    config: &Config,
) -> Result<(FileWatcher, tokio::sync::mpsc::Receiver<WatchEvent>), ServerError> {
    let watch_paths: Vec<PathBuf> = config.watch_paths().into_iter().map(canonical).collect();
    let ignore: Vec<PathBuf> = config
        .generated_paths()
        .into_iter()
        .map(canonical)
        .collect();

    FileWatcher::new(&watch_paths, &ignore).map_err(|e| ServerError::WatchError(e.to_string()))
}

/// Rebuild the site for the dev server and tell connected browsers.
///
/// Rebuilds run one at a time: the watch loop awaits each before reading the
/// next change.
async fn rebuild(config: Arc<Config>, hub: &ReloadHub) -> Result<(), ServerError> {
    let result = tokio::task::spawn_blocking(move || {
        StaticBuilder::new(&config).build(BuildOptions { is_server: true })
    })
    .await
    .map_err(|e| ServerError::TaskError(e.to_string()))??;

    tracing::info!(
        "Built {} of {} pages in {}ms",
        result.summary.succeeded.len(),
        result.summary.total(),
        result.duration_ms
    );

    if result.summary.failed.is_empty() {
        hub.send(ReloadMessage::Reload);
    } else {
        hub.send(ReloadMessage::BuildFailed {
            failed: result.summary.failed.len(),
        });
    }

    Ok(())
}

/// Resolve symlinks so paths compare equal to the ones notify reports.
///
/// A file that does not exist yet (a compiler output before the first build)
/// resolves through its parent directory.
fn canonical(path: PathBuf) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => path,
        },
        _ => path,
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward reload messages to one browser until it disconnects.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    if !send_message(&mut socket, &ReloadMessage::Connected).await {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> bool {
    let Ok(json) = serde_json::to_string(msg) else {
        return false;
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn site(pages: &[(&str, &str)]) -> (tempfile::TempDir, Config) {
        let temp = tempdir().unwrap();
        let contents = temp.path().join("contents");
        fs::create_dir_all(&contents).unwrap();
        for (name, body) in pages {
            fs::write(contents.join(name), body).unwrap();
        }
        let config = Config::default().with_root(temp.path().to_path_buf());
        (temp, config)
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 8000);
        assert_eq!(server.config.host, "127.0.0.1");
    }

    #[tokio::test]
    async fn rebuild_injects_reload_client_and_notifies() {
        let (temp, config) = site(&[("index.md", "---\ntitle: Home\n---\nhello")]);
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        rebuild(Arc::new(config), &hub).await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        let html = fs::read_to_string(temp.path().join("dist/index.html")).unwrap();
        assert!(html.contains(RELOAD_PATH));
    }

    #[tokio::test]
    async fn rebuild_reports_failed_pages() {
        let (_temp, config) = site(&[
            ("index.md", "---\n---\nhome"),
            ("broken.md", "no preamble"),
        ]);
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        rebuild(Arc::new(config), &hub).await.unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            ReloadMessage::BuildFailed { failed: 1 }
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn compiler_output_in_watched_dir_does_not_retrigger() {
        use quire_build::DynamicCompiler;

        let (temp, mut config) = site(&[("index.md", "---\ntitle: Home\n---\nhome")]);
        fs::create_dir_all(temp.path().join("static")).unwrap();
        config.build.compiler.dynamic = Some(DynamicCompiler {
            command: "echo 'init()' > static/app.js".to_string(),
            output: temp.path().join("static/app.js"),
            public_path: None,
            watch: Vec::new(),
        });
        let config = Arc::new(config);
        let hub = ReloadHub::new();

        let (watcher, mut rx) = watch_site(&config).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        for _ in 0..3 {
            rebuild(Arc::clone(&config), &hub).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(
            rx.try_recv().is_err(),
            "a build must not report its own output as a change"
        );

        // Edits to sources still come through
        fs::write(
            temp.path().join("contents/index.md"),
            "---\ntitle: Edited\n---\nhome",
        )
        .unwrap();
        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv())
            .await
            .expect("timeout waiting for source change")
            .unwrap();
        drop(watcher);

        assert!(event.path().ends_with("contents/index.md"));
    }

    #[test]
    fn canonical_resolves_missing_file_through_parent() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("app.js");

        assert_eq!(
            canonical(missing),
            temp.path().canonicalize().unwrap().join("app.js")
        );
    }

    #[tokio::test]
    async fn serve_dir_rejects_bad_host() {
        let temp = tempdir().unwrap();

        let result = serve_dir(temp.path(), "not a host", 4000, false).await;

        assert!(matches!(result, Err(ServerError::AddressError(_))));
    }

    #[tokio::test]
    async fn rebuild_propagates_fatal_errors() {
        let temp = tempdir().unwrap();
        let config = Config::default().with_root(temp.path().to_path_buf());

        let result = rebuild(Arc::new(config), &ReloadHub::new()).await;

        assert!(matches!(
            result,
            Err(ServerError::BuildError(BuildError::ReadError(_)))
        ));
    }
}
