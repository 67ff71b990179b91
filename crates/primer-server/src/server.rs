//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use primer_markdown::{parse_doc, render_html, GrammarRegistry, RenderOptions};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing docs
    pub docs_dir: PathBuf,

    /// Directory containing demo entry pages
    pub demos_dir: PathBuf,

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
            docs_dir: PathBuf::from("docs"),
            demos_dir: PathBuf::from("demos"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    hub: ReloadHub,
    grammars: GrammarRegistry,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
    grammars: GrammarRegistry,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self {
            config,
            grammars: GrammarRegistry::new(),
        }
    }

    /// Use the given grammar registry for on-the-fly rendering.
    pub fn with_grammars(mut self, grammars: GrammarRegistry) -> Self {
        self.grammars = grammars;
        self
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("Invalid address");

        let state = Arc::new(RwLock::new(ServerState {
            config: self.config.clone(),
            hub: ReloadHub::new(),
            grammars: self.grammars,
        }));

        // Set up file watcher
        let watch_paths = vec![
            self.config.docs_dir.clone(),
            self.config.demos_dir.clone(),
        ];

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        // Spawn file watch handler
        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        // Build router
        let app = Router::new()
            .route("/", get(index_handler))
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .nest_service("/docs", ServeDir::new(&self.config.docs_dir))
            .nest_service("/demo", ServeDir::new(&self.config.demos_dir))
            .with_state(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handle file watch events.
async fn handle_watch_event(state: &Arc<RwLock<ServerState>>, event: WatchEvent) {
    let state = state.read().await;

    match event {
        WatchEvent::DocModified(path) => {
            tracing::info!("Doc modified: {}", path.display());

            // Re-render the page and push the new content to clients
            if let Ok(source) = std::fs::read_to_string(&path) {
                match parse_doc(&source) {
                    Ok(doc) => {
                        let html =
                            render_html(&doc.content, &RenderOptions::default(), &state.grammars);
                        state.hub.send(ReloadMessage::UpdatePage {
                            path: path.display().to_string(),
                            html,
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", path.display(), e);
                        state.hub.send(ReloadMessage::Reload);
                    }
                }
            }
        }

        WatchEvent::DemoModified(path) => {
            tracing::info!("Demo modified: {}", path.display());
            state.hub.send(ReloadMessage::Reload);
        }

        WatchEvent::Created(_) | WatchEvent::Deleted(_) | WatchEvent::Modified(_) => {
            state.hub.send(ReloadMessage::Reload);
        }
    }
}

/// Handler for the index page.
async fn index_handler(State(state): State<Arc<RwLock<ServerState>>>) -> impl IntoResponse {
    let state = state.read().await;

    let index_path = state.config.docs_dir.join("index.md");

    let content = if index_path.exists() {
        match std::fs::read_to_string(&index_path) {
            Ok(source) => match parse_doc(&source) {
                Ok(doc) => {
                    let title = doc
                        .frontmatter
                        .as_ref()
                        .map(|f| f.title.clone())
                        .unwrap_or_else(|| "Documentation".to_string());

                    format!(
                        r#"<h1>{}</h1>
<div class="content">{}</div>"#,
                        title,
                        render_html(&doc.content, &RenderOptions::default(), &state.grammars)
                    )
                }
                Err(e) => format!("<p>Error parsing index.md: {}</p>", e),
            },
            Err(e) => format!("<p>Error reading index.md: {}</p>", e),
        }
    } else {
        "<h1>Welcome</h1><p>Create docs/index.md to get started.</p>".to_string()
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Primer Dev</title>
  <style>
    body {{ font-family: system-ui, sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; }}
    h1 {{ font-size: 2rem; }}
    pre {{ background: #f5f5f5; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }}
  </style>
</head>
<body>
  <article>{}</article>
  <script src="/__reload.js"></script>
</body>
</html>"#,
        content
    ))
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<RwLock<ServerState>>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<RwLock<ServerState>>) {
    let mut rx = {
        let state = state.read().await;
        state.hub.subscribe()
    };

    // Send connected message
    let Ok(msg) = serde_json::to_string(&ReloadMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    // Forward reload messages to the client
    while let Ok(reload_msg) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&reload_msg) else {
            continue;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler(State(state): State<Arc<RwLock<ServerState>>>) -> impl IntoResponse {
    let state = state.read().await;
    let ws_url = format!(
        "ws://{}:{}/__reload",
        state.config.host, state.config.port
    );
    let script = reload_client_script(&ws_url);
    ([("content-type", "application/javascript")], script)
}
