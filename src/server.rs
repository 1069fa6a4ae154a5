// ============================================================================
// Serveur HTTP : page statique + statistiques
// ============================================================================
// - GET /api/stats : le DisplaySnapshot courant en JSON (lu par la page)
// - tout autre chemin : fichier sous le répertoire racine, avec un type MIME
//   déduit de l'extension
//
// Réponses du serveur de fichiers :
// - 200 + Content-Type si le fichier est lu
// - 404 "File not found" si le fichier n'existe pas
// - 500 "Internal server error" pour toute autre erreur de lecture
// ============================================================================

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::board::StatsBoard;
use crate::config::ServerConfig;

/// Type MIME des extensions inconnues
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// État partagé par les handlers
#[derive(Clone)]
struct ServerState {
    root: Arc<PathBuf>,
    index: Arc<str>,
    board: StatsBoard,
}

/// Type MIME d'un fichier d'après son extension (insensible à la casse)
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => DEFAULT_MIME,
    }
}

/// Traduit le chemin de la requête en chemin de fichier sous `root`
///
/// "/" est servi par le document d'index. Un chemin qui remonte au-dessus
/// de la racine ("..") ne correspond à aucun fichier.
pub fn resolve_path(root: &Path, index: &str, request_path: &str) -> Option<PathBuf> {
    let relative = if request_path == "/" || request_path.is_empty() {
        index
    } else {
        request_path
    };

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir | Component::RootDir => {}
            Component::ParentDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Construit le routeur (utilisé par start_server_on et par les tests)
pub fn router(root: PathBuf, index: &str, board: StatsBoard) -> Router {
    let state = ServerState {
        root: Arc::new(root),
        index: Arc::from(index),
        board,
    };

    Router::new()
        .route("/api/stats", get(stats_handler))
        .fallback(file_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Démarre le serveur sur l'adresse configurée
pub async fn start_server(config: &ServerConfig, board: StatsBoard) -> Result<(JoinHandle<()>, SocketAddr)> {
    start_server_on(config.socket_addr()?, config, board).await
}

/// Démarre le serveur sur une adresse précise
///
/// Les tests passent le port 0 pour obtenir un port libre.
pub async fn start_server_on(
    addr: SocketAddr,
    config: &ServerConfig,
    board: StatsBoard,
) -> Result<(JoinHandle<()>, SocketAddr)> {
    let app = router(config.root.clone(), &config.index, board);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            error!(%addr, "Port already in use, set another port in the config file");
            return Err(e).context(format!("Port {} déjà utilisé", addr.port()));
        }
        Err(e) => return Err(e).context(format!("Échec de l'écoute sur {}", addr)),
    };
    let actual_addr = listener.local_addr()?;

    info!("Server running at http://{}", actual_addr);
    info!(root = %config.root.display(), "Serving files");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok((handle, actual_addr))
}

/// Handler de /api/stats
async fn stats_handler(State(state): State<ServerState>) -> impl IntoResponse {
    Json(state.board.snapshot().await)
}

/// Handler de repli : sert un fichier du répertoire racine
async fn file_handler(State(state): State<ServerState>, uri: Uri) -> Response {
    let Some(file_path) = resolve_path(&state.root, &state.index, uri.path()) else {
        debug!(path = %uri.path(), "Rejected path outside of root");
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    };

    match tokio::fs::read(&file_path).await {
        Ok(data) => {
            let mime = mime_for(&file_path);
            (StatusCode::OK, [(header::CONTENT_TYPE, mime)], data).into_response()
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %file_path.display(), "File not found");
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
        Err(e) => {
            error!(path = %file_path.display(), error = %e, "Failed to read file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
