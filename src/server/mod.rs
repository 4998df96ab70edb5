use axum::{
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    Json,
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::api_routes::{self, AppState};
use crate::catalogue::CatalogueClient;
use crate::config::Config;
use crate::render::Profile;

#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

/// API routes plus the embedded single-page app.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes::api_routes(state))
        .route("/", get(index_handler))
        .route("/*file", get(static_handler))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(
    config: Config,
    profile: Profile,
    page_size: usize,
    port: u16,
    open_browser: bool,
) -> anyhow::Result<()> {
    let client = CatalogueClient::from_config(&config);
    let state = AppState::new(config, profile, page_size);
    state.spawn_load(client);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Starting web UI at http://{}", addr);

    // Open browser automatically unless disabled.
    if open_browser {
        if let Err(err) = open::that(format!("http://{}", addr)) {
            tracing::warn!(error = %err, "could not open browser");
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    static_handler(Uri::from_static("/index.html")).await
}

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();

    if path.is_empty() {
        path = "index.html".to_string();
    }

    // Unknown API paths are errors, not client routes.
    if path == "api" || path.starts_with("api/") {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("No such endpoint: /{path}") })),
        )
            .into_response();
    }

    match Asset::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => {
            // SPA fallback to index.html for unknown routes
            if let Some(content) = Asset::get("index.html") {
                let mime = mime_guess::from_path("index.html").first_or_octet_stream();
                ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
            } else {
                (StatusCode::NOT_FOUND, "404 Not Found").into_response()
            }
        }
    }
}
