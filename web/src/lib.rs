use axum::Router;
use log::*;
use time::Duration;
use tokio::net::TcpListener;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
pub(crate) mod extractors;
mod router;
pub mod views;

/// The full application: routes plus the session layer every route reads through.
pub fn build_app(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(app_state.config.is_production())
        // Lax so the cookie is sent on the provider's top-level redirect back to us
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            app_state.config.session_expiry_seconds,
        )));

    router::define_routes(app_state).layer(session_layer)
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let server_url = format!("{}:{}", interface, app_state.config.port);

    info!(
        "Server starting... listening for connections on http://{} ({:?})",
        server_url,
        app_state.config.runtime_env()
    );

    let listener = TcpListener::bind(&server_url).await?;
    axum::serve(listener, build_app(app_state)).await
}
