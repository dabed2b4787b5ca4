use crate::AppState;
use axum::{routing::get, Router};

use crate::controller::{health_check_controller, home_controller, oauth_controller};

use service::config::OAUTH_CALLBACK_PATH;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// Global definition of the OpenAPI description. A path must be listed here to be
// part of the rendered document.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "FusionAuth PKCE Login"
        ),
        paths(
            home_controller::index,
            oauth_controller::login,
            oauth_controller::register,
            oauth_controller::logout,
            oauth_controller::callback,
            health_check_controller::health_check,
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "fusionauth_pkce", description = "Browser login through FusionAuth with PKCE")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// The session cookie is the only credential a browser carries.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id set on the first response and rotated after a successful login",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(home_routes())
        .merge(oauth_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn home_routes() -> Router {
    Router::new().route("/", get(home_controller::index))
}

fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", get(oauth_controller::login))
        .route("/register", get(oauth_controller::register))
        .route("/logout", get(oauth_controller::logout))
        .route(OAUTH_CALLBACK_PATH, get(oauth_controller::callback))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
