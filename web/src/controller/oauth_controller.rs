//! Controller for the FusionAuth login, registration and logout flows.
//!
//! These endpoints are reached through browser redirects, so every response is a
//! redirect or an HTML page.

use crate::extractors::auth_session::AuthSession;
use crate::{AppState, Error};

use axum::extract::{rejection::QueryRejection, Query, State};
use axum::response::{IntoResponse, Redirect};

use domain::authorization::{self, CallbackParams};
use domain::error::{AuthorizationErrorKind, Error as DomainError};
use domain::gateway::oauth::AuthorizeKind;
use domain::UserRecord;
use log::*;

async fn start_flow(
    app_state: &AppState,
    session: &AuthSession,
    kind: AuthorizeKind,
) -> Result<Redirect, Error> {
    let start = authorization::start(&app_state.config, kind);
    session.set_code_verifier(&start.code_verifier).await?;

    info!("Starting {:?} flow, redirecting to the identity provider", kind);
    Ok(Redirect::temporary(&start.url))
}

/// GET /login
///
/// Starts the PKCE flow at the provider's hosted login page.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 307, description = "Redirect to the FusionAuth authorize endpoint"),
        (status = 500, description = "Session store failure"),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    session: AuthSession,
) -> Result<impl IntoResponse, Error> {
    start_flow(&app_state, &session, AuthorizeKind::Login).await
}

/// GET /register
///
/// Starts the PKCE flow at the provider's self-service registration page.
#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 307, description = "Redirect to the FusionAuth register endpoint"),
        (status = 500, description = "Session store failure"),
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    session: AuthSession,
) -> Result<impl IntoResponse, Error> {
    start_flow(&app_state, &session, AuthorizeKind::Register).await
}

/// GET /logout
///
/// Forgets the session user and hands the browser to the provider, which ends its own
/// session and sends the browser back home.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 307, description = "Redirect to the FusionAuth logout endpoint"),
        (status = 500, description = "Session store failure"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn logout(
    State(app_state): State<AppState>,
    session: AuthSession,
) -> Result<impl IntoResponse, Error> {
    session.remove_user().await?;

    info!("Session user logged out");
    Ok(Redirect::temporary(&authorization::logout_url(
        &app_state.config,
    )))
}

/// GET /oauth-callback
///
/// Redeems the authorization code the provider sent back. On success the user is
/// stored in the session and the browser goes home; any failure renders the error view.
#[utoipa::path(
    get,
    path = "/oauth-callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code issued by FusionAuth"),
        ("error" = Option<String>, Query, description = "OAuth error code when no code was issued"),
        ("error_reason" = Option<String>, Query, description = "FusionAuth specific error reason"),
        ("error_description" = Option<String>, Query, description = "Human readable error description"),
    ),
    responses(
        (status = 307, description = "Redirect to the home page after a successful login"),
        (status = 401, description = "Authorization denied, malformed callback, or the code could not be redeemed"),
        (status = 403, description = "User is not registered for this application"),
        (status = 502, description = "User lookup failed or the provider is unreachable"),
        (status = 500, description = "Session store failure"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    session: AuthSession,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    session.set_user(&UserRecord::Unauthenticated).await?;
    let code_verifier = session.take_code_verifier().await?;

    let Query(params) = query.map_err(|rejection| {
        warn!("Malformed callback query: {}", rejection.body_text());
        DomainError::authorization(
            AuthorizationErrorKind::ProviderDenied,
            "invalid_request",
            rejection.body_text(),
        )
    })?;

    let user = authorization::complete(
        app_state.identity_provider_ref(),
        &app_state.config,
        &params,
        code_verifier.as_deref(),
    )
    .await
    .inspect_err(|e| info!("Callback ended without a login: {:?}", e.authorization_kind()))?;

    session.login(UserRecord::Authenticated(user)).await?;
    Ok(Redirect::temporary("/"))
}
