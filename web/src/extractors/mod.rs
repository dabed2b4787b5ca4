pub(crate) mod auth_session;
pub(crate) mod current_user;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
