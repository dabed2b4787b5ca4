use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use domain::error::{
    AuthorizationError, AuthorizationErrorKind, DomainErrorKind, Error as DomainError,
    InternalErrorKind,
};
use log::*;

use crate::views;

extern crate log;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    pub(crate) fn session(err: tower_sessions::session::Error) -> Self {
        error!("Session store failure: {err:?}");
        Self(DomainError::internal(InternalErrorKind::Session, err))
    }

    pub(crate) fn view(err: handlebars::RenderError) -> Self {
        error!("Failed to render view: {err:?}");
        Self(DomainError::internal(InternalErrorKind::View, err))
    }
}

fn authorization_status(kind: AuthorizationErrorKind) -> StatusCode {
    match kind {
        AuthorizationErrorKind::ProviderDenied | AuthorizationErrorKind::TokenExchangeFailed => {
            StatusCode::UNAUTHORIZED
        }
        AuthorizationErrorKind::NotRegistered => StatusCode::FORBIDDEN,
        AuthorizationErrorKind::UserFetchFailed | AuthorizationErrorKind::ProviderUnavailable => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn render_authorization_error(err: &AuthorizationError) -> Response {
    let status = authorization_status(err.kind);
    match views::render_error(err.kind.message(), &err.reason, &err.description) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(render_error) => {
            error!("Failed to render error view: {render_error:?}");
            (status, err.kind.message()).into_response()
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self.0.error_kind {
            DomainErrorKind::Authorization(authorization_error) => {
                render_authorization_error(authorization_error)
            }
            DomainErrorKind::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
