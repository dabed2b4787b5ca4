use crate::extractors::current_user::CurrentUser;
use crate::{views, Error};

use axum::response::{Html, IntoResponse};

/// GET the home page for the current session user
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Home page, with the profile when logged in", content_type = "text/html", body = String),
        (status = 500, description = "Session store or template failure"),
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(CurrentUser(user): CurrentUser) -> Result<impl IntoResponse, Error> {
    let page = views::render_index(&user).map_err(Error::view)?;
    Ok(Html(page))
}
