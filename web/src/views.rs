//! HTML views rendered with Handlebars.

use std::sync::LazyLock;

use domain::UserRecord;
use handlebars::{Handlebars, RenderError};
use serde_json::json;

const INDEX: &str = "index";
const ERROR: &str = "error";

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut handlebars = Handlebars::new();
    handlebars
        .register_template_string(INDEX, include_str!("../templates/index.hbs"))
        .expect("Failed to register index template");
    handlebars
        .register_template_string(ERROR, include_str!("../templates/error.hbs"))
        .expect("Failed to register error template");
    handlebars
});

/// Home page for the current user.
pub fn render_index(user: &UserRecord) -> Result<String, RenderError> {
    TEMPLATES.render(INDEX, &json!({ "user": user.to_view_value() }))
}

/// Error page shown when a login attempt fails.
pub fn render_error(msg: &str, reason: &str, description: &str) -> Result<String, RenderError> {
    TEMPLATES.render(
        ERROR,
        &json!({
            "msg": msg,
            "reason": reason,
            "description": description,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_for_anonymous_visitor_offers_login_and_register() {
        let page = render_index(&UserRecord::Unauthenticated).unwrap();
        assert!(page.contains("You are not logged in."));
        assert!(page.contains("href=\"/login\""));
        assert!(page.contains("href=\"/register\""));
        assert!(!page.contains("href=\"/logout\""));
    }

    #[test]
    fn test_index_for_authenticated_user_shows_profile() {
        let user = serde_json::from_value(json!({
            "id": "u-1",
            "email": "richard@example.com",
            "firstName": "Richard",
            "registrations": [{"applicationId": "app-1", "roles": ["admin", "user"]}]
        }))
        .unwrap();

        let page = render_index(&UserRecord::Authenticated(user)).unwrap();
        assert!(page.contains("Welcome, Richard"));
        assert!(page.contains("richard@example.com"));
        assert!(page.contains("app-1 (admin, user)"));
        assert!(page.contains("href=\"/logout\""));
    }

    #[test]
    fn test_error_page_escapes_provider_text() {
        let page = render_error("Failed to get auth token.", "bad<reason>", "a & b").unwrap();
        assert!(page.contains("<h1>Failed to get auth token.</h1>"));
        assert!(page.contains("bad&lt;reason&gt;"));
        assert!(page.contains("a &amp; b"));
    }
}
