//! The user as this application sees it: a snapshot of the provider's profile taken
//! at login, or nobody.
//!
//! The snapshot is never refreshed. If the user is changed, deactivated or deleted in
//! the identity provider, the session keeps the old copy until the next login.

use crate::gateway::oauth::{Registration, User};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "profile", rename_all = "snake_case")]
pub enum UserRecord {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl UserRecord {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, UserRecord::Authenticated(_))
    }

    pub fn profile(&self) -> Option<&User> {
        match self {
            UserRecord::Authenticated(user) => Some(user),
            UserRecord::Unauthenticated => None,
        }
    }

    /// The record as views see it: the full profile merged with
    /// `is_authenticated: true`, or just `{"is_authenticated": false}`.
    pub fn to_view_value(&self) -> Value {
        let mut value = self
            .profile()
            .and_then(|user| serde_json::to_value(user).ok())
            .unwrap_or_else(|| json!({}));
        if let Value::Object(fields) = &mut value {
            fields.insert(
                "is_authenticated".to_string(),
                Value::Bool(self.is_authenticated()),
            );
        }
        value
    }
}

/// A user is registered for `application_id` when at least one of their
/// registrations names it. Roles are not consulted, so a registration whose roles
/// mark it "deactivated" still counts.
pub fn user_is_registered(registrations: Option<&[Registration]>, application_id: &str) -> bool {
    registrations
        .unwrap_or_default()
        .iter()
        .any(|registration| registration.application_id == application_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    const APP_ID: &str = "85a03867-dccf-4882-adde-1a79aeec50df";

    fn registration(application_id: &str, roles: &[&str]) -> Registration {
        Registration {
            application_id: application_id.to_string(),
            roles: Some(roles.iter().map(|r| r.to_string()).collect()),
            other: Map::new(),
        }
    }

    fn user() -> User {
        serde_json::from_value(json!({
            "id": "u-1",
            "email": "richard@example.com",
            "firstName": "Richard",
            "registrations": [{"applicationId": APP_ID, "roles": ["user"]}]
        }))
        .unwrap()
    }

    #[test]
    fn test_not_registered_without_registrations() {
        assert!(!user_is_registered(None, APP_ID));
        assert!(!user_is_registered(Some(&[][..]), APP_ID));
    }

    #[test]
    fn test_not_registered_for_other_applications() {
        let registrations = vec![registration("some-other-app", &["admin"])];
        assert!(!user_is_registered(Some(registrations.as_slice()), APP_ID));
    }

    #[test]
    fn test_registered_with_matching_application() {
        let registrations = vec![
            registration("some-other-app", &[]),
            registration(APP_ID, &["user"]),
        ];
        assert!(user_is_registered(Some(registrations.as_slice()), APP_ID));
    }

    #[test]
    fn test_deactivated_role_still_counts_as_registered() {
        let registrations = vec![registration(APP_ID, &["deactivated"])];
        assert!(user_is_registered(Some(registrations.as_slice()), APP_ID));
    }

    #[test]
    fn test_unauthenticated_view_value() {
        assert_eq!(
            UserRecord::Unauthenticated.to_view_value(),
            json!({ "is_authenticated": false })
        );
        assert!(!UserRecord::default().is_authenticated());
    }

    #[test]
    fn test_authenticated_view_value_merges_flag_into_profile() {
        let value = UserRecord::Authenticated(user()).to_view_value();

        assert_eq!(value["is_authenticated"], json!(true));
        assert_eq!(value["email"], json!("richard@example.com"));
        assert_eq!(value["firstName"], json!("Richard"));
        assert_eq!(value["registrations"][0]["applicationId"], json!(APP_ID));
    }

    #[test]
    fn test_session_serialization_round_trips_profile() {
        let record = UserRecord::Authenticated(user());
        let stored = serde_json::to_value(&record).unwrap();
        assert_eq!(stored["state"], json!("authenticated"));

        let restored: UserRecord = serde_json::from_value(stored).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.profile().map(|u| u.id.as_str()), Some("u-1"));
    }
}
