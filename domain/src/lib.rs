//! Login domain: who the current user is, and how a PKCE authorization code flow
//! turns a provider callback into one.

pub use user::UserRecord;

pub mod authorization;
pub mod error;
pub mod user;

pub mod gateway;
