pub mod auth;
pub mod content;

pub use auth::{AuthError, AuthService, Claims};
pub use content::{ContentError, ContentResult, ContentService};
