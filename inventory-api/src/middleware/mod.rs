mod auth;

pub use auth::{AuthContext, AuthGate, TokenRequirement};
