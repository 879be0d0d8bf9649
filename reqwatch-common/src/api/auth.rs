//! Admin-secret header parsing and construction
//!
//! The admin read API authenticates by possession of a single shared secret,
//! carried either as `Authorization: Bearer <secret>` or in the
//! `X-Admin-Secret` header. The bearer form wins when both are present.
//!
//! # Pure Functions
//!
//! This module contains ONLY pure string functions. No HTTP framework
//! dependencies (axum, reqwest, etc.) - those live in module-specific code,
//! which extracts the raw header values and passes them here.

/// Fallback header carrying the bare admin secret
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Extract the admin secret from raw header values
///
/// `authorization` is the value of the `Authorization` header, if present;
/// `admin_secret` the value of `X-Admin-Secret`. Returns `None` when neither
/// carries a non-empty secret.
pub fn parse_admin_secret(
    authorization: Option<&str>,
    admin_secret: Option<&str>,
) -> Option<String> {
    if let Some(auth) = authorization {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
            return None;
        }
    }
    admin_secret
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Build an `Authorization` header value for a secret
pub fn bearer(secret: &str) -> String {
    format!("Bearer {}", secret)
}
