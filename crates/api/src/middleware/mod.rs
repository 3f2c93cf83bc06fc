//! Route guards, implemented as Axum extractors.
//!
//! - [`auth::BearerUser`] -- user from an `Authorization: Bearer` access token.
//! - [`session::CookieUser`] -- user from the session cookies, refreshing them when needed.

pub mod auth;
pub mod session;
