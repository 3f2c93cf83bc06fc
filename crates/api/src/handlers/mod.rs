//! Request handlers.
//!
//! Handlers reach user records through the [`UserStore`](agenda_db::store::UserStore)
//! in [`AppState`](crate::state::AppState) and map failures via
//! [`AppError`](crate::error::AppError).

pub mod auth;
