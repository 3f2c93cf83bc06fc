use crate::types::DbId;

/// Domain-level failures, independent of transport.
///
/// The HTTP layer maps each variant onto a status code; see
/// `agenda_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A record addressed by id does not exist (e.g. a user deleted after
    /// its tokens were issued).
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before reaching the credential store.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No usable credential or token chain.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
