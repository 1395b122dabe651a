use crate::gateway::StoreError;

/// Expected failure modes of the service layer. Handlers translate these
/// into JSON error bodies; they never cross the HTTP boundary as panics.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("already enrolled in this course")]
    AlreadyEnrolled,

    #[error("not enrolled in this course")]
    NotEnrolled,

    #[error("course already rated")]
    AlreadyRated,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Permission denied by the backend or by the authorization capability.
    /// First-class so callers must decide whether to surface or degrade.
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ServiceError::NotFound("document"),
            StoreError::PermissionDenied(_) => ServiceError::Unauthorized,
            StoreError::Backend(msg) => ServiceError::Backend(msg),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
