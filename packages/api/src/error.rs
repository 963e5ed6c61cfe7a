use store::StoreError;
use thiserror::Error;

/// Errors returned by controllers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Debes iniciar sesión para continuar")]
    NotAuthenticated,

    #[error("No tienes permiso para modificar este recurso")]
    NotOwner,

    #[error("{0} no encontrado")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),
}
