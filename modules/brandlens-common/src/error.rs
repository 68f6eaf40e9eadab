use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrandLensError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Contract violation: {0}")]
    Contract(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
