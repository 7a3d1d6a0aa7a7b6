use thiserror::Error;

#[derive(Error, Debug)]
pub enum GripewatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}
