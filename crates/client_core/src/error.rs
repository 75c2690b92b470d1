use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "La puntuación debe estar entre 1 y 10";
pub const CREATE_FAILED_MESSAGE: &str = "Error al crear superhéroe";
pub const LIST_FAILED_MESSAGE: &str = "Error al obtener superhéroes";
pub const UNKNOWN_MESSAGE: &str = "Error desconocido";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeroError {
    /// Humility score outside 1..=10; raised before any request is sent.
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("{0}")]
    Transport(String),
    #[error("{}", UNKNOWN_MESSAGE)]
    Unknown,
}

impl HeroError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Wraps a lower-level failure, keeping its text when it has any.
    pub fn from_failure(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Transport(message)
        }
    }

    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for HeroError {
    fn from(value: reqwest::Error) -> Self {
        Self::from_failure(value)
    }
}
