use thiserror::Error;

use crate::assert::AssertionError;

/// Boxed error used for failures raised by caller-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
   #[error("Input not found in directory {directory}")]
   InputNotFound { directory: String },

   #[error(transparent)]
   Mismatch(#[from] Box<AssertionError>),

   #[error(transparent)]
   Generate(BoxError),

   #[error(transparent)]
   Format(BoxError),

   #[error("Failed to parse options {path}: {reason}")]
   Options { path: String, reason: String },

   #[error("No script loader installed for {path}")]
   UnsupportedOptions { path: String },

   #[error("Invalid configuration: {0}")]
   Config(String),

   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),

   #[error("JSON error: {0}")]
   Json(#[from] serde_json::Error),

   #[error("TOML error: {0}")]
   Toml(#[from] toml::de::Error),
}

impl Error {
   /// Whether this is a baseline comparison failure.
   pub const fn is_mismatch(&self) -> bool {
      matches!(self, Self::Mismatch(_))
   }

   /// The assertion payload, if this is a comparison failure.
   pub fn as_assertion(&self) -> Option<&AssertionError> {
      match self {
         Self::Mismatch(err) => Some(err),
         _ => None,
      }
   }
}

impl From<AssertionError> for Error {
   fn from(err: AssertionError) -> Self {
      Self::Mismatch(Box::new(err))
   }
}

pub type Result<T> = std::result::Result<T, Error>;
