use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Malformed password hash")]
    MalformedHash,

    #[error("Unsupported hash scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid round count: {0}")]
    InvalidRounds(String),

    #[error("Invalid base64 in hash: {0}")]
    Base64(#[from] base64::DecodeError),
}
