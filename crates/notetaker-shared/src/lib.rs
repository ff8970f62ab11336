//! # notetaker-shared
//!
//! Constants and password hashing shared by the NoteTaker store and client
//! crates.

pub mod constants;
pub mod error;
pub mod password;

pub use error::PasswordError;
