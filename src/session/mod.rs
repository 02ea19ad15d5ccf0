//! Operator session lifecycle.
//!
//! A [`Session`] is created by signing in and cleared by logging out. It is
//! passed explicitly to the API client; nothing reads credentials from
//! ambient state.

mod store;
mod types;

pub use store::{SessionStore, TOKEN_ENV};
pub use types::{Session, SessionError};
