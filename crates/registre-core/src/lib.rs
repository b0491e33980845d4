//! Core types and the user lifecycle service for the Registre person store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::PersonStore`]; transports drive
//! [`UserService`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod eligibility;
pub mod error;
pub mod person;
pub mod service;
pub mod store;

pub use error::{Error, Lookup, Result};
pub use service::UserService;
