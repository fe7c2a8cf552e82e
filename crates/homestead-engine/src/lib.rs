//! Transaction handlers and dispatch for the Homestead farming economy.
//!
//! [`Homestead`] is the handler context. Each handler runs its
//! read-validate-write sequence in one transaction and returns an
//! [`Outcome`]: either the committed result or a [`Rejection`] explaining
//! why nothing changed. [`commands`] turns slash commands and button ids
//! into those calls and renders the results as [`Reply`] values for the
//! chat front end.
//!
//! # Modules
//!
//! - [`handlers`] -- Plot and animal purchase, market sales, storage
//!   transfer, and read views.
//! - [`commands`] -- Command and button dispatch into replies.
//! - [`rejection`] -- User-facing refusals.
//! - [`format`] -- Gold and item text.
//! - [`error`] -- Handler and service errors.
//!
//! [`Homestead`]: handlers::Homestead
//! [`Outcome`]: handlers::Outcome
//! [`Rejection`]: rejection::Rejection
//! [`Reply`]: commands::Reply

pub mod commands;
pub mod error;
pub mod format;
pub mod handlers;
pub mod rejection;

pub use commands::{Button, Command, Reply};
pub use error::{EngineError, HandlerError};
pub use handlers::{Homestead, Outcome};
pub use rejection::Rejection;
