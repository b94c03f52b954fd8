//! Core types for atlas-pauser.
//!
//! This crate holds everything that does not talk to the network:
//!
//! - **Events**: decoding of trigger events into validated [`Command`]s
//! - **Types**: actions, commands and project records
//! - **Identifiers**: typed project and organization ids
//! - **Errors**: the [`PauserError`] taxonomy and its [`ErrorKind`]
//!
//! # Example
//!
//! ```
//! use atlas_pauser_core::{Action, Command, Event};
//!
//! let command = Command::new(Action::Pause, "dev0-document-service0", "cluster0");
//! let event = Event::encode(&command);
//!
//! assert_eq!(event.decode().unwrap(), command);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod event;
pub mod ids;
pub mod types;

pub use error::{ErrorKind, PauserError, Result};
pub use event::{decode_payload, Event};
pub use ids::{OrgId, ProjectId};
pub use types::{Action, Command, Project};
