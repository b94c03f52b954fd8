//! Pause and resume MongoDB Atlas clusters from trigger events.
//!
//! This crate turns a decoded [`Command`] into a cluster state transition on
//! the Atlas control plane and classifies the answer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Entry point (atlas-pauser binary)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ Event
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ClusterPauser                         │
//! │  ┌─────────────┐ ┌─────────────────┐ ┌─────────────────┐    │
//! │  │   Event     │ │    Project      │ │    Outcome      │    │
//! │  │   decode    │ │    resolver     │ │    classify     │    │
//! │  └─────────────┘ └─────────────────┘ └─────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ AtlasClient
//!                 ┌────────────┴────────────┐
//!                 ▼                         ▼
//!          ┌──────────────┐          ┌──────────────┐
//!          │ HTTP+digest  │          │   mongocli   │
//!          └──────────────┘          └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use atlas_pauser_control::{ClusterPauser, PauserConfig};
//! use atlas_pauser_core::Event;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PauserConfig::from_env()?;
//! let pauser = ClusterPauser::new(config.build_client()?);
//!
//! let event = Event::from_json(r#"{"data": "..."}"#)?;
//! let outcome = pauser.handle_event(&event).await?;
//!
//! println!("{}", outcome.body);
//! # Ok(())
//! # }
//! ```
//!
//! # Error classification
//!
//! Every failure carries an [`ErrorKind`]: `Event` for bad input or an
//! unresolvable project, `Action` for a rejected update (with the
//! already-paused and cooldown cases split out), and `Environment` for
//! missing configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli_client;
pub mod client;
pub mod config;
pub mod digest;
pub mod dispatcher;
pub mod http_client;
pub mod resolver;

pub use cli_client::CliAtlasClient;
pub use client::AtlasClient;
#[cfg(any(test, feature = "test-utils"))]
pub use client::{MockAtlasClient, PauseCall};
pub use config::{Credentials, PauserConfig, Transport};
pub use dispatcher::{ClusterPauser, Outcome};
pub use http_client::HttpAtlasClient;
pub use resolver::resolve_project;

// Re-export commonly used types from dependencies for convenience
pub use atlas_pauser_core::{
    Action, Command, ErrorKind, Event, OrgId, PauserError, Project, ProjectId, Result,
};
