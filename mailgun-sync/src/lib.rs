//! mailgun-sync library
//!
//! Loads local Handlebars email templates, renders them against their
//! partials and publishes the result to Mailgun's template store, keeping a
//! `latest` version per template.

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod observability;
pub mod publish;
pub mod remote;
pub mod sync;
pub mod templates;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use publish::{publish, SyncDecision};
pub use remote::{lookup, MailgunClient, RemoteTemplate, RemoteVersion, TemplateStore};
pub use sync::{SyncReport, Synchronizer, TemplateOutcome};
pub use templates::{load_partials, load_templates, PartialSet, Renderer, Template};
