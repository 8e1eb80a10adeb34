//! CLI command implementations

pub mod sync;

pub use sync::SyncCommand;
