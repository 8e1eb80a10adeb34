//! Remote template store
//!
//! [`TemplateStore`] is the seam between the sync workflow and Mailgun's
//! template API. [`MailgunClient`] is the HTTP implementation; tests use a
//! mock.

use serde::Deserialize;
use tracing::info;

use crate::error::SyncResult;

pub mod client;
pub use client::MailgunClient;

/// Version tag this tool maintains on every template
pub const LATEST_TAG: &str = "latest";

/// One version of a remote template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteVersion {
    /// Version tag
    pub tag: String,
    /// Whether this version is the one being served
    #[serde(default)]
    pub active: bool,
}

/// Provider's view of a template and its versions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTemplate {
    /// Template name
    pub name: String,
    /// Known versions
    #[serde(default)]
    pub versions: Vec<RemoteVersion>,
}

impl RemoteTemplate {
    /// Whether any version carries `tag`
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.versions.iter().any(|v| v.tag == tag)
    }
}

/// Body of the versions endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct VersionsEnvelope {
    pub(crate) template: Option<RemoteTemplate>,
}

/// Payload for creating a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    /// Template name
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Rendered content
    pub template: String,
    /// Tag for the initial version
    pub tag: Option<String>,
}

impl NewTemplate {
    /// Form fields in request order
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("template", self.template.as_str()),
        ];
        if let Some(tag) = &self.tag {
            fields.push(("tag", tag.as_str()));
        }
        fields
    }
}

/// Payload for adding a version to an existing template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    /// Version tag
    pub tag: String,
    /// Rendered content
    pub template: String,
    /// Make this the active version
    pub active: bool,
}

impl NewVersion {
    /// Form fields in request order
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("tag", self.tag.as_str()),
            ("template", self.template.as_str()),
            ("active", active_flag(self.active)),
        ]
    }
}

/// Payload for replacing the content of an existing version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionUpdate {
    /// Rendered content
    pub template: String,
    /// Make this the active version
    pub active: bool,
}

impl VersionUpdate {
    /// Form fields in request order
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("template", self.template.as_str()),
            ("active", active_flag(self.active)),
        ]
    }
}

/// Mailgun spells boolean form flags as `yes` / `no`
const fn active_flag(active: bool) -> &'static str {
    if active {
        "yes"
    } else {
        "no"
    }
}

/// Operations the sync workflow needs from the provider
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore {
    /// Fetch a template and its versions
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// undecodable body. A missing template is reported as a 404 status.
    fn template_versions(&self, name: &str) -> SyncResult<RemoteTemplate>;

    /// Create a new template
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    fn create_template(&self, template: &NewTemplate) -> SyncResult<()>;

    /// Add a version to an existing template
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    fn create_version(&self, name: &str, version: &NewVersion) -> SyncResult<()>;

    /// Replace the content of an existing version
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    fn update_version(&self, name: &str, tag: &str, update: &VersionUpdate) -> SyncResult<()>;
}

/// Look up a template's remote record
///
/// Any failure means "no record": first uploads are expected to 404.
pub fn lookup<S: TemplateStore + ?Sized>(store: &S, name: &str) -> Option<RemoteTemplate> {
    match store.template_versions(name) {
        Ok(remote) => Some(remote),
        Err(e) if e.is_not_found() => {
            info!(template = %name, "No remote template yet");
            None
        }
        Err(e) => {
            info!(template = %name, error = %e, "Remote lookup failed, treating as new");
            None
        }
    }
}
