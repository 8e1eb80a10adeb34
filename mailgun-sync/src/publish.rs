//! Create-or-update decision and the matching write call

use std::fmt;

use tracing::info;

use crate::error::SyncResult;
use crate::remote::{NewTemplate, NewVersion, RemoteTemplate, TemplateStore, VersionUpdate, LATEST_TAG};

/// What to do with a template given the remote state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// No remote template: create it with a `latest` version
    Create,
    /// Remote template has a `latest` version: overwrite it
    UpdateLatest,
    /// Remote template exists without `latest`: add that version
    CreateLatest,
}

impl SyncDecision {
    /// Classify the lookup result
    #[must_use]
    pub fn from_remote(remote: Option<&RemoteTemplate>) -> Self {
        match remote {
            None => Self::Create,
            Some(remote) if remote.has_tag(LATEST_TAG) => Self::UpdateLatest,
            Some(_) => Self::CreateLatest,
        }
    }

    /// Whether this decision produces a new remote resource
    #[must_use]
    pub const fn is_create(self) -> bool {
        matches!(self, Self::Create | Self::CreateLatest)
    }
}

impl fmt::Display for SyncDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "created"),
            Self::UpdateLatest => write!(f, "updated {LATEST_TAG}"),
            Self::CreateLatest => write!(f, "created {LATEST_TAG} version"),
        }
    }
}

/// Perform the single write call for `decision`
///
/// # Errors
///
/// Returns the store's error if the write fails. Nothing is retried.
pub fn publish<S: TemplateStore + ?Sized>(
    store: &S,
    name: &str,
    content: &str,
    decision: SyncDecision,
) -> SyncResult<SyncDecision> {
    match decision {
        SyncDecision::Create => store.create_template(&NewTemplate {
            name: name.to_string(),
            description: format!("Template for {name}"),
            template: content.to_string(),
            tag: Some(LATEST_TAG.to_string()),
        })?,
        SyncDecision::UpdateLatest => store.update_version(
            name,
            LATEST_TAG,
            &VersionUpdate {
                template: content.to_string(),
                active: true,
            },
        )?,
        SyncDecision::CreateLatest => store.create_version(
            name,
            &NewVersion {
                tag: LATEST_TAG.to_string(),
                template: content.to_string(),
                active: true,
            },
        )?,
    }

    info!(template = %name, action = %decision, "Published template");
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::remote::{MockTemplateStore, RemoteVersion};

    fn remote(versions: &[(&str, bool)]) -> RemoteTemplate {
        RemoteTemplate {
            name: "welcome".into(),
            versions: versions
                .iter()
                .map(|(tag, active)| RemoteVersion {
                    tag: (*tag).to_string(),
                    active: *active,
                })
                .collect(),
        }
    }

    #[test]
    fn test_decision_without_remote() {
        assert_eq!(SyncDecision::from_remote(None), SyncDecision::Create);
    }

    #[test]
    fn test_decision_with_latest() {
        let with_latest = remote(&[("latest", true)]);
        assert_eq!(SyncDecision::from_remote(Some(&with_latest)), SyncDecision::UpdateLatest);
    }

    #[test]
    fn test_decision_without_latest() {
        let older = remote(&[("v1", false)]);
        assert_eq!(SyncDecision::from_remote(Some(&older)), SyncDecision::CreateLatest);

        let empty = remote(&[]);
        assert_eq!(SyncDecision::from_remote(Some(&empty)), SyncDecision::CreateLatest);
    }

    #[test]
    fn test_create_sends_latest_tag_only() {
        let mut store = MockTemplateStore::new();
        store
            .expect_create_template()
            .withf(|t| {
                t.name == "welcome"
                    && t.description == "Template for welcome"
                    && t.template == "<p>Hi</p>"
                    && t.tag.as_deref() == Some("latest")
            })
            .times(1)
            .returning(|_| Ok(()));
        store.expect_update_version().times(0);
        store.expect_create_version().times(0);

        let done = publish(&store, "welcome", "<p>Hi</p>", SyncDecision::Create).unwrap();
        assert_eq!(done, SyncDecision::Create);
    }

    #[test]
    fn test_update_targets_latest_never_creates() {
        let mut store = MockTemplateStore::new();
        store
            .expect_update_version()
            .withf(|name, tag, update| {
                name == "welcome" && tag == "latest" && update.template == "new" && update.active
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        store.expect_create_template().times(0);
        store.expect_create_version().times(0);

        let decision = SyncDecision::from_remote(Some(&remote(&[("latest", true)])));
        publish(&store, "welcome", "new", decision).unwrap();
    }

    #[test]
    fn test_missing_latest_creates_version_never_updates() {
        let mut store = MockTemplateStore::new();
        store
            .expect_create_version()
            .withf(|name, version| {
                name == "welcome" && version.tag == "latest" && version.active && version.template == "new"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_update_version().times(0);
        store.expect_create_template().times(0);

        let decision = SyncDecision::from_remote(Some(&remote(&[("v1", false)])));
        assert_eq!(
            publish(&store, "welcome", "new", decision).unwrap(),
            SyncDecision::CreateLatest
        );
    }

    #[test]
    fn test_write_failure_is_returned() {
        let mut store = MockTemplateStore::new();
        store.expect_create_template().times(1).returning(|_| {
            Err(SyncError::Status {
                status: 400,
                body: "template with name already exists".into(),
            })
        });

        let err = publish(&store, "welcome", "x", SyncDecision::Create).unwrap_err();
        assert!(matches!(err, SyncError::Status { status: 400, .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(SyncDecision::Create.to_string(), "created");
        assert_eq!(SyncDecision::UpdateLatest.to_string(), "updated latest");
        assert_eq!(SyncDecision::CreateLatest.to_string(), "created latest version");
        assert!(SyncDecision::CreateLatest.is_create());
        assert!(!SyncDecision::UpdateLatest.is_create());
    }
}
