//! Sequential sync of local templates to the remote store

use tracing::{debug, warn};

use crate::error::SyncResult;
use crate::publish::{publish, SyncDecision};
use crate::remote::{lookup, TemplateStore};
use crate::templates::{Renderer, Template};

/// Result of syncing one template
#[derive(Debug)]
pub struct TemplateOutcome {
    /// Template name
    pub name: String,
    /// Performed (or, in a dry run, planned) decision, or the failure
    pub result: SyncResult<SyncDecision>,
}

/// Outcomes of a whole run, in processing order
#[derive(Debug, Default)]
pub struct SyncReport {
    /// One entry per template
    pub outcomes: Vec<TemplateOutcome>,
    /// Whether writes were skipped
    pub dry_run: bool,
}

impl SyncReport {
    /// Templates that were (or would be) created, including new `latest` versions
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|d| d.is_create())
    }

    /// Templates whose `latest` version was (or would be) overwritten
    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|d| !d.is_create())
    }

    /// Templates that failed to render or publish
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Whether any template failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(SyncDecision) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result.as_ref().is_ok_and(|d| pred(*d)))
            .count()
    }
}

/// Drives lookup, render and publish for each template in turn
pub struct Synchronizer<'a, S: TemplateStore + ?Sized> {
    store: &'a S,
    renderer: &'a Renderer,
    dry_run: bool,
}

impl<'a, S: TemplateStore + ?Sized> Synchronizer<'a, S> {
    /// Create a synchronizer over a store and a renderer
    pub const fn new(store: &'a S, renderer: &'a Renderer) -> Self {
        Self {
            store,
            renderer,
            dry_run: false,
        }
    }

    /// Look up and render, but skip every write
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sync every template
    pub fn run(&self, templates: &[Template]) -> SyncReport {
        self.run_with(templates, |_| {})
    }

    /// Sync every template, calling `on_outcome` as each one finishes
    ///
    /// A failing template is recorded and the run moves on to the next one.
    pub fn run_with(
        &self,
        templates: &[Template],
        mut on_outcome: impl FnMut(&TemplateOutcome),
    ) -> SyncReport {
        let mut report = SyncReport {
            outcomes: Vec::with_capacity(templates.len()),
            dry_run: self.dry_run,
        };

        for template in templates {
            let result = self.sync_one(template);
            if let Err(e) = &result {
                warn!(template = %template.name, error = %e, "Template sync failed");
            }

            let outcome = TemplateOutcome {
                name: template.name.clone(),
                result,
            };
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        report
    }

    fn sync_one(&self, template: &Template) -> SyncResult<SyncDecision> {
        let remote = lookup(self.store, &template.name);
        let decision = SyncDecision::from_remote(remote.as_ref());
        let content = self.renderer.render(template)?;

        if self.dry_run {
            debug!(template = %template.name, ?decision, "Dry run, skipping write");
            return Ok(decision);
        }

        publish(self.store, &template.name, &content, decision)
    }
}
