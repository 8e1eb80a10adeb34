//! Static Handlebars rendering with a fixed partial set

use handlebars::Handlebars;
use serde_json::json;
use tracing::{debug, warn};

use super::{PartialSet, Template};
use crate::error::{SyncError, SyncResult};

/// Renders templates against the partials loaded for this run
///
/// The registry is filled once in [`Renderer::new`] and only read afterwards.
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    /// Build a renderer with every partial in `partials` registered
    ///
    /// A partial that does not parse is skipped with a warning; templates
    /// that reference it fail when rendered.
    #[must_use]
    pub fn new(partials: &PartialSet) -> Self {
        let mut handlebars = Handlebars::new();

        for (name, source) in partials {
            match handlebars.register_partial(name, source) {
                Ok(()) => debug!(partial = %name, "Registered partial"),
                Err(e) => warn!(partial = %name, error = %e, "Skipping partial that failed to parse"),
            }
        }

        Self { handlebars }
    }

    /// Whether a partial with this name is available
    #[must_use]
    pub fn has_partial(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Compile and render a template with an empty data context
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Render` if the template has invalid syntax or
    /// references a partial that is not registered.
    pub fn render(&self, template: &Template) -> SyncResult<String> {
        self.handlebars
            .render_template(&template.source, &json!({}))
            .map_err(|e| SyncError::render(&template.name, e))
    }
}
