//! Local template and partial loading

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{SyncError, SyncResult};

pub mod renderer;
pub use renderer::Renderer;

/// File names starting with this prefix are never treated as templates
const PARTIALS_PREFIX: &str = "partials";

/// A top-level email template read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Template name (file name without its last extension)
    pub name: String,
    /// Raw Handlebars source
    pub source: String,
}

impl Template {
    /// Create a template from a name and its source
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Partials keyed by name, in name order
pub type PartialSet = BTreeMap<String, String>;

/// Load every template directly inside `dir`
///
/// Files whose name starts with `partials` are skipped, as are
/// subdirectories. Templates come back sorted by file name.
///
/// # Errors
///
/// Returns `SyncError::Io` if the directory or any template file cannot be read.
pub fn load_templates(dir: &Path) -> SyncResult<Vec<Template>> {
    let templates = read_dir_files(dir)?
        .into_iter()
        .filter(|(file_name, _)| !file_name.starts_with(PARTIALS_PREFIX))
        .map(|(file_name, source)| Template::new(template_name(&file_name), source))
        .collect::<Vec<_>>();

    debug!(dir = %dir.display(), count = templates.len(), "Loaded templates");
    Ok(templates)
}

/// Load every partial directly inside `dir`
///
/// # Errors
///
/// Returns `SyncError::Io` if the directory or any partial file cannot be read.
pub fn load_partials(dir: &Path) -> SyncResult<PartialSet> {
    let partials = read_dir_files(dir)?
        .into_iter()
        .map(|(file_name, source)| (template_name(&file_name), source))
        .collect::<PartialSet>();

    debug!(dir = %dir.display(), count = partials.len(), "Loaded partials");
    Ok(partials)
}

/// Strip the last extension: `welcome.hbs` -> `welcome`, `a.b.hbs` -> `a.b`
#[must_use]
pub fn template_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Read `(file name, content)` for every regular file in `dir`, sorted by name
fn read_dir_files(dir: &Path) -> SyncResult<Vec<(String, String)>> {
    let entries = fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        // Invalid UTF-8 is replaced rather than failing the whole directory.
        let bytes = fs::read(&path).map_err(|e| SyncError::io(&path, e))?;
        files.push((file_name, String::from_utf8_lossy(&bytes).into_owned()));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
