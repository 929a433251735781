//! Template loading with a per-instance parse cache.
//!
//! A [`TemplateLoader`] owns its cache. Each filename is parsed at most once
//! per loader until [`TemplateLoader::clear_cache`] is called; loaders never
//! share state, so tests and workers can each hold their own.

use super::error::TemplateError;
use super::parser::{ParsedTemplate, parse_template};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Accepted template file extensions (no leading dots).
pub const TEMPLATE_EXTENSIONS: &[&str] = &["md", "txt"];

/// Loads and caches templates from a single directory.
#[derive(Debug)]
pub struct TemplateLoader {
    base_dir: PathBuf,
    cache: HashMap<String, Arc<ParsedTemplate>>,
}

impl TemplateLoader {
    /// Create a loader over `base_dir` with an empty cache.
    ///
    /// # Errors
    ///
    /// [`TemplateError::DirectoryNotFound`] if `base_dir` is not a directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        Self::with_cache(base_dir, HashMap::new())
    }

    /// Create a loader with a pre-populated cache keyed by filename.
    pub fn with_cache(
        base_dir: impl Into<PathBuf>,
        cache: HashMap<String, Arc<ParsedTemplate>>,
    ) -> Result<Self, TemplateError> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            return Err(TemplateError::DirectoryNotFound { path: base_dir });
        }
        Ok(Self { base_dir, cache })
    }

    /// The directory templates are loaded from.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Load a template by filename, parsing it on first use.
    ///
    /// The template is named after the filename without its extension.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::FileNotFound`] if the file does not exist
    /// - [`TemplateError::UnsupportedExtension`] unless it ends in `.md` or `.txt`
    /// - [`TemplateError::Io`] if it cannot be read
    /// - any parse error from [`parse_template`]
    pub fn load(&mut self, filename: &str) -> Result<Arc<ParsedTemplate>, TemplateError> {
        if let Some(template) = self.cache.get(filename) {
            debug!(template = filename, "template cache hit");
            return Ok(Arc::clone(template));
        }

        let path = self.base_dir.join(filename);
        if !path.is_file() {
            return Err(TemplateError::FileNotFound { path });
        }
        if !has_template_extension(&path) {
            return Err(TemplateError::UnsupportedExtension { path });
        }

        let source = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.clone(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());

        debug!(template = filename, "parsing template");
        let template = Arc::new(parse_template(&source, Some(&name))?);
        self.cache.insert(filename.to_string(), Arc::clone(&template));

        Ok(template)
    }

    /// Load every template file directly inside the base directory.
    ///
    /// Subdirectories and files without a template extension are skipped.
    /// Results are in filename order.
    pub fn load_all(&mut self) -> Result<Vec<Arc<ParsedTemplate>>, TemplateError> {
        let filenames = Self::list_templates(&self.base_dir)?;
        filenames.iter().map(|name| self.load(name)).collect()
    }

    /// Drop every cached template so the next load re-reads from disk.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Whether `filename` is currently cached.
    pub fn is_cached(&self, filename: &str) -> bool {
        self.cache.contains_key(filename)
    }

    /// Number of cached templates.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// List template filenames in `dir` without parsing them.
    ///
    /// Flat scan, sorted by filename.
    pub fn list_templates(dir: impl AsRef<Path>) -> Result<Vec<String>, TemplateError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let io_err = |source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() || !has_template_extension(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names)
    }
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
}
