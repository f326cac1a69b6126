//! Prompt registry: templates on disk indexed by name and version
//!
//! Each template lives in its own YAML file somewhere under the storage
//! directory. [`PromptRegistry::load`] walks the directory tree and swaps in
//! a fresh index; queries read that index without touching the disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::error::RegistryError;
use crate::core::template::{Inputs, PromptTemplate, UNNAMED};
use crate::yaml::YamlSyntaxError;

/// Extensions recognised as prompt documents
const DOCUMENT_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// File written by [`PromptRegistry::init_storage`]
pub const EXAMPLE_FILE: &str = "example.yaml";

type Index = BTreeMap<String, BTreeMap<i64, PromptTemplate>>;

/// In-memory index of the prompt templates stored under one directory
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    prompts_dir: PathBuf,
    templates: Index,
    /// Templates whose version is not an integer; only [`validate_all`](Self::validate_all) sees them
    unversioned: Vec<PromptTemplate>,
    loaded: bool,
}

impl PromptRegistry {
    /// Create an empty, unloaded registry. Performs no I/O.
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            templates: Index::new(),
            unversioned: Vec::new(),
            loaded: false,
        }
    }

    /// Create a registry and load it
    pub fn open(prompts_dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let mut registry = Self::new(prompts_dir);
        registry.load()?;
        Ok(registry)
    }

    /// Storage directory
    pub fn prompts_dir(&self) -> &Path {
        &self.prompts_dir
    }

    /// Whether [`load`](Self::load) has completed at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Load every prompt document under the storage directory, recursively.
    ///
    /// A missing directory loads as empty. Any unreadable or malformed
    /// document fails the whole load and leaves the current index as it was.
    /// When two documents share a name and version, the one visited last wins.
    /// Documents whose version is not an integer are kept aside for validation.
    pub fn load(&mut self) -> Result<(), RegistryError> {
        let mut templates = Index::new();
        let mut unversioned = Vec::new();

        if self.prompts_dir.exists() {
            for path in self.document_paths()? {
                let Some(template) = load_document(&path)? else {
                    continue;
                };
                debug!(path = %path.display(), template = %template, "loaded prompt template");
                match template.version.number() {
                    Some(version) => {
                        templates
                            .entry(template.name.clone())
                            .or_default()
                            .insert(version, template);
                    }
                    None => {
                        warn!(
                            path = %path.display(),
                            version = %template.version,
                            "prompt template version is not an integer"
                        );
                        unversioned.push(template);
                    }
                }
            }
        } else {
            debug!(dir = %self.prompts_dir.display(), "prompts directory does not exist");
        }

        info!(
            dir = %self.prompts_dir.display(),
            prompts = templates.len(),
            "loaded prompt registry"
        );
        self.templates = templates;
        self.unversioned = unversioned;
        self.loaded = true;
        Ok(())
    }

    /// Discard the index and load again from disk
    pub fn reload(&mut self) -> Result<(), RegistryError> {
        self.loaded = false;
        self.load()
    }

    /// Load once if nothing has been loaded yet
    pub fn ensure_loaded(&mut self) -> Result<&mut Self, RegistryError> {
        if !self.loaded {
            self.load()?;
        }
        Ok(self)
    }

    /// Like [`get`](Self::get), loading first if nothing has been loaded yet
    pub fn find(
        &mut self,
        name: &str,
        version: Option<i64>,
    ) -> Result<Option<&PromptTemplate>, RegistryError> {
        Ok(self.ensure_loaded()?.get(name, version))
    }

    /// Like [`contains`](Self::contains), loading first if nothing has been loaded yet
    pub fn has(&mut self, name: &str) -> Result<bool, RegistryError> {
        Ok(self.ensure_loaded()?.contains(name))
    }

    /// Like [`len`](Self::len), loading first if nothing has been loaded yet
    pub fn count(&mut self) -> Result<usize, RegistryError> {
        Ok(self.ensure_loaded()?.len())
    }

    /// Like [`iter`](Self::iter), loading first if nothing has been loaded yet
    pub fn names(&mut self) -> Result<impl Iterator<Item = &str> + '_, RegistryError> {
        Ok(self.ensure_loaded()?.iter())
    }

    /// Document files in a stable order so duplicate resolution is deterministic
    fn document_paths(&self) -> Result<Vec<PathBuf>, RegistryError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.prompts_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.prompts_dir.clone());
                RegistryError::io(path, e.into())
            })?;
            if entry.file_type().is_file() && is_document(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Look up a template. Without a version, the highest version is returned.
    pub fn get(&self, name: &str, version: Option<i64>) -> Option<&PromptTemplate> {
        let versions = self.templates.get(name)?;
        match version {
            Some(version) => versions.get(&version),
            None => versions.values().next_back(),
        }
    }

    /// All template names, sorted
    pub fn list_names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Versions loaded for `name`, ascending; empty when unknown
    pub fn list_versions(&self, name: &str) -> Vec<i64> {
        self.templates
            .get(name)
            .map(|versions| versions.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Every template grouped by name, versions ascending
    pub fn all_templates(&self) -> BTreeMap<String, Vec<&PromptTemplate>> {
        self.templates
            .iter()
            .map(|(name, versions)| (name.clone(), versions.values().collect()))
            .collect()
    }

    /// Validation errors keyed by `"<name>:v<version>"`, only for templates with errors.
    ///
    /// Templates with a non-integer version are keyed by the version as written.
    pub fn validate_all(&self) -> BTreeMap<String, Vec<String>> {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let templates = self
            .templates
            .values()
            .flat_map(|versions| versions.values())
            .chain(&self.unversioned);
        for template in templates {
            let template_errors = template.validate();
            if !template_errors.is_empty() {
                errors
                    .entry(format!("{}:v{}", template.name, template.version))
                    .or_default()
                    .extend(template_errors);
            }
        }
        errors
    }

    /// Look up a template and render it
    pub fn render(
        &self,
        name: &str,
        version: Option<i64>,
        inputs: &Inputs,
    ) -> Result<String, RegistryError> {
        let template = self
            .get(name, version)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
                version,
            })?;
        Ok(template.render(inputs)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Number of distinct template names
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Where a template with this name and version is written by [`create`](Self::create).
    ///
    /// Version 1 uses `<name>.yaml`; any other version uses `<name>_v<version>.yaml`.
    pub fn storage_path_for(&self, name: &str, version: i64) -> PathBuf {
        let filename = if version == 1 {
            format!("{}.yaml", name)
        } else {
            format!("{}_v{}.yaml", name, version)
        };
        self.prompts_dir.join(filename)
    }

    /// Write a new template document and reload so it is visible immediately.
    ///
    /// Refuses to overwrite an existing file at the target path. Callers that
    /// want to refuse any existing version should check [`contains`](Self::contains) first.
    /// If the file is written but the reload fails, [`RegistryError::Reload`]
    /// carries the path of the new file.
    pub fn create(&mut self, template: &PromptTemplate) -> Result<PathBuf, RegistryError> {
        validate_name(&template.name)?;
        let Some(version) = template.version.number() else {
            return Err(RegistryError::InvalidVersion {
                name: template.name.clone(),
                version: template.version.to_string(),
            });
        };

        fs::create_dir_all(&self.prompts_dir)
            .map_err(|e| RegistryError::io(&self.prompts_dir, e))?;

        let path = self.storage_path_for(&template.name, version);
        let yaml = template
            .to_yaml()
            .map_err(|source| RegistryError::Serialize {
                name: template.name.clone(),
                source,
            })?;

        write_new(&path, &yaml)?;
        info!(path = %path.display(), template = %template, "created prompt template");

        self.reload().map_err(|source| RegistryError::Reload {
            path: path.clone(),
            source: Box::new(source),
        })?;
        Ok(path)
    }

    /// Make sure the storage directory exists and holds the example template.
    ///
    /// An existing example file is left untouched.
    pub fn init_storage(&self) -> Result<PathBuf, RegistryError> {
        fs::create_dir_all(&self.prompts_dir)
            .map_err(|e| RegistryError::io(&self.prompts_dir, e))?;

        let example_path = self.prompts_dir.join(EXAMPLE_FILE);
        if example_path.exists() {
            debug!(path = %example_path.display(), "example template already present");
        } else {
            write_new(&example_path, Self::example_document())?;
            info!(path = %example_path.display(), "wrote example template");
        }

        Ok(self.prompts_dir.clone())
    }

    fn example_document() -> &'static str {
        r#"# Prompt template document
#
# name:        optional, defaults to the file name without extension
# version:     optional positive integer, defaults to 1
# variables:   map of variable name to spec
#   required:    defaults to true
#   default:     used when an optional variable is not supplied
#   description: shown by `prompt-registry show`
# template:    Jinja-style body, reference variables with {{ name }}
name: example
version: 1
description: An example prompt template
variables:
  topic:
    required: true
    description: The topic to explain
  audience:
    required: false
    default: general audience
    description: Target audience for the explanation
template: |
  Explain {{ topic }} in simple terms for a {{ audience }}.
"#
    }
}

impl<'a> IntoIterator for &'a PromptRegistry {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DOCUMENT_EXTENSIONS.contains(&e))
}

/// Parse one document file. Empty documents yield `None`.
fn load_document(path: &Path) -> Result<Option<PromptTemplate>, RegistryError> {
    let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;

    let document: serde_yml::Value = serde_yml::from_str(&content).map_err(|e| {
        RegistryError::Parse {
            path: path.to_path_buf(),
            source: YamlSyntaxError::from_serde_error(&e, &content, &path.display().to_string()),
        }
    })?;

    if document.is_null() {
        warn!(path = %path.display(), "skipping empty prompt document");
        return Ok(None);
    }

    let mut template =
        PromptTemplate::parse(document).map_err(|source| RegistryError::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })?;

    if template.name == UNNAMED {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            template.name = stem.to_string();
        }
    }

    Ok(Some(template))
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    let invalid = name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..");
    if invalid {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Write `content` to a file that must not exist yet. A failed write removes the file.
fn write_new(path: &Path, content: &str) -> Result<(), RegistryError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => RegistryError::AlreadyExists(path.to_path_buf()),
            _ => RegistryError::io(path, e),
        })?;
    if let Err(e) = file.write_all(content.as_bytes()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "could not remove partial file");
        }
        return Err(RegistryError::io(path, e));
    }
    Ok(())
}
