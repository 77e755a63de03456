//! Serialization options.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tessera_core::ast::ResilienceStrategy;

/// A module search path recorded in the input block.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SearchPath {
    pub path: String,
    #[serde(default)]
    pub framework: bool,
    #[serde(default)]
    pub system: bool,
}

/// Options for one serialization session.
///
/// Loadable from JSON; every field is optional there.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializationOptions {
    pub(crate) output_path: PathBuf,
    pub(crate) doc_output_path: Option<PathBuf>,
    pub(crate) module_link_name: Option<String>,
    pub(crate) target: String,
    pub(crate) sdk_path: Option<String>,
    /// Arguments forwarded to the foreign-declaration importer.
    pub(crate) extra_foreign_args: Vec<String>,
    pub(crate) search_paths: Vec<SearchPath>,
    pub(crate) is_sib: bool,
    pub(crate) testable: bool,
    pub(crate) resilience: ResilienceStrategy,
    /// Write every lowered body, not only those marked serialized.
    pub(crate) serialize_all_bodies: bool,
    /// Serialize only this file's declarations; the rest of the module
    /// becomes cross-references.
    pub(crate) primary_file: Option<String>,
    /// File name → documentation group.
    pub(crate) doc_groups: BTreeMap<String, String>,
}

impl SerializationOptions {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Parse options from JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn doc_output_path(&self) -> Option<&Path> {
        self.doc_output_path.as_deref()
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn doc_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.doc_output_path = Some(path.into());
        self
    }

    pub fn module_link_name(mut self, name: impl Into<String>) -> Self {
        self.module_link_name = Some(name.into());
        self
    }

    pub fn target(mut self, triple: impl Into<String>) -> Self {
        self.target = triple.into();
        self
    }

    pub fn sdk_path(mut self, path: impl Into<String>) -> Self {
        self.sdk_path = Some(path.into());
        self
    }

    pub fn extra_foreign_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_foreign_args.push(arg.into());
        self
    }

    pub fn search_path(mut self, path: SearchPath) -> Self {
        self.search_paths.push(path);
        self
    }

    pub fn sib(mut self, value: bool) -> Self {
        self.is_sib = value;
        self
    }

    pub fn testable(mut self, value: bool) -> Self {
        self.testable = value;
        self
    }

    pub fn resilience(mut self, strategy: ResilienceStrategy) -> Self {
        self.resilience = strategy;
        self
    }

    pub fn serialize_all_bodies(mut self, value: bool) -> Self {
        self.serialize_all_bodies = value;
        self
    }

    pub fn primary_file(mut self, name: impl Into<String>) -> Self {
        self.primary_file = Some(name.into());
        self
    }

    pub fn doc_group(mut self, file: impl Into<String>, group: impl Into<String>) -> Self {
        self.doc_groups.insert(file.into(), group.into());
        self
    }
}
