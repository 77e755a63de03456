//! Modules and file units.

use serde::{Deserialize, Serialize};

use crate::Symbol;

use super::attrs::LibraryKind;
use super::body::LoweredModule;
use super::ids::{DeclId, FileId, ModuleId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Compiled from source by this toolchain.
    #[default]
    Source,
    Builtin,
    /// Declarations imported through a bridging header.
    ForeignHeader,
    /// A module produced by the foreign-declaration importer.
    Foreign,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Import {
    pub module: ModuleId,
    #[serde(default)]
    pub exported: bool,
    /// Scoped import path below the module (`import struct M.S`).
    #[serde(default)]
    pub access_path: Vec<Symbol>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkLibrary {
    pub name: String,
    #[serde(default)]
    pub kind: LibraryKind,
    #[serde(default)]
    pub force_load: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: Symbol,
    #[serde(default)]
    pub kind: ModuleKind,
    /// Name under which a foreign module's declarations are re-exported.
    #[serde(default)]
    pub exported_name: Option<Symbol>,
    #[serde(default)]
    pub files: Vec<FileId>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub link_libraries: Vec<LinkLibrary>,
    #[serde(default)]
    pub body: Option<LoweredModule>,
}

impl Module {
    pub fn new(name: Symbol) -> Self {
        Self {
            name,
            kind: ModuleKind::Source,
            exported_name: None,
            files: Vec::new(),
            imports: Vec::new(),
            link_libraries: Vec::new(),
            body: None,
        }
    }

    pub fn with_kind(mut self, kind: ModuleKind) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileUnit {
    pub module: ModuleId,
    /// File name, used for doc grouping.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub top_level_decls: Vec<DeclId>,
    /// Type declarations nested inside bodies.
    #[serde(default)]
    pub local_types: Vec<DeclId>,
    #[serde(default)]
    pub entry_point: Option<DeclId>,
}

impl FileUnit {
    pub fn new(module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
            top_level_decls: Vec::new(),
            local_types: Vec::new(),
            entry_point: None,
        }
    }
}
