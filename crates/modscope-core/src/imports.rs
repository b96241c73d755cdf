//! Import tables produced by the import-resolution pass
//!
//! This pass never builds these tables itself; it only reads them. A key is the
//! name as it is visible locally (optionally behind a qualifier), and each key
//! maps to one or more [`ImportRecord`]s. More than one record means the name is
//! ambiguous.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::names::{ModuleName, Qualified, SourceSpan};

/// How an import brought a name into scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImportProvenance {
    /// Open import of everything a module exports (`import M`)
    Implicit,
    /// Named in an explicit import list (`import M (x)`)
    Explicit,
    /// Declared in the importing module itself
    Local,
    /// Builtin names
    Prim,
}

/// One candidate origin for a locally visible name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Module the name was imported from
    pub module: ModuleName,
    /// Name as exported by `module`
    pub name: String,
    /// Home module the name traces back to
    pub source_module: ModuleName,
    pub span: SourceSpan,
    pub provenance: ImportProvenance,
}

impl ImportRecord {
    pub fn new(
        module: impl Into<ModuleName>,
        name: impl Into<String>,
        source_module: impl Into<ModuleName>,
        provenance: ImportProvenance,
    ) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            source_module: source_module.into(),
            span: SourceSpan::NULL,
            provenance,
        }
    }

    pub fn at(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    /// The original qualified name this record refers to
    pub fn original_name(&self) -> Qualified<String> {
        Qualified::by_module(self.module.clone(), self.name.clone())
    }
}

/// Local qualified name to its candidate origins
pub type ImportTable = BTreeMap<Qualified<String>, Vec<ImportRecord>>;

/// Every name visible in a module through its imports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imports {
    pub types: ImportTable,
    pub type_operators: ImportTable,
    pub data_constructors: ImportTable,
    pub type_classes: ImportTable,
    pub values: ImportTable,
    pub value_operators: ImportTable,
    /// Modules imported without a qualifier
    pub unqualified_modules: BTreeSet<ModuleName>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> [&ImportTable; 6] {
        [
            &self.types,
            &self.type_operators,
            &self.data_constructors,
            &self.type_classes,
            &self.values,
            &self.value_operators,
        ]
    }

    /// Whether `module` is used as a qualifier by any imported name
    ///
    /// Qualified imports (`import A as X`) create such qualifiers even when no
    /// module called `X` exists, which is what makes `module X` a valid
    /// re-export.
    pub fn is_pseudo_module(&self, module: &ModuleName) -> bool {
        self.tables()
            .iter()
            .any(|table| table.keys().any(|key| key.is_qualified_with(module)))
    }

    pub fn is_unqualified_import(&self, module: &ModuleName) -> bool {
        self.unqualified_modules.contains(module)
    }

    /// Number of ambiguous keys across all tables
    pub fn ambiguous_count(&self) -> usize {
        self.tables()
            .iter()
            .map(|table| table.values().filter(|records| records.len() > 1).count())
            .sum()
    }
}

/// Append `record` under `key`, creating the entry if needed
pub fn insert_record(table: &mut ImportTable, key: Qualified<String>, record: ImportRecord) {
    table.entry(key).or_default().push(record);
}
