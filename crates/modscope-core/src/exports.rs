//! Per-module export tables
//!
//! An [`Exports`] value is the publicly visible symbol table of one module. It
//! keeps one map per [`Namespace`], and every entry records where the name was
//! defined and which module it was most recently re-exported through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::names::{ModuleName, Namespace};

/// Where an exported name comes from
///
/// `imported_from == None` means the name is declared in `defined_in` itself.
/// Otherwise `imported_from` is the module of the most recent re-export hop;
/// each hop overwrites it rather than extending a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportSource {
    pub defined_in: ModuleName,
    pub imported_from: Option<ModuleName>,
}

impl ExportSource {
    /// Source for a name physically declared in `module`
    pub fn local(module: ModuleName) -> Self {
        Self {
            defined_in: module,
            imported_from: None,
        }
    }

    pub fn is_local(&self) -> bool {
        self.imported_from.is_none()
    }

    /// The same source, seen through one more re-export hop via `module`
    pub fn reexported_via(&self, module: ModuleName) -> Self {
        Self {
            defined_in: self.defined_in.clone(),
            imported_from: Some(module),
        }
    }
}

/// An exported name's payload together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exported<P> {
    pub payload: P,
    pub source: ExportSource,
}

impl<P> Exported<P> {
    pub fn new(payload: P, source: ExportSource) -> Self {
        Self { payload, source }
    }
}

/// Constructor names exported alongside a type, in declaration order
pub type Constructors = Vec<String>;

/// One namespace of an export table
pub type NamespaceMap<P> = BTreeMap<String, Exported<P>>;

/// The export table of a module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exports {
    pub types: NamespaceMap<Constructors>,
    pub type_operators: NamespaceMap<()>,
    pub type_classes: NamespaceMap<()>,
    pub values: NamespaceMap<()>,
    pub value_operators: NamespaceMap<()>,
}

impl Exports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, name: impl Into<String>, constructors: Constructors, source: ExportSource) {
        self.types
            .insert(name.into(), Exported::new(constructors, source));
    }

    /// Insert a payload-free entry into one of the four plain namespaces
    ///
    /// Types carry constructors and must go through [`Exports::add_type`];
    /// passing [`Namespace::Type`] here records the type with no constructors.
    pub fn add(&mut self, ns: Namespace, name: impl Into<String>, source: ExportSource) {
        let name = name.into();
        match ns {
            Namespace::Type => {
                self.types.insert(name, Exported::new(Vec::new(), source));
            }
            Namespace::TypeOperator => {
                self.type_operators.insert(name, Exported::new((), source));
            }
            Namespace::TypeClass => {
                self.type_classes.insert(name, Exported::new((), source));
            }
            Namespace::Value => {
                self.values.insert(name, Exported::new((), source));
            }
            Namespace::ValueOperator => {
                self.value_operators.insert(name, Exported::new((), source));
            }
        }
    }

    /// Provenance of `name` in `ns`, if it is exported
    pub fn source_of(&self, ns: Namespace, name: &str) -> Option<&ExportSource> {
        match ns {
            Namespace::Type => self.types.get(name).map(|e| &e.source),
            Namespace::TypeOperator => self.type_operators.get(name).map(|e| &e.source),
            Namespace::TypeClass => self.type_classes.get(name).map(|e| &e.source),
            Namespace::Value => self.values.get(name).map(|e| &e.source),
            Namespace::ValueOperator => self.value_operators.get(name).map(|e| &e.source),
        }
    }

    pub fn contains(&self, ns: Namespace, name: &str) -> bool {
        self.source_of(ns, name).is_some()
    }

    /// Constructors currently exported for `type_name`
    pub fn constructors_of(&self, type_name: &str) -> Option<&[String]> {
        self.types.get(type_name).map(|e| e.payload.as_slice())
    }

    /// Whether `constructor` is exported as part of `type_name`
    pub fn exports_constructor(&self, type_name: &str, constructor: &str) -> bool {
        self.constructors_of(type_name)
            .is_some_and(|ctors| ctors.iter().any(|c| c == constructor))
    }

    /// Find the exported type owning `constructor`
    pub fn type_of_constructor(&self, constructor: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|(_, e)| e.payload.iter().any(|c| c == constructor))
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self, ns: Namespace) -> Vec<&str> {
        fn keys<P>(map: &NamespaceMap<P>) -> Vec<&str> {
            map.keys().map(String::as_str).collect()
        }
        match ns {
            Namespace::Type => keys(&self.types),
            Namespace::TypeOperator => keys(&self.type_operators),
            Namespace::TypeClass => keys(&self.type_classes),
            Namespace::Value => keys(&self.values),
            Namespace::ValueOperator => keys(&self.value_operators),
        }
    }

    pub fn len(&self, ns: Namespace) -> usize {
        match ns {
            Namespace::Type => self.types.len(),
            Namespace::TypeOperator => self.type_operators.len(),
            Namespace::TypeClass => self.type_classes.len(),
            Namespace::Value => self.values.len(),
            Namespace::ValueOperator => self.value_operators.len(),
        }
    }

    pub fn total_len(&self) -> usize {
        Namespace::ALL.iter().map(|ns| self.len(*ns)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Serialize the table as JSON for build caches and debugging dumps
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
