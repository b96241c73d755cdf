//! Symbol table model for module export resolution
//!
//! The types here describe what a module exports ([`Exports`]), what it can
//! see through its imports ([`Imports`]), and the environment of modules that
//! have already been resolved ([`Env`]).

pub mod config;
pub mod declarations;
pub mod env;
pub mod error;
pub mod exports;
pub mod imports;
pub mod module_graph;
pub mod names;

pub use config::ResolveConfig;
pub use declarations::{ClassMember, Declaration, DeclarationRef, RefKind};
pub use env::Env;
pub use error::{ConfigError, ResolveError};
pub use exports::{Constructors, ExportSource, Exported, Exports, NamespaceMap};
pub use imports::{ImportProvenance, ImportRecord, ImportTable, Imports};
pub use module_graph::ModuleGraph;
pub use names::{ModuleName, NameKind, Namespace, Qualified, SourcePos, SourceSpan};
