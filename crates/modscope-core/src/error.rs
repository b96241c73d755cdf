use thiserror::Error;

use crate::names::{ModuleName, NameKind, SourceSpan};

/// Fatal errors raised while resolving a module's exports
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{span}: cannot export unknown {kind} '{name}' from module {module}")]
    UnknownExport {
        module: ModuleName,
        span: SourceSpan,
        kind: NameKind,
        name: String,
    },

    #[error("{span}: cannot export unknown data constructor '{constructor}' for type '{type_name}' from module {module}")]
    UnknownExportDataConstructor {
        module: ModuleName,
        span: SourceSpan,
        type_name: String,
        constructor: String,
    },

    #[error("{span}: conflicting imports for {kind} '{name}' in module {module}, candidates from: {}", format_modules(.origins))]
    ImportConflict {
        module: ModuleName,
        span: SourceSpan,
        kind: NameKind,
        name: String,
        origins: Vec<ModuleName>,
    },

    #[error("Circular dependency detected: {}", format_modules(.0))]
    CircularDependency(Vec<ModuleName>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResolveError {
    /// Compiler defects rather than problems in user code
    pub fn is_internal(&self) -> bool {
        matches!(self, ResolveError::Internal(_))
    }

    /// The module the error was reported against, if any
    pub fn module(&self) -> Option<&ModuleName> {
        match self {
            ResolveError::UnknownExport { module, .. }
            | ResolveError::UnknownExportDataConstructor { module, .. }
            | ResolveError::ImportConflict { module, .. } => Some(module),
            ResolveError::CircularDependency(_) | ResolveError::Internal(_) => None,
        }
    }

    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            ResolveError::UnknownExport { span, .. }
            | ResolveError::UnknownExportDataConstructor { span, .. }
            | ResolveError::ImportConflict { span, .. } => Some(*span),
            ResolveError::CircularDependency(_) | ResolveError::Internal(_) => None,
        }
    }
}

fn format_modules(modules: &[ModuleName]) -> String {
    modules
        .iter()
        .map(ModuleName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures loading a [`crate::config::ResolveConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
