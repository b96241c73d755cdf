//! Warnings and the two-channel result type of the export pass
//!
//! Fatal problems travel as [`ResolveError`] through `?`. Warnings are collected
//! in a [`Diagnostics`] value threaded through the pass by `&mut`, and are
//! handed back on both the success and the failure path.

use std::collections::BTreeMap;
use std::fmt;

use modscope_core::{DeclarationRef, ModuleName, NameKind, RefKind, ResolveError, SourceSpan};

/// Non-fatal findings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The same export appears more than once in an export list
    DuplicateExportRef {
        module: ModuleName,
        span: SourceSpan,
        kind: NameKind,
        name: String,
        occurrences: usize,
    },
    /// An ambiguous import was settled in favour of the only explicit import
    ScopeShadowing {
        module: ModuleName,
        span: SourceSpan,
        kind: NameKind,
        name: String,
        chosen: ModuleName,
        shadowed: Vec<ModuleName>,
    },
}

impl Warning {
    pub fn module(&self) -> &ModuleName {
        match self {
            Warning::DuplicateExportRef { module, .. } | Warning::ScopeShadowing { module, .. } => {
                module
            }
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Warning::DuplicateExportRef { span, .. } | Warning::ScopeShadowing { span, .. } => *span,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateExportRef {
                module,
                span,
                kind,
                name,
                occurrences,
            } => write!(
                f,
                "{}: {} '{}' is exported {} times from module {}",
                span, kind, name, occurrences, module
            ),
            Warning::ScopeShadowing {
                module,
                span,
                kind,
                name,
                chosen,
                shadowed,
            } => {
                let shadowed = shadowed
                    .iter()
                    .map(ModuleName::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "{}: {} '{}' imported from {} shadows the implicit import from {} in module {}",
                    span, kind, name, chosen, shadowed, module
                )
            }
        }
    }
}

/// Warning accumulator for one module
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Format warnings as a compact list
    pub fn format_compact(&self) -> String {
        self.warnings
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A successful result together with the warnings raised on the way
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Resolved<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self {
            value,
            warnings: diagnostics.into_warnings(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// A fatal error together with the warnings raised before it
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct ResolveFailure {
    #[source]
    pub error: ResolveError,
    pub warnings: Vec<Warning>,
}

impl ResolveFailure {
    pub fn new(error: ResolveError, diagnostics: Diagnostics) -> Self {
        Self {
            error,
            warnings: diagnostics.into_warnings(),
        }
    }
}

/// Warn about export list entries that occur more than once
///
/// Refs are compared by kind and name only, so `T(A)` and `T(B)` count as the
/// same type ref. One warning is raised per group, at the span of the second
/// occurrence. Constructor names repeated inside a single `T(A, A)` list are
/// reported as well.
pub fn warn_duplicate_refs(module: &ModuleName, refs: &[DeclarationRef], diagnostics: &mut Diagnostics) {
    let mut groups: BTreeMap<(NameKind, &str), Vec<SourceSpan>> = BTreeMap::new();
    for r in refs {
        groups
            .entry((r.kind.name_kind(), r.kind.name()))
            .or_default()
            .push(r.span);
    }

    let mut duplicates: Vec<(SourceSpan, Warning)> = groups
        .into_iter()
        .filter(|(_, spans)| spans.len() > 1)
        .map(|((kind, name), spans)| {
            let span = spans[1];
            let warning = Warning::DuplicateExportRef {
                module: module.clone(),
                span,
                kind,
                name: name.to_string(),
                occurrences: spans.len(),
            };
            (span, warning)
        })
        .collect();

    for r in refs {
        if let RefKind::Type {
            constructors: Some(ctors),
            ..
        } = &r.kind
        {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for ctor in ctors {
                *counts.entry(ctor.as_str()).or_default() += 1;
            }
            for (ctor, occurrences) in counts.into_iter().filter(|(_, n)| *n > 1) {
                duplicates.push((
                    r.span,
                    Warning::DuplicateExportRef {
                        module: module.clone(),
                        span: r.span,
                        kind: NameKind::DataConstructor,
                        name: ctor.to_string(),
                        occurrences,
                    },
                ));
            }
        }
    }

    duplicates.sort_by_key(|(span, _)| *span);
    for (_, warning) in duplicates {
        diagnostics.warn(warning);
    }
}
