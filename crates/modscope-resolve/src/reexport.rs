//! Elaboration of `module X` entries in an export list
//!
//! `module Self` sweeps everything the module declares back in. `module X` for
//! any other `X` re-exports what was imported from `X` (or through the
//! qualifier `X`), tracing each name to the module it was imported from and
//! recording that module as the latest re-export hop.

use modscope_core::{
    DeclarationRef, Env, Exported, Exports, ImportRecord, ImportTable, Imports, ModuleName, NameKind,
    NamespaceMap, RefKind, ResolveConfig, ResolveError, SourceSpan,
};

use crate::conflict::{resolve_import_conflict, ConflictSite};
use crate::diagnostics::Diagnostics;
use crate::namespace::{NamespaceAccess, PLAIN_NAMESPACES};

/// Read-only inputs shared by every module ref of one module
#[derive(Debug, Clone, Copy)]
pub struct ReexportContext<'a> {
    pub env: &'a Env,
    pub module: &'a ModuleName,
    pub imports: &'a Imports,
    pub config: &'a ResolveConfig,
}

/// Fold the module refs of `refs` over `filtered`, in order
pub fn elaborate_exports(
    ctx: ReexportContext<'_>,
    candidate: &Exports,
    filtered: Exports,
    refs: &[DeclarationRef],
    diagnostics: &mut Diagnostics,
) -> Result<Exports, ResolveError> {
    refs.iter().try_fold(filtered, |acc, r| match &r.kind {
        RefKind::Module(name) if name == ctx.module => {
            tracing::debug!("reexport: {} re-exports itself", ctx.module);
            Ok(reexport_self(acc, candidate))
        }
        RefKind::Module(name) => reexport_module(ctx, acc, name, r.span, diagnostics),
        _ => Ok(acc),
    })
}

/// Union the accumulator over the full candidate set; the accumulator wins ties
fn reexport_self(mut acc: Exports, candidate: &Exports) -> Exports {
    union_missing(&mut acc.types, &candidate.types);
    union_missing(&mut acc.type_operators, &candidate.type_operators);
    union_missing(&mut acc.type_classes, &candidate.type_classes);
    union_missing(&mut acc.values, &candidate.values);
    union_missing(&mut acc.value_operators, &candidate.value_operators);
    acc
}

fn union_missing<P: Clone>(acc: &mut NamespaceMap<P>, other: &NamespaceMap<P>) {
    for (name, entry) in other {
        acc.entry(name.clone()).or_insert_with(|| entry.clone());
    }
}

fn reexport_module(
    ctx: ReexportContext<'_>,
    mut acc: Exports,
    other: &ModuleName,
    span: SourceSpan,
    diagnostics: &mut Diagnostics,
) -> Result<Exports, ResolveError> {
    let is_pseudo = ctx.imports.is_pseudo_module(other);
    if !is_pseudo && !ctx.imports.is_unqualified_import(other) {
        return Err(ResolveError::UnknownExport {
            module: ctx.module.clone(),
            span,
            kind: NameKind::Module,
            name: other.to_string(),
        });
    }

    let extractor = Extractor {
        ctx,
        other,
        is_pseudo,
        span,
    };

    let types = extractor.extract(&ctx.imports.types, NameKind::Type, diagnostics)?;
    let constructors = extractor.extract(&ctx.imports.data_constructors, NameKind::DataConstructor, diagnostics)?;
    let type_count = types.len();
    for record in types {
        let origin = ctx.env.expect_module(&record.module)?;
        let entry = origin.types.get(&record.name).ok_or_else(|| missing_export(NameKind::Type, record))?;
        let exported_ctors: Vec<String> = entry
            .payload
            .iter()
            .filter(|ctor| {
                constructors
                    .iter()
                    .any(|c| c.module == record.module && c.name == **ctor)
            })
            .cloned()
            .collect();
        acc.types.insert(
            record.name.clone(),
            Exported::new(exported_ctors, entry.source.reexported_via(record.module.clone())),
        );
    }

    let mut plain_count = 0;
    for access in PLAIN_NAMESPACES.iter() {
        plain_count += extractor.reexport_plain(access, &mut acc, diagnostics)?;
    }

    tracing::debug!(
        "reexport: {} re-exports {} types and {} other names via module {}{}",
        ctx.module,
        type_count,
        plain_count,
        other,
        if is_pseudo { " (qualified alias)" } else { "" }
    );
    Ok(acc)
}

/// Pulls the names belonging to one `module X` ref out of the import tables
struct Extractor<'a> {
    ctx: ReexportContext<'a>,
    other: &'a ModuleName,
    is_pseudo: bool,
    span: SourceSpan,
}

impl<'a> Extractor<'a> {
    /// Records of every key in `table` that belongs to `module X`, with
    /// ambiguous keys settled first
    ///
    /// A key whose settled record points at the module itself, or (for an
    /// unqualified `module X`) at a name from a different origin than what `X`
    /// exports, is skipped.
    fn extract<'t>(
        &self,
        table: &'t ImportTable,
        kind: NameKind,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<&'t ImportRecord>, ResolveError> {
        let mut records = Vec::new();
        for (key, candidates) in table {
            let belongs = if self.is_pseudo {
                key.is_qualified_with(self.other)
            } else {
                key.is_unqualified() && candidates.iter().any(|r| r.module == *self.other)
            };
            if !belongs {
                continue;
            }
            let site = ConflictSite {
                module: self.ctx.module,
                kind,
                name: &key.name,
                span: self.span,
                report_shadowing: self.ctx.config.report_scope_shadowing,
            };
            let settled = resolve_import_conflict(site, candidates, diagnostics)?;
            match self.via_other(settled, candidates) {
                Some(record) => records.push(record),
                None => tracing::trace!(
                    "reexport: {} '{}' resolves to {}, not re-exported via {}",
                    kind,
                    key.name,
                    settled.module,
                    self.other
                ),
            }
        }
        Ok(records)
    }

    /// The record `module X` publishes for a settled name, if any
    ///
    /// Records sharing a home module are interchangeable, so an unqualified
    /// ref prefers the one imported from `X` itself.
    fn via_other<'t>(&self, settled: &'t ImportRecord, candidates: &'t [ImportRecord]) -> Option<&'t ImportRecord> {
        if settled.module == *self.ctx.module {
            return None;
        }
        if self.is_pseudo || settled.module == *self.other {
            return Some(settled);
        }
        candidates
            .iter()
            .find(|r| r.module == *self.other && r.source_module == settled.source_module)
    }

    fn reexport_plain(
        &self,
        access: &NamespaceAccess<()>,
        acc: &mut Exports,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, ResolveError> {
        let records = self.extract((access.imports)(self.ctx.imports), access.kind(), diagnostics)?;
        let count = records.len();
        for record in records {
            let origin = self.ctx.env.expect_module(&record.module)?;
            let entry = (access.exports)(origin)
                .get(&record.name)
                .ok_or_else(|| missing_export(access.kind(), record))?;
            (access.exports_mut)(acc).insert(
                record.name.clone(),
                Exported::new((), entry.source.reexported_via(record.module.clone())),
            );
        }
        Ok(count)
    }
}

fn missing_export(kind: NameKind, record: &ImportRecord) -> ResolveError {
    ResolveError::Internal(format!(
        "{} '{}' was imported from {} but {} does not export it",
        kind, record.name, record.module, record.module
    ))
}
