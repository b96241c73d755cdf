//! Settling ambiguous imports
//!
//! A name with several import records can still be used when all of them lead
//! to the same home module, or when exactly one of them was imported
//! explicitly and the rest came in through open imports. Anything else is a
//! conflict.

use std::collections::BTreeMap;

use modscope_core::{ImportProvenance, ImportRecord, ModuleName, NameKind, ResolveError, SourceSpan};

use crate::diagnostics::{Diagnostics, Warning};

/// Where an ambiguous name is being used
#[derive(Debug, Clone, Copy)]
pub struct ConflictSite<'a> {
    pub module: &'a ModuleName,
    pub kind: NameKind,
    pub name: &'a str,
    pub span: SourceSpan,
    pub report_shadowing: bool,
}

/// Pick the record a use of an ambiguous name refers to
pub fn resolve_import_conflict<'r>(
    site: ConflictSite<'_>,
    records: &'r [ImportRecord],
    diagnostics: &mut Diagnostics,
) -> Result<&'r ImportRecord, ResolveError> {
    let first = records.first().ok_or_else(|| {
        ResolveError::Internal(format!(
            "import table entry for {} '{}' has no records",
            site.kind, site.name
        ))
    })?;
    if records.len() == 1 {
        return Ok(first);
    }

    let mut by_origin: BTreeMap<&ModuleName, Vec<&ImportRecord>> = BTreeMap::new();
    for record in records {
        by_origin.entry(&record.source_module).or_default().push(record);
    }

    if by_origin.len() == 1 {
        tracing::trace!(
            "conflict: {} '{}' has {} records with one origin, using {}",
            site.kind,
            site.name,
            records.len(),
            first.module
        );
        return Ok(first);
    }

    let explicit: Vec<&ImportRecord> = records
        .iter()
        .filter(|r| r.provenance != ImportProvenance::Implicit)
        .collect();

    if let [chosen] = explicit.as_slice() {
        if site.report_shadowing && chosen.provenance == ImportProvenance::Explicit {
            let mut shadowed: Vec<ModuleName> = records
                .iter()
                .filter(|r| r.module != chosen.module)
                .map(|r| r.module.clone())
                .collect();
            shadowed.sort();
            shadowed.dedup();
            diagnostics.warn(Warning::ScopeShadowing {
                module: site.module.clone(),
                span: site.span,
                kind: site.kind,
                name: site.name.to_string(),
                chosen: chosen.module.clone(),
                shadowed,
            });
        }
        return Ok(*chosen);
    }

    Err(ResolveError::ImportConflict {
        module: site.module.clone(),
        span: site.span,
        kind: site.kind,
        name: site.name.to_string(),
        origins: by_origin.into_keys().cloned().collect(),
    })
}
