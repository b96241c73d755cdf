//! Narrow the candidate export set to what an explicit export list names

use std::collections::BTreeMap;

use modscope_core::{
    DeclarationRef, Exported, Exports, ModuleName, RefKind, ResolveError, SourceSpan,
};

use crate::namespace::{self, NamespaceAccess};

/// A type ref after merging every occurrence of the same type
struct MergedTypeRef {
    span: SourceSpan,
    /// `None` exports every constructor
    constructors: Option<Vec<String>>,
}

/// Keep only the candidate entries the export list names
///
/// `module` refs are skipped here and handled by the re-export step. Plain refs
/// must name something declared in `module` itself: exporting an imported name
/// needs a module re-export.
pub fn filter_exports(
    module: &ModuleName,
    candidate: &Exports,
    refs: &[DeclarationRef],
) -> Result<Exports, ResolveError> {
    let mut filtered = Exports::new();

    for (name, merged) in merge_type_refs(refs) {
        filter_type(module, candidate, &name, merged, &mut filtered)?;
    }

    for r in refs {
        let (access, name) = match &r.kind {
            RefKind::TypeOperator(name) => (&namespace::TYPE_OPERATORS, name),
            RefKind::TypeClass(name) => (&namespace::TYPE_CLASSES, name),
            RefKind::Value(name) => (&namespace::VALUES, name),
            RefKind::ValueOperator(name) => (&namespace::VALUE_OPERATORS, name),
            RefKind::Type { .. } | RefKind::Module(_) => continue,
        };
        filter_local(module, candidate, access, name, r.span, &mut filtered)?;
    }

    tracing::debug!(
        "filter: {} keeps {} of {} candidate names",
        module,
        filtered.total_len(),
        candidate.total_len()
    );
    Ok(filtered)
}

/// Combine `T(A)`, `T(B)` into `T(A, B)`; any `T(..)` wins over explicit lists
fn merge_type_refs(refs: &[DeclarationRef]) -> BTreeMap<String, MergedTypeRef> {
    let mut merged: BTreeMap<String, MergedTypeRef> = BTreeMap::new();
    for r in refs {
        let RefKind::Type { name, constructors } = &r.kind else {
            continue;
        };
        match merged.get_mut(name) {
            None => {
                let constructors = constructors.as_ref().map(|ctors| dedup(ctors.iter()));
                merged.insert(
                    name.clone(),
                    MergedTypeRef {
                        span: r.span,
                        constructors,
                    },
                );
            }
            Some(existing) => {
                existing.constructors = match (existing.constructors.take(), constructors) {
                    (Some(mut acc), Some(more)) => {
                        for ctor in more {
                            if !acc.contains(ctor) {
                                acc.push(ctor.clone());
                            }
                        }
                        Some(acc)
                    }
                    _ => None,
                };
            }
        }
    }
    merged
}

fn dedup<'a>(names: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

fn filter_type(
    module: &ModuleName,
    candidate: &Exports,
    name: &str,
    merged: MergedTypeRef,
    filtered: &mut Exports,
) -> Result<(), ResolveError> {
    let entry = candidate
        .types
        .get(name)
        .ok_or_else(|| ResolveError::UnknownExport {
            module: module.clone(),
            span: merged.span,
            kind: namespace::TYPES.kind(),
            name: name.to_string(),
        })?;

    let constructors = match merged.constructors {
        None => entry.payload.clone(),
        Some(requested) => {
            if let Some(unknown) = requested.iter().find(|c| !entry.payload.contains(*c)) {
                return Err(ResolveError::UnknownExportDataConstructor {
                    module: module.clone(),
                    span: merged.span,
                    type_name: name.to_string(),
                    constructor: unknown.clone(),
                });
            }
            requested
        }
    };

    filtered.add_type(name, constructors, entry.source.clone());
    Ok(())
}

fn filter_local(
    module: &ModuleName,
    candidate: &Exports,
    access: &NamespaceAccess<()>,
    name: &str,
    span: SourceSpan,
    filtered: &mut Exports,
) -> Result<(), ResolveError> {
    match (access.exports)(candidate).get(name) {
        Some(entry) if entry.source.defined_in == *module => {
            (access.exports_mut)(filtered).insert(name.to_string(), Exported::new((), entry.source.clone()));
            Ok(())
        }
        _ => Err(ResolveError::UnknownExport {
            module: module.clone(),
            span,
            kind: access.kind(),
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exportable::build_exportable;
    use modscope_core::{Declaration, ExportSource, NameKind, Namespace};
    use pretty_assertions::assert_eq;

    fn m() -> ModuleName {
        ModuleName::new("Shapes")
    }

    fn candidate() -> Exports {
        build_exportable(
            &m(),
            &[
                Declaration::data("T", ["A", "B", "C"]),
                Declaration::value("area"),
                Declaration::value("perimeter"),
                Declaration::class("HasArea", ["areaOf"]),
            ],
        )
    }

    #[test]
    fn test_type_with_constructor_subset() {
        let filtered = filter_exports(&m(), &candidate(), &[DeclarationRef::type_with("T", ["A"])]).unwrap();
        assert_eq!(filtered.constructors_of("T"), Some(&["A".to_string()][..]));
    }

    #[test]
    fn test_type_without_subset_exports_all_constructors() {
        let filtered = filter_exports(&m(), &candidate(), &[DeclarationRef::type_all("T")]).unwrap();
        assert_eq!(
            filtered.constructors_of("T").map(<[String]>::to_vec),
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_unknown_constructor() {
        let err = filter_exports(&m(), &candidate(), &[DeclarationRef::type_with("T", ["D"])]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownExportDataConstructor {
                module: m(),
                span: SourceSpan::NULL,
                type_name: "T".to_string(),
                constructor: "D".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_type_refs_are_merged() {
        let refs = vec![
            DeclarationRef::type_with("T", ["A"]),
            DeclarationRef::type_with("T", ["C"]),
        ];
        let filtered = filter_exports(&m(), &candidate(), &refs).unwrap();
        assert_eq!(
            filtered.constructors_of("T").map(<[String]>::to_vec),
            Some(vec!["A".to_string(), "C".to_string()])
        );

        let with_all = vec![
            DeclarationRef::type_with("T", ["A"]),
            DeclarationRef::type_all("T"),
        ];
        let filtered = filter_exports(&m(), &candidate(), &with_all).unwrap();
        assert_eq!(filtered.constructors_of("T").map(<[String]>::len), Some(3));
    }

    #[test]
    fn test_unknown_type() {
        let err = filter_exports(&m(), &candidate(), &[DeclarationRef::type_all("Nope")]).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownExport { kind: NameKind::Type, .. }));
    }

    #[test]
    fn test_values_and_classes() {
        let refs = vec![DeclarationRef::value("area"), DeclarationRef::class("HasArea")];
        let filtered = filter_exports(&m(), &candidate(), &refs).unwrap();

        assert_eq!(filtered.names(Namespace::Value), vec!["area"]);
        assert_eq!(filtered.names(Namespace::TypeClass), vec!["HasArea"]);
        assert!(filtered.types.is_empty());
    }

    #[test]
    fn test_non_local_value_is_rejected() {
        let mut candidate = candidate();
        candidate.add(
            Namespace::Value,
            "imported",
            ExportSource::local(ModuleName::new("Elsewhere")),
        );

        let err = filter_exports(&m(), &candidate, &[DeclarationRef::value("imported")]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownExport {
                module: m(),
                span: SourceSpan::NULL,
                kind: NameKind::Value,
                name: "imported".to_string(),
            }
        );
    }

    #[test]
    fn test_module_refs_are_skipped() {
        let filtered = filter_exports(&m(), &candidate(), &[DeclarationRef::module("Other")]).unwrap();
        assert!(filtered.is_empty());
    }
}
