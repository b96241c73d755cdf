//! Whole-program resolution in dependency order

mod common;

use common::{init_tracing, m, ImportsBuilder};
use modscope_core::imports::insert_record;
use modscope_core::{
    Declaration, DeclarationRef, Env, ExportSource, ImportProvenance, ImportRecord, Imports, NameKind, Namespace,
    Qualified, ResolveConfig, ResolveError,
};
use modscope_resolve::{build_exportable, resolve_program, resolve_program_concurrent, ModuleUnit, Warning};
use pretty_assertions::assert_eq;

fn lib_decls() -> Vec<Declaration> {
    vec![Declaration::value("f"), Declaration::data("T", ["X", "Y"])]
}

/// `A` declares, `B` re-exports `A`, `C` re-exports `B`, `D` is unrelated
fn chain() -> Vec<ModuleUnit> {
    let mut a = ModuleUnit::new("A");
    a.declarations = lib_decls();

    let mut b = ModuleUnit::new("B");
    b.imports = ImportsBuilder::new()
        .open("A", &build_exportable(&m("A"), &lib_decls()))
        .build();
    b.exports = Some(vec![DeclarationRef::module("A")]);
    b.dependencies = vec![m("A")];

    let mut c = ModuleUnit::new("C");
    c.imports = imports_through("B", "A");
    c.exports = Some(vec![DeclarationRef::module("B"), DeclarationRef::value("main")]);
    c.declarations = vec![Declaration::value("main")];
    c.dependencies = vec![m("B")];

    let mut d = ModuleUnit::new("D");
    d.declarations = vec![Declaration::value("standalone")];

    // Scheduling order must not matter
    vec![c, d, a, b]
}

/// What `import <via>` sees when `via` re-exports everything of `home`
fn imports_through(via: &str, home: &str) -> Imports {
    let mut imports = Imports::new();
    imports.unqualified_modules.insert(m(via));
    let rec = |name: &str| ImportRecord::new(via, name, home, ImportProvenance::Implicit);
    insert_record(&mut imports.values, Qualified::unqualified("f".to_string()), rec("f"));
    insert_record(&mut imports.types, Qualified::unqualified("T".to_string()), rec("T"));
    for ctor in ["X", "Y"] {
        insert_record(&mut imports.data_constructors, Qualified::unqualified(ctor.to_string()), rec(ctor));
    }
    imports
}

#[test]
fn test_sequential_chain_resolves_in_dependency_order() {
    init_tracing();
    let report = resolve_program(chain(), &ResolveConfig::default(), Env::new()).unwrap();

    assert!(report.is_success());
    assert_eq!(report.env.len(), 4);
    let c = report.env.get(&m("C")).unwrap();
    assert_eq!(
        c.source_of(Namespace::Value, "f"),
        Some(&ExportSource {
            defined_in: m("A"),
            imported_from: Some(m("B")),
        })
    );
    assert_eq!(c.names(Namespace::Value), vec!["f", "main"]);
}

#[tokio::test]
async fn test_concurrent_matches_sequential() {
    init_tracing();
    let config = ResolveConfig {
        max_parallel_modules: 2,
        ..ResolveConfig::default()
    };

    let sequential = resolve_program(chain(), &config, Env::new()).unwrap();
    let concurrent = resolve_program_concurrent(chain(), &config, Env::new()).await.unwrap();

    assert!(concurrent.is_success());
    let mut names: Vec<_> = concurrent.env.module_names().cloned().collect();
    names.sort();
    assert_eq!(names, vec![m("A"), m("B"), m("C"), m("D")]);
    for name in &names {
        assert_eq!(concurrent.env.get(name), sequential.env.get(name), "exports of {}", name);
    }
}

#[tokio::test]
async fn test_failure_blocks_dependents_only() {
    init_tracing();
    let mut units = chain();
    for unit in &mut units {
        if unit.name == m("B") {
            unit.exports = Some(vec![DeclarationRef::value("nope")]);
        }
    }

    let report = resolve_program_concurrent(units, &ResolveConfig::default(), Env::new())
        .await
        .unwrap();

    assert!(!report.is_success());
    assert!(matches!(
        report.failures.get(&m("B")),
        Some(ResolveError::UnknownExport { kind: NameKind::Value, name, .. }) if name == "nope"
    ));
    assert_eq!(report.blocked.iter().cloned().collect::<Vec<_>>(), vec![m("C")]);
    assert!(report.env.contains(&m("A")));
    assert!(report.env.contains(&m("D")));
    assert!(!report.env.contains(&m("C")));
}

#[test]
fn test_base_env_modules_are_visible() {
    init_tracing();
    let mut base = Env::new();
    base.commit(m("A"), build_exportable(&m("A"), &lib_decls())).unwrap();

    let units: Vec<ModuleUnit> = chain().into_iter().filter(|u| u.name != m("A")).collect();
    let report = resolve_program(units, &ResolveConfig::default(), base).unwrap();

    assert!(report.is_success());
    assert_eq!(report.env.len(), 4);
}

#[test]
fn test_warnings_are_reported_per_module() {
    init_tracing();
    let mut units = chain();
    for unit in &mut units {
        if unit.name == m("D") {
            unit.exports = Some(vec![
                DeclarationRef::value("standalone"),
                DeclarationRef::value("standalone"),
            ]);
        }
    }

    let report = resolve_program(units, &ResolveConfig::default(), Env::new()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.warning_count(), 1);
    assert!(matches!(
        report.warnings.get(&m("D")).map(Vec::as_slice),
        Some([Warning::DuplicateExportRef { .. }])
    ));
}

#[test]
fn test_duplicate_warnings_can_be_disabled() {
    init_tracing();
    let mut units = chain();
    for unit in &mut units {
        if unit.name == m("D") {
            unit.exports = Some(vec![
                DeclarationRef::value("standalone"),
                DeclarationRef::value("standalone"),
            ]);
        }
    }

    let config: ResolveConfig = "report_duplicate_refs = false".parse().unwrap();
    let report = resolve_program(units, &config, Env::new()).unwrap();
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn test_cycle_is_rejected_before_resolution() {
    init_tracing();
    let mut a = ModuleUnit::new("A");
    a.dependencies = vec![m("B")];
    let mut b = ModuleUnit::new("B");
    b.dependencies = vec![m("A")];

    let err = resolve_program(vec![a, b], &ResolveConfig::default(), Env::new()).unwrap_err();
    assert_eq!(err, ResolveError::CircularDependency(vec![m("A"), m("B")]));
}
