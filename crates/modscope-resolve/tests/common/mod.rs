//! Shared fixtures for the export resolution tests
#![allow(dead_code)]

use modscope_core::imports::insert_record;
use modscope_core::{
    Declaration, DeclarationRef, Env, ExportSource, Exports, ImportProvenance, ImportRecord,
    ImportTable, Imports, ModuleName, NamespaceMap, Qualified, ResolveConfig,
};
use modscope_resolve::{resolve_module_exports, ModuleInput, ResolveFailure, Resolved};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn m(name: &str) -> ModuleName {
    ModuleName::new(name)
}

pub fn local(module: &str) -> ExportSource {
    ExportSource::local(m(module))
}

/// Builds import tables the way the import pass would for a handful of
/// import declarations
#[derive(Default)]
pub struct ImportsBuilder {
    imports: Imports,
}

impl ImportsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `import M`
    pub fn open(mut self, module: &str, exports: &Exports) -> Self {
        self.imports.unqualified_modules.insert(m(module));
        self.add_all(module, None, exports, ImportProvenance::Implicit);
        self
    }

    /// `import M as Alias`
    pub fn qualified(mut self, module: &str, alias: &str, exports: &Exports) -> Self {
        self.add_all(module, Some(alias), exports, ImportProvenance::Implicit);
        self
    }

    /// `import M (value)`
    pub fn explicit_value(mut self, module: &str, name: &str, exports: &Exports) -> Self {
        self.imports.unqualified_modules.insert(m(module));
        if let Some(entry) = exports.values.get(name) {
            insert_record(
                &mut self.imports.values,
                Qualified::unqualified(name.to_string()),
                record(module, name, &entry.source, ImportProvenance::Explicit),
            );
        }
        self
    }

    /// A name declared in the importing module itself
    pub fn local_value(mut self, module: &str, name: &str) -> Self {
        insert_record(
            &mut self.imports.values,
            Qualified::unqualified(name.to_string()),
            ImportRecord::new(module, name, module, ImportProvenance::Local),
        );
        self
    }

    pub fn build(self) -> Imports {
        self.imports
    }

    fn add_all(&mut self, module: &str, alias: Option<&str>, exports: &Exports, provenance: ImportProvenance) {
        let key = |name: &str| match alias {
            Some(alias) => Qualified::by_module(alias, name.to_string()),
            None => Qualified::unqualified(name.to_string()),
        };

        for (name, entry) in &exports.types {
            insert_record(
                &mut self.imports.types,
                key(name.as_str()),
                record(module, name, &entry.source, provenance),
            );
            for ctor in &entry.payload {
                insert_record(
                    &mut self.imports.data_constructors,
                    key(ctor.as_str()),
                    record(module, ctor, &entry.source, provenance),
                );
            }
        }
        add_plain(&mut self.imports.type_operators, &exports.type_operators, module, &key, provenance);
        add_plain(&mut self.imports.type_classes, &exports.type_classes, module, &key, provenance);
        add_plain(&mut self.imports.values, &exports.values, module, &key, provenance);
        add_plain(&mut self.imports.value_operators, &exports.value_operators, module, &key, provenance);
    }
}

fn add_plain(
    table: &mut ImportTable,
    exports: &NamespaceMap<()>,
    module: &str,
    key: &dyn Fn(&str) -> Qualified<String>,
    provenance: ImportProvenance,
) {
    for (name, entry) in exports {
        insert_record(table, key(name.as_str()), record(module, name, &entry.source, provenance));
    }
}

fn record(module: &str, name: &str, source: &ExportSource, provenance: ImportProvenance) -> ImportRecord {
    ImportRecord::new(module, name, source.defined_in.clone(), provenance)
}

/// Resolve `name` against `env` and commit the result, panicking on failure
pub fn resolve_and_commit(
    env: &mut Env,
    name: &str,
    declarations: &[Declaration],
    imports: &Imports,
    refs: Option<&[DeclarationRef]>,
) -> Exports {
    let resolved = resolve(env, name, declarations, imports, refs)
        .unwrap_or_else(|f| panic!("resolving {} failed: {}", name, f));
    env.commit(m(name), resolved.value.clone()).unwrap();
    resolved.value
}

pub fn resolve(
    env: &Env,
    name: &str,
    declarations: &[Declaration],
    imports: &Imports,
    refs: Option<&[DeclarationRef]>,
) -> Result<Resolved<Exports>, ResolveFailure> {
    resolve_with_config(env, name, declarations, imports, refs, &ResolveConfig::default())
}

pub fn resolve_with_config(
    env: &Env,
    name: &str,
    declarations: &[Declaration],
    imports: &Imports,
    refs: Option<&[DeclarationRef]>,
    config: &ResolveConfig,
) -> Result<Resolved<Exports>, ResolveFailure> {
    let module = m(name);
    let input = ModuleInput {
        name: &module,
        declarations,
        imports,
        exports: refs,
    };
    resolve_module_exports(env, input, config)
}
