//! The candidate export set: everything a module declares, as if all of it were
//! public. Any explicit export list is ignored here.

use modscope_core::{Declaration, ExportSource, Exports, ModuleName, Namespace};

/// Build the candidate exports of `module` from its top-level declarations
pub fn build_exportable(module: &ModuleName, declarations: &[Declaration]) -> Exports {
    let mut exports = Exports::new();
    for decl in declarations {
        add_declaration(module, decl, &mut exports);
    }
    tracing::debug!(
        "exportable: {} declares {} types, {} classes, {} values",
        module,
        exports.len(Namespace::Type),
        exports.len(Namespace::TypeClass),
        exports.len(Namespace::Value)
    );
    exports
}

fn add_declaration(module: &ModuleName, decl: &Declaration, exports: &mut Exports) {
    let local = || ExportSource::local(module.clone());
    match decl {
        Declaration::TypeClass { name, members } => {
            exports.add(Namespace::TypeClass, name.as_str(), local());
            for member in members {
                exports.add(Namespace::Value, member.name.as_str(), local());
            }
        }
        Declaration::Data { name, constructors } => {
            exports.add_type(name.as_str(), constructors.clone(), local());
        }
        Declaration::TypeSynonym { name } | Declaration::ForeignType { name } => {
            exports.add_type(name.as_str(), Vec::new(), local());
        }
        Declaration::Value { name } | Declaration::ForeignValue { name } => {
            exports.add(Namespace::Value, name.as_str(), local());
        }
        Declaration::ValueFixity { operator } => {
            exports.add(Namespace::ValueOperator, operator.as_str(), local());
        }
        Declaration::TypeFixity { operator } => {
            exports.add(Namespace::TypeOperator, operator.as_str(), local());
        }
        Declaration::BindingGroup(group) => {
            for inner in group {
                add_declaration(module, inner, exports);
            }
        }
        Declaration::TypeInstance { .. } | Declaration::KindSignature { .. } => {}
    }
}
