//! Table accessors for each export namespace, shared by filtering and re-export

use modscope_core::exports::{Constructors, Exports};
use modscope_core::{ImportTable, Imports, NameKind, Namespace, NamespaceMap};

/// Accessors into the export and import tables for one namespace
pub struct NamespaceAccess<P> {
    pub namespace: Namespace,
    pub exports: fn(&Exports) -> &NamespaceMap<P>,
    pub exports_mut: fn(&mut Exports) -> &mut NamespaceMap<P>,
    pub imports: fn(&Imports) -> &ImportTable,
}

impl<P> NamespaceAccess<P> {
    pub fn kind(&self) -> NameKind {
        self.namespace.into()
    }
}

macro_rules! namespace_access {
    ($const_name:ident, $payload:ty, $ns:expr, $field:ident) => {
        pub const $const_name: NamespaceAccess<$payload> = {
            fn exports(e: &Exports) -> &NamespaceMap<$payload> {
                &e.$field
            }
            fn exports_mut(e: &mut Exports) -> &mut NamespaceMap<$payload> {
                &mut e.$field
            }
            fn imports(i: &Imports) -> &ImportTable {
                &i.$field
            }
            NamespaceAccess {
                namespace: $ns,
                exports,
                exports_mut,
                imports,
            }
        };
    };
}

namespace_access!(TYPES, Constructors, Namespace::Type, types);
namespace_access!(TYPE_OPERATORS, (), Namespace::TypeOperator, type_operators);
namespace_access!(TYPE_CLASSES, (), Namespace::TypeClass, type_classes);
namespace_access!(VALUES, (), Namespace::Value, values);
namespace_access!(VALUE_OPERATORS, (), Namespace::ValueOperator, value_operators);

/// The four namespaces whose entries carry no payload
pub static PLAIN_NAMESPACES: [NamespaceAccess<()>; 4] =
    [TYPE_OPERATORS, TYPE_CLASSES, VALUES, VALUE_OPERATORS];
