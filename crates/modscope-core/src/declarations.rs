//! Top-level declarations and export list entries, as handed over by the parser

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::names::{ModuleName, NameKind, SourceSpan};

/// A type signature inside a class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMember {
    pub name: String,
    pub span: SourceSpan,
}

impl ClassMember {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: SourceSpan::NULL,
        }
    }
}

/// The declaration forms that can contribute to a module's exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Declaration {
    /// `data` or `newtype` with its constructors
    Data {
        name: String,
        constructors: Vec<String>,
    },
    TypeSynonym {
        name: String,
    },
    ForeignType {
        name: String,
    },
    TypeClass {
        name: String,
        members: Vec<ClassMember>,
    },
    Value {
        name: String,
    },
    ForeignValue {
        name: String,
    },
    ValueFixity {
        operator: String,
    },
    TypeFixity {
        operator: String,
    },
    /// Instances are not named in export lists
    TypeInstance {
        name: String,
    },
    KindSignature {
        name: String,
    },
    /// A group of mutually recursive declarations
    BindingGroup(Vec<Declaration>),
}

impl Declaration {
    pub fn data<I, S>(name: impl Into<String>, constructors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Declaration::Data {
            name: name.into(),
            constructors: constructors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn value(name: impl Into<String>) -> Self {
        Declaration::Value { name: name.into() }
    }

    pub fn class<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Declaration::TypeClass {
            name: name.into(),
            members: members.into_iter().map(ClassMember::new).collect(),
        }
    }
}

/// The content of an export list entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RefKind {
    /// `T`, `T(..)` (`None`) or `T(A, B)` (`Some`)
    Type {
        name: String,
        constructors: Option<Vec<String>>,
    },
    TypeOperator(String),
    TypeClass(String),
    Value(String),
    ValueOperator(String),
    Module(ModuleName),
}

impl RefKind {
    pub fn name_kind(&self) -> NameKind {
        match self {
            RefKind::Type { .. } => NameKind::Type,
            RefKind::TypeOperator(_) => NameKind::TypeOperator,
            RefKind::TypeClass(_) => NameKind::TypeClass,
            RefKind::Value(_) => NameKind::Value,
            RefKind::ValueOperator(_) => NameKind::ValueOperator,
            RefKind::Module(_) => NameKind::Module,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RefKind::Type { name, .. }
            | RefKind::TypeOperator(name)
            | RefKind::TypeClass(name)
            | RefKind::Value(name)
            | RefKind::ValueOperator(name) => name,
            RefKind::Module(module) => module.as_str(),
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::Type {
                name,
                constructors: None,
            } => write!(f, "{}(..)", name),
            RefKind::Type {
                name,
                constructors: Some(ctors),
            } => write!(f, "{}({})", name, ctors.join(", ")),
            RefKind::TypeOperator(op) => write!(f, "type ({})", op),
            RefKind::TypeClass(name) => write!(f, "class {}", name),
            RefKind::Value(name) => write!(f, "{}", name),
            RefKind::ValueOperator(op) => write!(f, "({})", op),
            RefKind::Module(module) => write!(f, "module {}", module),
        }
    }
}

/// One entry of an explicit export list
///
/// Two refs are duplicates when their [`RefKind`]s are equal; spans are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationRef {
    pub span: SourceSpan,
    pub kind: RefKind,
}

impl DeclarationRef {
    pub fn new(kind: RefKind) -> Self {
        Self {
            span: SourceSpan::NULL,
            kind,
        }
    }

    pub fn at(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    pub fn type_all(name: impl Into<String>) -> Self {
        Self::new(RefKind::Type {
            name: name.into(),
            constructors: None,
        })
    }

    pub fn type_with<I, S>(name: impl Into<String>, constructors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(RefKind::Type {
            name: name.into(),
            constructors: Some(constructors.into_iter().map(Into::into).collect()),
        })
    }

    pub fn value(name: impl Into<String>) -> Self {
        Self::new(RefKind::Value(name.into()))
    }

    pub fn value_operator(op: impl Into<String>) -> Self {
        Self::new(RefKind::ValueOperator(op.into()))
    }

    pub fn type_operator(op: impl Into<String>) -> Self {
        Self::new(RefKind::TypeOperator(op.into()))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(RefKind::TypeClass(name.into()))
    }

    pub fn module(module: impl Into<ModuleName>) -> Self {
        Self::new(RefKind::Module(module.into()))
    }

    pub fn as_module(&self) -> Option<&ModuleName> {
        match &self.kind {
            RefKind::Module(module) => Some(module),
            _ => None,
        }
    }
}

impl PartialEq for DeclarationRef {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for DeclarationRef {}

impl fmt::Display for DeclarationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_span() {
        let a = DeclarationRef::value("f").at(SourceSpan::new((1, 1), (1, 2)));
        let b = DeclarationRef::value("f").at(SourceSpan::new((4, 10), (4, 11)));
        assert_eq!(a, b);
        assert_ne!(a, DeclarationRef::value("g"));
    }

    #[test]
    fn test_ref_display() {
        assert_eq!(DeclarationRef::type_all("Maybe").to_string(), "Maybe(..)");
        assert_eq!(
            DeclarationRef::type_with("Either", ["Left"]).to_string(),
            "Either(Left)"
        );
        assert_eq!(DeclarationRef::module("Data.Map").to_string(), "module Data.Map");
    }

    #[test]
    fn test_name_kind() {
        assert_eq!(DeclarationRef::class("Show").kind.name_kind(), NameKind::TypeClass);
        assert_eq!(DeclarationRef::module("M").kind.name_kind(), NameKind::Module);
    }
}
