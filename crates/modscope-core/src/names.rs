//! Module names, qualified names and the fixed set of namespaces
//!
//! Names only collide within the same namespace. Data constructors are not a
//! namespace of their own for export purposes: they hang off their owning type,
//! but the import tables still track them separately (see [`NameKind`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dotted module name such as `Data.Maybe`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dot-separated segments of the name
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModuleName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A name with an optional module qualifier, as it appears in an import table key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Qualified<N> {
    pub module: Option<ModuleName>,
    pub name: N,
}

impl<N> Qualified<N> {
    pub fn unqualified(name: N) -> Self {
        Self { module: None, name }
    }

    pub fn by_module(module: impl Into<ModuleName>, name: N) -> Self {
        Self {
            module: Some(module.into()),
            name,
        }
    }

    pub fn is_unqualified(&self) -> bool {
        self.module.is_none()
    }

    pub fn is_qualified_with(&self, module: &ModuleName) -> bool {
        self.module.as_ref() == Some(module)
    }
}

impl<N: fmt::Display> fmt::Display for Qualified<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}.{}", module, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The five independent export namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Namespace {
    Type,
    TypeOperator,
    TypeClass,
    Value,
    ValueOperator,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::Type,
        Namespace::TypeOperator,
        Namespace::TypeClass,
        Namespace::Value,
        Namespace::ValueOperator,
    ];
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        NameKind::from(*self).fmt(f)
    }
}

/// Every kind of name a diagnostic can talk about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NameKind {
    Type,
    TypeOperator,
    TypeClass,
    Value,
    ValueOperator,
    DataConstructor,
    Module,
}

impl From<Namespace> for NameKind {
    fn from(ns: Namespace) -> Self {
        match ns {
            Namespace::Type => NameKind::Type,
            Namespace::TypeOperator => NameKind::TypeOperator,
            Namespace::TypeClass => NameKind::TypeClass,
            Namespace::Value => NameKind::Value,
            Namespace::ValueOperator => NameKind::ValueOperator,
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NameKind::Type => "type",
            NameKind::TypeOperator => "type operator",
            NameKind::TypeClass => "type class",
            NameKind::Value => "value",
            NameKind::ValueOperator => "operator",
            NameKind::DataConstructor => "data constructor",
            NameKind::Module => "module",
        };
        f.write_str(label)
    }
}

/// A position in a source file, 1-based
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

/// The source range a declaration, ref or import was written at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourcePos,
    pub end: SourcePos,
}

impl SourceSpan {
    /// Span for entries that have no location in user source
    pub const NULL: SourceSpan = SourceSpan {
        start: SourcePos { line: 0, column: 0 },
        end: SourcePos { line: 0, column: 0 },
    };

    pub fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: SourcePos {
                line: start.0,
                column: start.1,
            },
            end: SourcePos {
                line: end.0,
                column: end.1,
            },
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "<unknown location>");
        }
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_display() {
        let q = Qualified::by_module("Data.Maybe", "fromMaybe".to_string());
        assert_eq!(q.to_string(), "Data.Maybe.fromMaybe");

        let u = Qualified::unqualified("map".to_string());
        assert_eq!(u.to_string(), "map");
        assert!(u.is_unqualified());
    }

    #[test]
    fn test_is_qualified_with() {
        let q = Qualified::by_module("M", "x".to_string());
        assert!(q.is_qualified_with(&ModuleName::new("M")));
        assert!(!q.is_qualified_with(&ModuleName::new("N")));
    }

    #[test]
    fn test_module_segments() {
        let m = ModuleName::new("Data.List.NonEmpty");
        assert_eq!(m.segments().collect::<Vec<_>>(), vec!["Data", "List", "NonEmpty"]);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(SourceSpan::new((3, 1), (3, 9)).to_string(), "3:1-3:9");
        assert_eq!(SourceSpan::NULL.to_string(), "<unknown location>");
    }
}
