use crate::{
    errors::TypeError,
    types::Type,
    values::{
        Bool, Constructor, Double, Integer, List, Map, Node, Set, SourceLocation, Str, Tuple,
    },
};
use core::hash::{Hash, Hasher};
use std::{hash::DefaultHasher, sync::Arc};

/// An immutable value together with its precise type.
///
/// Equality and hashing are structural over content: the static type of a
/// container and the labels of a tuple are not compared, but the kind is (a
/// list never equals a set). Use [`Value::ptr_eq`] for identity.
#[derive(Clone)]
pub enum Value<'a> {
    Integer(Integer<'a>),
    Double(Double<'a>),
    Bool(Bool<'a>),
    Str(Str<'a>),
    SourceLocation(SourceLocation<'a>),
    Tuple(Tuple<'a>),
    List(List<'a>),
    Set(Set<'a>),
    Map(Map<'a>),
    Node(Node<'a>),
    Constructor(Constructor<'a>),
}

macro_rules! as_kind {
    ($(#[$doc:meta])* $method:ident, $variant:ident, $view:ident, $kind:literal) => {
        $(#[$doc])*
        pub fn $method(&self) -> Result<&$view<'a>, TypeError> {
            match self {
                Value::$variant(view) => Ok(view),
                _ => Err(self.wrong_kind($kind)),
            }
        }
    };
}

impl<'a> Value<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        match self {
            Value::Integer(v) => v.ty,
            Value::Double(v) => v.ty,
            Value::Bool(v) => v.ty,
            Value::Str(v) => v.ty,
            Value::SourceLocation(v) => v.ty,
            Value::Tuple(v) => v.ty,
            Value::List(v) => v.ty,
            Value::Set(v) => v.ty,
            Value::Map(v) => v.ty,
            Value::Node(v) => v.ty,
            Value::Constructor(v) => v.ty,
        }
    }

    /// Replaces the static type. Callers guarantee `ty` unaliases to the
    /// same structure as the current type.
    pub(crate) fn with_type(mut self, ty: &'a Type<'a>) -> Self {
        match &mut self {
            Value::Integer(v) => v.ty = ty,
            Value::Double(v) => v.ty = ty,
            Value::Bool(v) => v.ty = ty,
            Value::Str(v) => v.ty = ty,
            Value::SourceLocation(v) => v.ty = ty,
            Value::Tuple(v) => v.ty = ty,
            Value::List(v) => v.ty = ty,
            Value::Set(v) => v.ty = ty,
            Value::Map(v) => v.ty = ty,
            Value::Node(v) => v.ty = ty,
            Value::Constructor(v) => v.ty = ty,
        }
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::SourceLocation(_) => "loc",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Set(v) if v.is_relation() => "relation",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Node(_) => "node",
            Value::Constructor(_) => "constructor",
        }
    }

    fn wrong_kind(&self, expected: &'static str) -> TypeError {
        TypeError::WrongKind {
            expected,
            found: format!("{} of type {}", self.kind_name(), self.ty()),
        }
    }

    /// True if both values share their storage. Scalars without storage
    /// compare by type identity and content.
    pub fn ptr_eq(&self, other: &Value<'a>) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => {
                core::ptr::eq(a.ty, b.ty) && a.value == b.value
            }
            (Value::Double(a), Value::Double(b)) => {
                core::ptr::eq(a.ty, b.ty) && a.value.to_bits() == b.value.to_bits()
            }
            (Value::Bool(a), Value::Bool(b)) => core::ptr::eq(a.ty, b.ty) && a.value == b.value,
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(&a.value, &b.value),
            (Value::SourceLocation(a), Value::SourceLocation(b)) => {
                Arc::ptr_eq(&a.path, &b.path) && a.range == b.range
            }
            (Value::Tuple(a), Value::Tuple(b)) => Arc::ptr_eq(&a.elems, &b.elems),
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(&a.elems, &b.elems),
            (Value::Set(a), Value::Set(b)) => Arc::ptr_eq(&a.elems, &b.elems),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(&a.entries, &b.entries),
            (Value::Node(a), Value::Node(b)) => Arc::ptr_eq(&a.children, &b.children),
            (Value::Constructor(a), Value::Constructor(b)) => {
                core::ptr::eq(a.ty, b.ty) && Arc::ptr_eq(&a.children, &b.children)
            }
            _ => false,
        }
    }

    as_kind!(as_integer, Integer, Integer, "int");
    as_kind!(as_double, Double, Double, "double");
    as_kind!(as_bool, Bool, Bool, "bool");
    as_kind!(as_str, Str, Str, "str");
    as_kind!(as_source_location, SourceLocation, SourceLocation, "loc");
    as_kind!(as_tuple, Tuple, Tuple, "tuple");
    as_kind!(as_list, List, List, "list");
    as_kind!(
        /// Any set, relations included.
        as_set,
        Set,
        Set,
        "set"
    );
    as_kind!(as_map, Map, Map, "map");
    as_kind!(as_node, Node, Node, "node");
    as_kind!(as_constructor, Constructor, Constructor, "constructor");

    /// A set whose element type is a tuple.
    pub fn as_relation(&self) -> Result<&Set<'a>, TypeError> {
        match self {
            Value::Set(set) if set.is_relation() => Ok(set),
            _ => Err(self.wrong_kind("relation")),
        }
    }
}

macro_rules! impl_from_view {
    ($($view:ident),*) => {
        $(
            impl<'a> From<$view<'a>> for Value<'a> {
                fn from(view: $view<'a>) -> Self {
                    Value::$view(view)
                }
            }
        )*
    };
}

impl_from_view!(
    Integer,
    Double,
    Bool,
    Str,
    SourceLocation,
    Tuple,
    List,
    Set,
    Map,
    Node,
    Constructor
);

// Equality.

fn ordered_eq(a: &[Value<'_>], b: &[Value<'_>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.value == b.value,
            (Value::Double(a), Value::Double(b)) => a.canonical_bits() == b.canonical_bits(),
            (Value::Bool(a), Value::Bool(b)) => a.value == b.value,
            (Value::Str(a), Value::Str(b)) => a.value == b.value,
            (Value::SourceLocation(a), Value::SourceLocation(b)) => {
                a.path == b.path && a.range == b.range
            }
            (Value::Tuple(a), Value::Tuple(b)) => ordered_eq(&a.elems, &b.elems),
            (Value::List(a), Value::List(b)) => ordered_eq(&a.elems, &b.elems),
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|elem| b.contains(elem))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(key, val)| b.get(key) == Some(val))
            }
            (Value::Node(a), Value::Node(b)) => {
                a.name == b.name && ordered_eq(&a.children, &b.children)
            }
            (Value::Constructor(a), Value::Constructor(b)) => {
                a.adt().name() == b.adt().name()
                    && a.name() == b.name()
                    && ordered_eq(&a.children, &b.children)
            }
            _ => false,
        }
    }
}

impl Eq for Value<'_> {}

/// Order-independent digest of a collection: the wrapping sum of the
/// element hashes. Uses a fixed-key hasher so equal collections hash alike.
fn unordered_digest<'v, 'a: 'v>(items: impl Iterator<Item = (&'v Value<'a>, Option<&'v Value<'a>>)>) -> u64 {
    items.fold(0u64, |acc, (key, val)| {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        if let Some(val) = val {
            val.hash(&mut hasher);
        }
        acc.wrapping_add(hasher.finish())
    })
}

impl Hash for Value<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Integer(v) => v.value.hash(state),
            Value::Double(v) => v.canonical_bits().hash(state),
            Value::Bool(v) => v.value.hash(state),
            Value::Str(v) => v.value.hash(state),
            Value::SourceLocation(v) => {
                v.path.hash(state);
                v.range.hash(state);
            }
            Value::Tuple(v) => v.elems.hash(state),
            Value::List(v) => v.elems.hash(state),
            Value::Set(v) => {
                v.len().hash(state);
                unordered_digest(v.iter().map(|elem| (elem, None))).hash(state);
            }
            Value::Map(v) => {
                v.len().hash(state);
                unordered_digest(v.iter().map(|(key, val)| (key, Some(val)))).hash(state);
            }
            Value::Node(v) => {
                v.name.hash(state);
                v.children.hash(state);
            }
            Value::Constructor(v) => {
                v.adt().name().hash(state);
                v.name().hash(state);
                v.children.hash(state);
            }
        }
    }
}

impl core::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} : {}", self, self.ty())
    }
}
