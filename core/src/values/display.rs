//! Canonical text rendering.
//!
//! `Display` on values produces exactly the standard text format, so
//! `to_string()` and the text writer always agree. No whitespace is
//! emitted.

use crate::{
    syntax::string_literal::{escape_path, escape_string},
    values::{
        Bool, Constructor, Double, Integer, List, Map, Node, Set, SourceLocation, Str, Tuple,
        Value,
    },
};
use core::fmt::{self, Display, Formatter};

/// Format a float ensuring it always has a decimal point, so it never reads
/// back as an integer.
pub(crate) fn format_float(f: &mut Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            write!(f, "inf")
        } else {
            write!(f, "-inf")
        }
    } else {
        let s = value.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            write!(f, "{}", s)
        } else {
            write!(f, "{}.", s)
        }
    }
}

/// Node names that would read back as something else are quoted.
fn is_plain_node_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !matches!(name, "true" | "false" | "nan" | "inf")
}

fn write_separated<'v, 'a: 'v>(
    f: &mut Formatter<'_>,
    items: impl Iterator<Item = &'v Value<'a>>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Integer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Double<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        format_float(f, self.value)
    }
}

impl Display for Bool<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Str<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        escape_string(f, &self.value)
    }
}

impl Display for SourceLocation<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        escape_path(f, &self.path)?;
        let r = &self.range;
        write!(
            f,
            "({},{},<{},{}>,<{},{}>)",
            r.start_offset, r.length, r.start_line, r.start_column, r.end_line, r.end_column
        )
    }
}

impl Display for Tuple<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        write_separated(f, self.iter())?;
        f.write_str(">")
    }
}

impl Display for List<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_separated(f, self.iter())?;
        f.write_str("]")
    }
}

impl Display for Set<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_separated(f, self.iter())?;
        f.write_str("}")
    }
}

impl Display for Map<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (key, val)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", key, val)?;
        }
        f.write_str(")")
    }
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if is_plain_node_name(&self.name) {
            f.write_str(&self.name)?;
        } else {
            escape_string(f, &self.name)?;
        }
        f.write_str("(")?;
        write_separated(f, self.iter())?;
        f.write_str(")")
    }
}

impl Display for Constructor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Parameters of a generic data type are not written; the reader
        // resolves the name against its store.
        let adt = self.adt().name().unwrap_or_default();
        write!(f, "{}::{}(", adt, self.name())?;
        write_separated(f, self.iter())?;
        f.write_str(")")
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => Display::fmt(v, f),
            Value::Double(v) => Display::fmt(v, f),
            Value::Bool(v) => Display::fmt(v, f),
            Value::Str(v) => Display::fmt(v, f),
            Value::SourceLocation(v) => Display::fmt(v, f),
            Value::Tuple(v) => Display::fmt(v, f),
            Value::List(v) => Display::fmt(v, f),
            Value::Set(v) => Display::fmt(v, f),
            Value::Map(v) => Display::fmt(v, f),
            Value::Node(v) => Display::fmt(v, f),
            Value::Constructor(v) => Display::fmt(v, f),
        }
    }
}

macro_rules! debug_as_display {
    ($($view:ident),*) => {
        $(
            impl fmt::Debug for $view<'_> {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    write!(f, "{} : {}", self, self.ty())
                }
            }
        )*
    };
}

debug_as_display!(
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
