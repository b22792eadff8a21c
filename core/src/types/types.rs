use core::fmt::{self, Display};

/// A tuple or constructor field: its type and an optional label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field<'a> {
    pub ty: &'a Type<'a>,
    pub label: Option<&'a str>,
}

/// A type. Always obtained from a [`TypeManager`], which interns it, so
/// structurally identical types are the same reference.
///
/// [`TypeManager`]: crate::types::manager::TypeManager
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type<'a> {
    // Scalars.
    Integer,
    Double,
    Bool,
    Str,
    SourceLocation,

    // Lattice top and bottom.
    Value,
    Void,

    // Collections.
    Tuple(&'a [Field<'a>]),
    List(&'a Type<'a>),
    Set(&'a Type<'a>),
    Relation(&'a Type<'a>), // Always wraps a Tuple.
    Map(&'a Type<'a>, &'a Type<'a>),

    // Untyped labeled term.
    Node,

    // User declarations.
    Adt {
        name: &'a str,
        params: &'a [&'a Type<'a>],
    },
    Constructor {
        adt: &'a Type<'a>,
        name: &'a str,
        fields: &'a [Field<'a>],
    },
    Alias {
        name: &'a str,
        aliased: &'a Type<'a>,
    },
}

impl<'a> Type<'a> {
    /// Strips every alias layer.
    pub fn unalias(&'a self) -> &'a Type<'a> {
        let mut ty = self;
        while let Type::Alias { aliased, .. } = ty {
            ty = aliased;
        }
        ty
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Type::Alias { .. })
    }

    pub fn is_tuple(&'a self) -> bool {
        matches!(self.unalias(), Type::Tuple(_))
    }

    pub fn is_list(&'a self) -> bool {
        matches!(self.unalias(), Type::List(_))
    }

    /// True for sets, including relations.
    pub fn is_set(&'a self) -> bool {
        matches!(self.unalias(), Type::Set(_) | Type::Relation(_))
    }

    pub fn is_relation(&'a self) -> bool {
        matches!(self.unalias(), Type::Relation(_))
    }

    pub fn is_map(&'a self) -> bool {
        matches!(self.unalias(), Type::Map(..))
    }

    pub fn is_adt(&'a self) -> bool {
        matches!(self.unalias(), Type::Adt { .. })
    }

    pub fn is_constructor(&'a self) -> bool {
        matches!(self.unalias(), Type::Constructor { .. })
    }

    /// Element type of a list, set or relation. For a relation this is its
    /// tuple type.
    pub fn element_type(&'a self) -> Option<&'a Type<'a>> {
        match self.unalias() {
            Type::List(elem) | Type::Set(elem) | Type::Relation(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn key_type(&'a self) -> Option<&'a Type<'a>> {
        match self.unalias() {
            Type::Map(key, _) => Some(key),
            _ => None,
        }
    }

    pub fn value_type(&'a self) -> Option<&'a Type<'a>> {
        match self.unalias() {
            Type::Map(_, val) => Some(val),
            _ => None,
        }
    }

    /// Fields of a tuple, a relation's tuple, or a constructor.
    pub fn fields(&'a self) -> Option<&'a [Field<'a>]> {
        match self.unalias() {
            Type::Tuple(fields) | Type::Constructor { fields, .. } => Some(fields),
            Type::Relation(tuple) => tuple.fields(),
            _ => None,
        }
    }

    pub fn arity(&'a self) -> Option<usize> {
        self.fields().map(<[Field<'a>]>::len)
    }

    /// Name of an alias, data type or constructor.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Type::Alias { name, .. } | Type::Adt { name, .. } | Type::Constructor { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// The data type a constructor belongs to.
    pub fn owner_adt(&'a self) -> Option<&'a Type<'a>> {
        match self.unalias() {
            Type::Constructor { adt, .. } => Some(adt),
            _ => None,
        }
    }

    /// Short kind name used in error messages.
    pub(crate) fn kind_name(&'a self) -> &'static str {
        match self.unalias() {
            Type::Integer => "int",
            Type::Double => "double",
            Type::Bool => "bool",
            Type::Str => "str",
            Type::SourceLocation => "loc",
            Type::Value => "value",
            Type::Void => "void",
            Type::Tuple(_) => "tuple",
            Type::List(_) => "list",
            Type::Set(_) => "set",
            Type::Relation(_) => "relation",
            Type::Map(..) => "map",
            Type::Node => "node",
            Type::Adt { .. } => "data type",
            Type::Constructor { .. } => "constructor",
            Type::Alias { .. } => unreachable!("unalias never returns an alias"),
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field<'_>]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", field.ty)?;
        if let Some(label) = field.label {
            write!(f, " {}", label)?;
        }
    }
    Ok(())
}

impl Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "str"),
            Type::SourceLocation => write!(f, "loc"),
            Type::Value => write!(f, "value"),
            Type::Void => write!(f, "void"),
            Type::Node => write!(f, "node"),
            Type::Tuple(fields) => {
                write!(f, "tuple[")?;
                write_fields(f, fields)?;
                write!(f, "]")
            }
            Type::List(elem) => write!(f, "list[{}]", elem),
            Type::Set(elem) => write!(f, "set[{}]", elem),
            Type::Relation(tuple) => {
                write!(f, "rel[")?;
                write_fields(f, tuple.fields().unwrap_or_default())?;
                write!(f, "]")
            }
            Type::Map(key, val) => write!(f, "map[{}, {}]", key, val),
            Type::Adt { name, params } => {
                write!(f, "{}", name)?;
                if !params.is_empty() {
                    let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                    write!(f, "[{}]", params.join(", "))?;
                }
                Ok(())
            }
            Type::Constructor { adt, name, fields } => {
                write!(f, "{}::{}(", adt, name)?;
                write_fields(f, fields)?;
                write!(f, ")")
            }
            Type::Alias { name, .. } => write!(f, "{}", name),
        }
    }
}
