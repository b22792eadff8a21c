//! Structural subtyping and least upper bounds.
//!
//! Aliases are unwrapped before any comparison, so an alias is always
//! equivalent to its definition. Data types and constructors are nominal: a
//! constructor is a subtype of its owner data type only, and constructor
//! fields are never visited, which keeps recursive data types finite.

use crate::types::{Field, Type, manager::TypeManager};

impl<'a> Type<'a> {
    /// Returns true if every value of `self` is also a value of `other`.
    pub fn is_subtype_of(&'a self, other: &'a Type<'a>) -> bool {
        let (sub, sup) = (self.unalias(), other.unalias());
        if core::ptr::eq(sub, sup) {
            return true;
        }
        match (sub, sup) {
            (_, Type::Value) | (Type::Void, _) => true,

            (Type::List(a), Type::List(b)) => a.is_subtype_of(b),
            (Type::Set(a) | Type::Relation(a), Type::Set(b) | Type::Relation(b)) => {
                a.is_subtype_of(b)
            }
            (Type::Map(ka, va), Type::Map(kb, vb)) => ka.is_subtype_of(kb) && va.is_subtype_of(vb),
            (Type::Tuple(a), Type::Tuple(b)) => fields_subtype(a, b),

            (
                Type::Adt {
                    name: na,
                    params: pa,
                },
                Type::Adt {
                    name: nb,
                    params: pb,
                },
            ) => {
                na == nb
                    && pa.len() == pb.len()
                    && pa.iter().zip(pb.iter()).all(|(a, b)| a.is_subtype_of(b))
            }
            (Type::Constructor { adt, .. }, Type::Adt { .. }) => adt.is_subtype_of(sup),

            // Only reached for types interned by different managers.
            (Type::Integer, Type::Integer)
            | (Type::Double, Type::Double)
            | (Type::Bool, Type::Bool)
            | (Type::Str, Type::Str)
            | (Type::SourceLocation, Type::SourceLocation)
            | (Type::Node, Type::Node) => true,
            (Type::Constructor { .. }, Type::Constructor { .. }) => sub == sup,

            _ => false,
        }
    }

    /// Mutual subtypes: equal up to aliases and labels.
    pub fn is_equivalent(&'a self, other: &'a Type<'a>) -> bool {
        self.is_subtype_of(other) && other.is_subtype_of(self)
    }

    /// The most specific common supertype, `value` when there is nothing
    /// better.
    pub fn lub(&'a self, other: &'a Type<'a>, types: &TypeManager<'a>) -> &'a Type<'a> {
        if self.is_subtype_of(other) {
            return other;
        }
        if other.is_subtype_of(self) {
            return self;
        }
        match (self.unalias(), other.unalias()) {
            (Type::Tuple(a), Type::Tuple(b)) if a.len() == b.len() => {
                let fields: Vec<Field<'a>> = a
                    .iter()
                    .zip(b.iter())
                    .map(|(fa, fb)| Field {
                        ty: fa.ty.lub(fb.ty, types),
                        label: if fa.label == fb.label { fa.label } else { None },
                    })
                    .collect();
                types.tuple_of_fields(&fields)
            }
            (Type::List(a), Type::List(b)) => types.list(a.lub(b, types)),
            (Type::Set(a) | Type::Relation(a), Type::Set(b) | Type::Relation(b)) => {
                types.set(a.lub(b, types))
            }
            (Type::Map(ka, va), Type::Map(kb, vb)) => {
                types.map(ka.lub(kb, types), va.lub(vb, types))
            }
            (Type::Constructor { adt: a, .. }, Type::Constructor { adt: b, .. }) => {
                a.lub(b, types)
            }
            (Type::Constructor { adt, .. }, adt_ty @ Type::Adt { .. })
            | (adt_ty @ Type::Adt { .. }, Type::Constructor { adt, .. }) => adt.lub(adt_ty, types),
            (
                Type::Adt {
                    name: na,
                    params: pa,
                },
                Type::Adt {
                    name: nb,
                    params: pb,
                },
            ) if na == nb && pa.len() == pb.len() => {
                let params: Vec<&'a Type<'a>> = pa
                    .iter()
                    .zip(pb.iter())
                    .map(|(a, b)| a.lub(b, types))
                    .collect();
                types.adt(na, &params)
            }
            _ => types.value(),
        }
    }
}

fn fields_subtype<'a>(a: &'a [Field<'a>], b: &'a [Field<'a>]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(fa, fb)| fa.ty.is_subtype_of(fb.ty))
}
