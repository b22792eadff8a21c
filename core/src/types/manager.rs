use crate::{
    errors::TypeError,
    types::{Field, Type, store::TypeStore},
};
use bumpalo::Bump;
use core::{
    cell::{Ref, RefCell},
    hash::{Hash, Hasher},
};
use hashbrown::{DefaultHashBuilder, HashMap};
use tracing::debug;

/// Interning key. Children of a type being interned are already interned,
/// so they are compared and hashed by identity instead of recursively.
#[derive(Clone)]
struct InternKey<'a>(Type<'a>);

fn same_types<'a>(a: &[&'a Type<'a>], b: &[&'a Type<'a>]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| core::ptr::eq(*x, *y))
}

fn same_fields<'a>(a: &[Field<'a>], b: &[Field<'a>]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| core::ptr::eq(x.ty, y.ty) && x.label == y.label)
}

fn hash_fields<H: Hasher>(fields: &[Field<'_>], state: &mut H) {
    fields.len().hash(state);
    for field in fields {
        core::ptr::hash(field.ty, state);
        field.label.hash(state);
    }
}

impl PartialEq for InternKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Type::Tuple(a), Type::Tuple(b)) => same_fields(a, b),
            (Type::List(a), Type::List(b))
            | (Type::Set(a), Type::Set(b))
            | (Type::Relation(a), Type::Relation(b)) => core::ptr::eq(*a, *b),
            (Type::Map(ka, va), Type::Map(kb, vb)) => core::ptr::eq(*ka, *kb) && core::ptr::eq(*va, *vb),
            (
                Type::Adt {
                    name: na,
                    params: pa,
                },
                Type::Adt {
                    name: nb,
                    params: pb,
                },
            ) => na == nb && same_types(pa, pb),
            (
                Type::Constructor {
                    adt: aa,
                    name: na,
                    fields: fa,
                },
                Type::Constructor {
                    adt: ab,
                    name: nb,
                    fields: fb,
                },
            ) => core::ptr::eq(*aa, *ab) && na == nb && same_fields(fa, fb),
            (
                Type::Alias {
                    name: na,
                    aliased: a,
                },
                Type::Alias {
                    name: nb,
                    aliased: b,
                },
            ) => na == nb && core::ptr::eq(*a, *b),
            // Leaves, or different kinds.
            (a, b) => core::mem::discriminant(a) == core::mem::discriminant(b),
        }
    }
}

impl Eq for InternKey<'_> {}

impl Hash for InternKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(&self.0).hash(state);
        match &self.0 {
            Type::Tuple(fields) => hash_fields(fields, state),
            Type::List(elem) | Type::Set(elem) | Type::Relation(elem) => {
                core::ptr::hash(*elem, state)
            }
            Type::Map(key, val) => {
                core::ptr::hash(*key, state);
                core::ptr::hash(*val, state);
            }
            Type::Adt { name, params } => {
                name.hash(state);
                for param in params.iter() {
                    core::ptr::hash(*param, state);
                }
            }
            Type::Constructor { adt, name, fields } => {
                core::ptr::hash(*adt, state);
                name.hash(state);
                hash_fields(fields, state);
            }
            Type::Alias { name, aliased } => {
                name.hash(state);
                core::ptr::hash(*aliased, state);
            }
            _ => {}
        }
    }
}

/// Creates and interns types.
///
/// Every type lives in the arena passed to [`TypeManager::new`]; asking twice
/// for the same structure returns the same reference, so identity
/// (`core::ptr::eq`) is structural equality for types from one manager.
pub struct TypeManager<'a> {
    // Arena holding all types from this TypeManager.
    arena: &'a Bump,
    interned_strs: RefCell<HashMap<&'a str, &'a str, DefaultHashBuilder, &'a Bump>>,
    interned: RefCell<HashMap<InternKey<'a>, &'a Type<'a>, DefaultHashBuilder, &'a Bump>>,
}

impl<'a> TypeManager<'a> {
    pub fn new(arena: &'a Bump) -> &'a Self {
        arena.alloc(Self {
            arena,
            interned_strs: RefCell::new(HashMap::new_in(arena)),
            interned: RefCell::new(HashMap::new_in(arena)),
        })
    }

    pub(crate) fn intern_str(&self, s: &str) -> &'a str {
        if let Some(&interned_str) = self.interned_strs.borrow().get(s) {
            return interned_str;
        }
        let arena_str = self.arena.alloc_str(s);
        self.interned_strs.borrow_mut().insert(arena_str, arena_str);
        arena_str
    }

    fn intern_map(&self) -> Ref<'_, HashMap<InternKey<'a>, &'a Type<'a>, DefaultHashBuilder, &'a Bump>> {
        self.interned.borrow()
    }

    fn intern(&self, ty: Type<'a>) -> &'a Type<'a> {
        let key = InternKey(ty);
        if let Some(&interned_ty) = self.intern_map().get(&key) {
            return interned_ty;
        }
        let arena_ty = self.arena.alloc(key.0.clone());
        self.interned.borrow_mut().insert(key, arena_ty);
        arena_ty
    }

    fn intern_fields(&self, fields: impl ExactSizeIterator<Item = Field<'a>>) -> &'a [Field<'a>] {
        self.arena.alloc_slice_fill_iter(fields)
    }

    // Factory methods for types.
    pub fn integer(&self) -> &'a Type<'a> {
        self.intern(Type::Integer)
    }
    pub fn double(&self) -> &'a Type<'a> {
        self.intern(Type::Double)
    }
    pub fn bool(&self) -> &'a Type<'a> {
        self.intern(Type::Bool)
    }
    pub fn string(&self) -> &'a Type<'a> {
        self.intern(Type::Str)
    }
    pub fn source_location(&self) -> &'a Type<'a> {
        self.intern(Type::SourceLocation)
    }
    pub fn value(&self) -> &'a Type<'a> {
        self.intern(Type::Value)
    }
    pub fn void(&self) -> &'a Type<'a> {
        self.intern(Type::Void)
    }
    pub fn node(&self) -> &'a Type<'a> {
        self.intern(Type::Node)
    }

    /// Unlabeled tuple type.
    pub fn tuple(&self, field_types: &[&'a Type<'a>]) -> &'a Type<'a> {
        let fields = self.intern_fields(field_types.iter().map(|&ty| Field { ty, label: None }));
        self.intern(Type::Tuple(fields))
    }

    /// Tuple type with a label on every field.
    pub fn labeled_tuple(&self, fields: &[(&'a Type<'a>, &str)]) -> &'a Type<'a> {
        let fields: Vec<Field<'a>> = fields
            .iter()
            .map(|&(ty, label)| Field {
                ty,
                label: Some(self.intern_str(label)),
            })
            .collect();
        self.tuple_of_fields(&fields)
    }

    pub fn tuple_of_fields(&self, fields: &[Field<'a>]) -> &'a Type<'a> {
        let fields = self.intern_fields(fields.iter().copied());
        self.intern(Type::Tuple(fields))
    }

    pub fn list(&self, elem_ty: &'a Type<'a>) -> &'a Type<'a> {
        self.intern(Type::List(elem_ty))
    }

    /// Set type. A set of tuples is a relation, so a tuple element type
    /// yields `Relation`.
    pub fn set(&self, elem_ty: &'a Type<'a>) -> &'a Type<'a> {
        if elem_ty.is_tuple() {
            self.intern(Type::Relation(elem_ty))
        } else {
            self.intern(Type::Set(elem_ty))
        }
    }

    pub fn map(&self, key_ty: &'a Type<'a>, val_ty: &'a Type<'a>) -> &'a Type<'a> {
        self.intern(Type::Map(key_ty, val_ty))
    }

    /// Relation over unlabeled tuples with the given field types.
    pub fn relation(&self, field_types: &[&'a Type<'a>]) -> &'a Type<'a> {
        let tuple = self.tuple(field_types);
        self.intern(Type::Relation(tuple))
    }

    pub fn relation_from_tuple(&self, tuple_ty: &'a Type<'a>) -> Result<&'a Type<'a>, TypeError> {
        if !tuple_ty.is_tuple() {
            return Err(TypeError::NotATuple {
                found: tuple_ty.to_string(),
            });
        }
        Ok(self.intern(Type::Relation(tuple_ty)))
    }

    pub(crate) fn adt(&self, name: &str, params: &[&'a Type<'a>]) -> &'a Type<'a> {
        let name = self.intern_str(name);
        let params = self.arena.alloc_slice_copy(params);
        self.intern(Type::Adt { name, params })
    }

    // Declarations.

    /// Declares `name` as an alias of `definition` in `store`, or returns the
    /// existing alias when `name` is already declared with an equivalent
    /// definition.
    pub fn alias(
        &self,
        store: &mut TypeStore<'a>,
        name: &str,
        definition: &'a Type<'a>,
    ) -> Result<&'a Type<'a>, TypeError> {
        let alias = self.intern(Type::Alias {
            name: self.intern_str(name),
            aliased: definition,
        });
        let declared = store.declare_alias(alias)?;
        debug!(alias = name, definition = %definition, "declared alias");
        Ok(declared)
    }

    /// Declares an abstract data type with the given type parameters.
    pub fn abstract_data_type(
        &self,
        store: &mut TypeStore<'a>,
        name: &str,
        params: &[&'a Type<'a>],
    ) -> Result<&'a Type<'a>, TypeError> {
        let adt = self.adt(name, params);
        let declared = store.declare_adt(adt)?;
        debug!(adt = %declared, "declared data type");
        Ok(declared)
    }

    /// Declares a constructor of `adt`, which must already be declared in
    /// `store`. A constructor without fields is a constant. The same name may
    /// be declared again with a different field list.
    pub fn constructor(
        &self,
        store: &mut TypeStore<'a>,
        adt: &'a Type<'a>,
        name: &str,
        fields: &[(&'a Type<'a>, Option<&str>)],
    ) -> Result<&'a Type<'a>, TypeError> {
        if !matches!(adt, Type::Adt { .. }) {
            return Err(TypeError::WrongKind {
                expected: "data type",
                found: adt.to_string(),
            });
        }
        let fields = self.intern_fields(fields.iter().map(|&(ty, label)| Field {
            ty,
            label: label.map(|label| self.intern_str(label)),
        }));
        let constructor = self.intern(Type::Constructor {
            adt,
            name: self.intern_str(name),
            fields,
        });
        let declared = store.declare_constructor(constructor)?;
        debug!(constructor = %declared, "declared constructor");
        Ok(declared)
    }
}
