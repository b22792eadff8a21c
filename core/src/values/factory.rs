use crate::{
    errors::TypeError,
    types::{Type, manager::TypeManager, store::TypeStore},
    values::{
        Bool, Constructor, Double, Integer, List, Map, Node, Set, SourceLocation, SourceRange,
        Str, Tuple, Value,
        writer::{
            ElementType, ListBuffer, ListWriter, MapBuffer, MapWriter, SetBuffer, SetWriter,
            TupleBuffer, TupleWriter, Writer,
        },
    },
};
use std::sync::Arc;
use tracing::trace;

/// Constructs values. Every value it builds is typed with types interned by
/// its [`TypeManager`].
///
/// The sequence constructors (`tuple`, `list`, `set`, `relation`, `map`)
/// accept any number of elements and share their buffers with the
/// corresponding writers, so building eagerly or through a writer yields the
/// same value.
#[derive(Clone, Copy)]
pub struct ValueFactory<'a> {
    types: &'a TypeManager<'a>,
}

impl<'a> ValueFactory<'a> {
    pub fn new(types: &'a TypeManager<'a>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &'a TypeManager<'a> {
        self.types
    }

    // Scalars.

    pub fn integer(&self, value: i64) -> Integer<'a> {
        Integer {
            ty: self.types.integer(),
            value,
        }
    }

    pub fn double(&self, value: f64) -> Double<'a> {
        Double {
            ty: self.types.double(),
            value,
        }
    }

    pub fn bool(&self, value: bool) -> Bool<'a> {
        Bool {
            ty: self.types.bool(),
            value,
        }
    }

    pub fn string(&self, value: &str) -> Str<'a> {
        Str {
            ty: self.types.string(),
            value: Arc::from(value),
        }
    }

    pub fn source_range(
        &self,
        start_offset: usize,
        length: usize,
        start_line: usize,
        end_line: usize,
        start_column: usize,
        end_column: usize,
    ) -> SourceRange {
        SourceRange {
            start_offset,
            length,
            start_line,
            end_line,
            start_column,
            end_column,
        }
    }

    pub fn source_location(&self, path: &str, range: SourceRange) -> SourceLocation<'a> {
        SourceLocation {
            ty: self.types.source_location(),
            path: Arc::from(path),
            range,
        }
    }

    // Sequences.

    pub fn tuple<I>(&self, values: I) -> Tuple<'a>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        let mut buffer = TupleBuffer::new(self.types);
        for value in values {
            buffer.push(value.into());
        }
        buffer.finish()
    }

    /// A list whose element type is the least upper bound of its elements,
    /// `void` when empty.
    pub fn list<I>(&self, values: I) -> List<'a>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        let mut buffer = ListBuffer::new(self.types, ElementType::inferred(self.types));
        for value in values {
            buffer.push_inferred(value.into());
        }
        buffer.finish()
    }

    /// A set of the given values with duplicates collapsed. Tuples make a
    /// relation.
    pub fn set<I>(&self, values: I) -> Set<'a>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        let mut buffer = SetBuffer::new(self.types, ElementType::inferred(self.types));
        for value in values {
            buffer.push_inferred(value.into());
        }
        buffer.finish()
    }

    /// A relation over the given tuples. Fails if an element is not a tuple
    /// or the tuples have different arities.
    pub fn relation<I>(&self, tuples: I) -> Result<Set<'a>, TypeError>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        let mut writer = self.relation_writer_inferred();
        for tuple in tuples {
            writer.insert(tuple.into()).map_err(only_type_errors)?;
        }
        writer.done().map_err(only_type_errors)
    }

    pub fn map<I, K, V>(&self, entries: I) -> Map<'a>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value<'a>>,
        V: Into<Value<'a>>,
    {
        let mut buffer = MapBuffer::new(
            self.types,
            ElementType::inferred(self.types),
            ElementType::inferred(self.types),
        );
        for (key, val) in entries {
            buffer.push_inferred(key.into(), val.into());
        }
        buffer.finish()
    }

    // Typed empty collections.

    pub fn empty_list(&self, elem: &'a Type<'a>) -> List<'a> {
        ListBuffer::new(self.types, ElementType::Declared(elem)).finish()
    }

    pub fn empty_set(&self, elem: &'a Type<'a>) -> Set<'a> {
        SetBuffer::new(self.types, ElementType::Declared(elem)).finish()
    }

    pub fn empty_map(&self, key: &'a Type<'a>, val: &'a Type<'a>) -> Map<'a> {
        MapBuffer::new(
            self.types,
            ElementType::Declared(key),
            ElementType::Declared(val),
        )
        .finish()
    }

    pub fn empty_relation(&self, tuple_ty: &'a Type<'a>) -> Result<Set<'a>, TypeError> {
        self.types.relation_from_tuple(tuple_ty)?;
        Ok(self.empty_set(tuple_ty))
    }

    // Writers.

    pub fn tuple_writer(&self) -> TupleWriter<'a> {
        TupleWriter::new(self.types)
    }

    /// A list writer inferring its element type.
    pub fn list_writer(&self) -> ListWriter<'a> {
        ListWriter::new(self.types, ElementType::inferred(self.types))
    }

    /// A list writer accepting only subtypes of `elem`.
    pub fn list_writer_of(&self, elem: &'a Type<'a>) -> ListWriter<'a> {
        ListWriter::new(self.types, ElementType::Declared(elem))
    }

    pub fn set_writer(&self) -> SetWriter<'a> {
        SetWriter::new(self.types, ElementType::inferred(self.types), false)
    }

    pub fn set_writer_of(&self, elem: &'a Type<'a>) -> SetWriter<'a> {
        SetWriter::new(self.types, ElementType::Declared(elem), false)
    }

    /// A writer for a relation over `tuple_ty`.
    pub fn relation_writer(&self, tuple_ty: &'a Type<'a>) -> Result<SetWriter<'a>, TypeError> {
        self.types.relation_from_tuple(tuple_ty)?;
        Ok(SetWriter::new(
            self.types,
            ElementType::Declared(tuple_ty),
            true,
        ))
    }

    fn relation_writer_inferred(&self) -> SetWriter<'a> {
        SetWriter::new(self.types, ElementType::inferred(self.types), true)
    }

    pub fn map_writer(&self) -> MapWriter<'a> {
        MapWriter::new(
            self.types,
            ElementType::inferred(self.types),
            ElementType::inferred(self.types),
        )
    }

    pub fn map_writer_of(&self, key: &'a Type<'a>, val: &'a Type<'a>) -> MapWriter<'a> {
        MapWriter::new(
            self.types,
            ElementType::Declared(key),
            ElementType::Declared(val),
        )
    }

    // Trees.

    pub fn node<I>(&self, name: &str, children: I) -> Node<'a>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        Node {
            ty: self.types.node(),
            name: Arc::from(name),
            children: Arc::new(children.into_iter().map(Into::into).collect()),
        }
    }

    /// Applies a constructor type to children, each a subtype of its field.
    pub fn constructor<I>(&self, cons_ty: &'a Type<'a>, children: I) -> Result<Constructor<'a>, TypeError>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        let Type::Constructor { fields, .. } = cons_ty.unalias() else {
            return Err(TypeError::WrongKind {
                expected: "constructor",
                found: cons_ty.to_string(),
            });
        };
        let children: Vec<Value<'a>> = children.into_iter().map(Into::into).collect();
        check_fields(cons_ty, fields.iter().map(|field| field.ty), &children)?;
        Ok(Constructor {
            ty: cons_ty,
            children: Arc::new(children),
        })
    }

    /// Resolves the constructor of `adt` called `name` that accepts the
    /// children's types in `store`, then applies it.
    pub fn construct<I>(
        &self,
        store: &TypeStore<'a>,
        adt: &'a Type<'a>,
        name: &str,
        children: I,
    ) -> Result<Constructor<'a>, TypeError>
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        let children: Vec<Value<'a>> = children.into_iter().map(Into::into).collect();
        let arg_types: Vec<&'a Type<'a>> = children.iter().map(Value::ty).collect();
        let Some(cons_ty) = store.lookup_constructor(adt, name, &arg_types) else {
            let args: Vec<String> = arg_types.iter().map(|ty| ty.to_string()).collect();
            return Err(TypeError::UndeclaredConstructor {
                adt: adt.to_string(),
                name: name.to_string(),
                args: args.join(", "),
            });
        };
        Ok(Constructor {
            ty: cons_ty,
            children: Arc::new(children),
        })
    }

    /// Builds a value of exactly `ty` from `children`.
    ///
    /// The shape of `children` depends on the kind of `ty` once aliases are
    /// stripped: one child for a scalar, the elements of a list or set,
    /// alternating keys and values for a map, and the fields of a tuple or
    /// constructor. The result keeps `ty` itself, alias included.
    pub fn make(&self, ty: &'a Type<'a>, children: &[Value<'a>]) -> Result<Value<'a>, TypeError> {
        trace!(ty = %ty, children = children.len(), "make");
        let value: Value<'a> = match ty.unalias() {
            Type::Integer | Type::Double | Type::Bool | Type::Str | Type::SourceLocation => {
                let [child] = children else {
                    return Err(arity(ty, 1, children.len()));
                };
                if !child.ty().is_subtype_of(ty) {
                    return Err(TypeError::Mismatch {
                        expected: ty.to_string(),
                        found: child.ty().to_string(),
                    });
                }
                child.clone()
            }
            Type::List(elem) => {
                let mut writer = self.list_writer_of(elem);
                for child in children {
                    writer.insert(child.clone()).map_err(only_type_errors)?;
                }
                writer.done().map_err(only_type_errors)?.into()
            }
            Type::Set(elem) => {
                let mut writer = self.set_writer_of(elem);
                for child in children {
                    writer.insert(child.clone()).map_err(only_type_errors)?;
                }
                writer.done().map_err(only_type_errors)?.into()
            }
            Type::Relation(tuple_ty) => {
                let mut writer = self.relation_writer(tuple_ty)?;
                for child in children {
                    writer.insert(child.clone()).map_err(only_type_errors)?;
                }
                writer.done().map_err(only_type_errors)?.into()
            }
            Type::Map(key, val) => {
                if children.len() % 2 != 0 {
                    return Err(arity(ty, children.len() + 1, children.len()));
                }
                let mut writer = self.map_writer_of(key, val);
                for pair in children.chunks_exact(2) {
                    writer
                        .insert((pair[0].clone(), pair[1].clone()))
                        .map_err(only_type_errors)?;
                }
                writer.done().map_err(only_type_errors)?.into()
            }
            Type::Tuple(fields) => {
                check_fields(ty, fields.iter().map(|field| field.ty), children)?;
                Tuple {
                    ty,
                    elems: Arc::new(children.to_vec()),
                }
                .into()
            }
            Type::Constructor { .. } => self.constructor(ty, children.iter().cloned())?.into(),
            Type::Value | Type::Void | Type::Node | Type::Adt { .. } => {
                return Err(TypeError::NotConstructible { ty: ty.to_string() });
            }
            Type::Alias { .. } => unreachable!("unalias never returns an alias"),
        };
        Ok(value.with_type(ty))
    }
}

fn arity(ty: &Type<'_>, expected: usize, found: usize) -> TypeError {
    TypeError::Arity {
        ty: ty.to_string(),
        expected,
        found,
    }
}

/// Checks arity and that each child is a subtype of its field type.
fn check_fields<'a>(
    ty: &'a Type<'a>,
    field_types: impl ExactSizeIterator<Item = &'a Type<'a>>,
    children: &[Value<'a>],
) -> Result<(), TypeError> {
    if field_types.len() != children.len() {
        return Err(arity(ty, field_types.len(), children.len()));
    }
    for (field_ty, child) in field_types.zip(children) {
        if !child.ty().is_subtype_of(field_ty) {
            return Err(TypeError::Mismatch {
                expected: field_ty.to_string(),
                found: child.ty().to_string(),
            });
        }
    }
    Ok(())
}

/// Writers created and finished in one call are never spent, so only their
/// type errors can surface.
fn only_type_errors(err: crate::errors::BuildError) -> TypeError {
    match err {
        crate::errors::BuildError::Type(err) => err,
        crate::errors::BuildError::State(err) => {
            unreachable!("fresh writer reported {err}")
        }
    }
}

impl<'a> Type<'a> {
    /// Shorthand for [`ValueFactory::make`].
    pub fn make(&'a self, vf: &ValueFactory<'a>, children: &[Value<'a>]) -> Result<Value<'a>, TypeError> {
        vf.make(self, children)
    }
}
