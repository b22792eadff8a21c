//! Incremental builders for collection values.
//!
//! A writer is open until [`Writer::done`] hands its buffer over to the
//! immutable value it produces. After that every call fails with a
//! [`WriterStateError`] and the produced value is unaffected.

use crate::{
    errors::{BuildError, TypeError, WriterStateError},
    types::{Type, manager::TypeManager},
    values::{List, Map, Set, Tuple, Value, table::OrderedTable},
};
use std::sync::Arc;

pub trait Writer<'a> {
    type Item;
    type Output;

    /// Kind name reported by [`WriterStateError`].
    const KIND: &'static str;

    fn is_open(&self) -> bool;

    fn insert(&mut self, item: Self::Item) -> Result<(), BuildError>;

    /// Inserts items in order, stopping at the first failure.
    fn insert_all<I>(&mut self, items: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = Self::Item>,
    {
        if !self.is_open() {
            return Err(spent::<Self>().into());
        }
        for item in items {
            self.insert(item)?;
        }
        Ok(())
    }

    /// Produces the value. The writer is spent afterwards.
    fn done(&mut self) -> Result<Self::Output, BuildError>;
}

fn spent<'a, W: Writer<'a> + ?Sized>() -> WriterStateError {
    WriterStateError { kind: W::KIND }
}

/// How a writer settles its element type.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ElementType<'a> {
    /// Every element must be a subtype; the declared type is kept even when
    /// the collection is empty.
    Declared(&'a Type<'a>),
    /// Least upper bound of everything inserted so far.
    Inferred(&'a Type<'a>),
}

impl<'a> ElementType<'a> {
    pub(crate) fn inferred(types: &TypeManager<'a>) -> Self {
        ElementType::Inferred(types.void())
    }

    pub(crate) fn ty(&self) -> &'a Type<'a> {
        match *self {
            ElementType::Declared(ty) | ElementType::Inferred(ty) => ty,
        }
    }

    fn accept(&mut self, ty: &'a Type<'a>, types: &TypeManager<'a>) -> Result<(), TypeError> {
        match self {
            ElementType::Declared(declared) => {
                let declared = *declared;
                if ty.is_subtype_of(declared) {
                    Ok(())
                } else {
                    Err(TypeError::Mismatch {
                        expected: declared.to_string(),
                        found: ty.to_string(),
                    })
                }
            }
            ElementType::Inferred(current) => {
                *current = current.lub(ty, types);
                Ok(())
            }
        }
    }

    /// Widens an inferred type. Declared types are left alone.
    fn widen(&mut self, ty: &'a Type<'a>, types: &TypeManager<'a>) {
        if let ElementType::Inferred(current) = self {
            *current = current.lub(ty, types);
        }
    }
}

// Buffers are shared by writers and the eager constructors of the factory.

pub(crate) struct TupleBuffer<'a> {
    types: &'a TypeManager<'a>,
    elems: Vec<Value<'a>>,
}

impl<'a> TupleBuffer<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>) -> Self {
        Self {
            types,
            elems: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, value: Value<'a>) {
        self.elems.push(value);
    }

    pub(crate) fn finish(self) -> Tuple<'a> {
        let field_types: Vec<&'a Type<'a>> = self.elems.iter().map(Value::ty).collect();
        Tuple {
            ty: self.types.tuple(&field_types),
            elems: Arc::new(self.elems),
        }
    }
}

pub(crate) struct ListBuffer<'a> {
    types: &'a TypeManager<'a>,
    elem: ElementType<'a>,
    elems: Vec<Value<'a>>,
}

impl<'a> ListBuffer<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>, elem: ElementType<'a>) -> Self {
        Self {
            types,
            elem,
            elems: Vec::new(),
        }
    }

    fn push(&mut self, value: Value<'a>) -> Result<(), TypeError> {
        self.elem.accept(value.ty(), self.types)?;
        self.elems.push(value);
        Ok(())
    }

    pub(crate) fn push_inferred(&mut self, value: Value<'a>) {
        self.elem.widen(value.ty(), self.types);
        self.elems.push(value);
    }

    pub(crate) fn finish(self) -> List<'a> {
        List {
            ty: self.types.list(self.elem.ty()),
            elems: Arc::new(self.elems),
        }
    }
}

pub(crate) struct SetBuffer<'a> {
    types: &'a TypeManager<'a>,
    elem: ElementType<'a>,
    elems: OrderedTable<Value<'a>, ()>,
}

impl<'a> SetBuffer<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>, elem: ElementType<'a>) -> Self {
        Self {
            types,
            elem,
            elems: OrderedTable::new(),
        }
    }

    fn push(&mut self, value: Value<'a>) -> Result<(), TypeError> {
        self.elem.accept(value.ty(), self.types)?;
        self.elems.insert(value, ());
        Ok(())
    }

    pub(crate) fn push_inferred(&mut self, value: Value<'a>) {
        self.elem.widen(value.ty(), self.types);
        self.elems.insert(value, ());
    }

    /// A set of tuples comes out as a relation.
    pub(crate) fn finish(self) -> Set<'a> {
        let ty = self.types.set(self.elem.ty());
        self.finish_as(ty)
    }

    fn finish_as(self, ty: &'a Type<'a>) -> Set<'a> {
        Set {
            ty,
            elems: Arc::new(self.elems),
        }
    }

    /// Like `finish`, but the element type must be a tuple. An empty
    /// relation with nothing declared ranges over empty tuples.
    fn finish_relation(self) -> Result<Set<'a>, TypeError> {
        let elem = self.elem.ty();
        let ty = if matches!(elem.unalias(), Type::Void) {
            self.types.relation(&[])
        } else {
            self.types.relation_from_tuple(elem)?
        };
        Ok(self.finish_as(ty))
    }
}

pub(crate) struct MapBuffer<'a> {
    types: &'a TypeManager<'a>,
    key: ElementType<'a>,
    val: ElementType<'a>,
    entries: OrderedTable<Value<'a>, Value<'a>>,
}

impl<'a> MapBuffer<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>, key: ElementType<'a>, val: ElementType<'a>) -> Self {
        Self {
            types,
            key,
            val,
            entries: OrderedTable::new(),
        }
    }

    /// A repeated key keeps its position and takes the new value.
    fn push(&mut self, key: Value<'a>, val: Value<'a>) -> Result<(), TypeError> {
        let (mut key_ty, mut val_ty) = (self.key, self.val);
        key_ty.accept(key.ty(), self.types)?;
        val_ty.accept(val.ty(), self.types)?;
        (self.key, self.val) = (key_ty, val_ty);
        self.entries.insert(key, val);
        Ok(())
    }

    pub(crate) fn push_inferred(&mut self, key: Value<'a>, val: Value<'a>) {
        self.key.widen(key.ty(), self.types);
        self.val.widen(val.ty(), self.types);
        self.entries.insert(key, val);
    }

    pub(crate) fn finish(self) -> Map<'a> {
        Map {
            ty: self.types.map(self.key.ty(), self.val.ty()),
            entries: Arc::new(self.entries),
        }
    }
}

/// Builds a tuple field by field. Field types are the precise types of the
/// inserted values.
pub struct TupleWriter<'a> {
    buffer: Option<TupleBuffer<'a>>,
}

impl<'a> TupleWriter<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>) -> Self {
        Self {
            buffer: Some(TupleBuffer::new(types)),
        }
    }

    pub(crate) fn seeded(types: &'a TypeManager<'a>, elems: Vec<Value<'a>>) -> Self {
        Self {
            buffer: Some(TupleBuffer { types, elems }),
        }
    }
}

impl<'a> Writer<'a> for TupleWriter<'a> {
    type Item = Value<'a>;
    type Output = Tuple<'a>;
    const KIND: &'static str = "tuple";

    fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    fn insert(&mut self, item: Value<'a>) -> Result<(), BuildError> {
        self.buffer.as_mut().ok_or(spent::<Self>())?.push(item);
        Ok(())
    }

    fn done(&mut self) -> Result<Tuple<'a>, BuildError> {
        Ok(self.buffer.take().ok_or(spent::<Self>())?.finish())
    }
}

pub struct ListWriter<'a> {
    buffer: Option<ListBuffer<'a>>,
}

impl<'a> ListWriter<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>, elem: ElementType<'a>) -> Self {
        Self {
            buffer: Some(ListBuffer::new(types, elem)),
        }
    }

    pub(crate) fn seeded(
        types: &'a TypeManager<'a>,
        elem: ElementType<'a>,
        elems: Vec<Value<'a>>,
    ) -> Self {
        Self {
            buffer: Some(ListBuffer { types, elem, elems }),
        }
    }
}

impl<'a> Writer<'a> for ListWriter<'a> {
    type Item = Value<'a>;
    type Output = List<'a>;
    const KIND: &'static str = "list";

    fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    fn insert(&mut self, item: Value<'a>) -> Result<(), BuildError> {
        self.buffer.as_mut().ok_or(spent::<Self>())?.push(item)?;
        Ok(())
    }

    fn done(&mut self) -> Result<List<'a>, BuildError> {
        Ok(self.buffer.take().ok_or(spent::<Self>())?.finish())
    }
}

/// Builds a set, or a relation when created for one. A relation writer
/// rejects non-tuple elements on insert.
pub struct SetWriter<'a> {
    buffer: Option<SetBuffer<'a>>,
    relation: bool,
}

impl<'a> SetWriter<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>, elem: ElementType<'a>, relation: bool) -> Self {
        Self {
            buffer: Some(SetBuffer::new(types, elem)),
            relation,
        }
    }

    pub(crate) fn seeded(
        types: &'a TypeManager<'a>,
        elem: ElementType<'a>,
        relation: bool,
        elems: OrderedTable<Value<'a>, ()>,
    ) -> Self {
        Self {
            buffer: Some(SetBuffer { types, elem, elems }),
            relation,
        }
    }
}

impl<'a> Writer<'a> for SetWriter<'a> {
    type Item = Value<'a>;
    type Output = Set<'a>;
    const KIND: &'static str = "set";

    fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    fn insert(&mut self, item: Value<'a>) -> Result<(), BuildError> {
        let buffer = self.buffer.as_mut().ok_or(spent::<Self>())?;
        if self.relation && !item.ty().is_tuple() {
            return Err(TypeError::NotATuple {
                found: item.ty().to_string(),
            }
            .into());
        }
        buffer.push(item)?;
        Ok(())
    }

    fn done(&mut self) -> Result<Set<'a>, BuildError> {
        let buffer = self.buffer.take().ok_or(spent::<Self>())?;
        if self.relation {
            Ok(buffer.finish_relation()?)
        } else {
            Ok(buffer.finish())
        }
    }
}

pub struct MapWriter<'a> {
    buffer: Option<MapBuffer<'a>>,
}

impl<'a> MapWriter<'a> {
    pub(crate) fn new(types: &'a TypeManager<'a>, key: ElementType<'a>, val: ElementType<'a>) -> Self {
        Self {
            buffer: Some(MapBuffer::new(types, key, val)),
        }
    }

    pub(crate) fn seeded(
        types: &'a TypeManager<'a>,
        key: ElementType<'a>,
        val: ElementType<'a>,
        entries: OrderedTable<Value<'a>, Value<'a>>,
    ) -> Self {
        Self {
            buffer: Some(MapBuffer {
                types,
                key,
                val,
                entries,
            }),
        }
    }

    /// Convenience for inserting one entry without building a pair.
    pub fn put(&mut self, key: impl Into<Value<'a>>, val: impl Into<Value<'a>>) -> Result<(), BuildError> {
        self.insert((key.into(), val.into()))
    }
}

impl<'a> Writer<'a> for MapWriter<'a> {
    type Item = (Value<'a>, Value<'a>);
    type Output = Map<'a>;
    const KIND: &'static str = "map";

    fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    fn insert(&mut self, (key, val): (Value<'a>, Value<'a>)) -> Result<(), BuildError> {
        self.buffer.as_mut().ok_or(spent::<Self>())?.push(key, val)?;
        Ok(())
    }

    fn done(&mut self) -> Result<Map<'a>, BuildError> {
        Ok(self.buffer.take().ok_or(spent::<Self>())?.finish())
    }
}
