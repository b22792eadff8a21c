use crate::{
    types::{Type, manager::TypeManager},
    values::{
        Value, ValueFactory,
        table::OrderedTable,
        writer::{ElementType, ListWriter, MapWriter, SetWriter, TupleWriter},
    },
};
use std::sync::Arc;

/// Looks up the child whose field carries `label`.
pub(crate) fn child_by_label<'v, 'a>(
    ty: &'a Type<'a>,
    children: &'v [Value<'a>],
    label: &str,
) -> Option<&'v Value<'a>> {
    let position = ty
        .fields()?
        .iter()
        .position(|field| field.label == Some(label))?;
    children.get(position)
}

/// Fixed-arity, ordered, heterogeneous product.
#[derive(Clone)]
pub struct Tuple<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) elems: Arc<Vec<Value<'a>>>,
}

impl<'a> Tuple<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    pub fn arity(&self) -> usize {
        self.elems.len()
    }

    pub fn get(&self, index: usize) -> Option<&Value<'a>> {
        self.elems.get(index)
    }

    /// Field lookup through the labels of the tuple's type.
    pub fn get_by_label(&self, label: &str) -> Option<&Value<'a>> {
        child_by_label(self.ty, &self.elems, label)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value<'a>> {
        self.elems.iter()
    }

    /// An open writer holding this tuple's fields.
    pub fn to_writer(&self, vf: &ValueFactory<'a>) -> TupleWriter<'a> {
        TupleWriter::seeded(vf.types(), self.elems.to_vec())
    }
}

/// Ordered sequence with a single element type.
#[derive(Clone)]
pub struct List<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) elems: Arc<Vec<Value<'a>>>,
}

impl<'a> List<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    pub fn element_type(&self) -> &'a Type<'a> {
        match self.ty.unalias() {
            Type::List(elem) => *elem,
            _ => unreachable!("list value typed as {}", self.ty),
        }
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value<'a>> {
        self.elems.get(index)
    }

    pub fn contains(&self, value: &Value<'a>) -> bool {
        self.elems.contains(value)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value<'a>> {
        self.elems.iter()
    }

    pub fn to_writer(&self, vf: &ValueFactory<'a>) -> ListWriter<'a> {
        ListWriter::seeded(
            vf.types(),
            ElementType::Inferred(self.element_type()),
            self.elems.to_vec(),
        )
    }
}

/// Unordered collection without duplicates. A set whose element type is a
/// tuple is a relation.
#[derive(Clone)]
pub struct Set<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) elems: Arc<OrderedTable<Value<'a>, ()>>,
}

impl<'a> Set<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    /// The element type; the tuple type for a relation.
    pub fn element_type(&self) -> &'a Type<'a> {
        match self.ty.unalias() {
            Type::Set(elem) | Type::Relation(elem) => *elem,
            _ => unreachable!("set value typed as {}", self.ty),
        }
    }

    pub fn is_relation(&self) -> bool {
        self.ty.is_relation()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn contains(&self, value: &Value<'a>) -> bool {
        self.elems.contains_key(value)
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Value<'a>> + '_ {
        self.elems.iter().map(|(elem, ())| elem)
    }

    pub fn to_writer(&self, vf: &ValueFactory<'a>) -> SetWriter<'a> {
        SetWriter::seeded(
            vf.types(),
            ElementType::Inferred(self.element_type()),
            self.is_relation(),
            (*self.elems).clone(),
        )
    }
}

/// Finite mapping from keys to values.
#[derive(Clone)]
pub struct Map<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) entries: Arc<OrderedTable<Value<'a>, Value<'a>>>,
}

impl<'a> Map<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    pub fn key_type(&self) -> &'a Type<'a> {
        match self.ty.unalias() {
            Type::Map(key, _) => *key,
            _ => unreachable!("map value typed as {}", self.ty),
        }
    }

    pub fn value_type(&self) -> &'a Type<'a> {
        match self.ty.unalias() {
            Type::Map(_, val) => *val,
            _ => unreachable!("map value typed as {}", self.ty),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value<'a>) -> Option<&Value<'a>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &Value<'a>) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value<'a>, &Value<'a>)> + '_ {
        self.entries.iter().map(|(key, val)| (key, val))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value<'a>> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value<'a>> + '_ {
        self.entries.iter().map(|(_, val)| val)
    }

    /// Returns a new map with `key` bound to `value`. The receiver is left
    /// untouched. The key and value types only widen when the new entry does
    /// not fit them.
    pub fn put(&self, types: &TypeManager<'a>, key: Value<'a>, value: Value<'a>) -> Map<'a> {
        let widen = |current: &'a Type<'a>, ty: &'a Type<'a>| {
            if ty.is_subtype_of(current) {
                current
            } else {
                current.lub(ty, types)
            }
        };
        let (key_ty, val_ty) = (self.key_type(), self.value_type());
        let new_key_ty = widen(key_ty, key.ty());
        let new_val_ty = widen(val_ty, value.ty());
        let ty = if core::ptr::eq(new_key_ty, key_ty) && core::ptr::eq(new_val_ty, val_ty) {
            self.ty
        } else {
            types.map(new_key_ty, new_val_ty)
        };

        let mut entries = (*self.entries).clone();
        entries.insert(key, value);
        Map {
            ty,
            entries: Arc::new(entries),
        }
    }

    pub fn to_writer(&self, vf: &ValueFactory<'a>) -> MapWriter<'a> {
        MapWriter::seeded(
            vf.types(),
            ElementType::Inferred(self.key_type()),
            ElementType::Inferred(self.value_type()),
            (*self.entries).clone(),
        )
    }
}
