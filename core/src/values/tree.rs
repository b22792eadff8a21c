use crate::{
    types::Type,
    values::{Value, collections::child_by_label},
};
use std::sync::Arc;

/// Untyped labeled term: a name and ordered children.
#[derive(Clone)]
pub struct Node<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) name: Arc<str>,
    pub(crate) children: Arc<Vec<Value<'a>>>,
}

impl<'a> Node<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn get(&self, index: usize) -> Option<&Value<'a>> {
        self.children.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value<'a>> {
        self.children.iter()
    }
}

/// Application of a declared constructor. Its type is the constructor type,
/// a subtype of the owning data type.
#[derive(Clone)]
pub struct Constructor<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) children: Arc<Vec<Value<'a>>>,
}

impl<'a> Constructor<'a> {
    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    pub fn name(&self) -> &'a str {
        match self.ty.unalias() {
            Type::Constructor { name, .. } => *name,
            _ => unreachable!("constructor value typed as {}", self.ty),
        }
    }

    /// The data type this constructor belongs to.
    pub fn adt(&self) -> &'a Type<'a> {
        match self.ty.unalias() {
            Type::Constructor { adt, .. } => *adt,
            _ => unreachable!("constructor value typed as {}", self.ty),
        }
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn get(&self, index: usize) -> Option<&Value<'a>> {
        self.children.get(index)
    }

    pub fn get_by_label(&self, label: &str) -> Option<&Value<'a>> {
        child_by_label(self.ty, &self.children, label)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Value<'a>> {
        self.children.iter()
    }
}
