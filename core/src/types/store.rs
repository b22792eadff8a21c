//! Scoped declarations of aliases, data types and constructors.
//!
//! A store is an explicitly passed namespace: two stores never see each
//! other's declarations unless one is imported into the other, and an import
//! that disagrees with an existing declaration fails instead of coercing.

use crate::{errors::TypeError, types::Type};
use hashbrown::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TypeStore<'a> {
    aliases: HashMap<&'a str, &'a Type<'a>>,
    adts: HashMap<&'a str, &'a Type<'a>>,
    // Keyed by data type name, in declaration order.
    constructors: HashMap<&'a str, Vec<&'a Type<'a>>>,
}

impl<'a> TypeStore<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_alias(&self, name: &str) -> Option<&'a Type<'a>> {
        self.aliases.get(name).copied()
    }

    pub fn lookup_adt(&self, name: &str) -> Option<&'a Type<'a>> {
        self.adts.get(name).copied()
    }

    /// All constructors declared for `adt`, in declaration order.
    pub fn constructors_of(&self, adt: &'a Type<'a>) -> &[&'a Type<'a>] {
        adt.name()
            .and_then(|name| self.constructors.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Finds the first constructor of `adt` called `name` whose fields accept
    /// arguments of `arg_types`.
    pub fn lookup_constructor(
        &self,
        adt: &'a Type<'a>,
        name: &str,
        arg_types: &[&'a Type<'a>],
    ) -> Option<&'a Type<'a>> {
        self.constructors_of(adt).iter().copied().find(|cons| {
            let Type::Constructor {
                name: cons_name,
                fields,
                ..
            } = cons
            else {
                return false;
            };
            *cons_name == name
                && fields.len() == arg_types.len()
                && fields
                    .iter()
                    .zip(arg_types)
                    .all(|(field, arg)| arg.is_subtype_of(field.ty))
        })
    }

    pub fn aliases(&self) -> impl Iterator<Item = &'a Type<'a>> + '_ {
        self.aliases.values().copied()
    }

    pub fn adts(&self) -> impl Iterator<Item = &'a Type<'a>> + '_ {
        self.adts.values().copied()
    }

    /// Merges every declaration of `other` into this store. Nothing is merged
    /// if any declaration conflicts.
    pub fn import(&mut self, other: &TypeStore<'a>) -> Result<(), TypeError> {
        for alias in other.aliases() {
            self.check_alias(alias)?;
        }
        for adt in other.adts() {
            self.check_adt(adt)?;
        }
        for alias in other.aliases() {
            self.declare_alias(alias)?;
        }
        for adt in other.adts() {
            self.declare_adt(adt)?;
        }
        for constructors in other.constructors.values() {
            for &constructor in constructors {
                self.declare_constructor(constructor)?;
            }
        }
        debug!(
            aliases = other.aliases.len(),
            adts = other.adts.len(),
            "imported type store"
        );
        Ok(())
    }

    /// Returns the alias already declared under the same name, if it has the
    /// same definition as `alias`.
    fn check_alias(&self, alias: &'a Type<'a>) -> Result<Option<&'a Type<'a>>, TypeError> {
        let Type::Alias { name, aliased } = alias else {
            return Err(TypeError::WrongKind {
                expected: "alias",
                found: alias.to_string(),
            });
        };
        if let Some(adt) = self.adts.get(name) {
            return Err(TypeError::NameClash {
                name: name.to_string(),
                existing: adt.to_string(),
            });
        }
        match self.aliases.get(name) {
            None => Ok(None),
            Some(&existing) => {
                // Field labels are part of a definition, so compare interned
                // identity rather than subtyping equivalence.
                let existing_def = existing.unalias();
                if core::ptr::eq(existing_def, aliased.unalias()) {
                    Ok(Some(existing))
                } else {
                    Err(TypeError::AliasRedeclared {
                        name: name.to_string(),
                        existing: existing_def.to_string(),
                        requested: aliased.to_string(),
                    })
                }
            }
        }
    }

    fn check_adt(&self, adt: &'a Type<'a>) -> Result<Option<&'a Type<'a>>, TypeError> {
        let Type::Adt { name, .. } = adt else {
            return Err(TypeError::WrongKind {
                expected: "data type",
                found: adt.to_string(),
            });
        };
        if let Some(alias) = self.aliases.get(name) {
            return Err(TypeError::NameClash {
                name: name.to_string(),
                existing: alias.unalias().to_string(),
            });
        }
        match self.adts.get(name) {
            None => Ok(None),
            Some(&existing) if existing == adt => Ok(Some(existing)),
            Some(&existing) => Err(TypeError::AdtRedeclared {
                name: name.to_string(),
                existing: existing.to_string(),
                requested: adt.to_string(),
            }),
        }
    }

    pub(crate) fn declare_alias(&mut self, alias: &'a Type<'a>) -> Result<&'a Type<'a>, TypeError> {
        if let Some(existing) = self.check_alias(alias)? {
            return Ok(existing);
        }
        if let Type::Alias { name, .. } = alias {
            self.aliases.insert(*name, alias);
        }
        Ok(alias)
    }

    pub(crate) fn declare_adt(&mut self, adt: &'a Type<'a>) -> Result<&'a Type<'a>, TypeError> {
        if let Some(existing) = self.check_adt(adt)? {
            return Ok(existing);
        }
        if let Type::Adt { name, .. } = adt {
            self.adts.insert(*name, adt);
        }
        Ok(adt)
    }

    pub(crate) fn declare_constructor(
        &mut self,
        constructor: &'a Type<'a>,
    ) -> Result<&'a Type<'a>, TypeError> {
        let Type::Constructor { adt, .. } = constructor else {
            return Err(TypeError::WrongKind {
                expected: "constructor",
                found: constructor.to_string(),
            });
        };
        let Type::Adt { name: adt_name, .. } = adt else {
            return Err(TypeError::WrongKind {
                expected: "data type",
                found: adt.to_string(),
            });
        };
        match self.adts.get(adt_name) {
            Some(&declared) if declared == *adt => {}
            _ => {
                return Err(TypeError::UndeclaredAdt {
                    name: adt.to_string(),
                });
            }
        }
        let constructors = self.constructors.entry(*adt_name).or_default();
        if let Some(&existing) = constructors.iter().find(|&&c| c == constructor) {
            return Ok(existing);
        }
        constructors.push(constructor);
        Ok(constructor)
    }
}
