//! pdb - typed, immutable values with a canonical text form
//!
//! # Overview
//!
//! pdb models structured program data: scalars, source locations, tuples,
//! lists, sets, relations, maps, untyped trees and trees typed by abstract
//! data types. Every value carries a static type drawn from a structural
//! type lattice, and values are compared by content.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use pdb::{StandardTextReader, TypeManager, TypeStore, Value, ValueFactory};
//!
//! // Types live in an arena for as long as the values that use them.
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let vf = ValueFactory::new(types);
//!
//! // Declare a data type with two constructors.
//! let mut store = TypeStore::new();
//! let shape = types.abstract_data_type(&mut store, "Shape", &[]).unwrap();
//! let circle = types
//!     .constructor(&mut store, shape, "circle", &[(types.double(), Some("radius"))])
//!     .unwrap();
//!
//! let value = Value::from(vf.constructor(circle, [vf.double(1.5)]).unwrap());
//! assert_eq!(value.to_string(), "Shape::circle(1.5)");
//!
//! // The text form reads back into an equal value.
//! let read = StandardTextReader::with_store(&store)
//!     .read_str(&vf, "Shape::circle(1.5)")
//!     .unwrap();
//! assert_eq!(read, value);
//! assert!(read.ty().is_subtype_of(shape));
//! ```
//!
//! # Building values
//!
//! The [`ValueFactory`] constructs values eagerly from their elements and
//! infers the most precise collection types. Writers build collections
//! incrementally, either inferring the element type or enforcing a declared
//! one:
//!
//! ```
//! use bumpalo::Bump;
//! use pdb::{TypeManager, ValueFactory, Writer};
//!
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let vf = ValueFactory::new(types);
//!
//! let mut writer = vf.set_writer_of(types.integer());
//! writer.insert(vf.integer(1).into()).unwrap();
//! assert!(writer.insert(vf.string("x").into()).is_err());
//! let set = writer.done().unwrap();
//! assert_eq!(set.to_string(), "{1}");
//! ```

pub use bumpalo;
pub use pdb_core::*;
