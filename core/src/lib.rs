//! Typed, immutable value algebra.
//!
//! Types are interned in an arena by a [`TypeManager`] and classified with
//! structural subtyping; user declarations (aliases, abstract data types and
//! their constructors) live in an explicitly passed [`TypeStore`]. Values are
//! built through a [`ValueFactory`] or incrementally through writers, and can
//! be rendered to and parsed from a canonical text form with the codec in
//! [`io`].
//!
//! ```
//! use bumpalo::Bump;
//! use pdb_core::{TypeManager, ValueFactory};
//!
//! let arena = Bump::new();
//! let types = TypeManager::new(&arena);
//! let vf = ValueFactory::new(types);
//!
//! let list = vf.list([vf.integer(1), vf.integer(2)]);
//! assert_eq!(list.to_string(), "[1,2]");
//! assert!(core::ptr::eq(list.element_type(), types.integer()));
//! ```

pub mod errors;
pub mod io;
pub mod syntax;
pub mod types;
pub mod values;

pub use errors::{BuildError, CodecError, TypeError, WriterStateError};
pub use io::{ReaderOptions, StandardTextReader, StandardTextWriter};
pub use types::{Field, Type, manager::TypeManager, store::TypeStore};
pub use values::{
    Bool, Constructor, Double, Integer, List, ListWriter, Map, MapWriter, Node, Set, SetWriter,
    SourceLocation, SourceRange, Str, Tuple, TupleWriter, Value, ValueFactory, Writer,
};
