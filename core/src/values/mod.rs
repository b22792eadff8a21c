mod collections;
mod display;
mod factory;
mod scalar;
mod table;
mod tree;
mod value;
mod writer;

pub use collections::{List, Map, Set, Tuple};
pub use factory::ValueFactory;
pub use scalar::{Bool, Double, Integer, SourceLocation, SourceRange, Str};
pub use tree::{Constructor, Node};
pub use value::Value;
pub use writer::{ListWriter, MapWriter, SetWriter, TupleWriter, Writer};

#[cfg(test)]
mod factory_test;
#[cfg(test)]
mod writer_test;
