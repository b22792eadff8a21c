//! The canonical text codec.
//!
//! [`StandardTextWriter`] renders a value in the same form as its `Display`
//! implementation and [`StandardTextReader`] parses that form back. Reading
//! constructor applications needs a [`TypeStore`](crate::types::store::TypeStore)
//! holding their data types.

mod options;
mod text_reader;
mod text_writer;

pub use options::ReaderOptions;
pub use text_reader::StandardTextReader;
pub use text_writer::StandardTextWriter;
