pub mod manager;
pub mod store;
mod subtype;
mod types;


pub use types::{Field, Type};
