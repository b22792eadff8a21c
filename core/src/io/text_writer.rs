use crate::{errors::CodecError, values::Value};
use std::io::Write;
use tracing::trace;

/// Writes values in their canonical text form.
///
/// The output is exactly the value's `Display` rendering, which
/// [`StandardTextReader`](super::StandardTextReader) reads back into an equal
/// value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTextWriter;

impl StandardTextWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, value: &Value<'_>, mut sink: impl Write) -> Result<(), CodecError> {
        trace!(kind = value.kind_name(), "writing value");
        write!(sink, "{}", value)?;
        sink.flush()?;
        Ok(())
    }
}
