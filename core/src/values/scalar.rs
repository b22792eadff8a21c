use crate::types::Type;
use std::sync::Arc;

/// A 64-bit signed integer.
#[derive(Clone, Copy)]
pub struct Integer<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) value: i64,
}

impl<'a> Integer<'a> {
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }
}

/// A 64-bit float. NaNs are all equal to each other; otherwise equality is
/// by bit pattern, so `0.0` and `-0.0` differ.
#[derive(Clone, Copy)]
pub struct Double<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) value: f64,
}

impl<'a> Double<'a> {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }

    /// Bits used for equality and hashing.
    pub(crate) fn canonical_bits(&self) -> u64 {
        if self.value.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.value.to_bits()
        }
    }
}

#[derive(Clone, Copy)]
pub struct Bool<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) value: bool,
}

impl<'a> Bool<'a> {
    pub fn value(&self) -> bool {
        self.value
    }

    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }
}

#[derive(Clone)]
pub struct Str<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) value: Arc<str>,
}

impl<'a> Str<'a> {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }
}

/// A span inside a source file: offset and length in characters, plus the
/// line and column of both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start_offset: usize,
    pub length: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

/// A path paired with a range inside it. Both are returned exactly as given.
#[derive(Clone)]
pub struct SourceLocation<'a> {
    pub(crate) ty: &'a Type<'a>,
    pub(crate) path: Arc<str>,
    pub(crate) range: SourceRange,
}

impl<'a> SourceLocation<'a> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn range(&self) -> SourceRange {
        self.range
    }

    pub fn ty(&self) -> &'a Type<'a> {
        self.ty
    }
}
