#![allow(dead_code)]

use pdb::{CodecError, StandardTextReader, StandardTextWriter, TypeManager, TypeStore, Value, ValueFactory};

/// Declares the data types the text cases refer to.
///
/// ```text
/// data Expr  = lit(int) | var(str name) | add(Expr lhs, Expr rhs)
/// data Color = red() | green() | blue()
/// data Shape = circle(double radius) | rect(double w, double h)
/// ```
pub fn sample_store<'a>(types: &'a TypeManager<'a>) -> TypeStore<'a> {
    let mut store = TypeStore::new();

    let expr = types.abstract_data_type(&mut store, "Expr", &[]).unwrap();
    types
        .constructor(&mut store, expr, "lit", &[(types.integer(), None)])
        .unwrap();
    types
        .constructor(&mut store, expr, "var", &[(types.string(), Some("name"))])
        .unwrap();
    types
        .constructor(&mut store, expr, "add", &[(expr, Some("lhs")), (expr, Some("rhs"))])
        .unwrap();

    let color = types.abstract_data_type(&mut store, "Color", &[]).unwrap();
    for name in ["red", "green", "blue"] {
        types.constructor(&mut store, color, name, &[]).unwrap();
    }

    let shape = types.abstract_data_type(&mut store, "Shape", &[]).unwrap();
    types
        .constructor(&mut store, shape, "circle", &[(types.double(), Some("radius"))])
        .unwrap();
    types
        .constructor(
            &mut store,
            shape,
            "rect",
            &[(types.double(), Some("w")), (types.double(), Some("h"))],
        )
        .unwrap();

    store
}

/// Reads `input` against the sample store and writes the value back out.
pub fn read_and_write<'a>(
    store: &TypeStore<'a>,
    vf: &ValueFactory<'a>,
    input: &str,
) -> Result<(Value<'a>, String), CodecError> {
    let value = StandardTextReader::with_store(store).read_str(vf, input)?;
    let mut out = Vec::new();
    StandardTextWriter::new().write(&value, &mut out)?;
    let text = String::from_utf8(out).unwrap();
    Ok((value, text))
}

/// A text codec case.
///
/// `formatted: Ok(..)` reads `input`, checks the canonical rendering and
/// that reading the rendering gives back an equal value of the same type.
/// `ty:` additionally checks the static type. `formatted: Err(..)` matches
/// the reader's error against a pattern.
#[macro_export]
macro_rules! test_case {
    ($name:ident, input: $input:expr, formatted: Ok($expected:expr) $(, ty: $ty:expr)? $(,)?) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let types = pdb::TypeManager::new(&arena);
            let vf = pdb::ValueFactory::new(types);
            let store = cases::sample_store(types);

            let (value, text) = cases::read_and_write(&store, &vf, $input).unwrap();
            pretty_assertions::assert_eq!(text, $expected);
            $(pretty_assertions::assert_eq!(value.ty().to_string(), $ty);)?

            let (again, text_again) = cases::read_and_write(&store, &vf, &text).unwrap();
            assert_eq!(again, value);
            assert!(core::ptr::eq(again.ty(), value.ty()));
            pretty_assertions::assert_eq!(text_again, text);
        }
    };
    ($name:ident, input: $input:expr, formatted: Err($err:pat) $(,)?) => {
        #[test]
        fn $name() {
            let arena = bumpalo::Bump::new();
            let types = pdb::TypeManager::new(&arena);
            let vf = pdb::ValueFactory::new(types);
            let store = cases::sample_store(types);

            let result = cases::read_and_write(&store, &vf, $input);
            assert!(
                matches!(result, Err($err)),
                "unexpected result for {:?}: {:?}",
                $input,
                result,
            );
        }
    };
}
