use crate::{
    errors::{BuildError, TypeError, WriterStateError},
    test_utils::init_test_logging,
    types::manager::TypeManager,
    values::{Value, ValueFactory, Writer},
};
use bumpalo::Bump;

#[test]
fn test_list_writer_matches_eager_constructor() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    for n in 0..7 {
        let items: Vec<Value> = (0..n).map(|i| vf.integer(i).into()).collect();
        let mut writer = vf.list_writer();
        writer.insert_all(items.iter().cloned()).unwrap();
        let written = writer.done().unwrap();
        let eager = vf.list(items.iter().cloned());

        assert_eq!(Value::from(written.clone()), Value::from(eager.clone()));
        assert!(core::ptr::eq(written.ty(), eager.ty()));
        assert_eq!(written.len(), n as usize);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(written.get(i), Some(item));
        }
    }
}

#[test]
fn test_spent_writer_rejects_everything() {
    init_test_logging();
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let mut writer = vf.set_writer();
    writer.insert(vf.integer(1).into()).unwrap();
    let set = writer.done().unwrap();
    assert!(!writer.is_open());

    let spent = BuildError::State(WriterStateError { kind: "set" });
    assert_eq!(writer.insert(vf.integer(2).into()), Err(spent.clone()));
    assert_eq!(writer.insert_all(Vec::new()), Err(spent.clone()));
    assert_eq!(writer.done().unwrap_err(), spent);

    // The value already produced is unaffected.
    assert_eq!(set.len(), 1);
    assert!(set.contains(&vf.integer(1).into()));
    assert!(!set.contains(&vf.integer(2).into()));
}

#[test]
fn test_every_writer_kind_reports_its_kind() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let mut tuple = vf.tuple_writer();
    tuple.done().unwrap();
    assert_eq!(
        tuple.insert(vf.integer(1).into()),
        Err(WriterStateError { kind: "tuple" }.into())
    );

    let mut list = vf.list_writer();
    list.done().unwrap();
    assert_eq!(
        list.done().unwrap_err(),
        WriterStateError { kind: "list" }.into()
    );

    let mut map = vf.map_writer();
    map.done().unwrap();
    assert_eq!(
        map.put(vf.integer(1), vf.integer(2)),
        Err(WriterStateError { kind: "map" }.into())
    );
}

#[test]
fn test_declared_element_type_is_enforced() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let mut writer = vf.list_writer_of(types.integer());
    writer.insert(vf.integer(1).into()).unwrap();
    let err = writer.insert(vf.string("no").into()).unwrap_err();
    assert_eq!(
        err,
        BuildError::Type(TypeError::Mismatch {
            expected: "int".to_string(),
            found: "str".to_string(),
        })
    );
    // The writer stays open after a rejected element.
    writer.insert(vf.integer(2).into()).unwrap();
    let list = writer.done().unwrap();
    assert_eq!(list.len(), 2);
    assert!(core::ptr::eq(list.ty(), types.list(types.integer())));
}

#[test]
fn test_declared_element_type_survives_empty() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let set = vf.set_writer_of(types.double()).done().unwrap();
    assert!(set.is_empty());
    assert!(core::ptr::eq(set.element_type(), types.double()));

    let map = vf
        .map_writer_of(types.string(), types.value())
        .done()
        .unwrap();
    assert!(core::ptr::eq(map.key_type(), types.string()));
    assert!(core::ptr::eq(map.value_type(), types.value()));
}

#[test]
fn test_declared_supertype_keeps_declared_type() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let mut writer = vf.list_writer_of(types.value());
    writer.insert(vf.integer(1).into()).unwrap();
    let list = writer.done().unwrap();
    assert!(core::ptr::eq(list.element_type(), types.value()));
}

#[test]
fn test_inferred_element_type_is_lub() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let mut writer = vf.list_writer();
    writer.insert(vf.integer(1).into()).unwrap();
    assert!(core::ptr::eq(
        writer.done().unwrap().element_type(),
        types.integer()
    ));

    let mut writer = vf.list_writer();
    writer
        .insert_all([vf.integer(1).into(), vf.double(2.0).into()])
        .unwrap();
    assert!(core::ptr::eq(
        writer.done().unwrap().element_type(),
        types.value()
    ));

    let empty = vf.list_writer().done().unwrap();
    assert!(core::ptr::eq(empty.element_type(), types.void()));
}

#[test]
fn test_set_writer_collapses_duplicates() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let mut writer = vf.set_writer();
    for i in [1, 2, 1, 3, 2] {
        writer.insert(vf.integer(i).into()).unwrap();
    }
    let set = writer.done().unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.to_string(), "{1,2,3}");
}

#[test]
fn test_relation_writer() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let tuple_ty = types.tuple(&[types.integer(), types.string()]);
    let mut writer = vf.relation_writer(tuple_ty).unwrap();
    writer
        .insert(vf.tuple([Value::from(vf.integer(1)), vf.string("a").into()]).into())
        .unwrap();
    let err = writer.insert(vf.integer(3).into()).unwrap_err();
    assert!(matches!(err, BuildError::Type(TypeError::NotATuple { .. })));
    let err = writer
        .insert(vf.tuple([vf.integer(1), vf.integer(2)]).into())
        .unwrap_err();
    assert!(matches!(err, BuildError::Type(TypeError::Mismatch { .. })));

    let rel = writer.done().unwrap();
    assert!(rel.is_relation());
    assert!(core::ptr::eq(rel.element_type(), tuple_ty));
    assert_eq!(rel.len(), 1);

    assert!(matches!(
        vf.relation_writer(types.integer()),
        Err(TypeError::NotATuple { .. })
    ));
}

#[test]
fn test_map_writer_last_value_wins() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let mut writer = vf.map_writer_of(types.string(), types.integer());
    writer.put(vf.string("a"), vf.integer(1)).unwrap();
    writer.put(vf.string("b"), vf.integer(2)).unwrap();
    writer.put(vf.string("a"), vf.integer(3)).unwrap();
    let err = writer.put(vf.integer(0), vf.integer(0)).unwrap_err();
    assert!(matches!(err, BuildError::Type(TypeError::Mismatch { .. })));
    let err = writer.put(vf.string("c"), vf.bool(true)).unwrap_err();
    assert!(matches!(err, BuildError::Type(TypeError::Mismatch { .. })));

    let map = writer.done().unwrap();
    assert_eq!(map.to_string(), r#"("a":3,"b":2)"#);
}

#[test]
fn test_tuple_writer_types_fields_precisely() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let mut writer = vf.tuple_writer();
    writer
        .insert_all([vf.integer(1).into(), vf.list([vf.bool(true)]).into()])
        .unwrap();
    let tuple = writer.done().unwrap();
    assert!(core::ptr::eq(
        tuple.ty(),
        types.tuple(&[types.integer(), types.list(types.bool())])
    ));
}

#[test]
fn test_to_writer_reopens_a_copy() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let list = vf.list([vf.integer(1), vf.integer(2)]);
    let mut writer = list.to_writer(&vf);
    writer.insert(vf.integer(3).into()).unwrap();
    let longer = writer.done().unwrap();
    assert_eq!(list.to_string(), "[1,2]");
    assert_eq!(longer.to_string(), "[1,2,3]");

    let set = vf.set([vf.string("x")]);
    let mut writer = set.to_writer(&vf);
    writer.insert(vf.string("x").into()).unwrap();
    writer.insert(vf.string("y").into()).unwrap();
    let bigger = writer.done().unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(bigger.len(), 2);

    let map = vf.map([(vf.integer(1), vf.integer(1))]);
    let mut writer = map.to_writer(&vf);
    writer.put(vf.integer(1), vf.string("one")).unwrap();
    let retyped = writer.done().unwrap();
    assert!(core::ptr::eq(
        retyped.ty(),
        types.map(types.integer(), types.value())
    ));
    assert_eq!(map.to_string(), "(1:1)");
    assert_eq!(retyped.to_string(), r#"(1:"one")"#);

    let tuple = vf.tuple([vf.integer(1)]);
    let mut writer = tuple.to_writer(&vf);
    writer.insert(vf.integer(2).into()).unwrap();
    assert_eq!(writer.done().unwrap().arity(), 2);
    assert_eq!(tuple.arity(), 1);

    let rel = vf.relation([vf.tuple([vf.integer(1)])]).unwrap();
    let mut writer = rel.to_writer(&vf);
    assert!(writer.insert(vf.integer(1).into()).is_err());
    assert!(writer.done().unwrap().is_relation());
}
