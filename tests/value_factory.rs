use bumpalo::Bump;
use pdb::{BuildError, TypeError, TypeManager, TypeStore, Value, ValueFactory, Writer};
use pretty_assertions::assert_eq;

#[test]
fn test_values_outlive_nothing_but_the_arena() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let values: Vec<Value> = (0..3)
        .map(|i| Value::from(vf.tuple([vf.integer(i), vf.integer(i * i)])))
        .collect();
    let rel = vf.relation(values.clone()).unwrap();
    assert_eq!(rel.to_string(), "{<0,0>,<1,1>,<2,4>}");
    assert!(core::ptr::eq(
        rel.ty(),
        types.relation(&[types.integer(), types.integer()])
    ));
    for value in &values {
        assert!(rel.contains(value));
    }
}

#[test]
fn test_values_cross_threads() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let shared = Value::from(vf.map([(vf.string("k"), vf.list([vf.integer(1)]))]));
    let rendered = std::thread::scope(|scope| {
        let handle = scope.spawn(|| shared.to_string());
        handle.join().unwrap()
    });
    assert_eq!(rendered, r#"("k":[1])"#);
}

#[test]
fn test_make_through_aliases() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let edge = types
        .alias(&mut store, "Edge", types.labeled_tuple(&[(types.integer(), "from"), (types.integer(), "to")]))
        .unwrap();
    let graph = types
        .alias(&mut store, "Graph", types.relation_from_tuple(edge).unwrap())
        .unwrap();

    let e1 = edge
        .make(&vf, &[vf.integer(1).into(), vf.integer(2).into()])
        .unwrap();
    let e2 = edge
        .make(&vf, &[vf.integer(2).into(), vf.integer(3).into()])
        .unwrap();
    assert!(core::ptr::eq(e1.ty(), edge));
    assert_eq!(
        e1.as_tuple().unwrap().get_by_label("to"),
        Some(&Value::from(vf.integer(2)))
    );

    let g = graph.make(&vf, &[e1, e2]).unwrap();
    assert!(core::ptr::eq(g.ty(), graph));
    assert_eq!(g.to_string(), "{<1,2>,<2,3>}");
    assert!(g.as_relation().is_ok());

    let err = graph.make(&vf, &[vf.integer(1).into()]).unwrap_err();
    assert!(matches!(err, TypeError::Mismatch { .. } | TypeError::NotATuple { .. }));
}

#[test]
fn test_writers_build_large_collections() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let mut list = vf.list_writer_of(types.integer());
    list.insert_all((0..1000).map(|i| vf.integer(i).into())).unwrap();
    let list = list.done().unwrap();
    assert_eq!(list.len(), 1000);
    assert_eq!(list.get(999), Some(&Value::from(vf.integer(999))));

    let mut map = vf.map_writer();
    for i in 0..1000 {
        map.put(vf.integer(i % 10), vf.integer(i)).unwrap();
    }
    let map = map.done().unwrap();
    assert_eq!(map.len(), 10);
    assert_eq!(map.get(&vf.integer(3).into()), Some(&Value::from(vf.integer(993))));
}

#[test]
fn test_constructor_values() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let list_adt = types.abstract_data_type(&mut store, "IntList", &[]).unwrap();
    let nil = types.constructor(&mut store, list_adt, "nil", &[]).unwrap();
    let cons = types
        .constructor(
            &mut store,
            list_adt,
            "cons",
            &[(types.integer(), Some("head")), (list_adt, Some("tail"))],
        )
        .unwrap();

    let mut tail = Value::from(vf.constructor(nil, Vec::<Value>::new()).unwrap());
    for i in (1..=3).rev() {
        tail = vf.constructor(cons, [vf.integer(i).into(), tail]).unwrap().into();
    }
    assert_eq!(
        tail.to_string(),
        "IntList::cons(1,IntList::cons(2,IntList::cons(3,IntList::nil())))"
    );

    let head = tail.as_constructor().unwrap();
    assert_eq!(head.name(), "cons");
    assert!(core::ptr::eq(head.adt(), list_adt));
    assert_eq!(head.get_by_label("head"), Some(&Value::from(vf.integer(1))));

    let err = vf
        .constructor(cons, [Value::from(vf.integer(1)), vf.integer(2).into()])
        .unwrap_err();
    assert!(matches!(err, TypeError::Mismatch { .. }));

    let built = vf
        .construct(&store, list_adt, "cons", [tail.clone(), tail.clone()])
        .unwrap_err();
    assert!(matches!(built, TypeError::UndeclaredConstructor { .. }));
}

#[test]
fn test_done_twice_is_a_state_error() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let mut writer = vf.tuple_writer();
    writer.done().unwrap();
    assert!(matches!(writer.done(), Err(BuildError::State(_))));
}
