use crate::{
    errors::TypeError,
    types::{Type, manager::TypeManager, store::TypeStore},
    values::{Value, ValueFactory},
};
use bumpalo::Bump;

fn some_values<'a>(vf: &ValueFactory<'a>) -> Vec<Value<'a>> {
    vec![
        vf.integer(0).into(),
        vf.double(1.5).into(),
        vf.string("two").into(),
        vf.bool(true).into(),
        vf.list([vf.integer(4)]).into(),
        vf.tuple([vf.integer(5), vf.integer(5)]).into(),
        vf.node("six", [vf.integer(6)]).into(),
    ]
}

#[test]
fn test_tuple_of_every_arity() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));
    let values = some_values(&vf);

    for n in 1..=values.len() {
        let tuple = vf.tuple(values[..n].iter().cloned());
        assert_eq!(tuple.arity(), n);
        assert_eq!(tuple.ty().arity(), Some(n));
        for (i, value) in values[..n].iter().enumerate() {
            assert_eq!(tuple.get(i), Some(value));
            assert!(core::ptr::eq(tuple.ty().fields().unwrap()[i].ty, value.ty()));
        }
        assert_eq!(tuple.get(n), None);
    }
}

#[test]
fn test_set_of_every_arity() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));
    let values = some_values(&vf);

    for n in 1..=values.len() {
        let set = vf.set(values[..n].iter().cloned());
        assert_eq!(set.len(), n);
        for value in &values[..n] {
            assert!(set.contains(value));
        }
        for value in &values[n..] {
            assert!(!set.contains(value));
        }
    }
}

#[test]
fn test_list_of_every_arity() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));
    let values = some_values(&vf);

    for n in 1..=values.len() {
        let list = vf.list(values[..n].iter().cloned());
        assert_eq!(list.len(), n);
        for (i, value) in values[..n].iter().enumerate() {
            assert_eq!(list.get(i), Some(value));
            assert!(list.contains(value));
        }
    }
}

#[test]
fn test_relation_from_tuples() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let tuples: Vec<Value> = (0..7)
        .map(|i| vf.tuple([Value::from(vf.integer(i)), vf.double(i as f64).into()]).into())
        .collect();
    let tuple_ty = types.tuple(&[types.integer(), types.double()]);
    let rel_ty = types.relation_from_tuple(tuple_ty).unwrap();

    // Every prefix of the tuples, not only the whole list.
    for end in 1..=tuples.len() {
        let prefix = &tuples[..end];
        let rel = vf.relation(prefix.iter().cloned()).unwrap();
        assert!(core::ptr::eq(rel.ty(), rel_ty), "prefix of {end}");
        assert!(matches!(rel.ty(), Type::Relation(_)));
        assert_eq!(rel.len(), end);
        for tuple in prefix {
            assert!(rel.contains(tuple), "prefix of {end} is missing {tuple}");
        }
        for tuple in &tuples[end..] {
            assert!(!rel.contains(tuple));
        }
    }
}

#[test]
fn test_set_of_tuples_is_a_relation() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let set = vf.set([vf.tuple([vf.integer(1)]), vf.tuple([vf.integer(2)])]);
    assert!(set.is_relation());
}

#[test]
fn test_relation_rejects_non_tuples() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let err = vf.relation([vf.integer(1)]).unwrap_err();
    assert_eq!(
        err,
        TypeError::NotATuple {
            found: "int".to_string()
        }
    );

    // Tuples of different arities have no common tuple type.
    let err = vf
        .relation([vf.tuple([vf.integer(1)]), vf.tuple([vf.integer(1), vf.integer(2)])])
        .unwrap_err();
    assert!(matches!(err, TypeError::NotATuple { .. }));
}

#[test]
fn test_empty_relation() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let rel = vf.relation(Vec::<Value>::new()).unwrap();
    assert!(rel.is_relation());
    assert!(rel.is_empty());
    assert!(core::ptr::eq(rel.ty(), types.relation(&[])));

    let tuple_ty = types.labeled_tuple(&[(types.string(), "name")]);
    let typed = vf.empty_relation(tuple_ty).unwrap();
    assert!(core::ptr::eq(typed.element_type(), tuple_ty));
    assert!(vf.empty_relation(types.string()).is_err());
}

#[test]
fn test_empty_set_keeps_element_type() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let set = vf.empty_set(types.double());
    assert_eq!(set.len(), 0);
    assert!(core::ptr::eq(set.element_type(), types.double()));
    assert!(!set.contains(&vf.double(0.0).into()));

    let list = vf.empty_list(types.string());
    assert!(core::ptr::eq(list.ty(), types.list(types.string())));
}

#[test]
fn test_inferred_types_of_eager_constructors() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    let empty = vf.list(Vec::<Value>::new());
    assert!(core::ptr::eq(empty.ty(), types.list(types.void())));

    let mixed = vf.set([Value::from(vf.integer(1)), vf.string("a").into()]);
    assert!(core::ptr::eq(mixed.ty(), types.set(types.value())));

    let map = vf.map([(vf.string("k"), vf.list([vf.integer(1)]))]);
    assert!(core::ptr::eq(
        map.ty(),
        types.map(types.string(), types.list(types.integer()))
    ));
}

#[test]
fn test_make_on_alias_keeps_the_alias() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let alias = types
        .alias(&mut store, "N", types.set(types.integer()))
        .unwrap();
    let value = alias
        .make(&vf, &[vf.integer(1).into(), vf.integer(2).into()])
        .unwrap();

    assert!(core::ptr::eq(value.ty(), alias));
    assert!(value.ty().is_subtype_of(alias));
    let set = value.as_set().unwrap();
    assert_eq!(set.len(), 2);
    assert!(core::ptr::eq(set.element_type(), types.integer()));
}

#[test]
fn test_integer_alias_is_not_a_set() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let alias = types.alias(&mut store, "M", types.integer()).unwrap();
    let value = vf.make(alias, &[vf.integer(7).into()]).unwrap();
    assert!(core::ptr::eq(value.ty(), alias));
    assert_eq!(value.as_integer().unwrap().value(), 7);
    assert!(matches!(value.as_set(), Err(TypeError::WrongKind { .. })));
}

#[test]
fn test_make_checks_shape() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);

    // Scalars take exactly one child of their type.
    assert!(matches!(
        vf.make(types.integer(), &[]),
        Err(TypeError::Arity { expected: 1, found: 0, .. })
    ));
    assert!(matches!(
        vf.make(types.integer(), &[vf.string("1").into()]),
        Err(TypeError::Mismatch { .. })
    ));

    // Collections check their elements.
    assert!(matches!(
        vf.make(types.list(types.integer()), &[vf.bool(true).into()]),
        Err(TypeError::Mismatch { .. })
    ));

    // Maps take keys and values in turn.
    let map_ty = types.map(types.string(), types.integer());
    let map = vf
        .make(map_ty, &[vf.string("a").into(), vf.integer(1).into()])
        .unwrap();
    assert_eq!(map.to_string(), r#"("a":1)"#);
    assert!(matches!(
        vf.make(map_ty, &[vf.string("a").into()]),
        Err(TypeError::Arity { .. })
    ));

    // Tuples check arity and fields.
    let pair = types.tuple(&[types.integer(), types.value()]);
    let tuple = vf
        .make(pair, &[vf.integer(1).into(), vf.string("x").into()])
        .unwrap();
    assert!(core::ptr::eq(tuple.ty(), pair));
    assert!(matches!(
        vf.make(pair, &[vf.integer(1).into()]),
        Err(TypeError::Arity { expected: 2, found: 1, .. })
    ));

    // Relations take tuples.
    let rel_ty = types.relation(&[types.integer()]);
    let rel = vf.make(rel_ty, &[vf.tuple([vf.integer(1)]).into()]).unwrap();
    assert!(rel.as_relation().is_ok());
}

#[test]
fn test_make_rejects_abstract_types() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let adt = types.abstract_data_type(&mut store, "E", &[]).unwrap();
    for ty in [types.value(), types.void(), types.node(), adt] {
        assert!(
            matches!(vf.make(ty, &[]), Err(TypeError::NotConstructible { .. })),
            "{ty} should not be constructible"
        );
    }
}

#[test]
fn test_constructor_application() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let expr = types.abstract_data_type(&mut store, "Expr", &[]).unwrap();
    let lit = types
        .constructor(&mut store, expr, "lit", &[(types.integer(), Some("n"))])
        .unwrap();
    let add = types
        .constructor(
            &mut store,
            expr,
            "add",
            &[(expr, Some("lhs")), (expr, Some("rhs"))],
        )
        .unwrap();

    let one = vf.constructor(lit, [vf.integer(1)]).unwrap();
    let two = vf.constructor(lit, [vf.integer(2)]).unwrap();
    let sum = vf.constructor(add, [one.clone(), two]).unwrap();
    assert_eq!(sum.name(), "add");
    assert!(core::ptr::eq(sum.adt(), expr));
    assert_eq!(sum.arity(), 2);
    assert_eq!(sum.get_by_label("lhs"), Some(&Value::from(one.clone())));
    assert!(sum.ty().is_subtype_of(expr));

    assert!(matches!(
        vf.constructor(lit, [vf.string("1")]),
        Err(TypeError::Mismatch { .. })
    ));
    assert!(matches!(
        vf.constructor(add, [one]),
        Err(TypeError::Arity { .. })
    ));
    assert!(matches!(
        vf.constructor(expr, Vec::<Value>::new()),
        Err(TypeError::WrongKind { .. })
    ));

    // make goes through the same checks.
    let made = vf.make(lit, &[vf.integer(3).into()]).unwrap();
    assert_eq!(made.to_string(), "Expr::lit(3)");
}

#[test]
fn test_construct_through_store() {
    let arena = Bump::new();
    let types = TypeManager::new(&arena);
    let vf = ValueFactory::new(types);
    let mut store = TypeStore::new();

    let color = types.abstract_data_type(&mut store, "Color", &[]).unwrap();
    types.constructor(&mut store, color, "red", &[]).unwrap();
    types
        .constructor(&mut store, color, "rgb", &[(types.integer(), None); 3])
        .unwrap();

    let red = vf.construct(&store, color, "red", Vec::<Value>::new()).unwrap();
    assert_eq!(red.to_string(), "Color::red()");
    let rgb = vf
        .construct(&store, color, "rgb", [vf.integer(1), vf.integer(2), vf.integer(3)])
        .unwrap();
    assert_eq!(rgb.to_string(), "Color::rgb(1,2,3)");

    let err = vf
        .construct(&store, color, "rgb", [vf.integer(1)])
        .unwrap_err();
    assert_eq!(
        err,
        TypeError::UndeclaredConstructor {
            adt: "Color".to_string(),
            name: "rgb".to_string(),
            args: "int".to_string(),
        }
    );
    assert!(vf.construct(&store, color, "blue", Vec::<Value>::new()).is_err());
}

#[test]
fn test_node_children_are_ordered() {
    let arena = Bump::new();
    let vf = ValueFactory::new(TypeManager::new(&arena));

    let node = vf.node("call", [Value::from(vf.string("f")), vf.integer(1).into()]);
    assert_eq!(node.name(), "call");
    assert_eq!(node.arity(), 2);
    assert_eq!(node.get(1), Some(&Value::from(vf.integer(1))));
    assert!(core::ptr::eq(node.ty(), vf.types().node()));
}
