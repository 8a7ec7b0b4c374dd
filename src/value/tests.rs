use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use crate::parse::read_str;

fn int(x: i64) -> Value {
    Value::Integer(x)
}

#[test]
fn test_print_readable() {
    let mut map = Map::new();
    map.insert(Value::keyword("a"), Value::string("x\"y"));
    let value = Value::list(vec![
        Value::symbol("f"),
        int(-3),
        Value::vector(vec![Value::Nil, Value::True, Value::False]),
        Value::map(map),
        Value::string("line\nbreak \\"),
    ]);
    assert_eq!(
        pr_str(&value, true),
        r#"(f -3 [nil true false] {:a "x\"y"} "line\nbreak \\")"#,
    );
}

#[test]
fn test_print_display() {
    let value = Value::list(vec![Value::string("a\"b"), Value::keyword("k")]);
    assert_eq!(pr_str(&value, false), "(a\"b :k)");
    assert_eq!(pr_str(&Value::string("plain"), false), "plain");
}

#[test]
fn test_print_empty_collections() {
    assert_eq!(pr_str(&Value::list(vec![]), true), "()");
    assert_eq!(pr_str(&Value::vector(vec![]), true), "[]");
    assert_eq!(pr_str(&Value::map(Map::new()), true), "{}");
}

#[test]
fn test_print_callables() {
    let native = Value::native(Native::new("id", |args| Ok(args[0].clone())));
    assert_eq!(pr_str(&native, true), "#<builtin id>");
}

#[test]
fn test_list_and_vector_compare_equal() {
    assert_eq!(Value::list(vec![int(1)]), Value::vector(vec![int(1)]));
    assert_ne!(Value::list(vec![int(1)]), Value::vector(vec![int(2)]));
    assert_ne!(Value::list(vec![]), Value::Nil);
}

#[test]
fn test_atoms_compare_by_tag() {
    assert_ne!(Value::symbol("a"), Value::keyword("a"));
    assert_ne!(Value::symbol("a"), Value::string("a"));
    assert_ne!(Value::False, Value::Nil);
    assert_eq!(Value::symbol("a"), Value::symbol("a"));
}

#[test]
fn test_map_equality_ignores_order() {
    let a: Map = vec![(int(1), int(2)), (int(3), int(4))].into_iter().collect();
    let b: Map = vec![(int(3), int(4)), (int(1), int(2))].into_iter().collect();
    let c: Map = vec![(int(1), int(2)), (int(3), int(5))].into_iter().collect();
    assert_eq!(Value::map(a.clone()), Value::map(b));
    assert_ne!(Value::map(a), Value::map(c));
}

#[test]
fn test_map_keys_are_structural() {
    let mut map = Map::new();
    map.insert(Value::list(vec![int(1)]), int(1));
    map.insert(Value::vector(vec![int(1)]), int(2));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Value::list(vec![int(1)])), Some(&int(2)));
}

#[test]
fn test_map_keys_of_every_kind() {
    let f = Value::native(Native::new("f", |_| Ok(Value::Nil)));
    let g = Value::native(Native::new("g", |_| Ok(Value::Nil)));
    let inner_a: Map = vec![(int(1), int(2)), (int(3), int(4))].into_iter().collect();
    let inner_b: Map = vec![(int(3), int(4)), (int(1), int(2))].into_iter().collect();

    let mut map = Map::new();
    map.insert(f.clone(), int(1));
    map.insert(g.clone(), int(2));
    map.insert(Value::map(inner_a), int(3));
    map.insert(Value::map(inner_b.clone()), int(4));
    map.insert(Value::string("k"), int(5));
    map.insert(Value::keyword("k"), int(6));
    map.insert(Value::symbol("k"), int(7));

    assert_eq!(map.len(), 6);
    assert_eq!(map.get(&f), Some(&int(1)));
    assert_eq!(map.get(&g), Some(&int(2)));
    assert_eq!(map.get(&Value::map(inner_b)), Some(&int(4)));
    assert_eq!(map.get(&Value::keyword("k")), Some(&int(6)));
    assert_eq!(map.get(&Value::Nil), None);
}

#[test]
fn test_map_keeps_insertion_order() {
    let map: Map = (0..100).rev().map(|x| (int(x), int(x * 2))).collect();
    let keys = map.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>();
    assert_eq!(keys, (0..100).rev().map(int).collect::<Vec<_>>());
    assert_eq!(map.get(&int(42)), Some(&int(84)));
}

#[test]
fn test_callable_equality_is_identity() {
    let f = Value::native(Native::new("f", |_| Ok(Value::Nil)));
    let g = Value::native(Native::new("f", |_| Ok(Value::Nil)));
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

#[test]
fn test_truthiness() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::False.is_truthy());
    assert!(Value::True.is_truthy());
    assert!(int(0).is_truthy());
    assert!(Value::list(vec![]).is_truthy());
    assert!(Value::string("").is_truthy());
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z*+!?<>=_][a-z0-9*+!?<>=_-]{0,8}"
        .prop_filter("reserved atom", |s| !matches!(s.as_str(), "nil" | "true" | "false"))
}

fn arb_literal() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        "[ -~\n]{0,12}".prop_map(|s| Value::string(s)),
        arb_name().prop_map(|s| Value::symbol(&s)),
        arb_name().prop_map(|s| Value::keyword(&s)),
        Just(Value::Nil),
        Just(Value::True),
        Just(Value::False),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::list),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::vector),
            prop::collection::vec((inner.clone(), inner), 0..4)
                .prop_map(|pairs| Value::map(pairs.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn test_readable_print_reads_back(value in arb_literal()) {
        let printed = pr_str(&value, true);
        let read = read_str(&printed).into_result();
        prop_assert_eq!(read, Ok(Some(value)), "printed as {}", printed);
    }
}
