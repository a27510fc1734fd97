extern crate just_bind;

use just_bind::runner::binding::{
    build, build_entries, instantiate, resolve_host_ptr, DefinitionEntry, HostPtr, ObjectDefinition, PropertyHandler,
    SlotProperty,
};
use just_bind::runner::ds::error::JErrorType;
use just_bind::runner::ds::object_property::{PropertyAttributes, PropertyKey};
use just_bind::runner::ds::operations::object::{get, get_own_property, get_path, get_v, invoke, set};
use just_bind::runner::ds::operations::type_conversion::to_property_key;
use just_bind::runner::ds::value::{JsObjectType, JsValue};
use just_bind::runner::plugin::types::EvalContext;
use std::cell::Cell;
use std::rc::Rc;

/// Handler returning `magic32 * 6` and counting its invocations.
fn counting_handler(calls: Rc<Cell<usize>>) -> PropertyHandler {
    PropertyHandler::from_closure(move |_ctx, _host, magic32, _write| {
        calls.set(calls.get() + 1);
        Ok(JsValue::from(magic32 as i64 * 6))
    })
}

fn object_of(v: &JsValue) -> JsObjectType {
    match v {
        JsValue::Object(o) => o.clone(),
        other => panic!("expected an object, got {:?}", other),
    }
}

fn key(s: &str) -> PropertyKey {
    PropertyKey::from(s)
}

/// `{ child: { x: H(magic32 = 7) } }`
fn scenario_b_table(calls: Rc<Cell<usize>>) -> ObjectDefinition {
    ObjectDefinition::new(vec![DefinitionEntry::object(
        "child",
        ObjectDefinition::new(vec![DefinitionEntry::dynamic("x", counting_handler(calls), 7)]),
    )])
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn test_literal_property_reads_without_handler() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build_entries(
        &mut ctx.heap,
        vec![
            DefinitionEntry::property("version", "1.0"),
            DefinitionEntry::dynamic("unused", counting_handler(calls.clone()), 1),
        ],
    )
    .unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x10), false).unwrap();

    assert_eq!(get_v(&mut ctx, &obj, &key("version")).unwrap(), JsValue::from("1.0"));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_nested_dynamic_property_promotes_once() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build(&mut ctx.heap, &scenario_b_table(calls.clone())).unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x1234), false).unwrap();

    assert_eq!(get_path(&mut ctx, &obj, "child.x").unwrap(), JsValue::from(42));
    assert_eq!(calls.get(), 1);
    assert_eq!(get_path(&mut ctx, &obj, "child.x").unwrap(), JsValue::from(42));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_write_replaces_dynamic_property() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build(&mut ctx.heap, &scenario_b_table(calls.clone())).unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x1234), false).unwrap();

    assert_eq!(get_path(&mut ctx, &obj, "child.x").unwrap(), JsValue::from(42));
    let child = object_of(&get_v(&mut ctx, &obj, &key("child")).unwrap());
    assert!(set(&mut ctx, &child, key("x"), JsValue::from(99)).unwrap());

    assert_eq!(get_path(&mut ctx, &obj, "child.x").unwrap(), JsValue::from(99));
    assert_eq!(get_path(&mut ctx, &obj, "child.x").unwrap(), JsValue::from(99));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_three_nested_levels_build_four_slots() {
    let mut ctx = EvalContext::new();
    let table = ObjectDefinition::new(vec![DefinitionEntry::object(
        "a",
        ObjectDefinition::new(vec![
            DefinitionEntry::property("depth", "1"),
            DefinitionEntry::object(
                "b",
                ObjectDefinition::new(vec![
                    DefinitionEntry::property("depth", "2"),
                    DefinitionEntry::object(
                        "c",
                        ObjectDefinition::new(vec![DefinitionEntry::property("depth", "3")]),
                    ),
                ]),
            ),
        ]),
    )]);
    let proto = build(&mut ctx.heap, &table).unwrap();
    assert_eq!(proto.slot_count(), 4);

    // Each offset leads to the slot holding that level's entries.
    let mut index = 0;
    for (name, depth) in &[("a", "1"), ("b", "2"), ("c", "3")] {
        let slot = proto.slot(index).unwrap();
        let offset = match &slot.shared_properties()[&key(name)].kind {
            SlotProperty::Nested { offset } => *offset,
            other => panic!("expected a nested template, got {:?}", other),
        };
        index = proto.child_index(index, offset).unwrap();
        let child = proto.slot(index).unwrap();
        match &child.shared_properties()[&key("depth")].kind {
            SlotProperty::Value(v) => assert_eq!(v, &JsValue::from(*depth)),
            other => panic!("expected a literal, got {:?}", other),
        }
    }

    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(1), false).unwrap();
    assert_eq!(get_path(&mut ctx, &obj, "a.b.c.depth").unwrap(), JsValue::from("3"));
}

// ── Sharing ──────────────────────────────────────────────────────────

#[test]
fn test_instances_share_template_table() {
    let mut ctx = EvalContext::new();
    let proto = build_entries(&mut ctx.heap, vec![DefinitionEntry::property("v", "1")]).unwrap();
    let a = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xa), false).unwrap();
    let b = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xb), false).unwrap();
    let (a_obj, b_obj) = (object_of(&a), object_of(&b));

    {
        let a_ref = a_obj.borrow();
        let b_ref = b_obj.borrow();
        let a_ext = a_ref.as_external().unwrap();
        let b_ext = b_ref.as_external().unwrap();
        assert!(std::ptr::eq(a_ext.shared_properties(), b_ext.shared_properties()));
        assert!(Rc::ptr_eq(a_ext.prototype(), &proto));
    }

    assert!(set(&mut ctx, &a_obj, key("v"), JsValue::from("changed")).unwrap());
    assert!(set(&mut ctx, &a_obj, key("extra"), JsValue::from(1)).unwrap());
    assert_eq!(get_v(&mut ctx, &a, &key("v")).unwrap(), JsValue::from("changed"));
    assert_eq!(get_v(&mut ctx, &b, &key("v")).unwrap(), JsValue::from("1"));
    assert_eq!(get_v(&mut ctx, &b, &key("extra")).unwrap(), JsValue::Undefined);
}

#[test]
fn test_promotion_is_per_instance() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build_entries(&mut ctx.heap, vec![DefinitionEntry::dynamic("x", counting_handler(calls.clone()), 1)])
        .unwrap();
    let a = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xa), false).unwrap();
    let b = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xb), false).unwrap();

    get_v(&mut ctx, &a, &key("x")).unwrap();
    get_v(&mut ctx, &a, &key("x")).unwrap();
    get_v(&mut ctx, &b, &key("x")).unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_nested_object_is_cached_by_reference() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build(&mut ctx.heap, &scenario_b_table(calls)).unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0x99), false).unwrap();

    let first = object_of(&get_v(&mut ctx, &obj, &key("child")).unwrap());
    let second = object_of(&get_v(&mut ctx, &obj, &key("child")).unwrap());
    assert!(Rc::ptr_eq(&first, &second));
}

// ── Write demotion ───────────────────────────────────────────────────

#[test]
fn test_write_before_first_read_skips_handler() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build_entries(&mut ctx.heap, vec![DefinitionEntry::dynamic("x", counting_handler(calls.clone()), 1)])
        .unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xa), false).unwrap();

    assert!(set(&mut ctx, &object_of(&obj), key("x"), JsValue::from("mine")).unwrap());
    assert_eq!(get_v(&mut ctx, &obj, &key("x")).unwrap(), JsValue::from("mine"));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_write_replaces_nested_namespace() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build(&mut ctx.heap, &scenario_b_table(calls.clone())).unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xa), false).unwrap();

    assert!(set(&mut ctx, &object_of(&obj), key("child"), JsValue::Null).unwrap());
    assert_eq!(get_v(&mut ctx, &obj, &key("child")).unwrap(), JsValue::Null);
    assert!(matches!(get_path(&mut ctx, &obj, "child.x"), Err(JErrorType::TypeError(_))));
    assert_eq!(calls.get(), 0);
}

// ── Index-like names ─────────────────────────────────────────────────

#[test]
fn test_index_like_names_are_reachable() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let proto = build_entries(
        &mut ctx.heap,
        vec![
            DefinitionEntry::property("0", "zero"),
            DefinitionEntry::dynamic(format!("{}", 12), counting_handler(calls.clone()), 2),
            DefinitionEntry::property("007", "bond"),
        ],
    )
    .unwrap();
    let keys: Vec<PropertyKey> = proto.root().unwrap().shared_properties().keys().cloned().collect();
    assert_eq!(
        keys,
        vec![PropertyKey::Int(0), PropertyKey::Int(12), PropertyKey::Str("007".to_string())]
    );

    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(1), false).unwrap();
    assert_eq!(get_path(&mut ctx, &obj, "0").unwrap(), JsValue::from("zero"));
    let zero = to_property_key(&JsValue::from("0")).unwrap();
    assert_eq!(get(&mut ctx, &object_of(&obj), &zero).unwrap(), JsValue::from("zero"));
    assert_eq!(get_v(&mut ctx, &obj, &PropertyKey::Int(12)).unwrap(), JsValue::from(12));
    assert_eq!(get_path(&mut ctx, &obj, "12").unwrap(), JsValue::from(12));
    assert_eq!(calls.get(), 1);
    assert_eq!(get_path(&mut ctx, &obj, "007").unwrap(), JsValue::from("bond"));
}

// ── Attributes ───────────────────────────────────────────────────────

#[test]
fn test_promoted_attributes_match_definition() {
    let mut ctx = EvalContext::new();
    let calls = Rc::new(Cell::new(0));
    let hidden = PropertyAttributes::new(true, false, true);
    let frozen = PropertyAttributes::NONE;
    let proto = build_entries(
        &mut ctx.heap,
        vec![
            DefinitionEntry::dynamic("x", counting_handler(calls), 1).with_attributes(hidden),
            DefinitionEntry::object("ns", ObjectDefinition::default()).with_attributes(frozen),
        ],
    )
    .unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xa), false).unwrap();
    let o = object_of(&obj);

    get_v(&mut ctx, &obj, &key("x")).unwrap();
    get_v(&mut ctx, &obj, &key("ns")).unwrap();
    let x = get_own_property(&mut ctx, &o, &key("x")).unwrap().unwrap();
    let ns = get_own_property(&mut ctx, &o, &key("ns")).unwrap().unwrap();
    assert_eq!(x.attributes(), hidden);
    assert_eq!(ns.attributes(), frozen);
    assert_eq!(proto.slot(1).unwrap().default_attributes(), frozen);
}

#[test]
fn test_methods_are_not_enumerable() {
    fn noop(_: &mut EvalContext, _: Option<HostPtr>, _: i32, _: Vec<JsValue>) -> Result<JsValue, JErrorType> {
        Ok(JsValue::Undefined)
    }
    let mut ctx = EvalContext::new();
    let proto = build_entries(&mut ctx.heap, vec![DefinitionEntry::method("f", noop, 0)]).unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xa), false).unwrap();
    let pd = get_own_property(&mut ctx, &object_of(&obj), &key("f")).unwrap().unwrap();
    assert_eq!(pd.attributes(), PropertyAttributes::METHOD);
}

// ── Host pointers ────────────────────────────────────────────────────

#[test]
fn test_nested_objects_carry_parent_pointer() {
    let mut ctx = EvalContext::new();
    let table = ObjectDefinition::new(vec![DefinitionEntry::object(
        "a",
        ObjectDefinition::new(vec![DefinitionEntry::object(
            "b",
            ObjectDefinition::new(vec![DefinitionEntry::object("c", ObjectDefinition::default())]),
        )]),
    )]);
    let proto = build(&mut ctx.heap, &table).unwrap();
    let mut host_data = [0u8; 16];
    let host = HostPtr::new(host_data.as_mut_ptr());
    let obj = instantiate(&mut ctx.heap, Some(&proto), host, true).unwrap();

    for path in &["a", "a.b", "a.b.c"] {
        let nested = get_path(&mut ctx, &obj, path).unwrap();
        assert_eq!(resolve_host_ptr(&nested), Some(host), "at {}", path);
    }
    assert_eq!(resolve_host_ptr(&obj), Some(host));
}

#[test]
fn test_method_receives_this_pointer_and_magic() {
    fn echo(_: &mut EvalContext, host: Option<HostPtr>, magic: i32, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
        let addr = host.map_or(-1, |h| h.addr() as i64);
        Ok(JsValue::from(addr * 100 + magic as i64 + args.len() as i64))
    }
    let mut ctx = EvalContext::new();
    let proto = build_entries(
        &mut ctx.heap,
        vec![DefinitionEntry::method("one", echo, 1), DefinitionEntry::method("two", echo, 2)],
    )
    .unwrap();
    let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(5), false).unwrap();

    assert_eq!(invoke(&mut ctx, &obj, &key("one"), vec![]).unwrap(), JsValue::from(501));
    assert_eq!(
        invoke(&mut ctx, &obj, &key("two"), vec![JsValue::Null]).unwrap(),
        JsValue::from(503)
    );
}

#[test]
fn test_instantiate_requires_prototype() {
    let mut ctx = EvalContext::new();
    assert_eq!(
        instantiate(&mut ctx.heap, None, HostPtr::from_addr(1), false),
        Err(JErrorType::InvalidPrototype)
    );
}
