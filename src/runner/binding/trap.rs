//! Lazy property trap and the two-level lookup of external objects.
//!
//! Reads check the instance's own table, then the shared slot templates,
//! then the slot's catch-all. A lazy template (nested namespace or dynamic
//! property) is materialized on first read and promoted into the own table,
//! so it is never resolved twice for the same instance. A write to any
//! templated key demotes it to a plain own data property.
//!
//! Borrows of the object are never held across host callbacks.

use std::mem;

use indexmap::IndexSet;

use crate::runner::binding::definition::{CatchAllFn, KeyEnumeratorFn};
use crate::runner::binding::host::HostPtr;
use crate::runner::binding::instance::{new_external_object, resolve_host_ptr, ExternalObject};
use crate::runner::binding::slot::{SlotDescriptor, SlotProperty};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{order_property_keys, JsObject};
use crate::runner::ds::object_property::{PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::runner::ds::value::{JsObjectType, JsValue};
use crate::runner::plugin::types::EvalContext;

enum ReadPlan {
    Lazy(SlotDescriptor),
    CatchAll(CatchAllFn),
}

enum WritePlan {
    Own,
    Demote(PropertyAttributes),
    CatchAll(CatchAllFn),
    Define,
}

fn not_external() -> JErrorType {
    JErrorType::InternalError("external object operation on a non-external object".to_string())
}

/// Runs `f` against the external object behind `object`.
fn with_external<R>(object: &JsObjectType, f: impl FnOnce(&ExternalObject) -> R) -> Result<R, JErrorType> {
    let o = object.borrow();
    let ext = o.as_external().ok_or_else(not_external)?;
    Ok(f(ext))
}

/// `[[Get]]` on an external object.
pub fn get(
    ctx: &mut EvalContext,
    object: &JsObjectType,
    key: &PropertyKey,
    receiver: &JsValue,
) -> Result<JsValue, JErrorType> {
    let plan = {
        let o = object.borrow();
        let ext = o.as_external().ok_or_else(not_external)?;
        if let Some(pd) = ext.get_own_property(key) {
            return Ok(pd.value.clone());
        }
        match ext.template(key) {
            Some(SlotDescriptor {
                kind: SlotProperty::Value(v),
                ..
            }) => return Ok(v.clone()),
            Some(template) => ReadPlan::Lazy(template.clone()),
            None => match ext.slot().catch_all() {
                Some(c) if !ext.is_masked(key) => ReadPlan::CatchAll(c.clone()),
                _ => return Ok(JsValue::Undefined),
            },
        }
    };
    match plan {
        ReadPlan::Lazy(template) => lazy_read(ctx, object, key, &template, receiver),
        ReadPlan::CatchAll(catch_all) => match resolve_host_ptr(receiver) {
            Some(host) => {
                tracing::trace!(target: "just_bind::trap", %key, "catch-all read");
                Ok(catch_all(ctx, host, key, None)?.unwrap_or(JsValue::Undefined))
            }
            None => Ok(JsValue::Undefined),
        },
    }
}

/// Read path of the lazy property trap.
///
/// Resolves the host pointer on the receiver; without one the result is
/// `undefined` and nothing is cached. Otherwise the template is materialized
/// and promoted into the own table of `object` under `key`. The promotion is
/// the last step, after every allocation succeeded.
pub fn lazy_read(
    ctx: &mut EvalContext,
    object: &JsObjectType,
    key: &PropertyKey,
    template: &SlotDescriptor,
    receiver: &JsValue,
) -> Result<JsValue, JErrorType> {
    let host = match resolve_host_ptr(receiver) {
        Some(host) => host,
        None => return Ok(JsValue::Undefined),
    };
    let descriptor_bytes = mem::size_of::<PropertyDescriptor>();
    let (value, attributes, charged) = match &template.kind {
        SlotProperty::Value(v) => return Ok(v.clone()),
        SlotProperty::Nested { offset } => {
            let (prototype, index, shared) =
                with_external(object, |ext| (ext.prototype().clone(), ext.slot_index(), ext.is_shared()))?;
            let child = prototype.child_index(index, *offset).map_err(|e| {
                tracing::error!(target: "just_bind::trap", %key, "{}", e);
                e
            })?;
            let attributes = match prototype.slot(child) {
                Some(slot) => slot.default_attributes(),
                None => return Err(JErrorType::InternalError(format!("missing slot {}", child))),
            };
            ctx.heap.allocate(descriptor_bytes)?;
            // Same host pointer at every level: the child interprets it.
            let child_object = match new_external_object(&mut ctx.heap, prototype, child, host, shared) {
                Ok(child_object) => child_object,
                Err(e) => {
                    ctx.heap.deallocate(descriptor_bytes);
                    return Err(e);
                }
            };
            (
                JsValue::Object(child_object),
                attributes,
                descriptor_bytes + mem::size_of::<ExternalObject>(),
            )
        }
        SlotProperty::Dynamic { handler, magic32 } => {
            let value = handler.call(ctx, host, *magic32, None)?;
            ctx.heap.allocate(descriptor_bytes)?;
            (value, template.attributes, descriptor_bytes)
        }
    };
    match promote(object, key, PropertyDescriptor::new(value, attributes)) {
        Ok(Promoted::Inserted(value)) => Ok(value),
        Ok(Promoted::Existing(value)) => {
            ctx.heap.deallocate(charged);
            Ok(value)
        }
        Err(e) => {
            ctx.heap.deallocate(charged);
            Err(e)
        }
    }
}

enum Promoted {
    Inserted(JsValue),
    Existing(JsValue),
}

fn promote(object: &JsObjectType, key: &PropertyKey, descriptor: PropertyDescriptor) -> Result<Promoted, JErrorType> {
    let mut o = object.borrow_mut();
    let ext = o.as_external_mut().ok_or_else(not_external)?;
    // A re-entrant read of the same key may already have promoted it.
    if let Some(existing) = ext.get_own_property(key) {
        return Ok(Promoted::Existing(existing.value.clone()));
    }
    let value = descriptor.value.clone();
    ext.get_object_base_mut().properties.insert(key.clone(), descriptor);
    tracing::trace!(target: "just_bind::trap", %key, "promoted lazy property");
    Ok(Promoted::Inserted(value))
}

/// Write path of the lazy property trap: the value is taken as-is, without
/// consulting any host handler, and stored as a plain own data property of
/// this instance. The shared template stays untouched.
pub fn lazy_write(
    ctx: &mut EvalContext,
    object: &JsObjectType,
    key: &PropertyKey,
    attributes: PropertyAttributes,
    value: JsValue,
) -> Result<bool, JErrorType> {
    ctx.heap.allocate_for::<PropertyDescriptor>(1)?;
    let mut o = object.borrow_mut();
    let ext = o.as_external_mut().ok_or_else(not_external)?;
    ext.get_object_base_mut()
        .properties
        .insert(key.clone(), PropertyDescriptor::new(value, attributes));
    tracing::trace!(target: "just_bind::trap", %key, "demoted lazy property to own slot");
    Ok(true)
}

/// `[[Set]]` on an external object. Returns `false` when the write is refused.
pub fn set(ctx: &mut EvalContext, object: &JsObjectType, key: &PropertyKey, value: JsValue) -> Result<bool, JErrorType> {
    let plan = {
        let o = object.borrow();
        let ext = o.as_external().ok_or_else(not_external)?;
        if let Some(pd) = ext.get_own_property(key) {
            if !pd.writable {
                return Ok(false);
            }
            WritePlan::Own
        } else if let Some(template) = ext.template(key) {
            if !template.attributes.writable {
                return Ok(false);
            }
            WritePlan::Demote(template.attributes)
        } else if !ext.is_extensible() {
            return Ok(false);
        } else {
            match ext.slot().catch_all() {
                Some(c) if !ext.is_masked(key) => WritePlan::CatchAll(c.clone()),
                _ => WritePlan::Define,
            }
        }
    };
    match plan {
        WritePlan::Own => {
            let mut o = object.borrow_mut();
            let ext = o.as_external_mut().ok_or_else(not_external)?;
            Ok(ext.set_own(key.clone(), value))
        }
        WritePlan::Demote(attributes) => lazy_write(ctx, object, key, attributes, value),
        WritePlan::CatchAll(catch_all) => {
            let host = with_external(object, ExternalObject::host_ptr)?;
            tracing::trace!(target: "just_bind::trap", %key, "catch-all write");
            if catch_all(ctx, host, key, Some(value.clone()))?.is_some() {
                Ok(true)
            } else {
                define_plain(ctx, object, key, value)
            }
        }
        WritePlan::Define => define_plain(ctx, object, key, value),
    }
}

fn define_plain(ctx: &mut EvalContext, object: &JsObjectType, key: &PropertyKey, value: JsValue) -> Result<bool, JErrorType> {
    ctx.heap.allocate_for::<PropertyDescriptor>(1)?;
    let mut o = object.borrow_mut();
    let ext = o.as_external_mut().ok_or_else(not_external)?;
    Ok(ext.define_own_property(key.clone(), PropertyDescriptor::new(value, PropertyAttributes::ALL)))
}

/// `[[Delete]]` on an external object. A deleted template is hidden for this
/// instance only.
pub fn delete(object: &JsObjectType, key: &PropertyKey) -> Result<bool, JErrorType> {
    let mut o = object.borrow_mut();
    let ext = o.as_external_mut().ok_or_else(not_external)?;
    let configurable = match (ext.get_own_property(key), ext.template(key)) {
        (Some(pd), _) => pd.configurable,
        (None, Some(template)) => template.attributes.configurable,
        (None, None) => true,
    };
    if !configurable {
        return Ok(false);
    }
    ext.get_object_base_mut().properties.shift_remove(key);
    if ext.slot().shared_properties().contains_key(key) {
        ext.mask(key.clone());
    }
    Ok(true)
}

/// `[[HasProperty]]`; consults the catch-all for unknown keys.
pub fn has_property(ctx: &mut EvalContext, object: &JsObjectType, key: &PropertyKey) -> Result<bool, JErrorType> {
    let (found, catch_all, host) = with_external(object, |ext| {
        let found = ext.get_own_property(key).is_some() || ext.template(key).is_some();
        let catch_all = if ext.is_masked(key) {
            None
        } else {
            ext.slot().catch_all().cloned()
        };
        (found, catch_all, ext.host_ptr())
    })?;
    if found {
        return Ok(true);
    }
    match catch_all {
        Some(catch_all) => Ok(catch_all(ctx, host, key, None)?.is_some()),
        None => Ok(false),
    }
}

/// Own property descriptor. Lazy templates are materialized (and promoted)
/// so the descriptor carries the real value.
pub fn get_own_property(
    ctx: &mut EvalContext,
    object: &JsObjectType,
    key: &PropertyKey,
) -> Result<Option<PropertyDescriptor>, JErrorType> {
    let plan = {
        let o = object.borrow();
        let ext = o.as_external().ok_or_else(not_external)?;
        if let Some(pd) = ext.get_own_property(key) {
            return Ok(Some(pd.clone()));
        }
        match ext.template(key) {
            Some(SlotDescriptor {
                kind: SlotProperty::Value(v),
                attributes,
            }) => return Ok(Some(PropertyDescriptor::new(v.clone(), *attributes))),
            Some(template) => ReadPlan::Lazy(template.clone()),
            None => match ext.slot().catch_all() {
                Some(c) if !ext.is_masked(key) => ReadPlan::CatchAll(c.clone()),
                _ => return Ok(None),
            },
        }
    };
    match plan {
        ReadPlan::Lazy(template) => {
            let receiver = JsValue::Object(object.clone());
            lazy_read(ctx, object, key, &template, &receiver)?;
            with_external(object, |ext| ext.get_own_property(key).cloned())
        }
        ReadPlan::CatchAll(catch_all) => {
            let host = with_external(object, ExternalObject::host_ptr)?;
            Ok(catch_all(ctx, host, key, None)?.map(|v| PropertyDescriptor::new(v, PropertyAttributes::ALL)))
        }
    }
}

/// Own keys: templates in definition order (skipping deleted ones), keys
/// added on this instance, then keys reported by the slot's enumerator.
pub fn own_property_keys(ctx: &mut EvalContext, object: &JsObjectType) -> Result<Vec<PropertyKey>, JErrorType> {
    let (mut keys, enumerator, host) = collect_static_keys(object)?;
    if let Some(enumerator) = enumerator {
        for key in enumerator(ctx, host)? {
            keys.insert(key);
        }
    }
    Ok(order_property_keys(keys))
}

/// Own keys whose descriptor is enumerable. Enumerator-reported keys count
/// as enumerable.
pub fn enumerable_own_keys(ctx: &mut EvalContext, object: &JsObjectType) -> Result<Vec<PropertyKey>, JErrorType> {
    let (keys, enumerator, host) = collect_static_keys(object)?;
    let mut result: IndexSet<PropertyKey> = with_external(object, |ext| {
        keys.into_iter()
            .filter(|key| match ext.get_own_property(key) {
                Some(pd) => pd.enumerable,
                None => ext.template(key).map_or(false, |t| t.attributes.enumerable),
            })
            .collect()
    })?;
    if let Some(enumerator) = enumerator {
        for key in enumerator(ctx, host)? {
            result.insert(key);
        }
    }
    Ok(order_property_keys(result))
}

fn collect_static_keys(
    object: &JsObjectType,
) -> Result<(IndexSet<PropertyKey>, Option<KeyEnumeratorFn>, HostPtr), JErrorType> {
    with_external(object, |ext| {
        let mut keys = IndexSet::new();
        for key in ext.shared_properties().keys() {
            if !ext.is_masked(key) || ext.get_own_property(key).is_some() {
                keys.insert(key.clone());
            }
        }
        for key in ext.own_properties().keys() {
            keys.insert(key.clone());
        }
        (keys, ext.slot().key_enumerator().cloned(), ext.host_ptr())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::binding::builder::build_entries;
    use crate::runner::binding::definition::{DefinitionEntry, ObjectDefinition, PropertyHandler};
    use crate::runner::binding::instance::instantiate;
    use crate::runner::ds::heap::{Heap, HeapConfig};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_handler(counter: Rc<Cell<usize>>) -> PropertyHandler {
        PropertyHandler::from_closure(move |_ctx, _host, magic32, _write| {
            counter.set(counter.get() + 1);
            Ok(JsValue::from(magic32 as i64 * 6))
        })
    }

    fn instance(ctx: &mut EvalContext, entries: Vec<DefinitionEntry>) -> JsObjectType {
        let proto = build_entries(&mut ctx.heap, entries).unwrap();
        match instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_addr(0xbeef), false).unwrap() {
            JsValue::Object(o) => o,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_dynamic_property_promotes_once() {
        let mut ctx = EvalContext::new();
        let calls = Rc::new(Cell::new(0));
        let obj = instance(&mut ctx, vec![DefinitionEntry::dynamic("x", counting_handler(calls.clone()), 7)]);
        let receiver = JsValue::Object(obj.clone());
        let key = PropertyKey::from("x");

        assert_eq!(get(&mut ctx, &obj, &key, &receiver).unwrap(), JsValue::from(42));
        assert_eq!(get(&mut ctx, &obj, &key, &receiver).unwrap(), JsValue::from(42));
        assert_eq!(calls.get(), 1);
        assert!(obj.borrow().as_external().unwrap().own_properties().contains_key(&key));
    }

    #[test]
    fn test_receiver_without_host_reads_undefined() {
        let mut ctx = EvalContext::new();
        let calls = Rc::new(Cell::new(0));
        let obj = instance(&mut ctx, vec![DefinitionEntry::dynamic("x", counting_handler(calls.clone()), 1)]);
        let key = PropertyKey::from("x");

        assert_eq!(get(&mut ctx, &obj, &key, &JsValue::Null).unwrap(), JsValue::Undefined);
        assert_eq!(calls.get(), 0);
        assert!(obj.borrow().as_external().unwrap().own_properties().is_empty());
    }

    #[test]
    fn test_promotion_out_of_memory_leaves_own_table_unchanged() {
        let mut ctx = EvalContext::new();
        let obj = instance(
            &mut ctx,
            vec![DefinitionEntry::object("child", ObjectDefinition::default())],
        );
        ctx.heap = Heap::new(HeapConfig::with_limit(0));
        let receiver = JsValue::Object(obj.clone());
        let result = get(&mut ctx, &obj, &PropertyKey::from("child"), &receiver);
        assert_eq!(result, Err(JErrorType::OutOfMemory));
        assert!(obj.borrow().as_external().unwrap().own_properties().is_empty());
    }

    #[test]
    fn test_non_writable_template_refuses_write() {
        let mut ctx = EvalContext::new();
        let obj = instance(
            &mut ctx,
            vec![DefinitionEntry::property("ro", "1").with_attributes(PropertyAttributes::NONE)],
        );
        let key = PropertyKey::from("ro");
        assert!(!set(&mut ctx, &obj, &key, JsValue::from(2)).unwrap());
        assert!(!delete(&obj, &key).unwrap());
        let receiver = JsValue::Object(obj.clone());
        assert_eq!(get(&mut ctx, &obj, &key, &receiver).unwrap(), JsValue::from("1"));
    }

    #[test]
    fn test_delete_masks_template_for_instance() {
        let mut ctx = EvalContext::new();
        let obj = instance(&mut ctx, vec![DefinitionEntry::property("v", "1")]);
        let key = PropertyKey::from("v");
        let receiver = JsValue::Object(obj.clone());

        assert!(delete(&obj, &key).unwrap());
        assert_eq!(get(&mut ctx, &obj, &key, &receiver).unwrap(), JsValue::Undefined);
        assert!(!has_property(&mut ctx, &obj, &key).unwrap());
        assert!(own_property_keys(&mut ctx, &obj).unwrap().is_empty());

        assert!(set(&mut ctx, &obj, &key, JsValue::from(5)).unwrap());
        assert_eq!(get(&mut ctx, &obj, &key, &receiver).unwrap(), JsValue::from(5));
    }
}
