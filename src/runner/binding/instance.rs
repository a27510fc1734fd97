//! Instance factory and external pointer accessor.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::runner::binding::host::HostPtr;
use crate::runner::binding::slot::{Prototype, PrototypeSlot, SharedPropertyMap, SlotDescriptor};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::heap::Heap;
use crate::runner::ds::object::{JsObject, ObjectBase, ObjectType};
use crate::runner::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runner::ds::value::{JsObjectType, JsValue};
use indexmap::IndexMap;

/// A script object wrapping a host pointer.
///
/// The object base holds the instance's own table: promoted and written
/// properties. Everything else is read through the shared slot it points at.
pub struct ExternalObject {
    object_base: ObjectBase,
    prototype: Rc<Prototype>,
    slot: usize,
    host: HostPtr,
    shared: bool,
    /// Templates deleted on this instance.
    masked: HashSet<PropertyKey>,
}
impl ExternalObject {
    pub fn prototype(&self) -> &Rc<Prototype> {
        &self.prototype
    }

    pub fn slot_index(&self) -> usize {
        self.slot
    }

    pub fn slot(&self) -> &PrototypeSlot {
        debug_assert!(self.slot < self.prototype.slot_count());
        &self.prototype[self.slot]
    }

    pub fn host_ptr(&self) -> HostPtr {
        self.host
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    pub fn shared_properties(&self) -> &SharedPropertyMap {
        &self.slot().shared
    }

    pub fn own_properties(&self) -> &IndexMap<PropertyKey, PropertyDescriptor> {
        &self.object_base.properties
    }

    /// The shared template for `key`, unless deleted on this instance.
    pub fn template(&self, key: &PropertyKey) -> Option<&SlotDescriptor> {
        if self.masked.contains(key) {
            None
        } else {
            self.slot().shared.get(key)
        }
    }

    pub(crate) fn mask(&mut self, key: PropertyKey) {
        self.masked.insert(key);
    }

    pub(crate) fn is_masked(&self, key: &PropertyKey) -> bool {
        self.masked.contains(key)
    }
}
impl JsObject for ExternalObject {
    fn get_object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.object_base
    }

    fn get_object_base(&self) -> &ObjectBase {
        &self.object_base
    }

    fn as_super_trait(&self) -> &dyn JsObject {
        self
    }

    fn as_super_trait_mut(&mut self) -> &mut dyn JsObject {
        self
    }

    fn to_string(&self) -> String {
        format!("[object External({:?})]", self.host)
    }
}

/// Wraps `host` in a script object backed by the root slot of `prototype`.
///
/// O(1): the definition table is not consulted. `shared` is recorded for the
/// surrounding object model and has no effect on lookup.
pub fn instantiate(
    heap: &mut Heap,
    prototype: Option<&Rc<Prototype>>,
    host: HostPtr,
    shared: bool,
) -> Result<JsValue, JErrorType> {
    let prototype = match prototype {
        Some(p) if !p.is_empty() => p,
        _ => return Err(JErrorType::InvalidPrototype),
    };
    let object = new_external_object(heap, prototype.clone(), 0, host, shared)?;
    tracing::debug!(target: "just_bind::instance", host = ?host, shared, "instantiated external object");
    Ok(JsValue::Object(object))
}

pub(crate) fn new_external_object(
    heap: &mut Heap,
    prototype: Rc<Prototype>,
    slot: usize,
    host: HostPtr,
    shared: bool,
) -> Result<JsObjectType, JErrorType> {
    if prototype.slot(slot).is_none() {
        return Err(JErrorType::InternalError(format!(
            "slot {} is outside a prototype of {} slots",
            slot,
            prototype.slot_count()
        )));
    }
    heap.allocate_for::<ExternalObject>(1)?;
    let object = ExternalObject {
        object_base: ObjectBase::new(),
        prototype,
        slot,
        host,
        shared,
        masked: HashSet::new(),
    };
    Ok(Rc::new(RefCell::new(ObjectType::External(object))))
}

/// The host pointer wrapped by `value`, or `None` for anything that is not
/// an external object.
pub fn resolve_host_ptr(value: &JsValue) -> Option<HostPtr> {
    match value {
        JsValue::Object(o) => o.borrow().as_external().map(ExternalObject::host_ptr),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::binding::builder::build_entries;
    use crate::runner::binding::definition::DefinitionEntry;
    use crate::runner::ds::heap::HeapConfig;
    use crate::runner::ds::object::SimpleObject;

    #[test]
    fn test_instantiate_null_prototype() {
        let mut heap = Heap::default();
        let host = HostPtr::from_addr(0x10);
        assert_eq!(
            instantiate(&mut heap, None, host, false),
            Err(JErrorType::InvalidPrototype)
        );
        let empty = Rc::new(Prototype::default());
        assert_eq!(
            instantiate(&mut heap, Some(&empty), host, false),
            Err(JErrorType::InvalidPrototype)
        );
    }

    #[test]
    fn test_instantiate_stores_pointer_verbatim() {
        let mut heap = Heap::default();
        let proto = build_entries(&mut heap, vec![DefinitionEntry::property("v", "1")]).unwrap();
        let obj = instantiate(&mut heap, Some(&proto), HostPtr::null(), true).unwrap();
        assert_eq!(resolve_host_ptr(&obj), Some(HostPtr::null()));
        let o = obj.as_object().unwrap().borrow();
        let ext = o.as_external().unwrap();
        assert!(ext.is_shared());
        assert_eq!(ext.slot_index(), 0);
        assert!(ext.own_properties().is_empty());
    }

    #[test]
    fn test_instantiate_out_of_memory() {
        let mut heap = Heap::default();
        let proto = build_entries(&mut heap, vec![]).unwrap();
        let mut tight = Heap::new(HeapConfig::with_limit(1));
        assert_eq!(
            instantiate(&mut tight, Some(&proto), HostPtr::from_addr(1), false),
            Err(JErrorType::OutOfMemory)
        );
    }

    #[test]
    fn test_resolve_host_ptr_misses() {
        assert_eq!(resolve_host_ptr(&JsValue::from(3)), None);
        assert_eq!(resolve_host_ptr(&JsValue::Undefined), None);
        let plain = JsValue::new_object(ObjectType::Ordinary(Box::new(SimpleObject::new())));
        assert_eq!(resolve_host_ptr(&plain), None);
    }
}
