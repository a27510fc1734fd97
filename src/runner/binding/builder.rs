//! Slot builder: turns a definition table into a shared prototype.
//!
//! Two passes. The counting pass sizes the slot vector exactly, so the
//! population pass never reallocates it. Nested namespaces are appended at
//! the end of the vector and referenced by their distance from the owning
//! slot, which stays valid however the vector is later moved.

use std::mem;
use std::rc::Rc;

use crate::runner::binding::definition::{DefinitionEntry, DefinitionKind, ObjectDefinition, PropertyPayload};
use crate::runner::binding::slot::{Prototype, PrototypeSlot, SlotDescriptor, SlotProperty};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::function_object::NativeFunctionObject;
use crate::runner::ds::heap::Heap;
use crate::runner::ds::object_property::{PropertyAttributes, PropertyKey};
use crate::runner::ds::value::JsValue;

/// `1` for this level plus one per `Object` entry, recursively.
pub fn count_slots(entries: &[DefinitionEntry]) -> usize {
    1 + entries
        .iter()
        .filter_map(DefinitionEntry::as_object)
        .map(|o| count_slots(&o.entries))
        .sum::<usize>()
}

/// Builds a prototype whose root slot carries `ALL` default attributes.
pub fn build(heap: &mut Heap, table: &ObjectDefinition) -> Result<Rc<Prototype>, JErrorType> {
    build_with_root_attributes(heap, table, PropertyAttributes::ALL)
}

pub fn build_entries(heap: &mut Heap, entries: Vec<DefinitionEntry>) -> Result<Rc<Prototype>, JErrorType> {
    build(heap, &ObjectDefinition::new(entries))
}

pub fn build_with_root_attributes(
    heap: &mut Heap,
    table: &ObjectDefinition,
    root_attributes: PropertyAttributes,
) -> Result<Rc<Prototype>, JErrorType> {
    let capacity = count_slots(&table.entries);
    heap.allocate_for::<PrototypeSlot>(capacity)?;

    let mut slots = Vec::with_capacity(capacity);
    slots.push(PrototypeSlot::new(
        root_attributes,
        table.catch_all.clone(),
        table.key_enumerator.clone(),
    ));
    populate(heap, &mut slots, 0, &table.entries)?;

    if slots.len() != capacity {
        let msg = format!("built {} slots, counted {}", slots.len(), capacity);
        tracing::error!(target: "just_bind::builder", "{}", msg);
        return Err(JErrorType::InternalError(msg));
    }
    tracing::debug!(
        target: "just_bind::builder",
        slots = capacity,
        root_entries = table.entries.len(),
        "built prototype"
    );
    Ok(Rc::new(Prototype::from_slots(slots)))
}

fn populate(
    heap: &mut Heap,
    slots: &mut Vec<PrototypeSlot>,
    index: usize,
    entries: &[DefinitionEntry],
) -> Result<(), JErrorType> {
    for entry in entries {
        if slots[index].shared.contains_key(&entry.name) {
            return Err(duplicate_key(index, &entry.name));
        }
        heap.allocate_for::<SlotDescriptor>(1)?;
        let kind = match &entry.kind {
            DefinitionKind::Method { func, magic } => {
                heap.allocate_for::<NativeFunctionObject>(1)?;
                SlotProperty::Value(NativeFunctionObject::new_value(
                    entry.name.to_string(),
                    func.clone(),
                    *magic,
                ))
            }
            DefinitionKind::Property(PropertyPayload::Literal(s)) => {
                heap.allocate(mem::size_of::<String>() + s.len())?;
                SlotProperty::Value(JsValue::String(s.clone()))
            }
            DefinitionKind::Property(PropertyPayload::Handler { handler, magic32 }) => {
                SlotProperty::Dynamic {
                    handler: handler.clone(),
                    magic32: *magic32,
                }
            }
            DefinitionKind::Object(def) => {
                let child = slots.len();
                slots.push(PrototypeSlot::new(
                    entry.attributes,
                    def.catch_all.clone(),
                    def.key_enumerator.clone(),
                ));
                populate(heap, slots, child, &def.entries)?;
                SlotProperty::Nested {
                    offset: child - index,
                }
            }
        };
        slots[index].shared.insert(
            entry.name.clone(),
            SlotDescriptor {
                attributes: entry.attributes,
                kind,
            },
        );
    }
    Ok(())
}

fn duplicate_key(index: usize, key: &PropertyKey) -> JErrorType {
    let msg = format!("duplicate binding '{}' in slot {}", key, index);
    tracing::error!(target: "just_bind::builder", "{}", msg);
    JErrorType::InternalError(msg)
}
