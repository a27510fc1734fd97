use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::runner::binding::definition::{CatchAllFn, KeyEnumeratorFn, PropertyHandler};
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object_property::{PropertyAttributes, PropertyKey};
use crate::runner::ds::value::JsValue;

/// What a shared template resolves to.
#[derive(Clone, Debug)]
pub enum SlotProperty {
    /// Eager value: a native method object or a literal string.
    Value(JsValue),
    /// Host accessor run on first read, then cached per instance.
    Dynamic {
        handler: PropertyHandler,
        magic32: i32,
    },
    /// Nested namespace living `offset` slots after the owning slot.
    Nested { offset: usize },
}

/// A template descriptor inside a shared table. Never mutated after build.
#[derive(Clone, Debug)]
pub struct SlotDescriptor {
    pub attributes: PropertyAttributes,
    pub kind: SlotProperty,
}
impl SlotDescriptor {
    pub fn is_lazy(&self) -> bool {
        !matches!(self.kind, SlotProperty::Value(_))
    }
}

pub type SharedPropertyMap = IndexMap<PropertyKey, SlotDescriptor>;

/// One namespace level: its shared templates and defaults.
pub struct PrototypeSlot {
    pub(crate) shared: SharedPropertyMap,
    default_attributes: PropertyAttributes,
    catch_all: Option<CatchAllFn>,
    key_enumerator: Option<KeyEnumeratorFn>,
}
impl PrototypeSlot {
    pub(crate) fn new(
        default_attributes: PropertyAttributes,
        catch_all: Option<CatchAllFn>,
        key_enumerator: Option<KeyEnumeratorFn>,
    ) -> Self {
        PrototypeSlot {
            shared: SharedPropertyMap::new(),
            default_attributes,
            catch_all,
            key_enumerator,
        }
    }

    pub fn shared_properties(&self) -> &SharedPropertyMap {
        &self.shared
    }

    pub fn default_attributes(&self) -> PropertyAttributes {
        self.default_attributes
    }

    pub fn catch_all(&self) -> Option<&CatchAllFn> {
        self.catch_all.as_ref()
    }

    pub fn key_enumerator(&self) -> Option<&KeyEnumeratorFn> {
        self.key_enumerator.as_ref()
    }
}

/// The built, immutable slot array. Slot 0 is the root namespace.
pub struct Prototype {
    slots: Vec<PrototypeSlot>,
}
impl Prototype {
    pub(crate) fn from_slots(slots: Vec<PrototypeSlot>) -> Self {
        Prototype { slots }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&PrototypeSlot> {
        self.slots.get(index)
    }

    pub fn root(&self) -> Option<&PrototypeSlot> {
        self.slots.first()
    }

    /// Resolves a nested template's relative offset against its owning slot.
    pub fn child_index(&self, index: usize, offset: usize) -> Result<usize, JErrorType> {
        match index.checked_add(offset) {
            Some(child) if offset > 0 && child < self.slots.len() => Ok(child),
            _ => Err(JErrorType::InternalError(format!(
                "nested offset {} from slot {} is outside a prototype of {} slots",
                offset,
                index,
                self.slots.len()
            ))),
        }
    }
}

fn attribute_flags(a: PropertyAttributes) -> String {
    format!(
        "{}{}{}",
        if a.writable { 'w' } else { '-' },
        if a.enumerable { 'e' } else { '-' },
        if a.configurable { 'c' } else { '-' }
    )
}

/// Slot-by-slot layout, one template per line.
impl Index<usize> for Prototype {
    type Output = PrototypeSlot;

    fn index(&self, index: usize) -> &PrototypeSlot {
        &self.slots[index]
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "prototype: {} slot(s)", self.slots.len())?;
        for (index, slot) in self.slots.iter().enumerate() {
            write!(f, "slot {} [{}]", index, attribute_flags(slot.default_attributes))?;
            if slot.catch_all.is_some() {
                write!(f, " catch-all")?;
            }
            if slot.key_enumerator.is_some() {
                write!(f, " enumerator")?;
            }
            writeln!(f)?;
            for (key, descriptor) in &slot.shared {
                let kind = match &descriptor.kind {
                    SlotProperty::Value(JsValue::Object(_)) => "method".to_string(),
                    SlotProperty::Value(v) => format!("value {}", v),
                    SlotProperty::Dynamic { magic32, .. } => format!("dynamic magic={}", magic32),
                    SlotProperty::Nested { offset } => format!("object -> slot {} (+{})", index + offset, offset),
                };
                writeln!(f, "  {} [{}] {}", key, attribute_flags(descriptor.attributes), kind)?;
            }
        }
        Ok(())
    }
}

impl Default for Prototype {
    /// The null prototype handle; instantiating it fails.
    fn default() -> Self {
        Prototype { slots: Vec::new() }
    }
}
