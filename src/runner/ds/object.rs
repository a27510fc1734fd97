use indexmap::IndexMap;

use crate::runner::binding::instance::ExternalObject;
use crate::runner::ds::function_object::NativeFunctionObject;
use crate::runner::ds::object_property::{PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::runner::ds::value::JsObjectType;

pub enum ObjectType {
    Ordinary(Box<dyn JsObject>),
    Function(NativeFunctionObject),
    /// Wrapper around an opaque host pointer, backed by a shared prototype slot.
    External(ExternalObject),
}
impl ObjectType {
    pub fn is_callable(&self) -> bool {
        matches!(self, ObjectType::Function(_))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, ObjectType::External(_))
    }

    pub fn as_js_object(&self) -> &dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o.as_super_trait(),
            ObjectType::Function(o) => o,
            ObjectType::External(o) => o,
        }
    }

    pub fn as_js_object_mut(&mut self) -> &mut dyn JsObject {
        match self {
            ObjectType::Ordinary(o) => o.as_super_trait_mut(),
            ObjectType::Function(o) => o,
            ObjectType::External(o) => o,
        }
    }

    pub fn as_function(&self) -> Option<&NativeFunctionObject> {
        match self {
            ObjectType::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_external(&self) -> Option<&ExternalObject> {
        match self {
            ObjectType::External(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_external_mut(&mut self) -> Option<&mut ExternalObject> {
        match self {
            ObjectType::External(e) => Some(e),
            _ => None,
        }
    }
}

pub struct ObjectBase {
    pub(crate) properties: IndexMap<PropertyKey, PropertyDescriptor>,
    is_extensible: bool,
    prototype: Option<JsObjectType>,
}
impl ObjectBase {
    pub fn new() -> Self {
        ObjectBase {
            properties: IndexMap::new(),
            is_extensible: true,
            prototype: None,
        }
    }

    pub fn with_prototype(prototype: Option<JsObjectType>) -> Self {
        ObjectBase {
            prototype,
            ..ObjectBase::new()
        }
    }
}
impl Default for ObjectBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordinary own-property behaviour shared by every object kind. Prototype
/// walks and the external two-level lookup live in `operations::object`
/// because they may need the evaluation context.
pub trait JsObject {
    fn get_object_base_mut(&mut self) -> &mut ObjectBase;

    fn get_object_base(&self) -> &ObjectBase;

    fn as_super_trait(&self) -> &dyn JsObject;

    fn as_super_trait_mut(&mut self) -> &mut dyn JsObject;

    fn get_prototype_of(&self) -> Option<JsObjectType> {
        self.get_object_base().prototype.clone()
    }

    fn set_prototype_slot(&mut self, prototype: Option<JsObjectType>) {
        self.get_object_base_mut().prototype = prototype;
    }

    fn is_extensible(&self) -> bool {
        self.get_object_base().is_extensible
    }

    fn prevent_extensions(&mut self) -> bool {
        self.get_object_base_mut().is_extensible = false;
        true
    }

    fn get_own_property(&self, property: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.get_object_base().properties.get(property)
    }

    /// Defines or redefines an own data property. Non-configurable
    /// properties only accept a value change while writable.
    fn define_own_property(&mut self, property: PropertyKey, descriptor: PropertyDescriptor) -> bool {
        match self.get_own_property(&property) {
            None => {
                if !self.is_extensible() {
                    return false;
                }
            }
            Some(current) => {
                if !current.configurable
                    && (current.attributes() != descriptor.attributes()
                        || (!current.writable && current != &descriptor))
                {
                    return false;
                }
            }
        }
        self.get_object_base_mut()
            .properties
            .insert(property, descriptor);
        true
    }

    /// Ordinary `[[Set]]` against own properties only.
    fn set_own(&mut self, property: PropertyKey, value: crate::runner::ds::value::JsValue) -> bool {
        match self.get_object_base_mut().properties.get_mut(&property) {
            Some(pd) => {
                if pd.writable {
                    pd.value = value;
                    true
                } else {
                    false
                }
            }
            None => self.define_own_property(
                property,
                PropertyDescriptor::new(value, PropertyAttributes::ALL),
            ),
        }
    }

    fn delete(&mut self, property: &PropertyKey) -> bool {
        match self.get_own_property(property) {
            None => true,
            Some(pd) => {
                if pd.is_configurable() {
                    self.get_object_base_mut().properties.shift_remove(property);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn own_property_keys(&self) -> Vec<PropertyKey> {
        order_property_keys(self.get_object_base().properties.keys().cloned())
    }

    fn to_string(&self) -> String {
        "[object Object]".to_string()
    }
}

/// Integer keys ascending, then string keys, then symbols, each group
/// keeping its incoming order.
pub fn order_property_keys<I: IntoIterator<Item = PropertyKey>>(keys: I) -> Vec<PropertyKey> {
    let mut int_keys = vec![];
    let mut str_keys = vec![];
    let mut sym_keys = vec![];
    for key in keys {
        match key {
            PropertyKey::Int(_) => int_keys.push(key),
            PropertyKey::Str(_) => str_keys.push(key),
            PropertyKey::Sym(_) => sym_keys.push(key),
        }
    }
    int_keys.sort_by_key(|k| match k {
        PropertyKey::Int(i) => *i,
        _ => 0,
    });
    int_keys.append(&mut str_keys);
    int_keys.append(&mut sym_keys);
    int_keys
}

/// A plain script object.
pub struct SimpleObject {
    object_base: ObjectBase,
}
impl SimpleObject {
    pub fn new() -> Self {
        SimpleObject {
            object_base: ObjectBase::new(),
        }
    }

    pub fn with_prototype(prototype: Option<JsObjectType>) -> Self {
        SimpleObject {
            object_base: ObjectBase::with_prototype(prototype),
        }
    }
}
impl Default for SimpleObject {
    fn default() -> Self {
        Self::new()
    }
}
impl JsObject for SimpleObject {
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
}
