use crate::runner::binding::definition::ExternFn;
use crate::runner::ds::object::{JsObject, ObjectBase, ObjectType};
use crate::runner::ds::value::JsValue;

/// A host method bound with its magic tag.
///
/// One native function may back many bindings; the tag tells them apart.
/// Built once per prototype by the slot builder and shared by every
/// instance of that prototype.
pub struct NativeFunctionObject {
    name: String,
    func: ExternFn,
    magic: i32,
    object_base: ObjectBase,
}
impl NativeFunctionObject {
    pub fn new(name: impl Into<String>, func: ExternFn, magic: i32) -> Self {
        NativeFunctionObject {
            name: name.into(),
            func,
            magic,
            object_base: ObjectBase::new(),
        }
    }

    pub fn new_value(name: impl Into<String>, func: ExternFn, magic: i32) -> JsValue {
        JsValue::new_object(ObjectType::Function(Self::new(name, func, magic)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn magic(&self) -> i32 {
        self.magic
    }

    /// Detaches the callable parts so the caller can release its borrow of
    /// the function object before running host code.
    pub fn callable(&self) -> (ExternFn, i32) {
        (self.func.clone(), self.magic)
    }
}
impl JsObject for NativeFunctionObject {
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
        format!("function {}() {{ [native code] }}", self.name)
    }
}
