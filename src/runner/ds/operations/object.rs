use std::rc::Rc;

use crate::runner::binding::trap;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::{JsObject, ObjectType};
use crate::runner::ds::object_property::{PropertyDescriptor, PropertyKey};
use crate::runner::ds::operations::type_conversion::canonical_string_key;
use crate::runner::ds::value::{JsObjectType, JsValue};
use crate::runner::plugin::types::EvalContext;

pub fn get(ctx: &mut EvalContext, o: &JsObjectType, p: &PropertyKey) -> Result<JsValue, JErrorType> {
    get_with_receiver(ctx, o, p, &JsValue::Object(o.clone()))
}

/// `[[Get]]` with an explicit receiver, walking the prototype chain.
/// External objects hand over to the lazy property trap.
pub fn get_with_receiver(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
    receiver: &JsValue,
) -> Result<JsValue, JErrorType> {
    let mut current = o.clone();
    loop {
        let next = {
            let object = current.borrow();
            if object.is_external() {
                None
            } else {
                let js_object = object.as_js_object();
                if let Some(pd) = js_object.get_own_property(p) {
                    return Ok(pd.value.clone());
                }
                match js_object.get_prototype_of() {
                    Some(proto) => Some(proto),
                    None => return Ok(JsValue::Undefined),
                }
            }
        };
        match next {
            Some(proto) => current = proto,
            None => return trap::get(ctx, &current, p, receiver),
        }
    }
}

pub fn get_v(ctx: &mut EvalContext, v: &JsValue, p: &PropertyKey) -> Result<JsValue, JErrorType> {
    match v {
        JsValue::Object(o) => get_with_receiver(ctx, o, p, v),
        JsValue::Undefined | JsValue::Null => Err(JErrorType::TypeError(format!(
            "cannot read property '{}' of {}",
            p, v
        ))),
        _ => Ok(JsValue::Undefined),
    }
}

pub fn get_method(ctx: &mut EvalContext, v: &JsValue, p: &PropertyKey) -> Result<JsValue, JErrorType> {
    let f = get_v(ctx, v, p)?;
    match &f {
        JsValue::Undefined | JsValue::Null => Ok(JsValue::Undefined),
        JsValue::Object(o) if o.borrow().is_callable() => Ok(f),
        _ => Err(JErrorType::TypeError(format!("'{}' is not a function", p))),
    }
}

/// Reads a dotted path such as `fs.stat.size`. Each segment is a canonical
/// property key.
pub fn get_path(ctx: &mut EvalContext, v: &JsValue, path: &str) -> Result<JsValue, JErrorType> {
    let mut value = v.clone();
    for segment in path.split('.') {
        value = get_v(ctx, &value, &canonical_string_key(segment))?;
    }
    Ok(value)
}

/// `[[Set]]` on `o` itself. Returns `false` when the write is refused.
pub fn set(ctx: &mut EvalContext, o: &JsObjectType, p: PropertyKey, value: JsValue) -> Result<bool, JErrorType> {
    if o.borrow().is_external() {
        return trap::set(ctx, o, &p, value);
    }
    if o.borrow().as_js_object().get_own_property(&p).is_none() {
        ctx.heap.allocate_for::<PropertyDescriptor>(1)?;
    }
    Ok(o.borrow_mut().as_js_object_mut().set_own(p, value))
}

pub fn delete(o: &JsObjectType, p: &PropertyKey) -> Result<bool, JErrorType> {
    if o.borrow().is_external() {
        return trap::delete(o, p);
    }
    Ok(o.borrow_mut().as_js_object_mut().delete(p))
}

pub fn has_property(ctx: &mut EvalContext, o: &JsObjectType, p: &PropertyKey) -> Result<bool, JErrorType> {
    let mut current = o.clone();
    loop {
        let next = {
            let object = current.borrow();
            if object.is_external() {
                None
            } else {
                let js_object = object.as_js_object();
                if js_object.get_own_property(p).is_some() {
                    return Ok(true);
                }
                match js_object.get_prototype_of() {
                    Some(proto) => Some(proto),
                    None => return Ok(false),
                }
            }
        };
        match next {
            Some(proto) => current = proto,
            None => return trap::has_property(ctx, &current, p),
        }
    }
}

pub fn get_own_property(
    ctx: &mut EvalContext,
    o: &JsObjectType,
    p: &PropertyKey,
) -> Result<Option<PropertyDescriptor>, JErrorType> {
    if o.borrow().is_external() {
        return trap::get_own_property(ctx, o, p);
    }
    Ok(o.borrow().as_js_object().get_own_property(p).cloned())
}

pub fn own_property_keys(ctx: &mut EvalContext, o: &JsObjectType) -> Result<Vec<PropertyKey>, JErrorType> {
    if o.borrow().is_external() {
        return trap::own_property_keys(ctx, o);
    }
    Ok(o.borrow().as_js_object().own_property_keys())
}

/// Keys visited by `for-in` / `Object.keys`: own and enumerable.
pub fn enumerable_own_keys(ctx: &mut EvalContext, o: &JsObjectType) -> Result<Vec<PropertyKey>, JErrorType> {
    if o.borrow().is_external() {
        return trap::enumerable_own_keys(ctx, o);
    }
    let object = o.borrow();
    let js_object = object.as_js_object();
    Ok(js_object
        .own_property_keys()
        .into_iter()
        .filter(|k| js_object.get_own_property(k).map_or(false, |pd| pd.enumerable))
        .collect())
}

/// Sets the prototype of an ordinary object, refusing cycles.
pub fn set_prototype_of(o: &JsObjectType, prototype: Option<JsObjectType>) -> bool {
    if o.borrow().is_external() {
        return prototype.is_none();
    }
    let mut p = prototype.clone();
    while let Some(some_p) = p {
        if Rc::ptr_eq(&some_p, o) {
            // To prevent circular chain
            return false;
        }
        p = some_p.borrow().as_js_object().get_prototype_of();
    }
    let mut object = o.borrow_mut();
    if !object.as_js_object().is_extensible() {
        return false;
    }
    object.as_js_object_mut().set_prototype_slot(prototype);
    true
}

/// Calls `f` with `this`. Native methods receive `this`'s host pointer.
pub fn call(ctx: &mut EvalContext, f: &JsValue, this: &JsValue, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    let callable = match f {
        JsValue::Object(o) => match &*o.borrow() {
            ObjectType::Function(func) => Some(func.callable()),
            _ => None,
        },
        _ => None,
    };
    match callable {
        Some((func, magic)) => {
            let host = crate::runner::binding::instance::resolve_host_ptr(this);
            func.call(ctx, host, magic, args)
        }
        None => Err(JErrorType::TypeError(format!("{} is not a function", f))),
    }
}

/// `v[p](...args)` with `v` as `this`.
pub fn invoke(ctx: &mut EvalContext, v: &JsValue, p: &PropertyKey, args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
    let f = get_v(ctx, v, p)?;
    call(ctx, &f, v, args)
}
