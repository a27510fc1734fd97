use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object::ObjectType;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::value::{JsNumberType, JsValue};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_SYMBOL: &str = "symbol";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

pub fn get_type(a: &JsValue) -> &'static str {
    match a {
        JsValue::Undefined => TYPE_STR_UNDEFINED,
        JsValue::Null => TYPE_STR_NULL,
        JsValue::Boolean(_) => TYPE_STR_BOOLEAN,
        JsValue::String(_) => TYPE_STR_STRING,
        JsValue::Symbol(_) => TYPE_STR_SYMBOL,
        JsValue::Number(_) => TYPE_STR_NUMBER,
        JsValue::Object(o) => match *o.borrow() {
            ObjectType::Function(_) => TYPE_STR_FUNCTION,
            ObjectType::Ordinary(_) | ObjectType::External(_) => TYPE_STR_OBJECT,
        },
    }
}

/// Canonical property key for a value: array-index strings and
/// non-negative integers become `Int` keys.
pub fn to_property_key(v: &JsValue) -> Result<PropertyKey, JErrorType> {
    match v {
        JsValue::Symbol(s) => Ok(PropertyKey::Sym(s.clone())),
        JsValue::String(s) => Ok(canonical_string_key(s)),
        JsValue::Number(JsNumberType::Integer(i)) if *i >= 0 && *i < u32::MAX as i64 => {
            Ok(PropertyKey::Int(*i as u32))
        }
        JsValue::Object(_) => Err(JErrorType::TypeError(
            "cannot use an object as a property key".to_string(),
        )),
        JsValue::Number(JsNumberType::Integer(i)) => Ok(PropertyKey::Str(i.to_string())),
        JsValue::Number(JsNumberType::Float(f)) => Ok(canonical_string_key(&f.to_string())),
        JsValue::Number(JsNumberType::NaN) => Ok(PropertyKey::from("NaN")),
        JsValue::Number(JsNumberType::PositiveInfinity) => Ok(PropertyKey::from("Infinity")),
        JsValue::Number(JsNumberType::NegativeInfinity) => Ok(PropertyKey::from("-Infinity")),
        JsValue::Boolean(b) => Ok(PropertyKey::Str(b.to_string())),
        JsValue::Undefined => Ok(PropertyKey::from(TYPE_STR_UNDEFINED)),
        JsValue::Null => Ok(PropertyKey::from(TYPE_STR_NULL)),
    }
}

/// `"12"` becomes `Int(12)`; `"012"` and everything else stays a string.
pub fn canonical_string_key(s: &str) -> PropertyKey {
    match s.parse::<u32>() {
        Ok(i) if i != u32::MAX && i.to_string() == s => PropertyKey::Int(i),
        _ => PropertyKey::Str(s.to_string()),
    }
}
