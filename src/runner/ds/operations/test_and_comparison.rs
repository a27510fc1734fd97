use std::rc::Rc;

use crate::runner::ds::value::{JsNumberType, JsValue};

fn number_as_f64(n: &JsNumberType) -> f64 {
    match n {
        JsNumberType::Integer(i) => *i as f64,
        JsNumberType::Float(f) => *f,
        JsNumberType::NaN => f64::NAN,
        JsNumberType::PositiveInfinity => f64::INFINITY,
        JsNumberType::NegativeInfinity => f64::NEG_INFINITY,
    }
}

fn is_same_value(a: &JsValue, b: &JsValue, strict_mode: bool) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) | (JsValue::Null, JsValue::Null) => true,
        (JsValue::Number(JsNumberType::NaN), JsValue::Number(JsNumberType::NaN)) => !strict_mode,
        (JsValue::Number(na), JsValue::Number(nb)) => number_as_f64(na) == number_as_f64(nb),
        (JsValue::String(sa), JsValue::String(sb)) => sa == sb,
        (JsValue::Boolean(ba), JsValue::Boolean(bb)) => ba == bb,
        (JsValue::Symbol(sa), JsValue::Symbol(sb)) => sa == sb,
        (JsValue::Object(oa), JsValue::Object(ob)) => Rc::ptr_eq(oa, ob),
        _ => false,
    }
}

pub fn same_value(a: &JsValue, b: &JsValue) -> bool {
    is_same_value(a, b, false)
}

pub fn strict_equality_comparison(a: &JsValue, b: &JsValue) -> bool {
    is_same_value(a, b, true)
}
