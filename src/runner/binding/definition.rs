//! Host-authored definition tables.
//!
//! A definition table is an ordered list of entries; each entry names a
//! method, a property (literal or handler-backed) or a nested object
//! namespace. Tables are consumed by the slot builder and never mutated.

use std::fmt;
use std::rc::Rc;

use crate::runner::binding::host::HostPtr;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object_property::{PropertyAttributes, PropertyKey};
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

/// Native method signature: host pointer of `this`, magic tag, arguments.
pub type MethodFn = fn(
    ctx: &mut EvalContext,
    host: Option<HostPtr>,
    magic: i32,
    args: Vec<JsValue>,
) -> Result<JsValue, JErrorType>;

/// Dynamic property signature: host pointer, magic32 tag, write value
/// (`None` for reads).
pub type PropertyHandlerFn = fn(
    ctx: &mut EvalContext,
    host: HostPtr,
    magic32: i32,
    write: Option<JsValue>,
) -> Result<JsValue, JErrorType>;

/// Catch-all for keys absent from every table of a slot. `Ok(None)` means
/// "no such key" on read and "not handled" on write.
pub type CatchAllFn = Rc<
    dyn Fn(&mut EvalContext, HostPtr, &PropertyKey, Option<JsValue>) -> Result<Option<JsValue>, JErrorType>,
>;

/// Lists the dynamic keys a catch-all namespace currently exposes.
pub type KeyEnumeratorFn = Rc<dyn Fn(&mut EvalContext, HostPtr) -> Result<Vec<PropertyKey>, JErrorType>>;

/// A host method - either a plain function pointer or a closure.
#[derive(Clone)]
pub enum ExternFn {
    Native(MethodFn),
    Plugin(
        Rc<dyn Fn(&mut EvalContext, Option<HostPtr>, i32, Vec<JsValue>) -> Result<JsValue, JErrorType>>,
    ),
}
impl ExternFn {
    pub fn from_closure<F>(f: F) -> Self
    where
        F: Fn(&mut EvalContext, Option<HostPtr>, i32, Vec<JsValue>) -> Result<JsValue, JErrorType>
            + 'static,
    {
        ExternFn::Plugin(Rc::new(f))
    }

    pub fn call(
        &self,
        ctx: &mut EvalContext,
        host: Option<HostPtr>,
        magic: i32,
        args: Vec<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        match self {
            ExternFn::Native(f) => f(ctx, host, magic, args),
            ExternFn::Plugin(f) => f(ctx, host, magic, args),
        }
    }
}
impl fmt::Debug for ExternFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternFn::Native(p) => write!(f, "ExternFn::Native({:p})", *p as *const ()),
            ExternFn::Plugin(_) => write!(f, "ExternFn::Plugin"),
        }
    }
}

/// A dynamic property accessor - either a plain function pointer or a closure.
#[derive(Clone)]
pub enum PropertyHandler {
    Native(PropertyHandlerFn),
    Plugin(Rc<dyn Fn(&mut EvalContext, HostPtr, i32, Option<JsValue>) -> Result<JsValue, JErrorType>>),
}
impl PropertyHandler {
    pub fn from_closure<F>(f: F) -> Self
    where
        F: Fn(&mut EvalContext, HostPtr, i32, Option<JsValue>) -> Result<JsValue, JErrorType> + 'static,
    {
        PropertyHandler::Plugin(Rc::new(f))
    }

    pub fn call(
        &self,
        ctx: &mut EvalContext,
        host: HostPtr,
        magic32: i32,
        write: Option<JsValue>,
    ) -> Result<JsValue, JErrorType> {
        match self {
            PropertyHandler::Native(f) => f(ctx, host, magic32, write),
            PropertyHandler::Plugin(f) => f(ctx, host, magic32, write),
        }
    }
}
impl fmt::Debug for PropertyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyHandler::Native(p) => write!(f, "PropertyHandler::Native({:p})", *p as *const ()),
            PropertyHandler::Plugin(_) => write!(f, "PropertyHandler::Plugin"),
        }
    }
}

pub enum PropertyPayload {
    /// Materialized eagerly as a script string.
    Literal(String),
    /// Invoked lazily on first read.
    Handler { handler: PropertyHandler, magic32: i32 },
}

/// A nested namespace. Its entry's attributes become the nested slot's
/// default attributes.
#[derive(Default)]
pub struct ObjectDefinition {
    pub entries: Vec<DefinitionEntry>,
    pub catch_all: Option<CatchAllFn>,
    pub key_enumerator: Option<KeyEnumeratorFn>,
}
impl ObjectDefinition {
    pub fn new(entries: Vec<DefinitionEntry>) -> Self {
        ObjectDefinition {
            entries,
            catch_all: None,
            key_enumerator: None,
        }
    }

    pub fn add(mut self, entry: DefinitionEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn with_catch_all<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut EvalContext, HostPtr, &PropertyKey, Option<JsValue>) -> Result<Option<JsValue>, JErrorType>
            + 'static,
    {
        self.catch_all = Some(Rc::new(f));
        self
    }

    pub fn with_key_enumerator<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut EvalContext, HostPtr) -> Result<Vec<PropertyKey>, JErrorType> + 'static,
    {
        self.key_enumerator = Some(Rc::new(f));
        self
    }
}

pub enum DefinitionKind {
    Method { func: ExternFn, magic: i32 },
    Property(PropertyPayload),
    Object(ObjectDefinition),
}

pub struct DefinitionEntry {
    pub name: PropertyKey,
    pub attributes: PropertyAttributes,
    pub kind: DefinitionKind,
}
impl DefinitionEntry {
    pub fn method(name: impl Into<PropertyKey>, func: MethodFn, magic: i32) -> Self {
        Self::extern_method(name, ExternFn::Native(func), magic)
    }

    pub fn extern_method(name: impl Into<PropertyKey>, func: ExternFn, magic: i32) -> Self {
        DefinitionEntry {
            name: name.into(),
            attributes: PropertyAttributes::METHOD,
            kind: DefinitionKind::Method { func, magic },
        }
    }

    pub fn property(name: impl Into<PropertyKey>, value: impl Into<String>) -> Self {
        DefinitionEntry {
            name: name.into(),
            attributes: PropertyAttributes::ALL,
            kind: DefinitionKind::Property(PropertyPayload::Literal(value.into())),
        }
    }

    pub fn dynamic(name: impl Into<PropertyKey>, handler: PropertyHandler, magic32: i32) -> Self {
        DefinitionEntry {
            name: name.into(),
            attributes: PropertyAttributes::ALL,
            kind: DefinitionKind::Property(PropertyPayload::Handler { handler, magic32 }),
        }
    }

    pub fn object(name: impl Into<PropertyKey>, definition: ObjectDefinition) -> Self {
        DefinitionEntry {
            name: name.into(),
            attributes: PropertyAttributes::ALL,
            kind: DefinitionKind::Object(definition),
        }
    }

    pub fn with_attributes(mut self, attributes: PropertyAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn as_object(&self) -> Option<&ObjectDefinition> {
        match &self.kind {
            DefinitionKind::Object(o) => Some(o),
            _ => None,
        }
    }
}
