//! Host function table: named host functions that binding manifests refer to.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::runner::binding::definition::{CatchAllFn, ExternFn, KeyEnumeratorFn, MethodFn, PropertyHandler, PropertyHandlerFn};
use crate::runner::binding::host::HostPtr;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::object_property::PropertyKey;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

/// Error type for configuration and manifest loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown {kind} function '{name}'")]
    UnknownFunction { kind: &'static str, name: String },
    #[error("invalid entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: String },
    #[error(transparent)]
    Build(#[from] JErrorType),
}

/// Registry of host functions by name, one namespace per calling convention.
pub struct HostFunctionTable {
    methods: HashMap<String, ExternFn>,
    handlers: HashMap<String, PropertyHandler>,
    catch_alls: HashMap<String, CatchAllFn>,
    enumerators: HashMap<String, KeyEnumeratorFn>,
    /// When set, unknown names resolve to inert placeholders instead of
    /// failing. Used to inspect a manifest's layout without its host.
    allow_unbound: bool,
}

impl HostFunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        HostFunctionTable {
            methods: HashMap::new(),
            handlers: HashMap::new(),
            catch_alls: HashMap::new(),
            enumerators: HashMap::new(),
            allow_unbound: false,
        }
    }

    /// A table that binds every unknown name to a placeholder returning
    /// `undefined`.
    pub fn for_inspection() -> Self {
        HostFunctionTable {
            allow_unbound: true,
            ..Self::new()
        }
    }

    pub fn register_method(&mut self, name: impl Into<String>, func: MethodFn) -> &mut Self {
        self.methods.insert(name.into(), ExternFn::Native(func));
        self
    }

    pub fn register_extern_method(&mut self, name: impl Into<String>, func: ExternFn) -> &mut Self {
        self.methods.insert(name.into(), func);
        self
    }

    pub fn register_handler(&mut self, name: impl Into<String>, func: PropertyHandlerFn) -> &mut Self {
        self.handlers.insert(name.into(), PropertyHandler::Native(func));
        self
    }

    pub fn register_property_handler(&mut self, name: impl Into<String>, handler: PropertyHandler) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn register_catch_all<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut EvalContext, HostPtr, &PropertyKey, Option<JsValue>) -> Result<Option<JsValue>, JErrorType>
            + 'static,
    {
        self.catch_alls.insert(name.into(), Rc::new(f));
        self
    }

    pub fn register_key_enumerator<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut EvalContext, HostPtr) -> Result<Vec<PropertyKey>, JErrorType> + 'static,
    {
        self.enumerators.insert(name.into(), Rc::new(f));
        self
    }

    pub fn method(&self, name: &str) -> Result<ExternFn, ConfigError> {
        match self.methods.get(name) {
            Some(f) => Ok(f.clone()),
            None if self.allow_unbound => Ok(ExternFn::Native(unbound_method)),
            None => Err(unknown("method", name)),
        }
    }

    pub fn handler(&self, name: &str) -> Result<PropertyHandler, ConfigError> {
        match self.handlers.get(name) {
            Some(h) => Ok(h.clone()),
            None if self.allow_unbound => Ok(PropertyHandler::Native(unbound_handler)),
            None => Err(unknown("handler", name)),
        }
    }

    pub fn catch_all(&self, name: &str) -> Result<CatchAllFn, ConfigError> {
        match self.catch_alls.get(name) {
            Some(c) => Ok(c.clone()),
            None if self.allow_unbound => Ok(Rc::new(unbound_catch_all)),
            None => Err(unknown("catch-all", name)),
        }
    }

    pub fn key_enumerator(&self, name: &str) -> Result<KeyEnumeratorFn, ConfigError> {
        match self.enumerators.get(name) {
            Some(e) => Ok(e.clone()),
            None if self.allow_unbound => Ok(Rc::new(unbound_enumerator)),
            None => Err(unknown("enumerator", name)),
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }
}

impl Default for HostFunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown(kind: &'static str, name: &str) -> ConfigError {
    ConfigError::UnknownFunction {
        kind,
        name: name.to_string(),
    }
}

fn unbound_method(
    _ctx: &mut EvalContext,
    _host: Option<HostPtr>,
    _magic: i32,
    _args: Vec<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Undefined)
}

fn unbound_handler(
    _ctx: &mut EvalContext,
    _host: HostPtr,
    _magic32: i32,
    _write: Option<JsValue>,
) -> Result<JsValue, JErrorType> {
    Ok(JsValue::Undefined)
}

fn unbound_catch_all(
    _ctx: &mut EvalContext,
    _host: HostPtr,
    _key: &PropertyKey,
    _write: Option<JsValue>,
) -> Result<Option<JsValue>, JErrorType> {
    Ok(None)
}

fn unbound_enumerator(_ctx: &mut EvalContext, _host: HostPtr) -> Result<Vec<PropertyKey>, JErrorType> {
    Ok(vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(_ctx: &mut EvalContext, _host: Option<HostPtr>, magic: i32, _args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
        Ok(JsValue::from(magic as i64))
    }

    #[test]
    fn test_lookup_registered_method() {
        let mut table = HostFunctionTable::new();
        table.register_method("answer", answer);
        assert!(table.has_method("answer"));
        let mut ctx = EvalContext::new();
        let f = table.method("answer").unwrap();
        assert_eq!(f.call(&mut ctx, None, 42, vec![]).unwrap(), JsValue::from(42));
    }

    #[test]
    fn test_unknown_function_is_error() {
        let table = HostFunctionTable::new();
        match table.handler("missing") {
            Err(ConfigError::UnknownFunction { kind, name }) => {
                assert_eq!(kind, "handler");
                assert_eq!(name, "missing");
            }
            _ => panic!("expected UnknownFunction"),
        }
    }

    #[test]
    fn test_inspection_table_binds_placeholders() {
        let table = HostFunctionTable::for_inspection();
        let mut ctx = EvalContext::new();
        let f = table.method("anything").unwrap();
        assert_eq!(f.call(&mut ctx, None, 0, vec![]).unwrap(), JsValue::Undefined);
        assert!(table.catch_all("c").is_ok());
        assert!(table.key_enumerator("e").is_ok());
    }
}
