//! Binding resolver: exposes host objects as super-global names.
//!
//! Each name maps to a built prototype and the host pointer to wrap. The
//! wrapper is instantiated on first reference; the super-global environment
//! caches it from then on.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::runner::binding::host::HostPtr;
use crate::runner::binding::instance::instantiate;
use crate::runner::binding::slot::Prototype;
use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::resolver::PluginResolver;
use crate::runner::plugin::types::EvalContext;

struct GlobalBinding {
    prototype: Rc<Prototype>,
    host: HostPtr,
    shared: bool,
}

pub struct BindingResolver {
    name: String,
    bindings: IndexMap<String, GlobalBinding>,
}

impl BindingResolver {
    pub fn new(name: impl Into<String>) -> Self {
        BindingResolver {
            name: name.into(),
            bindings: IndexMap::new(),
        }
    }

    /// Exposes `host` wrapped by `prototype` under the global `name`.
    /// A later registration of the same name replaces the earlier one.
    pub fn expose(mut self, name: impl Into<String>, prototype: Rc<Prototype>, host: HostPtr, shared: bool) -> Self {
        self.bindings.insert(
            name.into(),
            GlobalBinding {
                prototype,
                host,
                shared,
            },
        );
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

impl PluginResolver for BindingResolver {
    fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    fn resolve(&self, name: &str, ctx: &mut EvalContext) -> Result<JsValue, JErrorType> {
        match self.bindings.get(name) {
            Some(binding) => instantiate(&mut ctx.heap, Some(&binding.prototype), binding.host, binding.shared),
            None => Err(JErrorType::ReferenceError(format!(
                "{} is not defined",
                name
            ))),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
