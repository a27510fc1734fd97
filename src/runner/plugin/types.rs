//! Core types for the plugin architecture.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::heap::Heap;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::config::EngineConfig;
use crate::runner::plugin::resolver::PluginResolver;
use crate::runner::plugin::super_global::SuperGlobalEnvironment;

pub type SharedSuperGlobal = Rc<RefCell<SuperGlobalEnvironment>>;

/// Execution context passed to native functions, property handlers and
/// resolvers.
pub struct EvalContext {
    /// Allocation budget for everything the binding layer creates.
    pub heap: Heap,
    super_global: SharedSuperGlobal,
}

impl EvalContext {
    pub fn new() -> Self {
        EvalContext {
            heap: Heap::default(),
            super_global: Rc::new(RefCell::new(SuperGlobalEnvironment::new())),
        }
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        EvalContext {
            heap: Heap::new(config.heap.clone()),
            ..EvalContext::new()
        }
    }

    pub fn super_global(&self) -> &SharedSuperGlobal {
        &self.super_global
    }

    pub fn add_resolver(&mut self, resolver: Box<dyn PluginResolver>) {
        self.super_global.borrow_mut().add_resolver(resolver);
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.super_global.borrow().has_name(name)
    }

    /// Resolves a global name through the super-global scope.
    pub fn get_binding(&mut self, name: &str) -> Result<JsValue, JErrorType> {
        let super_global = self.super_global.clone();
        let mut env = super_global.borrow_mut();
        env.resolve_binding(name, self)
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}
