//! Super-global environment, the bottom of the scope chain.
//!
//! This environment lazily resolves host-provided globals on first access.
//! Values are cached after first resolution so each name is materialized at
//! most once.
//!
//! ```text
//! script: fs.stat.size
//!      ↓
//! 1. Check super-global cache → miss
//! 2. Query resolvers: does anyone provide "fs"?
//! 3. BindingResolver says "yes" and instantiates the wrapper
//! 4. Cache the wrapper
//! 5. `.stat.size` goes through the lazy property trap
//! ```

use std::collections::HashMap;

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::resolver::PluginResolver;
use crate::runner::plugin::types::EvalContext;

/// The super-global environment for lazy resolution of host globals.
///
/// Script code cannot create or modify super-global bindings. It is wrapped
/// in `Rc<RefCell<>>` (see [`SharedSuperGlobal`](super::types::SharedSuperGlobal))
/// inside the evaluation context.
pub struct SuperGlobalEnvironment {
    /// Registered plugin resolvers, queried in order.
    resolvers: Vec<Box<dyn PluginResolver>>,
    /// Cache of already-resolved bindings (name → value).
    cache: HashMap<String, JsValue>,
    /// Cache of which resolver index owns which name.
    resolver_map: HashMap<String, usize>,
}

impl SuperGlobalEnvironment {
    pub fn new() -> Self {
        SuperGlobalEnvironment {
            resolvers: Vec::new(),
            cache: HashMap::new(),
            resolver_map: HashMap::new(),
        }
    }

    /// Register a plugin resolver. Resolvers are queried in registration order.
    pub fn add_resolver(&mut self, resolver: Box<dyn PluginResolver>) {
        tracing::debug!(target: "just_bind::plugin", resolver = resolver.name(), "registered resolver");
        self.resolvers.push(resolver);
    }

    /// Find which resolver (if any) provides the given name.
    fn find_resolver_index(&self, name: &str) -> Option<usize> {
        if let Some(&idx) = self.resolver_map.get(name) {
            return Some(idx);
        }
        self.resolvers.iter().position(|r| r.has_binding(name))
    }

    /// Check if any resolver provides the given name.
    pub fn has_name(&self, name: &str) -> bool {
        self.cache.contains_key(name) || self.find_resolver_index(name).is_some()
    }

    /// Has `name` already been materialized?
    pub fn is_resolved(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Resolve a name, caching the result.
    /// `ctx` is needed because resolvers allocate on its heap.
    pub fn resolve_binding(
        &mut self,
        name: &str,
        ctx: &mut EvalContext,
    ) -> Result<JsValue, JErrorType> {
        if let Some(val) = self.cache.get(name) {
            return Ok(val.clone());
        }

        if let Some(idx) = self.find_resolver_index(name) {
            let value = self.resolvers[idx].resolve(name, ctx)?;
            tracing::debug!(
                target: "just_bind::plugin",
                name,
                resolver = self.resolvers[idx].name(),
                "resolved super-global binding"
            );
            self.cache.insert(name.to_string(), value.clone());
            self.resolver_map.insert(name.to_string(), idx);
            Ok(value)
        } else {
            Err(JErrorType::ReferenceError(format!(
                "{} is not defined",
                name
            )))
        }
    }

    /// Get a reference to the resolvers (for inspection/testing).
    pub fn resolvers(&self) -> &[Box<dyn PluginResolver>] {
        &self.resolvers
    }
}

impl Default for SuperGlobalEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
