//! Plugin resolver trait for lazy, dynamic resolution of super-global objects.
//!
//! Resolvers provide named globals (like `fs` or `process`) that are
//! materialized only when script code actually references them.

use crate::runner::ds::error::JErrorType;
use crate::runner::ds::value::JsValue;
use crate::runner::plugin::types::EvalContext;

/// A plugin resolver that can dynamically provide named objects.
///
/// Resolvers are queried in registration order when a name lookup reaches the
/// super-global scope. The first resolver that claims a name wins.
pub trait PluginResolver {
    /// Does this resolver provide a binding with the given name?
    ///
    /// This should be a cheap check. It must NOT allocate or materialize the object.
    fn has_binding(&self, name: &str) -> bool;

    /// Materialize the object for the given name.
    ///
    /// Called only after `has_binding` returns `true`. The returned value is
    /// cached by the super-global environment, so this runs at most once per
    /// name.
    fn resolve(&self, name: &str, ctx: &mut EvalContext) -> Result<JsValue, JErrorType>;

    /// Human-readable name for this resolver (for logging).
    fn name(&self) -> &str;
}
