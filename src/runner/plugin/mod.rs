//! Host configuration and super-global exposure of bound objects.
//!
//! The super-global scope sits outside the script's lexical environments and
//! provides host objects that are available globally but resolved on demand:
//!
//! ```text
//! Variable Lookup Order:
//! 1. Local scope (function/block)
//! 2. Outer scopes (lexical chain)
//! 3. Global scope
//! 4. Super-global scope ← bound host objects live here
//! ```
//!
//! ### Key Components
//!
//! - **[`PluginResolver`]**: Trait for providing named globals lazily
//! - **[`SuperGlobalEnvironment`]**: Container holding multiple resolvers with caching
//! - **[`BindingResolver`]**: Exposes a built prototype and host pointer under a global name
//! - **[`HostFunctionTable`]**: Named host functions referenced by manifests
//! - **[`BindingManifest`]**: Definition tables written in TOML
//! - **[`EngineConfig`]**: Engine settings (heap budget)
//! - **[`EvalContext`](types::EvalContext)**: Execution context with super-global integration
//!
//! ## Example
//!
//! ```
//! use just_bind::runner::binding::{build_entries, DefinitionEntry, HostPtr};
//! use just_bind::runner::ds::value::JsValue;
//! use just_bind::runner::plugin::{BindingResolver, EvalContext};
//!
//! let mut ctx = EvalContext::new();
//! let proto = build_entries(&mut ctx.heap, vec![DefinitionEntry::property("version", "1.0")]).unwrap();
//! let host = 7u64;
//! ctx.add_resolver(Box::new(
//!     BindingResolver::new("host").expose("process", proto, HostPtr::from_ref(&host), false),
//! ));
//!
//! let process = ctx.get_binding("process").unwrap();
//! assert!(matches!(process, JsValue::Object(_)));
//! ```

pub mod binding_resolver;
pub mod config;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod super_global;
pub mod types;

pub use binding_resolver::BindingResolver;
pub use config::EngineConfig;
pub use manifest::{BindingManifest, EntryKind, ManifestEntry};
pub use registry::{ConfigError, HostFunctionTable};
pub use resolver::PluginResolver;
pub use super_global::SuperGlobalEnvironment;
pub use types::EvalContext;
