//! # just-bind - External Bindings for the just engine
//!
//! Exposes host data and host functions to script code:
//! - Declarative definition tables (methods, literal and dynamic properties, nested namespaces)
//! - Shared, build-once prototypes laid out as a flat slot array
//! - O(1) wrapping of opaque host pointers
//! - Lazy materialization of nested namespaces and dynamic properties, promoted once per instance
//! - TOML binding manifests and lazy super-global exposure
//!
//! ## Quick Start
//!
//! ### Building a prototype and wrapping a host pointer
//!
//! ```
//! use just_bind::runner::binding::{build, instantiate, DefinitionEntry, HostPtr, ObjectDefinition};
//! use just_bind::runner::ds::object_property::PropertyKey;
//! use just_bind::runner::ds::operations::object::get_v;
//! use just_bind::runner::ds::value::JsValue;
//! use just_bind::runner::plugin::types::EvalContext;
//!
//! let mut ctx = EvalContext::new();
//! let table = ObjectDefinition::new(vec![
//!     DefinitionEntry::property("version", "1.0"),
//!     DefinitionEntry::object("stat", ObjectDefinition::new(vec![
//!         DefinitionEntry::property("kind", "file"),
//!     ])),
//! ]);
//! let proto = build(&mut ctx.heap, &table).unwrap();
//! assert_eq!(proto.slot_count(), 2);
//!
//! let host_data = 0u32;
//! let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::from_ref(&host_data), false).unwrap();
//!
//! let version = get_v(&mut ctx, &obj, &PropertyKey::from("version")).unwrap();
//! assert_eq!(version, JsValue::from("1.0"));
//! ```
//!
//! ### Host methods
//!
//! Methods receive the host pointer of `this` and the magic tag they were
//! registered with, so one native function can serve several bindings:
//!
//! ```
//! use just_bind::runner::binding::{build_entries, instantiate, DefinitionEntry, HostPtr};
//! use just_bind::runner::ds::error::JErrorType;
//! use just_bind::runner::ds::object_property::PropertyKey;
//! use just_bind::runner::ds::operations::object::invoke;
//! use just_bind::runner::ds::value::JsValue;
//! use just_bind::runner::plugin::types::EvalContext;
//!
//! fn scaled(_ctx: &mut EvalContext, host: Option<HostPtr>, magic: i32, _args: Vec<JsValue>) -> Result<JsValue, JErrorType> {
//!     let base = match host {
//!         Some(h) => unsafe { *h.cast::<i64>() },
//!         None => return Err(JErrorType::TypeError("not a counter".to_string())),
//!     };
//!     Ok(JsValue::from(base * magic as i64))
//! }
//!
//! let mut ctx = EvalContext::new();
//! let proto = build_entries(&mut ctx.heap, vec![
//!     DefinitionEntry::method("double", scaled, 2),
//!     DefinitionEntry::method("triple", scaled, 3),
//! ]).unwrap();
//! let mut counter = 7i64;
//! let obj = instantiate(&mut ctx.heap, Some(&proto), HostPtr::new(&mut counter as *mut i64), false).unwrap();
//!
//! let result = invoke(&mut ctx, &obj, &PropertyKey::from("triple"), vec![]).unwrap();
//! assert_eq!(result, JsValue::from(21));
//! ```
//!
//! ## Lazy Property Trap
//!
//! Nested namespaces and handler-backed properties are not created when an
//! instance is made. The first read materializes them and stores the result
//! in the instance's own property table; later reads hit that entry directly.
//! Writes to a templated key replace it with a plain own data property on
//! that instance only. The shared prototype is never mutated after building.
//!
//! ## Architecture
//!
//! - **[`runner::binding`]** - Definition tables, slot builder, instance factory, lazy trap
//! - **[`runner::ds`]** - Data structures (values, objects, property keys, heap accounting)
//! - **[`runner::plugin`]** - Engine config, TOML manifests, super-global exposure

#[macro_use]
extern crate lazy_static;

pub mod runner;
