//! External bindings: exposing host functions, properties and nested
//! namespaces as script objects.
//!
//! ```text
//! DefinitionEntry table ──build──▶ Rc<Prototype> (slot array, shared)
//!                                        │
//!                 HostPtr ──instantiate──▶ ExternalObject (own table empty)
//!                                        │
//!                          property read ▶ trap: materialize + promote
//! ```
//!
//! - [`definition`]: host-authored tables
//! - [`builder`]: counting and population passes
//! - [`instance`]: instance factory and host pointer accessor
//! - [`trap`]: lazy property trap and two-level lookup

pub mod builder;
pub mod definition;
pub mod host;
pub mod instance;
pub mod slot;
pub mod trap;

pub use builder::{build, build_entries, count_slots};
pub use definition::{DefinitionEntry, DefinitionKind, ExternFn, ObjectDefinition, PropertyHandler, PropertyPayload};
pub use host::HostPtr;
pub use instance::{instantiate, resolve_host_ptr, ExternalObject};
pub use slot::{Prototype, PrototypeSlot, SlotDescriptor, SlotProperty};
