//! Binding manifests: definition tables written in TOML.
//!
//! ```toml
//! catch_all = "env_lookup"      # optional, root slot
//! enumerator = "env_keys"       # optional, root slot
//!
//! [[entry]]
//! name = "readFile"
//! kind = "method"
//! function = "fs_read"
//! magic = 1
//!
//! [[entry]]
//! symbol = "Symbol.toStringTag"
//! kind = "property"
//! value = "Host"
//! enumerable = false
//!
//! [[entry]]
//! name = "stat"
//! kind = "object"
//!
//!   [[entry.entry]]
//!   name = "size"
//!   kind = "property"
//!   handler = "stat_size"
//! ```
//!
//! Function names are resolved against a [`HostFunctionTable`]. Attribute
//! flags left out take the defaults of the entry kind.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::runner::binding::builder::build;
use crate::runner::binding::definition::{DefinitionEntry, ObjectDefinition};
use crate::runner::binding::slot::Prototype;
use crate::runner::ds::heap::Heap;
use crate::runner::ds::object_property::{PropertyAttributes, PropertyKey};
use crate::runner::ds::operations::type_conversion::canonical_string_key;
use crate::runner::ds::symbol::well_known_symbol;
use crate::runner::plugin::registry::{ConfigError, HostFunctionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Method,
    Property,
    Object,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub kind: EntryKind,
    /// Literal value of a property entry.
    pub value: Option<String>,
    /// Host method of a method entry.
    pub function: Option<String>,
    /// Host handler of a dynamic property entry.
    pub handler: Option<String>,
    #[serde(default)]
    pub magic: i32,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
    pub catch_all: Option<String>,
    pub enumerator: Option<String>,
    #[serde(default, rename = "entry")]
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingManifest {
    pub catch_all: Option<String>,
    pub enumerator: Option<String>,
    #[serde(default, rename = "entry")]
    pub entries: Vec<ManifestEntry>,
}

impl BindingManifest {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolves every function name and produces the definition table.
    pub fn to_definition(&self, functions: &HostFunctionTable) -> Result<ObjectDefinition, ConfigError> {
        to_object_definition(&self.entries, &self.catch_all, &self.enumerator, functions)
    }

    /// Resolves the manifest and runs the slot builder on it.
    pub fn build(&self, heap: &mut Heap, functions: &HostFunctionTable) -> Result<Rc<Prototype>, ConfigError> {
        let definition = self.to_definition(functions)?;
        Ok(build(heap, &definition)?)
    }
}

fn to_object_definition(
    entries: &[ManifestEntry],
    catch_all: &Option<String>,
    enumerator: &Option<String>,
    functions: &HostFunctionTable,
) -> Result<ObjectDefinition, ConfigError> {
    let mut definition = ObjectDefinition::new(
        entries
            .iter()
            .map(|e| e.to_definition_entry(functions))
            .collect::<Result<Vec<_>, _>>()?,
    );
    if let Some(name) = catch_all {
        definition.catch_all = Some(functions.catch_all(name)?);
    }
    if let Some(name) = enumerator {
        definition.key_enumerator = Some(functions.key_enumerator(name)?);
    }
    Ok(definition)
}

impl ManifestEntry {
    fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.symbol.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidEntry {
            entry: self.label(),
            reason: reason.into(),
        }
    }

    pub fn key(&self) -> Result<PropertyKey, ConfigError> {
        match (&self.name, &self.symbol) {
            (Some(name), None) => Ok(canonical_string_key(name)),
            (None, Some(symbol)) => well_known_symbol(symbol)
                .map(PropertyKey::Sym)
                .ok_or_else(|| self.invalid(format!("'{}' is not a well-known symbol", symbol))),
            (Some(_), Some(_)) => Err(self.invalid("both name and symbol given")),
            (None, None) => Err(self.invalid("missing name or symbol")),
        }
    }

    fn takes_namespace_hooks(&self) -> bool {
        self.catch_all.is_some() || self.enumerator.is_some()
    }

    fn attributes(&self, defaults: PropertyAttributes) -> PropertyAttributes {
        PropertyAttributes::new(
            self.writable.unwrap_or(defaults.writable),
            self.enumerable.unwrap_or(defaults.enumerable),
            self.configurable.unwrap_or(defaults.configurable),
        )
    }

    pub fn to_definition_entry(&self, functions: &HostFunctionTable) -> Result<DefinitionEntry, ConfigError> {
        let key = self.key()?;
        let entry = match self.kind {
            EntryKind::Method => {
                if self.value.is_some() || self.handler.is_some() || !self.entries.is_empty() || self.takes_namespace_hooks()
                {
                    return Err(self.invalid("a method only takes 'function' and 'magic'"));
                }
                let name = self
                    .function
                    .as_ref()
                    .ok_or_else(|| self.invalid("method without 'function'"))?;
                DefinitionEntry::extern_method(key, functions.method(name)?, self.magic)
            }
            EntryKind::Property => {
                if self.function.is_some() || !self.entries.is_empty() {
                    return Err(self.invalid("a property takes either 'value' or 'handler'"));
                }
                if self.takes_namespace_hooks() {
                    return Err(self.invalid("'catch_all' and 'enumerator' belong on objects"));
                }
                match (&self.value, &self.handler) {
                    (Some(value), None) => DefinitionEntry::property(key, value.as_str()),
                    (None, Some(handler)) => DefinitionEntry::dynamic(key, functions.handler(handler)?, self.magic),
                    _ => return Err(self.invalid("a property takes exactly one of 'value' or 'handler'")),
                }
            }
            EntryKind::Object => {
                if self.value.is_some() || self.handler.is_some() || self.function.is_some() {
                    return Err(self.invalid("an object only takes nested entries"));
                }
                DefinitionEntry::object(
                    key,
                    to_object_definition(&self.entries, &self.catch_all, &self.enumerator, functions)?,
                )
            }
        };
        let defaults = entry.attributes;
        Ok(entry.with_attributes(self.attributes(defaults)))
    }
}
