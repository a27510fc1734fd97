use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::operations::test_and_comparison::same_value;
use crate::runner::ds::operations::type_conversion::canonical_string_key;
use crate::runner::ds::symbol::SymbolData;
use crate::runner::ds::value::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Str(String),
    Int(u32),
    Sym(SymbolData),
}
impl Display for PropertyKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Str(s) => write!(f, "{}", s),
            PropertyKey::Int(i) => write!(f, "{}", i),
            PropertyKey::Sym(s) => write!(f, "{}", s),
        }
    }
}
/// Array-index strings become `Int` keys, the same way script lookups see them.
impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        canonical_string_key(s)
    }
}
impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        match canonical_string_key(&s) {
            PropertyKey::Str(_) => PropertyKey::Str(s),
            key => key,
        }
    }
}
impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        PropertyKey::Int(i)
    }
}
impl From<SymbolData> for PropertyKey {
    fn from(s: SymbolData) -> Self {
        PropertyKey::Sym(s)
    }
}

/// The writable/enumerable/configurable triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyAttributes {
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}
impl PropertyAttributes {
    pub const ALL: PropertyAttributes = PropertyAttributes {
        writable: true,
        enumerable: true,
        configurable: true,
    };
    pub const NONE: PropertyAttributes = PropertyAttributes {
        writable: false,
        enumerable: false,
        configurable: false,
    };
    /// Built-in method flavour: hidden from enumeration.
    pub const METHOD: PropertyAttributes = PropertyAttributes {
        writable: true,
        enumerable: false,
        configurable: true,
    };

    pub fn new(writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyAttributes {
            writable,
            enumerable,
            configurable,
        }
    }
}
impl Default for PropertyAttributes {
    fn default() -> Self {
        PropertyAttributes::ALL
    }
}

/// A concrete data property.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: JsValue,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}
impl PropertyDescriptor {
    pub fn new(value: JsValue, attributes: PropertyAttributes) -> Self {
        PropertyDescriptor {
            value,
            writable: attributes.writable,
            enumerable: attributes.enumerable,
            configurable: attributes.configurable,
        }
    }

    pub fn attributes(&self) -> PropertyAttributes {
        PropertyAttributes::new(self.writable, self.enumerable, self.configurable)
    }

    pub fn is_enumerable(&self) -> bool {
        self.enumerable
    }

    pub fn is_configurable(&self) -> bool {
        self.configurable
    }
}
impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        same_value(&self.value, &other.value) && self.attributes() == other.attributes()
    }
}
