use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A unique symbol. Two symbols are equal only if they come from the same
/// `SymbolData::new` call, regardless of description.
#[derive(Debug, Clone)]
pub struct SymbolData {
    id: Uuid,
    description: String,
}

impl SymbolData {
    pub fn new(description: impl Into<String>) -> Self {
        SymbolData {
            id: Uuid::new_v4(),
            description: description.into(),
        }
    }

    pub fn new_empty() -> Self {
        Self::new("")
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
impl PartialEq for SymbolData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for SymbolData {}
impl Hash for SymbolData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl Display for SymbolData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

/* Well known symbols */
lazy_static! {
    pub static ref SYMBOL_HAS_INSTANCE: SymbolData = SymbolData::new("Symbol.hasInstance");
    pub static ref SYMBOL_ITERATOR: SymbolData = SymbolData::new("Symbol.iterator");
    pub static ref SYMBOL_TO_PRIMITIVE: SymbolData = SymbolData::new("Symbol.toPrimitive");
    pub static ref SYMBOL_TO_STRING_TAG: SymbolData = SymbolData::new("Symbol.toStringTag");
    static ref WELL_KNOWN_SYMBOLS: HashMap<&'static str, SymbolData> = {
        let mut m = HashMap::new();
        m.insert("Symbol.hasInstance", SYMBOL_HAS_INSTANCE.clone());
        m.insert("Symbol.iterator", SYMBOL_ITERATOR.clone());
        m.insert("Symbol.toPrimitive", SYMBOL_TO_PRIMITIVE.clone());
        m.insert("Symbol.toStringTag", SYMBOL_TO_STRING_TAG.clone());
        m
    };
}

/// Looks up a well known symbol by its spelled-out name, e.g. `Symbol.iterator`.
pub fn well_known_symbol(name: &str) -> Option<SymbolData> {
    WELL_KNOWN_SYMBOLS.get(name).cloned()
}
