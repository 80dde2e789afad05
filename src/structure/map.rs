use serde_json::Value;

/// What a [`ValueMap`] yields for raw values missing from its table.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Fallback {
    #[default]
    Null,
    /// A literal default value.
    Literal(Value),
    /// The mapped value of another table entry, looked up by its raw key.
    Entry(Value),
}

/// A literal-to-literal lookup table applied to a resolved raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    source: Option<String>,
    table: Vec<(Value, Value)>,
    fallback: Fallback,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the raw value from `source` instead of the output key.
    pub fn from_field(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn entry(mut self, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        let from = from.into();
        let to = to.into();
        match self.table.iter_mut().find(|(key, _)| *key == from) {
            Some(existing) => existing.1 = to,
            None => self.table.push((from, to)),
        }
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.fallback = Fallback::Literal(value.into());
        self
    }

    /// Falls back to whatever the table maps `entry` to.
    pub fn default_to_entry(mut self, entry: impl Into<Value>) -> Self {
        self.fallback = Fallback::Entry(entry.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    fn lookup(&self, raw: &Value) -> Option<&Value> {
        self.table
            .iter()
            .find(|(from, _)| from == raw)
            .map(|(_, to)| to)
    }

    /// Returns `Err(entry)` when the fallback names an entry the table lacks.
    pub(crate) fn check_fallback(&self) -> Result<(), &Value> {
        match &self.fallback {
            Fallback::Entry(entry) if self.lookup(entry).is_none() => Err(entry),
            _ => Ok(()),
        }
    }

    pub fn apply(&self, raw: &Value) -> Value {
        if let Some(mapped) = self.lookup(raw) {
            return mapped.clone();
        }
        match &self.fallback {
            Fallback::Null => Value::Null,
            Fallback::Literal(value) => value.clone(),
            Fallback::Entry(entry) => self.lookup(entry).cloned().unwrap_or(Value::Null),
        }
    }
}
