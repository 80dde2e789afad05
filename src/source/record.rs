use super::{Related, Source};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// A getter-style accessor computed from the record's own fields.
pub type Accessor = fn(&Record) -> Value;

/// A relation slot on a [`Record`].
#[derive(Debug, Clone)]
pub enum Relation {
    Null,
    One(Box<Record>),
    Many(Vec<Record>),
}

/// An in-memory domain record: named fields, getter accessors and relations.
///
/// Records stand in for ORM models when the data is already materialized,
/// and are what the test fixtures are built from.
#[derive(Clone, Default)]
pub struct Record {
    model: String,
    fields: IndexMap<String, Value>,
    accessors: IndexMap<String, Accessor>,
    relations: IndexMap<String, Relation>,
}

impl Record {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_accessor(mut self, name: impl Into<String>, accessor: Accessor) -> Self {
        self.accessors.insert(name.into(), accessor);
        self
    }

    pub fn with_one(mut self, name: impl Into<String>, related: Record) -> Self {
        self.relations
            .insert(name.into(), Relation::One(Box::new(related)));
        self
    }

    pub fn with_many(mut self, name: impl Into<String>, related: Vec<Record>) -> Self {
        self.relations.insert(name.into(), Relation::Many(related));
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.relations.insert(name.into(), Relation::Null);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The record's `id` field, if it has one.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Source for Record {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn accessor(&self, name: &str) -> Option<Value> {
        self.accessors.get(name).map(|accessor| accessor(self))
    }

    fn relation(&self, name: &str) -> Option<Related<'_>> {
        self.relations.get(name).map(|relation| match relation {
            Relation::Null => Related::Null,
            Relation::One(record) => Related::One(&**record),
            Relation::Many(records) => Related::Many(
                records
                    .iter()
                    .map(|record| Some(record as &dyn Source))
                    .collect(),
            ),
        })
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("model", &self.model)
            .field("fields", &self.fields)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .field("relations", &self.relations)
            .finish()
    }
}
