use super::{Related, Source};
use serde_json::Value;

// Plain associative values: objects answer field and relation lookups,
// everything else answers nothing.
impl Source for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.as_object()?.get(name).cloned()
    }

    fn relation(&self, name: &str) -> Option<Related<'_>> {
        self.as_object()?.get(name).map(Related::from_value)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}
