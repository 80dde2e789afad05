//! Common test utilities: fixture data, fixture transformers and a store
//! that records every relation load it is asked for.
use ahash::AHashSet;
use henkan::prelude::*;
use serde_json::{Value, json};
use std::sync::Mutex;

/// A store that tracks which relations are loaded per object, keyed by the
/// object's `id` field, and records every `load_relations` call.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingStore {
    loaded: Mutex<AHashSet<(String, String)>>,
    calls: Mutex<Vec<Vec<String>>>,
    failure: Option<StoreError>,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every load fails with `error`.
    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// The paths requested by each `load_relations` call, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn identity(object: &dyn Source) -> String {
        object
            .field("id")
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    fn mark(&self, object: &dyn Source, path: &str) {
        let (head, rest) = split(path);
        self.loaded
            .lock()
            .unwrap()
            .insert((Self::identity(object), head.to_string()));
        if let (Some(rest), Some(related)) = (rest, object.relation(head)) {
            for child in related.objects() {
                self.mark(child, rest);
            }
        }
    }

    fn check(&self, object: &dyn Source, path: &str) -> bool {
        let (head, rest) = split(path);
        let key = (Self::identity(object), head.to_string());
        if !self.loaded.lock().unwrap().contains(&key) {
            return false;
        }
        match (rest, object.relation(head)) {
            (Some(rest), Some(related)) => related
                .objects()
                .into_iter()
                .all(|child| self.check(child, rest)),
            _ => true,
        }
    }
}

fn split(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

impl ObjectStore for RecordingStore {
    fn is_relation_loaded(&self, object: &dyn Source, path: &str) -> bool {
        self.check(object, path)
    }

    fn load_relations(&self, objects: &[&dyn Source], paths: &[String]) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(paths.to_vec());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        for object in objects {
            for path in paths {
                self.mark(*object, path);
            }
        }
        Ok(())
    }
}

/// Renders the `body` of a comment.
#[allow(dead_code)]
pub struct CommentTransformer;

impl Transformer for CommentTransformer {
    fn name(&self) -> &str {
        "comments"
    }

    fn structure(&self) -> Result<Structure, SpecError> {
        Structure::builder().field("body").build()
    }
}

/// Renders a post with its comments and declares `comments` for preloading.
#[allow(dead_code)]
pub struct PostTransformer;

impl Transformer for PostTransformer {
    fn name(&self) -> &str {
        "posts"
    }

    fn structure(&self) -> Result<Structure, SpecError> {
        Structure::builder()
            .field("title")
            .transform("comments", CommentTransformer)
            .build()
    }

    fn minimal_structure(&self) -> Result<Structure, SpecError> {
        Structure::builder().field("title").build()
    }

    fn preload(&self) -> Preloads {
        Preloads::new().with("comments")
    }
}

/// Renders a user with a computed `fullname` and their posts.
#[allow(dead_code)]
pub struct UserTransformer {
    pub preload: Preloads,
}

#[allow(dead_code)]
impl UserTransformer {
    /// Declares `posts` with [`PRELOAD_RELATED`].
    pub fn related() -> Self {
        Self {
            preload: Preloads::new().insert("posts", PRELOAD_RELATED),
        }
    }

    /// Declares `posts` as a plain relation.
    pub fn plain() -> Self {
        Self {
            preload: Preloads::new().with("posts"),
        }
    }
}

impl Transformer for UserTransformer {
    fn name(&self) -> &str {
        "users"
    }

    fn structure(&self) -> Result<Structure, SpecError> {
        Structure::builder()
            .field("id")
            .field("fullname")
            .transform("posts", PostTransformer)
            .build()
    }

    fn preload(&self) -> Preloads {
        self.preload.clone()
    }

    fn get(&self, key: &str, object: &dyn Source) -> Option<Value> {
        match key {
            "fullname" => {
                let first = object.field("first_name")?;
                let last = object.field("last_name")?;
                Some(json!(format!(
                    "{} {}",
                    first.as_str().unwrap_or_default(),
                    last.as_str().unwrap_or_default()
                )))
            }
            _ => None,
        }
    }
}

/// Two users, each with posts, each post with comments. Ids are unique
/// across the whole tree.
#[allow(dead_code)]
pub fn users() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "posts": [
                { "id": 10, "title": "Notes", "comments": [{ "id": 100, "body": "first" }] },
                { "id": 11, "title": "Engines", "comments": [] }
            ]
        }),
        json!({
            "id": 2,
            "first_name": "Alan",
            "last_name": "Turing",
            "posts": [
                { "id": 20, "title": "Machines", "comments": [{ "id": 200, "body": "halt" }] }
            ]
        }),
    ]
}

/// The expected full output for [`users`].
#[allow(dead_code)]
pub fn users_output() -> Value {
    json!([
        {
            "id": 1,
            "fullname": "Ada Lovelace",
            "posts": [
                { "title": "Notes", "comments": [{ "body": "first" }] },
                { "title": "Engines", "comments": [] }
            ]
        },
        {
            "id": 2,
            "fullname": "Alan Turing",
            "posts": [
                { "title": "Machines", "comments": [{ "body": "halt" }] }
            ]
        }
    ])
}

/// A definition exercising every declarative rule kind.
#[allow(dead_code)]
pub const ACCOUNTS_DEFINITION: &str = r#"{
    "name": "accounts",
    "fields": [
        { "key": "id", "rule": "copy" },
        { "key": "handle", "rule": "rename", "from": "username" },
        { "key": "profile", "rule": "group", "fields": [
            { "key": "email", "rule": "copy" },
            { "key": "country", "rule": "format", "format": { "kind": "uppercase" } }
        ]},
        { "key": "status", "rule": "map",
          "table": [{ "from": "active", "to": "Active" }, { "from": "blocked", "to": "Blocked" }],
          "default": "Unknown" },
        { "key": "joined", "rule": "format", "from": "created_at",
          "format": { "kind": "date", "pattern": "%d.%m.%Y" } },
        { "key": "roles", "rule": "transform", "preload_related": true,
          "transformer": {
              "name": "roles",
              "fields": [
                  { "key": "id", "rule": "copy" },
                  { "key": "label", "rule": "rename", "from": "name" },
                  { "key": "level", "rule": "copy" }
              ],
              "minimal": ["label", "level"],
              "preload": ["permissions"],
              "order_by": ["level", "desc"]
          },
          "minimal": true }
    ],
    "minimal": ["id", "handle"],
    "preload": ["settings"],
    "order_by": "id",
    "null_state": { "missing": true }
}"#;

/// An account matching [`ACCOUNTS_DEFINITION`].
#[allow(dead_code)]
pub fn account(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "username": format!("user{}", id),
        "email": format!("user{}@example.com", id),
        "country": "de",
        "status": status,
        "created_at": "2024-03-09",
        "roles": [
            { "id": id * 100 + 1, "name": "reader", "level": 1 },
            { "id": id * 100 + 2, "name": "admin", "level": 9 }
        ]
    })
}
