// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use once_cell::sync::Lazy;
use tessera::{AttributeSet, Context, Record, Registry, Resolution, Schema, SchemaBuilder, Value};
use tracing::Level;

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Schema helpers ---

/// A builder bound to a fresh registry, so tests never see global registrations.
pub fn builder(set: AttributeSet) -> SchemaBuilder {
  Schema::builder(set).registry(Registry::new())
}

pub fn compile(set: AttributeSet) -> Schema {
  builder(set).compile().expect("schema should compile")
}

pub fn resolve(schema: &Schema, context: &Context) -> Resolution {
  schema.resolve(context).expect("resolution should not raise")
}

pub fn messages(resolution: &Resolution, accessor: &str) -> Vec<String> {
  resolution.errors().for_accessor(accessor).to_vec()
}

// --- Host objects ---

#[derive(Debug, Clone)]
pub struct Account {
  pub id: i64,
  pub email: String,
}

impl Record for Account {
  fn field(&self, name: &str) -> Option<Value> {
    match name {
      "id" => Some(Value::Integer(self.id)),
      "email" => Some(Value::from(self.email.as_str())),
      _ => None,
    }
  }

  fn type_name(&self) -> &str {
    "Account"
  }
}
