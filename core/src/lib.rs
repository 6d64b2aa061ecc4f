// src/lib.rs

//! Tessera: declarative attribute resolution for business-logic tasks.
//!
//! A task declares the attributes it expects; Tessera resolves them against
//! a runtime context before the task's work runs:
//!  - Nested attribute trees, where children read fields off their parent.
//!  - Multiple sources: the context, task methods, closures, delegates and plain objects.
//!  - Coercion through a tag-keyed registry, with fallback type chains.
//!  - Conditional requiredness and accessor namespacing (prefix/suffix).
//!  - Composable validators with overridable, translatable messages.
//!  - Exhaustive error collection into a single `ValidationReport`.

pub mod coercion;
pub mod context;
pub mod error;
pub mod messages;
pub mod options;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod settings;
pub mod task;
pub mod validation;
pub mod value;

// --- Re-exports for the Public API ---

pub use crate::context::Context;
pub use crate::options::Options;
pub use crate::value::{Complex, Decimal, FieldRead, Kind, Map, Predicate, Proc, Range, Rational, Record, Value};

// Declaring and compiling attributes
pub use crate::schema::{
  Affix, AttributeSet, AttributeSpec, Condition, DefaultValue, Delegate, Schema, SchemaBuilder, Source,
};

// Resolving them
pub use crate::report::{Errors, ValidationReport};
pub use crate::resolver::{resolve, ResolvedAttribute, Resolution, Scope};

// Extending the engine
pub use crate::coercion::Coercion;
pub use crate::messages::{NoTranslations, Translator, Violation};
pub use crate::registry::{ExtensionKind, Registry};
pub use crate::settings::Settings;
pub use crate::validation::Validator;

pub use crate::task::{work_fn, Control, Execution, Outcome, State, Status, Task, Work};

pub use crate::error::{
  CoercionError, ConfigError, ResolveError, SourceError, Stage, TaskError, TesseraResult, ValidatorError,
};

/*
    Typical flow:
    1. Declare attributes with `AttributeSet::new().required(..).optional(..)`.
    2. Compile them with `Schema::builder(set)`, adding task methods, a registry
       and a translator as needed. Structural mistakes surface here as `ConfigError`.
    3. Resolve a `Context` with `schema.resolve(&ctx)`, or wrap the schema in a
       `Task` whose work only runs once every attribute is valid.
    4. Read `Resolution::report()` (or the task outcome's metadata) for the
       per-accessor messages and the joined `full_message`.
*/
