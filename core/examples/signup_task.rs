// core/examples/signup_task.rs

use std::sync::Arc;
use tessera::{work_fn, AttributeSet, Context, Control, Execution, Options, Schema, Source, Task, Value};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Signup Task Example ---");

  // 1. Declare the attributes the task expects.
  let attributes = AttributeSet::new()
    .required("email", |a| {
      a.of_type("string")
        .format(Options::new().set("with", Value::pattern(r"^[^@\s]+@[^@\s]+$").expect("valid pattern")))
    })
    .required("age", |a| a.of_type("integer").numeric(Options::new().set("min", 18)))
    .optional("plan", |a| {
      a.of_type("symbol")
        .default("free")
        .inclusion(Options::new().set("in", Value::list([Value::symbol("free"), Value::symbol("pro")])))
    })
    .required("address", |a| {
      a.of_type("hash")
        .children(|set| set.required("city", |c| c.presence()).optional("zip", |c| c.of_type("string")))
    })
    .required("referrer", |a| a.source(Source::method("referral_code")).when(false));

  // 2. Compile them, together with the methods they reference.
  let schema = Schema::builder(attributes)
    .method("referral_code", |scope| Ok(scope.context().get("ref").unwrap_or(Value::Nil)))
    .compile()?;
  info!("Accessors: {:?}", schema.accessors());

  // 3. Wrap the schema in a task.
  let task = Task::new(
    "signup",
    Arc::new(schema),
    work_fn(|execution: Execution| async move {
      let email = execution.get("email").cloned().unwrap_or(Value::Nil);
      let city = execution.get("address_city").cloned().unwrap_or(Value::Nil);
      info!("Creating account for {} in {}", email, city);
      execution.context().set("account_id", 42);
      Ok::<_, anyhow::Error>(Control::Continue)
    }),
  );

  // 4. A valid run completes and the work writes back into the context.
  let context = Context::new()
    .with("email", "ann@example.com")
    .with("age", "34")
    .with("address", Value::hash([("city", "Lisbon")]));
  let outcome = task.run(context.clone()).await?;
  info!("Outcome: {} / {}, account_id = {:?}", outcome.state(), outcome.status(), context.get("account_id"));

  // 5. An invalid run fails before the work with every problem collected.
  let outcome = task
    .run(Context::new().with("email", "nope").with("age", "12").with("plan", "gold"))
    .await?;
  info!("Outcome: {} / {}", outcome.state(), outcome.status());
  info!("Reason: {}", outcome.reason().unwrap_or_default());
  info!("Metadata: {}", outcome.metadata());

  Ok(())
}
