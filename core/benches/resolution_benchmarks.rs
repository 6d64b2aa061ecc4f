use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tessera::{work_fn, AttributeSet, Context, Control, Execution, Options, Schema, Task, Value};
use tokio::runtime::Runtime;

// --- Helpers ---

/// A flat schema of `width` integer attributes, each with a numeric bound.
fn flat_schema(width: usize) -> Schema {
  let names: Vec<String> = (0..width).map(|i| format!("field_{}", i)).collect();
  let names: Vec<&str> = names.iter().map(String::as_str).collect();
  Schema::builder(
    AttributeSet::new().required_each(&names, |a| a.of_type("integer").numeric(Options::new().set("min", 0))),
  )
  .compile()
  .unwrap()
}

fn flat_context(width: usize, valid: bool) -> Context {
  (0..width)
    .map(|i| {
      let raw = if valid { i.to_string() } else { "-1".to_string() };
      (format!("field_{}", i), Value::from(raw))
    })
    .collect()
}

/// A parent hash with `width` children read off it.
fn nested_schema(width: usize) -> Schema {
  Schema::builder(AttributeSet::new().required("profile", |a| {
    a.of_type("hash").children(|mut set| {
      for i in 0..width {
        set = set.required(format!("child_{}", i), |c| c.of_type("string").presence());
      }
      set
    })
  }))
  .compile()
  .unwrap()
}

fn nested_context(width: usize) -> Context {
  let profile = Value::hash((0..width).map(|i| (format!("child_{}", i), Value::Integer(i as i64))));
  Context::new().with("profile", profile)
}

// --- Benchmark Functions ---

fn bench_flat_resolution(c: &mut Criterion) {
  let mut group = c.benchmark_group("FlatResolution");

  for width in [1, 10, 50].iter() {
    let schema = flat_schema(*width);
    group.throughput(Throughput::Elements(*width as u64));
    for valid in [true, false] {
      let label = if valid { "valid" } else { "invalid" };
      let context = flat_context(*width, valid);
      group.bench_with_input(BenchmarkId::new(label, width), &context, |b, context| {
        b.iter(|| criterion::black_box(schema.resolve(context).unwrap()));
      });
    }
  }
  group.finish();
}

fn bench_nested_resolution(c: &mut Criterion) {
  let mut group = c.benchmark_group("NestedResolution");

  for width in [1, 10, 50].iter() {
    let schema = nested_schema(*width);
    let context = nested_context(*width);
    group.throughput(Throughput::Elements(*width as u64 + 1));
    group.bench_with_input(BenchmarkId::from_parameter(width), &context, |b, context| {
      b.iter(|| criterion::black_box(schema.resolve(context).unwrap()));
    });
  }
  group.finish();
}

fn bench_schema_compile(c: &mut Criterion) {
  let mut group = c.benchmark_group("SchemaCompile");
  for width in [10, 50].iter() {
    group.bench_with_input(BenchmarkId::from_parameter(width), width, |b, &width| {
      b.iter(|| criterion::black_box(flat_schema(width)));
    });
  }
  group.finish();
}

fn bench_task_run(c: &mut Criterion) {
  let mut group = c.benchmark_group("TaskRun");
  let rt = Runtime::new().unwrap();

  let task = Arc::new(Task::new(
    "bench",
    Arc::new(flat_schema(10)),
    work_fn(|execution: Execution| async move {
      criterion::black_box(execution.attributes().len());
      Ok::<_, anyhow::Error>(Control::Continue)
    }),
  ));

  group.bench_function("valid_10_attributes", |b| {
    b.to_async(&rt).iter_batched(
      || flat_context(10, true),
      |context| {
        let task = task.clone();
        async move { task.run(context).await.unwrap() }
      },
      criterion::BatchSize::SmallInput,
    );
  });
  group.finish();
}

criterion_group!(
  benches,
  bench_flat_resolution,
  bench_nested_resolution,
  bench_schema_compile,
  bench_task_run
);
criterion_main!(benches);
