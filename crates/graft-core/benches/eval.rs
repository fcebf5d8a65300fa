//! Evaluation and cache path benchmarks.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rhizome_graft_core::{
    ComputeScope, ContentHasher, Context, DynNode, Graph, GraphError, HashScope, NodeId,
    PlugId, PortDescriptor, ports,
};
use std::any::Any;

struct AddNode;

impl DynNode for AddNode {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        ports!["op1": F64, "op2": F64]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["sum": F64]
    }

    fn affects(&self, input: &str) -> Vec<&'static str> {
        match input {
            "op1" | "op2" => vec!["sum"],
            _ => vec![],
        }
    }

    fn hash(
        &self,
        _output: &str,
        scope: &mut HashScope<'_, '_>,
        h: &mut ContentHasher,
    ) -> Result<(), GraphError> {
        h.append_hash(&scope.input_hash("op1")?);
        h.append_hash(&scope.input_hash("op2")?);
        Ok(())
    }

    fn compute(&self, output: &str, scope: &mut ComputeScope<'_, '_>) -> Result<(), GraphError> {
        let a = scope.input("op1")?.as_f64()?;
        let b = scope.input("op2")?.as_f64()?;
        scope.set(output, a + b);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Chain of adders, each feeding the next one's op1.
fn chain(len: usize) -> (Graph, PlugId, PlugId) {
    let mut graph = Graph::new();
    let mut prev: Option<NodeId> = None;
    let mut head_op1 = None;
    for i in 0..len {
        let n = graph.add_node(format!("add{i}"), AddNode);
        let op1 = graph.find_plug(n, "op1").unwrap();
        let op2 = graph.find_plug(n, "op2").unwrap();
        graph.set_value(op2, 1.0).unwrap();
        match prev {
            Some(p) => {
                let sum = graph.find_plug(p, "sum").unwrap();
                graph.set_input(op1, Some(sum)).unwrap();
            }
            None => {
                graph.set_value(op1, 0.0).unwrap();
                head_op1 = Some(op1);
            }
        }
        prev = Some(n);
    }
    let tail_sum = graph.find_plug(prev.unwrap(), "sum").unwrap();
    (graph, head_op1.unwrap(), tail_sum)
}

fn bench_cached_reread(c: &mut Criterion) {
    let (graph, _, tail) = chain(64);
    graph.value(tail).unwrap();

    c.bench_function("cached_reread_chain64", |b| {
        b.iter(|| black_box(graph.value(black_box(tail)).unwrap()))
    });
}

fn bench_recompute_after_dirty(c: &mut Criterion) {
    let (mut graph, head, tail) = chain(64);
    let mut i = 0.0f64;

    c.bench_function("recompute_chain64", |b| {
        b.iter(|| {
            i += 1.0;
            graph.set_value(head, i).unwrap();
            black_box(graph.value(tail).unwrap())
        })
    });
}

fn bench_hash_only(c: &mut Criterion) {
    let (graph, _, tail) = chain(64);

    c.bench_function("hash_chain64", |b| {
        b.iter(|| black_box(graph.value_hash(black_box(tail)).unwrap()))
    });
}

fn bench_context_scoped_read(c: &mut Criterion) {
    let (graph, _, tail) = chain(8);

    c.bench_function("scoped_read_chain8", |b| {
        let mut frame = 0.0f64;
        b.iter(|| {
            frame += 1.0;
            let ctx = Context::new().with_frame(frame);
            let _scope = ctx.scoped();
            black_box(graph.value(tail).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_cached_reread,
    bench_recompute_after_dirty,
    bench_hash_only,
    bench_context_scoped_read
);
criterion_main!(benches);
