//! Context query nodes.

use rhizome_graft_core::{
    ComputeScope, ContentHasher, DynNode, GraphError, HashScope, PortDescriptor, ports,
};
use std::any::Any;

/// Emits the current context's frame number.
///
/// The hash folds in the frame, so queries under different frames occupy
/// different cache entries and may run concurrently.
#[derive(Debug, Default)]
pub struct FrameNode;

impl DynNode for FrameNode {
    fn type_name(&self) -> &'static str {
        "Frame"
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["frame": F64]
    }

    fn hash(
        &self,
        _output: &str,
        scope: &mut HashScope<'_, '_>,
        h: &mut ContentHasher,
    ) -> Result<(), GraphError> {
        h.append_f64(scope.context().frame());
        Ok(())
    }

    fn compute(&self, output: &str, scope: &mut ComputeScope<'_, '_>) -> Result<(), GraphError> {
        let frame = scope.context().frame();
        scope.set(output, frame);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AddNode;
    use rhizome_graft_core::{Context, Graph, Value};

    #[test]
    fn test_frame_default() {
        let mut graph = Graph::new();
        let f = graph.add_node("frame1", FrameNode);
        let out = graph.find_plug(f, "frame").unwrap();
        assert_eq!(graph.value(out).unwrap(), Value::F64(1.0));
    }

    #[test]
    fn test_frame_under_scope() {
        let mut graph = Graph::new();
        let f = graph.add_node("frame1", FrameNode);
        let out = graph.find_plug(f, "frame").unwrap();

        let ctx = Context::new().with_frame(48.0);
        let _scope = ctx.scoped();
        assert_eq!(graph.value(out).unwrap(), Value::F64(48.0));
    }

    #[test]
    fn test_downstream_of_frame_varies_per_context() {
        let mut graph = Graph::new();
        let f = graph.add_node("frame1", FrameNode);
        let a = graph.add_node("add1", AddNode);
        let out = graph.find_plug(f, "frame").unwrap();
        let op1 = graph.find_plug(a, "op1").unwrap();
        let sum = graph.find_plug(a, "sum").unwrap();
        graph.set_input(op1, Some(out)).unwrap();
        graph.set_value(graph.find_plug(a, "op2").unwrap(), 100.0).unwrap();

        for frame in [1.0, 2.0, 3.0] {
            let ctx = Context::new().with_frame(frame);
            let _scope = ctx.scoped();
            assert_eq!(graph.value(sum).unwrap(), Value::F64(100.0 + frame));
        }
        // Earlier frames stay cached and correct.
        let ctx = Context::new().with_frame(2.0);
        let _scope = ctx.scoped();
        assert_eq!(graph.value(sum).unwrap(), Value::F64(102.0));
    }
}
