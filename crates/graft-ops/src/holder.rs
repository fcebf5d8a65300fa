//! Value holder node.

use rhizome_graft_core::{DynNode, PortDescriptor, ports};
use std::any::Any;

/// Non-computing node with one settable f64 output.
///
/// A holder's `value` plug is a stored slot: set it directly, or wire it
/// downstream as a named constant. It never hashes or computes.
#[derive(Debug, Default)]
pub struct HolderNode;

impl DynNode for HolderNode {
    fn type_name(&self) -> &'static str {
        "Holder"
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["value": F64]
    }

    fn computes(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AddNode;
    use rhizome_graft_core::{Graph, Value};

    #[test]
    fn test_holder_set_and_read() {
        let mut graph = Graph::new();
        let h = graph.add_node("holder1", HolderNode);
        let value = graph.find_plug(h, "value").unwrap();
        assert_eq!(graph.value(value).unwrap(), Value::F64(0.0));
        graph.set_value(value, 7.5).unwrap();
        assert_eq!(graph.value(value).unwrap(), Value::F64(7.5));
    }

    #[test]
    fn test_holder_feeds_downstream() {
        let mut graph = Graph::new();
        let h = graph.add_node("holder1", HolderNode);
        let a = graph.add_node("add1", AddNode);
        let value = graph.find_plug(h, "value").unwrap();
        let op1 = graph.find_plug(a, "op1").unwrap();
        let sum = graph.find_plug(a, "sum").unwrap();
        graph.set_input(op1, Some(value)).unwrap();

        graph.set_value(value, 4.0).unwrap();
        graph.set_value(graph.find_plug(a, "op2").unwrap(), 1.0).unwrap();
        assert_eq!(graph.value(sum).unwrap(), Value::F64(5.0));

        graph.set_value(value, 40.0).unwrap();
        assert_eq!(graph.value(sum).unwrap(), Value::F64(41.0));
    }
}
