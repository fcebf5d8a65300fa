//! Arithmetic nodes.

use rhizome_graft_core::{
    ComputeScope, ContentHasher, DynNode, GraphError, HashScope, PortDescriptor, ports,
};
use std::any::Any;

/// `sum = op1 + op2` over f64.
#[derive(Debug, Default)]
pub struct AddNode;

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

/// `product = op1 * op2` over f64.
#[derive(Debug, Default)]
pub struct MultiplyNode;

impl DynNode for MultiplyNode {
    fn type_name(&self) -> &'static str {
        "Multiply"
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        vec![
            PortDescriptor::new("op1", rhizome_graft_core::ValueType::F64).with_default(1.0f64),
            PortDescriptor::new("op2", rhizome_graft_core::ValueType::F64).with_default(1.0f64),
        ]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["product": F64]
    }

    fn affects(&self, input: &str) -> Vec<&'static str> {
        match input {
            "op1" | "op2" => vec!["product"],
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
        scope.set(output, a * b);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_graft_core::{Graph, Value};

    #[test]
    fn test_add() {
        let mut graph = Graph::new();
        let a = graph.add_node("add1", AddNode);
        let op1 = graph.find_plug(a, "op1").unwrap();
        let op2 = graph.find_plug(a, "op2").unwrap();
        let sum = graph.find_plug(a, "sum").unwrap();
        graph.set_value(op1, 2.0).unwrap();
        graph.set_value(op2, 3.0).unwrap();
        assert_eq!(graph.value(sum).unwrap(), Value::F64(5.0));
    }

    #[test]
    fn test_multiply_default_is_one() {
        let mut graph = Graph::new();
        let m = graph.add_node("mul1", MultiplyNode);
        let op1 = graph.find_plug(m, "op1").unwrap();
        let product = graph.find_plug(m, "product").unwrap();
        graph.set_value(op1, 6.0).unwrap();
        // op2 keeps its identity default.
        assert_eq!(graph.value(product).unwrap(), Value::F64(6.0));
    }

    #[test]
    fn test_add_into_multiply() {
        let mut graph = Graph::new();
        let a = graph.add_node("add1", AddNode);
        let m = graph.add_node("mul1", MultiplyNode);
        let sum = graph.find_plug(a, "sum").unwrap();
        let m_op1 = graph.find_plug(m, "op1").unwrap();
        let product = graph.find_plug(m, "product").unwrap();
        graph.set_input(m_op1, Some(sum)).unwrap();

        graph.set_value(graph.find_plug(a, "op1").unwrap(), 2.0).unwrap();
        graph.set_value(graph.find_plug(a, "op2").unwrap(), 3.0).unwrap();
        graph.set_value(graph.find_plug(m, "op2").unwrap(), 4.0).unwrap();
        assert_eq!(graph.value(product).unwrap(), Value::F64(20.0));

        graph.set_value(graph.find_plug(a, "op1").unwrap(), 10.0).unwrap();
        assert_eq!(graph.value(product).unwrap(), Value::F64(52.0));
    }
}
