//! String nodes.

use rhizome_graft_core::{
    ComputeScope, ContentHasher, DynNode, GraphError, HashScope, PortDescriptor, ports,
};
use std::any::Any;

/// Joins two strings around a separator: `joined = part1 + sep + part2`.
#[derive(Debug, Default)]
pub struct JoinNode;

impl DynNode for JoinNode {
    fn type_name(&self) -> &'static str {
        "Join"
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        ports!["part1": Str, "part2": Str, "sep": Str]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["joined": Str]
    }

    fn affects(&self, input: &str) -> Vec<&'static str> {
        match input {
            "part1" | "part2" | "sep" => vec!["joined"],
            _ => vec![],
        }
    }

    fn hash(
        &self,
        _output: &str,
        scope: &mut HashScope<'_, '_>,
        h: &mut ContentHasher,
    ) -> Result<(), GraphError> {
        h.append_hash(&scope.input_hash("part1")?);
        h.append_hash(&scope.input_hash("part2")?);
        h.append_hash(&scope.input_hash("sep")?);
        Ok(())
    }

    fn compute(&self, output: &str, scope: &mut ComputeScope<'_, '_>) -> Result<(), GraphError> {
        let part1 = scope.input("part1")?;
        let part2 = scope.input("part2")?;
        let sep = scope.input("sep")?;
        let joined = format!("{}{}{}", part1.as_str()?, sep.as_str()?, part2.as_str()?);
        scope.set(output, joined);
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
    fn test_join() {
        let mut graph = Graph::new();
        let j = graph.add_node("join1", JoinNode);
        graph.set_value(graph.find_plug(j, "part1").unwrap(), "render").unwrap();
        graph.set_value(graph.find_plug(j, "part2").unwrap(), "beauty").unwrap();
        graph.set_value(graph.find_plug(j, "sep").unwrap(), "/").unwrap();
        let joined = graph.find_plug(j, "joined").unwrap();
        assert_eq!(
            graph.value(joined).unwrap(),
            Value::Str("render/beauty".into())
        );
    }

    #[test]
    fn test_join_empty_sep_default() {
        let mut graph = Graph::new();
        let j = graph.add_node("join1", JoinNode);
        graph.set_value(graph.find_plug(j, "part1").unwrap(), "ab").unwrap();
        graph.set_value(graph.find_plug(j, "part2").unwrap(), "cd").unwrap();
        let joined = graph.find_plug(j, "joined").unwrap();
        assert_eq!(graph.value(joined).unwrap(), Value::Str("abcd".into()));
    }

    #[test]
    fn test_join_chain_recomputes() {
        let mut graph = Graph::new();
        let a = graph.add_node("a", JoinNode);
        let b = graph.add_node("b", JoinNode);
        let a_joined = graph.find_plug(a, "joined").unwrap();
        let b_part1 = graph.find_plug(b, "part1").unwrap();
        graph.set_input(b_part1, Some(a_joined)).unwrap();

        graph.set_value(graph.find_plug(a, "part1").unwrap(), "x").unwrap();
        graph.set_value(graph.find_plug(a, "part2").unwrap(), "y").unwrap();
        graph.set_value(graph.find_plug(b, "part2").unwrap(), "z").unwrap();
        let b_joined = graph.find_plug(b, "joined").unwrap();
        assert_eq!(graph.value(b_joined).unwrap(), Value::Str("xyz".into()));

        graph.set_value(graph.find_plug(a, "part1").unwrap(), "X").unwrap();
        assert_eq!(graph.value(b_joined).unwrap(), Value::Str("Xyz".into()));
    }
}
