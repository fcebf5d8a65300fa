//! Routing nodes.

use rhizome_graft_core::{
    ComputeScope, ContentHasher, DynNode, GraphError, HashScope, PortDescriptor, ports,
};
use std::any::Any;

/// Pure passthrough: `out` is declared cache-equivalent to `in`.
///
/// The hash replacement means a read of `out` returns the literal cached
/// object the source holds; `compute` only runs when the upstream value was
/// never cached to begin with.
#[derive(Debug, Default)]
pub struct DotNode;

impl DynNode for DotNode {
    fn type_name(&self) -> &'static str {
        "Dot"
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        ports!["in": F64]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["out": F64]
    }

    fn affects(&self, input: &str) -> Vec<&'static str> {
        match input {
            "in" => vec!["out"],
            _ => vec![],
        }
    }

    fn hash(
        &self,
        _output: &str,
        scope: &mut HashScope<'_, '_>,
        h: &mut ContentHasher,
    ) -> Result<(), GraphError> {
        h.replace(scope.input_hash("in")?);
        Ok(())
    }

    fn compute(&self, output: &str, scope: &mut ComputeScope<'_, '_>) -> Result<(), GraphError> {
        let v = scope.input("in")?;
        scope.set_shared(output, v);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Selects one of two inputs by index.
///
/// The hash routes on the index's value: only the selected branch's digest
/// folds in, so editing the unselected branch never invalidates the cache.
#[derive(Debug, Default)]
pub struct SwitchNode;

impl SwitchNode {
    fn selected(index: i32) -> &'static str {
        if index == 0 { "in0" } else { "in1" }
    }
}

impl DynNode for SwitchNode {
    fn type_name(&self) -> &'static str {
        "Switch"
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        ports!["index": I32, "in0": F64, "in1": F64]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        ports!["out": F64]
    }

    fn affects(&self, input: &str) -> Vec<&'static str> {
        match input {
            "index" | "in0" | "in1" => vec!["out"],
            _ => vec![],
        }
    }

    fn hash(
        &self,
        _output: &str,
        scope: &mut HashScope<'_, '_>,
        h: &mut ContentHasher,
    ) -> Result<(), GraphError> {
        let index = scope.input("index")?.as_i32()?;
        h.replace(scope.input_hash(Self::selected(index))?);
        Ok(())
    }

    fn compute(&self, output: &str, scope: &mut ComputeScope<'_, '_>) -> Result<(), GraphError> {
        let index = scope.input("index")?.as_i32()?;
        let v = scope.input(Self::selected(index))?;
        scope.set_shared(output, v);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
