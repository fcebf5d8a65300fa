//! Node trait for graph computation.

use crate::error::GraphError;
use crate::eval::{ComputeScope, HashScope};
use crate::hash::ContentHasher;
use crate::value::{Value, ValueType};
use std::any::Any;

/// Which side of a node a plug sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// The plug receives values.
    In,
    /// The plug produces values.
    Out,
}

/// Port descriptor for a node input or output.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    /// Port name for lookup and display.
    pub name: &'static str,
    /// Type of values this port accepts/produces.
    pub value_type: ValueType,
    /// Value the plug holds before anything is set or connected.
    ///
    /// `None` falls back to the type's zero value, where one exists.
    pub default: Option<Value>,
    /// Whether computed results for this port may enter the cache.
    pub cacheable: bool,
}

impl PortDescriptor {
    /// Create a new port descriptor with no explicit default.
    pub fn new(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            value_type,
            default: None,
            cacheable: true,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets whether results for this port may be cached.
    pub fn with_cacheable(mut self, cacheable: bool) -> Self {
        self.cacheable = cacheable;
        self
    }
}

/// Trait for nodes whose outputs are computed on demand.
///
/// A node declares its ports with [`inputs`](DynNode::inputs) and
/// [`outputs`](DynNode::outputs), declares which outputs each input feeds
/// with [`affects`](DynNode::affects), and implements the paired
/// [`hash`](DynNode::hash)/[`compute`](DynNode::compute) methods.
///
/// # Contract
///
/// `hash` must fold in everything `compute` reads: every input it pulls
/// (via `HashScope::input_hash`) and every context variable it consults.
/// Two outputs with equal hashes are treated as having equal values, so an
/// under-inclusive hash silently serves stale results. `affects` must list
/// every output whose value depends on the given input; a missing entry
/// means edits to that input never dirty (or re-trigger) the output.
///
/// # Cancellation
///
/// Long-running computes should periodically call
/// `ComputeScope::check_cancelled` and propagate the error it returns.
pub trait DynNode: Send + Sync + Any {
    /// Returns the type name for display and hashing.
    ///
    /// Folded into every output hash, so two node types whose computes
    /// differ never collide in the cache.
    fn type_name(&self) -> &'static str;

    /// Returns descriptors for all input ports.
    fn inputs(&self) -> Vec<PortDescriptor> {
        Vec::new()
    }

    /// Returns descriptors for all output ports.
    fn outputs(&self) -> Vec<PortDescriptor> {
        Vec::new()
    }

    /// Whether this node computes its outputs.
    ///
    /// Nodes that return `false` (containers, value holders) treat output
    /// plugs as stored slots; `hash` and `compute` are never called.
    fn computes(&self) -> bool {
        true
    }

    /// Names the outputs whose values depend on the given input.
    fn affects(&self, _input: &str) -> Vec<&'static str> {
        Vec::new()
    }

    /// Folds everything `compute(output)` reads into `h`.
    ///
    /// The engine has already seeded `h` with the node type name and the
    /// output name, so the default is sufficient only for computes that
    /// read nothing at all.
    fn hash(
        &self,
        _output: &str,
        _scope: &mut HashScope<'_, '_>,
        _h: &mut ContentHasher,
    ) -> Result<(), GraphError> {
        Ok(())
    }

    /// Computes the value of `output`, delivering it via `ComputeScope::set`.
    ///
    /// Must set exactly the requested output, no more, no less.
    fn compute(&self, output: &str, _scope: &mut ComputeScope<'_, '_>) -> Result<(), GraphError> {
        Err(GraphError::ExecutionError(format!(
            "{} has no compute for output '{}'",
            self.type_name(),
            output
        )))
    }

    /// Returns `self` as `&dyn Any` for downcasting and type identification.
    fn as_any(&self) -> &dyn Any;
}

/// A boxed dynamic node.
pub type BoxedNode = Box<dyn DynNode>;

/// Plain grouping node: no computes, plugs added dynamically.
///
/// Output plugs on a container are stored slots, so a container output
/// wired between two computing nodes forwards values without touching the
/// container itself.
#[derive(Debug, Default)]
pub struct ContainerNode;

impl DynNode for ContainerNode {
    fn type_name(&self) -> &'static str {
        "Container"
    }

    fn computes(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Helper macro for creating port descriptor lists.
#[macro_export]
macro_rules! ports {
    ($($name:literal : $ty:ident),* $(,)?) => {
        vec![
            $($crate::PortDescriptor::new($name, $crate::ValueType::$ty)),*
        ]
    };
}
