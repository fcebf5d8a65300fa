//! Lazy, cache-mediated plug evaluation.
//!
//! One [`Evaluation`] lives for the duration of a single `value` /
//! `value_hash` query. Resolution is recursive: a connected plug resolves
//! its source; a settable plug resolves its stored value or default; a
//! computed output hashes itself (seeded with its node type and plug name,
//! then extended by the node's own `hash`), consults the cache, and only on
//! a miss runs `compute`.
//!
//! Failures unwind through the same recursion. At the computed plug whose
//! `hash` or `compute` raised, the error is wrapped once into
//! `ComputeFailed`. When the query returns, the owning node's error signal
//! fires with that plug as both locus and source, then each node crossed on
//! the way back to the queried plug fires once more, with its plug nearest
//! the queried one as the locus and the original plug as the source. The
//! caller always receives the original error. Cancellation unwinds
//! silently: no signal, no wrapping, nothing cached.

use std::sync::Arc;

use crate::context::Context;
use crate::error::GraphError;
use crate::graph::{ErrorEvent, Graph, NodeId, PlugId, PlugSlot};
use crate::hash::{ContentHash, ContentHasher};
use crate::node::Direction;
use crate::value::Value;

/// One top-level `value`/`value_hash` query against a graph.
pub(crate) struct Evaluation<'g> {
    graph: &'g Graph,
    ctx: Arc<Context>,
    /// Error signal per crossed node, collected during unwinding and
    /// emitted when the query returns. Kept in unwind order: origin first.
    pending: Vec<(NodeId, ErrorEvent)>,
}

impl<'g> Evaluation<'g> {
    pub(crate) fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            ctx: Context::current(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn value(&mut self, plug: PlugId) -> Result<Arc<Value>, GraphError> {
        let result = self.resolve_value(plug);
        self.emit_pending();
        result
    }

    pub(crate) fn hash(&mut self, plug: PlugId) -> Result<ContentHash, GraphError> {
        let result = self.resolve_hash(plug);
        self.emit_pending();
        result
    }

    fn resolve_value(&mut self, plug: PlugId) -> Result<Arc<Value>, GraphError> {
        match self.value_of(plug) {
            Ok(v) => Ok(v),
            Err(e) => Err(self.fail(plug, e)),
        }
    }

    fn resolve_hash(&mut self, plug: PlugId) -> Result<ContentHash, GraphError> {
        match self.hash_of(plug) {
            Ok(h) => Ok(h),
            Err(e) => Err(self.fail(plug, e)),
        }
    }

    fn value_of(&mut self, plug: PlugId) -> Result<Arc<Value>, GraphError> {
        let graph = self.graph;
        let slot = graph.plug_slot(plug)?;
        if let Some(src) = slot.input {
            let src_type = graph.plug_slot(src)?.value_type;
            let v = self.resolve_value(src)?;
            if src_type == slot.value_type {
                return Ok(v);
            }
            let got = v.value_type();
            let converted = v.convert_to(slot.value_type).ok_or(GraphError::TypeMismatch {
                expected: slot.value_type,
                got,
            })?;
            return Ok(Arc::new(converted));
        }
        if slot.direction == Direction::Out && graph.node_slot(slot.node)?.node.computes() {
            return self.computed_value(plug);
        }
        static_value(graph, plug, slot)
    }

    fn hash_of(&mut self, plug: PlugId) -> Result<ContentHash, GraphError> {
        let graph = self.graph;
        let slot = graph.plug_slot(plug)?;
        if let Some(src) = slot.input {
            let src_type = graph.plug_slot(src)?.value_type;
            let h = self.resolve_hash(src)?;
            if src_type == slot.value_type {
                return Ok(h);
            }
            // A conversion changes content, so the digest must diverge from
            // the source's.
            let mut hasher = ContentHasher::new();
            hasher.append_hash(&h);
            hasher.append_str("convert");
            hasher.append_str(&slot.value_type.to_string());
            return Ok(hasher.finish());
        }
        if slot.direction == Direction::Out && graph.node_slot(slot.node)?.node.computes() {
            return self.computed_hash(plug);
        }
        let v = static_value(graph, plug, slot)?;
        let mut hasher = ContentHasher::new();
        v.append_to(&mut hasher);
        Ok(hasher.finish())
    }

    fn computed_hash(&mut self, plug: PlugId) -> Result<ContentHash, GraphError> {
        let graph = self.graph;
        let slot = graph.plug_slot(plug)?;
        let node_slot = graph.node_slot(slot.node)?;
        let mut hasher = ContentHasher::new();
        hasher.append_str(node_slot.node.type_name());
        hasher.append_str(&slot.name);
        let mut scope = HashScope {
            eval: self,
            node: slot.node,
        };
        node_slot.node.hash(&slot.name, &mut scope, &mut hasher)?;
        Ok(hasher.finish())
    }

    fn computed_value(&mut self, plug: PlugId) -> Result<Arc<Value>, GraphError> {
        let graph = self.graph;
        let cacheable = graph.plug_slot(plug)?.cacheable;
        if cacheable {
            let hash = self.computed_hash(plug)?;
            if let Some(hit) = graph.cache().get(&hash) {
                return Ok(hit);
            }
            let value = self.run_compute(plug)?;
            // Another thread may have stored first; its value wins so every
            // reader of this hash shares one object.
            Ok(graph.cache().insert(hash, value))
        } else {
            self.run_compute(plug)
        }
    }

    fn run_compute(&mut self, plug: PlugId) -> Result<Arc<Value>, GraphError> {
        let graph = self.graph;
        let slot = graph.plug_slot(plug)?;
        let node_slot = graph.node_slot(slot.node)?;
        let mut scope = ComputeScope {
            eval: self,
            node: slot.node,
            produced: Vec::new(),
        };
        node_slot.node.compute(&slot.name, &mut scope)?;
        let produced = scope.produced;
        let mut result = None;
        for (name, value) in produced {
            if name == slot.name {
                result = Some(value);
            } else {
                return Err(GraphError::WrongPlugSet {
                    plug,
                    path: graph.plug_path(plug),
                    set: name,
                });
            }
        }
        let value = result.ok_or_else(|| GraphError::PlugNotSet {
            plug,
            path: graph.plug_path(plug),
        })?;
        if value.value_type() == slot.value_type {
            return Ok(value);
        }
        let got = value.value_type();
        match value.convert_to(slot.value_type) {
            Some(v) => Ok(Arc::new(v)),
            None => Err(GraphError::TypeMismatch {
                expected: slot.value_type,
                got,
            }),
        }
    }

    /// Failure bookkeeping for one recursion level: wrap node-raised errors
    /// at the computed plug they came from, and record a pending error
    /// signal for the owning node. A later unwind level crossing the same
    /// node moves its locus outward, so each node ends up signalling once,
    /// at its plug nearest the queried one. Cancellation passes through
    /// untouched.
    fn fail(&mut self, plug: PlugId, err: GraphError) -> GraphError {
        if matches!(err, GraphError::Cancelled) {
            return err;
        }
        let Ok(slot) = self.graph.plug_slot(plug) else { return err };
        let node = slot.node;
        let is_computed = slot.direction == Direction::Out
            && slot.input.is_none()
            && self.graph.node_slot(node).is_ok_and(|n| n.node.computes());
        let err = if is_computed && err.failing_plug().is_none() {
            GraphError::ComputeFailed {
                plug,
                path: self.graph.plug_path(plug),
                message: err.to_string(),
            }
        } else {
            err
        };
        if let Some(source) = err.failing_plug() {
            match self.pending.iter_mut().find(|(n, _)| *n == node) {
                Some((_, event)) => event.plug = plug,
                None => self.pending.push((
                    node,
                    ErrorEvent {
                        plug,
                        source,
                        message: err.to_string(),
                    },
                )),
            }
        }
        err
    }

    fn emit_pending(&mut self) {
        let graph = self.graph;
        for (node, event) in self.pending.drain(..) {
            graph.emit_error(node, &event);
        }
    }
}

fn static_value(graph: &Graph, plug: PlugId, slot: &PlugSlot) -> Result<Arc<Value>, GraphError> {
    if let Some(v) = &slot.stored {
        return Ok(v.clone());
    }
    if let Some(d) = &slot.default {
        return Ok(d.clone());
    }
    Err(match slot.direction {
        Direction::In => GraphError::NoValue {
            plug: graph.plug_path(plug),
        },
        Direction::Out => GraphError::NotComputable {
            plug: graph.plug_path(plug),
        },
    })
}

fn plug_for_scope(graph: &Graph, node: NodeId, name: &str) -> Result<PlugId, GraphError> {
    graph.plug_on(node, name).ok_or_else(|| GraphError::NoSuchPlug {
        node: graph.node_path(node),
        plug: name.to_string(),
    })
}

/// What a node sees while hashing one of its outputs.
///
/// Input lookups are by plug name on the node being hashed and resolve
/// through connections, so `input_hash("op1")` is the digest of whatever
/// actually feeds `op1`.
pub struct HashScope<'a, 'g> {
    eval: &'a mut Evaluation<'g>,
    node: NodeId,
}

impl HashScope<'_, '_> {
    /// Digest of the named input under the current context.
    pub fn input_hash(&mut self, name: &str) -> Result<ContentHash, GraphError> {
        let plug = plug_for_scope(self.eval.graph, self.node, name)?;
        self.eval.resolve_hash(plug)
    }

    /// Value of the named input, for hash logic that routes on a value.
    pub fn input(&mut self, name: &str) -> Result<Arc<Value>, GraphError> {
        let plug = plug_for_scope(self.eval.graph, self.node, name)?;
        self.eval.resolve_value(plug)
    }

    /// The context this query runs under.
    pub fn context(&self) -> &Context {
        &self.eval.ctx
    }

    /// Returns `Err(Cancelled)` if the context's token was cancelled.
    pub fn check_cancelled(&self) -> Result<(), GraphError> {
        if self.eval.ctx.is_cancelled() {
            Err(GraphError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// What a node sees while computing one of its outputs.
pub struct ComputeScope<'a, 'g> {
    eval: &'a mut Evaluation<'g>,
    node: NodeId,
    produced: Vec<(String, Arc<Value>)>,
}

impl ComputeScope<'_, '_> {
    /// Value of the named input, resolved through its connection.
    pub fn input(&mut self, name: &str) -> Result<Arc<Value>, GraphError> {
        let plug = plug_for_scope(self.eval.graph, self.node, name)?;
        self.eval.resolve_value(plug)
    }

    /// The context this query runs under.
    pub fn context(&self) -> &Context {
        &self.eval.ctx
    }

    /// Returns `Err(Cancelled)` if the context's token was cancelled.
    pub fn check_cancelled(&self) -> Result<(), GraphError> {
        if self.eval.ctx.is_cancelled() {
            Err(GraphError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Delivers the computed value for the named output.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.produced.push((name.into(), Arc::new(value.into())));
    }

    /// Delivers an already-shared value, preserving its identity.
    ///
    /// A passthrough compute forwards its input's `Arc` this way, so the
    /// cache ends up holding the very object the source holds.
    pub fn set_shared(&mut self, name: impl Into<String>, value: Arc<Value>) {
        self.produced.push((name.into(), value));
    }
}
