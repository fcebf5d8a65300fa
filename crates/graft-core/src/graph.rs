//! Graph container: nodes, plugs, connections, and change signals.
//!
//! A [`Graph`] owns every node and plug and hands out opaque [`NodeId`] /
//! [`PlugId`] handles. Structural mutation (adding nodes and plugs, wiring
//! connections, setting stored values) takes `&mut Graph`; evaluation
//! (`value`, `value_hash`) takes `&Graph` and may run from many threads at
//! once. The borrow rules are the concurrency contract: mutation can never
//! race a read.
//!
//! Mutations notify per-node observers synchronously, before the mutating
//! call returns. Reads never fire notifications.
//!
//! # Example
//!
//! ```
//! use rhizome_graft_core::{ContainerNode, Direction, Graph, Value, ValueType};
//!
//! let mut graph = Graph::new();
//! let holder = graph.add_node("holder", ContainerNode);
//! let out = graph
//!     .add_plug(holder, "out", Direction::Out, ValueType::F64)
//!     .unwrap();
//! graph.set_value(out, 2.5).unwrap();
//! assert_eq!(graph.value(out).unwrap(), Value::F64(2.5));
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::cache::ValueCache;
use crate::error::GraphError;
use crate::eval::Evaluation;
use crate::hash::ContentHash;
use crate::node::{BoxedNode, Direction, DynNode, PortDescriptor};
use crate::value::{Value, ValueType};

/// Unique identifier for a node in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for a plug in a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlugId(pub(crate) u32);

impl fmt::Display for PlugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for removing a signal subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Payload delivered to error subscribers.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// Plug on the subscribing node lying on the dependency path, nearest
    /// the queried plug.
    pub plug: PlugId,
    /// Output whose `hash` or `compute` originally failed.
    pub source: PlugId,
    /// Failure message.
    pub message: String,
}

type DirtiedFn = dyn Fn(PlugId) + Send + Sync;
type SetFn = dyn Fn(PlugId) + Send + Sync;
type ErrorFn = dyn Fn(&ErrorEvent) + Send + Sync;

pub(crate) struct PlugSlot {
    pub(crate) name: String,
    pub(crate) node: NodeId,
    pub(crate) direction: Direction,
    pub(crate) value_type: ValueType,
    pub(crate) cacheable: bool,
    /// Upstream connection, at most one.
    pub(crate) input: Option<PlugId>,
    /// Downstream connections, in connection order.
    pub(crate) outputs: Vec<PlugId>,
    /// Explicitly set value for settable plugs.
    pub(crate) stored: Option<Arc<Value>>,
    /// Fallback for settable plugs that were never set.
    pub(crate) default: Option<Arc<Value>>,
}

pub(crate) struct NodeSlot {
    pub(crate) name: String,
    pub(crate) node: BoxedNode,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) plugs: Vec<PlugId>,
    dirtied: Vec<(SubscriberId, Arc<DirtiedFn>)>,
    set: Vec<(SubscriberId, Arc<SetFn>)>,
    error: Vec<(SubscriberId, Arc<ErrorFn>)>,
}

const NO_PLUGS: &[PlugId] = &[];
const NO_NODES: &[NodeId] = &[];

/// A graph of nodes connected by plug-to-plug links.
#[derive(Default)]
pub struct Graph {
    nodes: HashMap<NodeId, NodeSlot>,
    plugs: HashMap<PlugId, PlugSlot>,
    roots: Vec<NodeId>,
    next_node: u32,
    next_plug: u32,
    next_subscriber: u64,
    cache: ValueCache,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // === Structure ===

    /// Adds a root node and returns its ID.
    ///
    /// The node's declared input and output ports are instantiated as plugs
    /// immediately. Sibling names are kept unique: a name already taken at
    /// this level gets its trailing number bumped (`add1` becomes `add2`),
    /// so paths stay unambiguous. Read the final name back with
    /// [`node_name`](Graph::node_name).
    pub fn add_node(&mut self, name: impl Into<String>, node: impl DynNode + 'static) -> NodeId {
        self.insert_node(name.into(), Box::new(node), None)
    }

    /// Adds a node inside a parent node.
    ///
    /// Names are uniquified against the parent's existing children, as in
    /// [`add_node`](Graph::add_node).
    pub fn add_child_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        node: impl DynNode + 'static,
    ) -> Result<NodeId, GraphError> {
        if !self.nodes.contains_key(&parent) {
            return Err(GraphError::NodeNotFound(parent));
        }
        Ok(self.insert_node(name.into(), Box::new(node), Some(parent)))
    }

    fn insert_node(&mut self, name: String, node: BoxedNode, parent: Option<NodeId>) -> NodeId {
        let name = self.unique_sibling_name(parent, name);
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let inputs = node.inputs();
        let outputs = node.outputs();
        let computes = node.computes();
        self.nodes.insert(
            id,
            NodeSlot {
                name,
                node,
                parent,
                children: Vec::new(),
                plugs: Vec::new(),
                dirtied: Vec::new(),
                set: Vec::new(),
                error: Vec::new(),
            },
        );
        for desc in inputs {
            self.instantiate_plug(id, desc, Direction::In, true);
        }
        for desc in outputs {
            self.instantiate_plug(id, desc, Direction::Out, !computes);
        }
        match parent {
            Some(p) => {
                if let Some(slot) = self.nodes.get_mut(&p) {
                    slot.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Resolves `name` against the existing children of `parent` (or the
    /// roots), bumping a trailing number until it is free.
    fn unique_sibling_name(&self, parent: Option<NodeId>, name: String) -> String {
        let taken = |candidate: &str| {
            let siblings = match parent {
                Some(p) => self
                    .nodes
                    .get(&p)
                    .map(|s| s.children.as_slice())
                    .unwrap_or(NO_NODES),
                None => self.roots.as_slice(),
            };
            siblings
                .iter()
                .any(|n| self.nodes.get(n).is_some_and(|s| s.name == candidate))
        };
        if !taken(&name) {
            return name;
        }
        let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
        let mut n: u64 = name[stem.len()..].parse().unwrap_or(1);
        loop {
            n += 1;
            let candidate = format!("{stem}{n}");
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    fn instantiate_plug(
        &mut self,
        node: NodeId,
        desc: PortDescriptor,
        direction: Direction,
        settable: bool,
    ) -> PlugId {
        let id = PlugId(self.next_plug);
        self.next_plug += 1;
        let default = if settable {
            desc.default
                .clone()
                .or_else(|| desc.value_type.default_value())
                .map(Arc::new)
        } else {
            None
        };
        self.plugs.insert(
            id,
            PlugSlot {
                name: desc.name.to_string(),
                node,
                direction,
                value_type: desc.value_type,
                cacheable: desc.cacheable,
                input: None,
                outputs: Vec::new(),
                stored: None,
                default,
            },
        );
        if let Some(slot) = self.nodes.get_mut(&node) {
            slot.plugs.push(id);
        }
        id
    }

    /// Adds a plug to an existing node.
    ///
    /// Container nodes start with no plugs and acquire them this way; the
    /// plug's default comes from the value type.
    pub fn add_plug(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        direction: Direction,
        value_type: ValueType,
    ) -> Result<PlugId, GraphError> {
        let name = name.into();
        let slot = self.nodes.get(&node).ok_or(GraphError::NodeNotFound(node))?;
        let computes = slot.node.computes();
        if self.plug_on(node, &name).is_some() {
            return Err(GraphError::DuplicatePlug {
                node: self.node_path(node),
                plug: name,
            });
        }
        let id = PlugId(self.next_plug);
        self.next_plug += 1;
        let settable = direction == Direction::In || !computes;
        let default = if settable {
            value_type.default_value().map(Arc::new)
        } else {
            None
        };
        self.plugs.insert(
            id,
            PlugSlot {
                name,
                node,
                direction,
                value_type,
                cacheable: true,
                input: None,
                outputs: Vec::new(),
                stored: None,
                default,
            },
        );
        if let Some(slot) = self.nodes.get_mut(&node) {
            slot.plugs.push(id);
        }
        Ok(id)
    }

    /// Removes a node, its children, and all their plugs.
    ///
    /// Connections crossing the removed subtree's boundary are detached;
    /// surviving downstream plugs are dirtied, exactly as if each had been
    /// disconnected with `set_input(plug, None)`.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        let parent = self.nodes.get(&node).and_then(|s| s.parent);

        let mut doomed_nodes = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            doomed_nodes.push(n);
            if let Some(slot) = self.nodes.get(&n) {
                stack.extend(slot.children.iter().copied());
            }
        }
        let doomed_plugs: Vec<PlugId> = doomed_nodes
            .iter()
            .filter_map(|n| self.nodes.get(n))
            .flat_map(|s| s.plugs.iter().copied())
            .collect();
        let doomed_plug_set: HashSet<PlugId> = doomed_plugs.iter().copied().collect();

        let mut orphaned = Vec::new();
        for &p in &doomed_plugs {
            let (input, outs) = match self.plugs.get(&p) {
                Some(s) => (s.input, s.outputs.clone()),
                None => continue,
            };
            if let Some(src) = input {
                if !doomed_plug_set.contains(&src) {
                    if let Some(src_slot) = self.plugs.get_mut(&src) {
                        src_slot.outputs.retain(|&o| o != p);
                    }
                }
            }
            for dst in outs {
                if !doomed_plug_set.contains(&dst) {
                    if let Some(dst_slot) = self.plugs.get_mut(&dst) {
                        dst_slot.input = None;
                    }
                    orphaned.push(dst);
                }
            }
        }

        for p in &doomed_plugs {
            self.plugs.remove(p);
        }
        for n in &doomed_nodes {
            self.nodes.remove(n);
        }
        match parent {
            Some(p) => {
                if let Some(slot) = self.nodes.get_mut(&p) {
                    slot.children.retain(|&c| c != node);
                }
            }
            None => self.roots.retain(|&r| r != node),
        }

        for dst in orphaned {
            self.propagate_dirty(dst);
        }
        Ok(())
    }

    /// Looks up a plug by name on a node.
    pub fn find_plug(&self, node: NodeId, name: &str) -> Result<PlugId, GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        self.plug_on(node, name).ok_or_else(|| GraphError::NoSuchPlug {
            node: self.node_path(node),
            plug: name.to_string(),
        })
    }

    pub(crate) fn plug_on(&self, node: NodeId, name: &str) -> Option<PlugId> {
        let slot = self.nodes.get(&node)?;
        slot.plugs
            .iter()
            .copied()
            .find(|p| self.plugs.get(p).is_some_and(|s| s.name == name))
    }

    // === Connections ===

    /// Connects or disconnects a plug's upstream source.
    ///
    /// `Some(source)` wires `plug` to read from `source`; `None` detaches
    /// it. Valid destinations are input plugs and outputs of non-computing
    /// nodes (forwarding plugs). Rejects connections with no defined type
    /// conversion and connections that would close a dependency cycle.
    /// Connecting transfers no value; the destination is merely dirtied.
    pub fn set_input(&mut self, plug: PlugId, source: Option<PlugId>) -> Result<(), GraphError> {
        let (dst_dir, dst_type, dst_node, old) = {
            let s = self
                .plugs
                .get(&plug)
                .ok_or(GraphError::PlugNotFound(plug))?;
            (s.direction, s.value_type, s.node, s.input)
        };
        match source {
            Some(src) => {
                let src_type = self
                    .plugs
                    .get(&src)
                    .ok_or(GraphError::PlugNotFound(src))?
                    .value_type;
                if dst_dir == Direction::Out && self.node_computes(dst_node) {
                    return Err(GraphError::NotSettable {
                        plug: self.plug_path(plug),
                    });
                }
                if !src_type.convertible_to(dst_type) {
                    return Err(GraphError::TypeMismatch {
                        expected: dst_type,
                        got: src_type,
                    });
                }
                if self.reaches_upstream(src, plug) {
                    return Err(GraphError::CycleDetected);
                }
                if let Some(o) = old {
                    if let Some(os) = self.plugs.get_mut(&o) {
                        os.outputs.retain(|&d| d != plug);
                    }
                }
                if let Some(ss) = self.plugs.get_mut(&src) {
                    ss.outputs.push(plug);
                }
                if let Some(ds) = self.plugs.get_mut(&plug) {
                    ds.input = Some(src);
                }
                self.propagate_dirty(plug);
            }
            None => {
                let Some(o) = old else { return Ok(()) };
                if let Some(os) = self.plugs.get_mut(&o) {
                    os.outputs.retain(|&d| d != plug);
                }
                if let Some(ds) = self.plugs.get_mut(&plug) {
                    ds.input = None;
                }
                self.propagate_dirty(plug);
            }
        }
        Ok(())
    }

    /// Returns a plug's current upstream connection, if any.
    pub fn input(&self, plug: PlugId) -> Option<PlugId> {
        self.plugs.get(&plug).and_then(|s| s.input)
    }

    /// Returns the plugs connected downstream of a plug, in connection order.
    pub fn outputs(&self, plug: PlugId) -> &[PlugId] {
        self.plugs
            .get(&plug)
            .map(|s| s.outputs.as_slice())
            .unwrap_or(NO_PLUGS)
    }

    fn node_computes(&self, node: NodeId) -> bool {
        self.nodes.get(&node).map(|n| n.node.computes()).unwrap_or(true)
    }

    /// True when `target` is reachable walking upstream from `from`, through
    /// connections and, for computed outputs, every input of the owning node.
    fn reaches_upstream(&self, from: PlugId, target: PlugId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(p) = stack.pop() {
            if p == target {
                return true;
            }
            if !seen.insert(p) {
                continue;
            }
            let Some(slot) = self.plugs.get(&p) else { continue };
            if let Some(src) = slot.input {
                stack.push(src);
            }
            if slot.direction == Direction::Out && self.node_computes(slot.node) {
                if let Some(node) = self.nodes.get(&slot.node) {
                    for &q in &node.plugs {
                        if self
                            .plugs
                            .get(&q)
                            .is_some_and(|qs| qs.direction == Direction::In)
                        {
                            stack.push(q);
                        }
                    }
                }
            }
        }
        false
    }

    // === Values ===

    /// Stores a value on a settable plug.
    ///
    /// Valid on unconnected inputs and on unconnected outputs of
    /// non-computing nodes. The value is converted to the plug's type when
    /// a conversion exists. Fires the plug-set signal, then the dirty pass,
    /// even when the new value equals the old one.
    pub fn set_value(&mut self, plug: PlugId, value: impl Into<Value>) -> Result<(), GraphError> {
        let value = value.into();
        let (vt, node, dir, has_input) = {
            let s = self
                .plugs
                .get(&plug)
                .ok_or(GraphError::PlugNotFound(plug))?;
            (s.value_type, s.node, s.direction, s.input.is_some())
        };
        if has_input {
            return Err(GraphError::InputHasConnection {
                plug: self.plug_path(plug),
            });
        }
        if dir == Direction::Out && self.node_computes(node) {
            return Err(GraphError::NotSettable {
                plug: self.plug_path(plug),
            });
        }
        let got = value.value_type();
        let converted = value
            .convert_to(vt)
            .ok_or(GraphError::TypeMismatch { expected: vt, got })?;
        if let Some(s) = self.plugs.get_mut(&plug) {
            s.stored = Some(Arc::new(converted));
        }
        self.emit_set(plug);
        self.propagate_dirty(plug);
        Ok(())
    }

    /// Computes a plug's value, returning an independent copy.
    pub fn value(&self, plug: PlugId) -> Result<Value, GraphError> {
        Ok((*self.value_shared(plug)?).clone())
    }

    /// Computes a plug's value, returning the shared stored object.
    ///
    /// Connected plugs of identical type and cache hits all return the same
    /// `Arc`, so pointer equality here means the values were never copied.
    pub fn value_shared(&self, plug: PlugId) -> Result<Arc<Value>, GraphError> {
        Evaluation::new(self).value(plug)
    }

    /// Computes a plug's content hash under the current context.
    pub fn value_hash(&self, plug: PlugId) -> Result<ContentHash, GraphError> {
        Evaluation::new(self).hash(plug)
    }

    /// Sets whether computed results for a plug may enter the cache.
    pub fn set_cacheable(&mut self, plug: PlugId, cacheable: bool) -> Result<(), GraphError> {
        let slot = self
            .plugs
            .get_mut(&plug)
            .ok_or(GraphError::PlugNotFound(plug))?;
        slot.cacheable = cacheable;
        Ok(())
    }

    /// Returns a plug's cacheable flag.
    pub fn cacheable(&self, plug: PlugId) -> bool {
        self.plugs.get(&plug).is_some_and(|s| s.cacheable)
    }

    /// The value cache backing computed reads.
    pub fn cache(&self) -> &ValueCache {
        &self.cache
    }

    // === Signals ===

    /// Subscribes to dirty notifications for plugs of one node.
    pub fn on_plug_dirtied(
        &mut self,
        node: NodeId,
        f: impl Fn(PlugId) + Send + Sync + 'static,
    ) -> Result<SubscriberId, GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        if let Some(slot) = self.nodes.get_mut(&node) {
            slot.dirtied.push((id, Arc::new(f)));
        }
        Ok(id)
    }

    /// Subscribes to value-set notifications for plugs of one node.
    pub fn on_plug_set(
        &mut self,
        node: NodeId,
        f: impl Fn(PlugId) + Send + Sync + 'static,
    ) -> Result<SubscriberId, GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        if let Some(slot) = self.nodes.get_mut(&node) {
            slot.set.push((id, Arc::new(f)));
        }
        Ok(id)
    }

    /// Subscribes to error notifications for one node.
    pub fn on_error(
        &mut self,
        node: NodeId,
        f: impl Fn(&ErrorEvent) + Send + Sync + 'static,
    ) -> Result<SubscriberId, GraphError> {
        if !self.nodes.contains_key(&node) {
            return Err(GraphError::NodeNotFound(node));
        }
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        if let Some(slot) = self.nodes.get_mut(&node) {
            slot.error.push((id, Arc::new(f)));
        }
        Ok(id)
    }

    /// Removes a subscription. Returns `true` if it existed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut removed = false;
        for slot in self.nodes.values_mut() {
            let before = slot.dirtied.len() + slot.set.len() + slot.error.len();
            slot.dirtied.retain(|(s, _)| *s != id);
            slot.set.retain(|(s, _)| *s != id);
            slot.error.retain(|(s, _)| *s != id);
            if slot.dirtied.len() + slot.set.len() + slot.error.len() != before {
                removed = true;
            }
        }
        removed
    }

    /// Walks the affects relation and downstream connections from `root`,
    /// notifying each reached plug exactly once, the root first.
    fn propagate_dirty(&self, root: PlugId) {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.collect_dirty(root, &mut order, &mut seen);
        for plug in order {
            self.emit_dirtied(plug);
        }
    }

    fn collect_dirty(&self, plug: PlugId, order: &mut Vec<PlugId>, seen: &mut HashSet<PlugId>) {
        if !seen.insert(plug) {
            return;
        }
        order.push(plug);
        let Some(slot) = self.plugs.get(&plug) else { return };
        if let Some(node) = self.nodes.get(&slot.node) {
            for affected in node.node.affects(&slot.name) {
                if let Some(out) = self.plug_on(slot.node, affected) {
                    self.collect_dirty(out, order, seen);
                }
            }
        }
        for &dst in &slot.outputs {
            self.collect_dirty(dst, order, seen);
        }
    }

    fn emit_dirtied(&self, plug: PlugId) {
        let Some(slot) = self.plugs.get(&plug) else { return };
        let Some(node) = self.nodes.get(&slot.node) else { return };
        let handlers: Vec<Arc<DirtiedFn>> = node.dirtied.iter().map(|(_, f)| f.clone()).collect();
        for f in handlers {
            f(plug);
        }
    }

    fn emit_set(&self, plug: PlugId) {
        let Some(slot) = self.plugs.get(&plug) else { return };
        let Some(node) = self.nodes.get(&slot.node) else { return };
        let handlers: Vec<Arc<SetFn>> = node.set.iter().map(|(_, f)| f.clone()).collect();
        for f in handlers {
            f(plug);
        }
    }

    pub(crate) fn emit_error(&self, node: NodeId, event: &ErrorEvent) {
        let Some(slot) = self.nodes.get(&node) else { return };
        let handlers: Vec<Arc<ErrorFn>> = slot.error.iter().map(|(_, f)| f.clone()).collect();
        for f in handlers {
            f(event);
        }
    }

    // === Introspection ===

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of plugs in the graph.
    pub fn plug_count(&self) -> usize {
        self.plugs.len()
    }

    /// Root nodes in creation order.
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.roots
    }

    /// A node's children in creation order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|s| s.children.as_slice())
            .unwrap_or(NO_NODES)
    }

    /// A node's parent, if it is not a root.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|s| s.parent)
    }

    /// A node's plugs in creation order.
    pub fn plugs(&self, node: NodeId) -> &[PlugId] {
        self.nodes
            .get(&node)
            .map(|s| s.plugs.as_slice())
            .unwrap_or(NO_PLUGS)
    }

    /// Borrows a node's behavior for inspection or downcasting.
    pub fn node(&self, id: NodeId) -> Option<&dyn DynNode> {
        self.nodes.get(&id).map(|s| s.node.as_ref())
    }

    /// A node's own name.
    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|s| s.name.as_str())
    }

    /// A plug's own name.
    pub fn plug_name(&self, plug: PlugId) -> Option<&str> {
        self.plugs.get(&plug).map(|s| s.name.as_str())
    }

    /// The node owning a plug.
    pub fn plug_node(&self, plug: PlugId) -> Option<NodeId> {
        self.plugs.get(&plug).map(|s| s.node)
    }

    /// A plug's direction.
    pub fn plug_direction(&self, plug: PlugId) -> Option<Direction> {
        self.plugs.get(&plug).map(|s| s.direction)
    }

    /// A plug's value type.
    pub fn plug_type(&self, plug: PlugId) -> Option<ValueType> {
        self.plugs.get(&plug).map(|s| s.value_type)
    }

    /// Dot-separated path of a node from its root ancestor.
    pub fn node_path(&self, node: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            match self.nodes.get(&id) {
                Some(slot) => {
                    parts.push(slot.name.clone());
                    cur = slot.parent;
                }
                None => {
                    parts.push(id.to_string());
                    cur = None;
                }
            }
        }
        parts.reverse();
        parts.join(".")
    }

    /// Dot-separated path of a plug, ending in the plug name.
    pub fn plug_path(&self, plug: PlugId) -> String {
        match self.plugs.get(&plug) {
            Some(slot) => format!("{}.{}", self.node_path(slot.node), slot.name),
            None => plug.to_string(),
        }
    }

    pub(crate) fn plug_slot(&self, plug: PlugId) -> Result<&PlugSlot, GraphError> {
        self.plugs.get(&plug).ok_or(GraphError::PlugNotFound(plug))
    }

    pub(crate) fn node_slot(&self, node: NodeId) -> Result<&NodeSlot, GraphError> {
        self.nodes.get(&node).ok_or(GraphError::NodeNotFound(node))
    }
}
