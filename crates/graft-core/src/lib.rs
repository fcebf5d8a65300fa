//! Incremental, content-addressed node graph engine.
//!
//! A [`Graph`] owns nodes exposing typed input/output plugs. Output values
//! are computed lazily by each node's [`DynNode`] implementation, keyed in a
//! shared [`ValueCache`] by content hash, and parameterized by the
//! thread-scoped [`Context`]. Mutating a value or rewiring a connection
//! dirties downstream plugs through each node's declared `affects` relation;
//! reads never recompute more than their hashes require and never fire
//! notifications.
//!
//! - [`Graph`] - node/plug container, connections, signals, evaluation entry
//! - [`DynNode`] - the `affects`/`hash`/`compute` contract nodes implement
//! - [`Value`] / [`ValueType`] - dynamic values flowing through plugs
//! - [`Context`] - per-thread evaluation environment (frame etc.)
//! - [`ValueCache`] - hash-keyed value store with a memory budget

mod cache;
mod context;
mod error;
mod eval;
mod graph;
mod hash;
mod node;
mod value;

pub use cache::ValueCache;
pub use context::{CancellationToken, Context, ContextScope, DEFAULT_FRAME, FRAME_VAR};
pub use error::{GraphError, TypeError};
pub use eval::{ComputeScope, HashScope};
pub use glam;
pub use graph::{ErrorEvent, Graph, NodeId, PlugId, SubscriberId};
pub use hash::{ContentHash, ContentHasher};
pub use node::{BoxedNode, ContainerNode, Direction, DynNode, PortDescriptor};
pub use value::{GraphValue, Value, ValueType};
