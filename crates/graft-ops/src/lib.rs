//! Standard node library for the graft engine.
//!
//! Small, composable nodes covering the common graph idioms: arithmetic
//! ([`AddNode`], [`MultiplyNode`]), string assembly ([`JoinNode`]), context
//! queries ([`FrameNode`]), routing ([`DotNode`], [`SwitchNode`]), and plain
//! value storage ([`HolderNode`]). They double as reference implementations
//! of the [`DynNode`](rhizome_graft_core::DynNode) contract.

mod holder;
mod math;
mod route;
mod string;
mod time;

pub use holder::HolderNode;
pub use math::{AddNode, MultiplyNode};
pub use route::{DotNode, SwitchNode};
pub use string::JoinNode;
pub use time::FrameNode;
