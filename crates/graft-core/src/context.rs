//! Evaluation context with a per-thread scope stack.
//!
//! A [`Context`] carries named variables (the frame number, plus anything
//! else) that computations may read. Contexts are not passed as arguments;
//! each thread has a stack of active contexts, and [`Context::current`]
//! returns the innermost one. Push a context with [`Context::scoped`] and
//! the returned guard pops it on drop, so two threads evaluating the same
//! graph at different frames never see each other's variables.
//!
//! # Example
//!
//! ```
//! use rhizome_graft_core::Context;
//!
//! assert_eq!(Context::current().frame(), 1.0);
//!
//! let ctx = Context::new().with_frame(10.0);
//! {
//!     let _scope = ctx.scoped();
//!     assert_eq!(Context::current().frame(), 10.0);
//! }
//! assert_eq!(Context::current().frame(), 1.0);
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;

use crate::hash::{ContentHash, ContentHasher};
use crate::value::Value;

/// Name of the frame variable every context carries.
pub const FRAME_VAR: &str = "frame";

/// Default frame number for a fresh context.
pub const DEFAULT_FRAME: f64 = 1.0;

thread_local! {
    static STACK: RefCell<Vec<Arc<Context>>> = const { RefCell::new(Vec::new()) };
}

static DEFAULT: Lazy<Arc<Context>> = Lazy::new(|| Arc::new(Context::new()));

/// Token for cooperative cancellation of long evaluations.
///
/// Clone it freely; all clones share the flag. Long computations should
/// poll `HashScope::check_cancelled` periodically.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears the flag so the token can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Named variables an evaluation runs under.
///
/// Equality and [`digest`](Context::digest) cover the variables only; the
/// cancellation token is control flow, not content.
#[derive(Debug, Clone, Default)]
pub struct Context {
    vars: BTreeMap<String, Value>,
    cancel: Option<CancellationToken>,
}

impl Context {
    /// Creates a context with the frame variable set to its default.
    pub fn new() -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(FRAME_VAR.to_string(), Value::F64(DEFAULT_FRAME));
        Self { vars, cancel: None }
    }

    /// Returns the frame number.
    ///
    /// Falls back to the default if the variable was removed or holds a
    /// non-numeric value.
    pub fn frame(&self) -> f64 {
        match self.vars.get(FRAME_VAR) {
            Some(Value::F64(f)) => *f,
            Some(Value::F32(f)) => *f as f64,
            Some(Value::I32(i)) => *i as f64,
            _ => DEFAULT_FRAME,
        }
    }

    /// Sets the frame number.
    pub fn set_frame(&mut self, frame: f64) {
        self.vars.insert(FRAME_VAR.to_string(), Value::F64(frame));
    }

    /// Builder form of [`set_frame`](Context::set_frame).
    pub fn with_frame(mut self, frame: f64) -> Self {
        self.set_frame(frame);
        self
    }

    /// Returns a variable's value, if set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Sets a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Builder form of [`set`](Context::set).
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Removes a variable, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    /// Iterates over all variables in name order.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the attached cancellation token, if any.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Returns `true` if an attached token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Digest of all variables, suitable for folding into value hashes.
    ///
    /// Variables fold in name order, so digests are deterministic across
    /// insertion orders.
    pub fn digest(&self) -> ContentHash {
        let mut h = ContentHasher::new();
        for (name, value) in &self.vars {
            h.append_str(name);
            value.append_to(&mut h);
        }
        h.finish()
    }

    /// Pushes a copy of this context onto the current thread's stack.
    ///
    /// The returned guard pops it when dropped. Guards are thread-bound;
    /// they cannot be sent to another thread.
    pub fn scoped(&self) -> ContextScope {
        ContextScope::push(Arc::new(self.clone()))
    }

    /// The innermost context active on this thread.
    ///
    /// Returns a process-wide default (frame 1.0, no other variables) when
    /// no scope is active.
    pub fn current() -> Arc<Context> {
        STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(|| DEFAULT.clone())
        })
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.vars == other.vars
    }
}

impl Eq for Context {}

/// Guard that keeps a context active on the current thread.
///
/// Created by [`Context::scoped`]. Scopes nest; dropping restores the
/// previously active context.
pub struct ContextScope {
    // Keeps the guard on the thread whose stack it pushed onto.
    _not_send: PhantomData<*const ()>,
}

impl ContextScope {
    fn push(ctx: Arc<Context>) -> Self {
        STACK.with(|stack| stack.borrow_mut().push(ctx));
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
