//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌──────────────────────┬──────────┬─────────┬─────────────┐  │
//! │  │ GateState            │ on_enter │ on_exit │ on_update   │  │
//! │  ├──────────────────────┼──────────┼─────────┼─────────────┤  │
//! │  │ Idle                 │ fn(ctx)  │:       │ fn -> Opt<> │  │
//! │  │ AwaitingVerification │ fn(ctx)  │ fn(ctx) │ fn -> Opt<> │  │
//! │  │ GateOpen             │:        │:       │ fn -> Opt<> │  │
//! │  │ GateClosing          │:        │:       │ fn -> Opt<> │  │
//! │  └──────────────────────┴──────────┴─────────┴─────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  At most one transition happens per tick.  All
//! functions receive `&mut GateContext`.

pub mod context;
pub mod states;

use context::GateContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all gate states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GateState {
    Idle = 0,
    AwaitingVerification = 1,
    GateOpen = 2,
    GateClosing = 3,
}

impl GateState {
    /// Total number of states: used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert a `u8` index back to `GateState`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::AwaitingVerification,
            2 => Self::GateOpen,
            3 => Self::GateClosing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut GateContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut GateContext) -> Option<GateState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: GateState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `GateState as usize`.
    table: [StateDescriptor; GateState::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; GateState::COUNT], initial: GateState) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut GateContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    pub fn tick(&mut self, ctx: &mut GateContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Jump straight to `next`, running exit/enter actions.
    #[cfg(test)]
    pub(crate) fn force_transition(&mut self, next: GateState, ctx: &mut GateContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> GateState {
        GateState::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: GateState, ctx: &mut GateContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
