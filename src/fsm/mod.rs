//! Table-driven finite state machine engine.
//!
//! Classic embedded transition-table pattern:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Transition table (scanned top to bottom)                  │
//! │  ┌──────────────┬───────────────┬──────────────┬─────────┐ │
//! │  │ from          │ guard         │ to           │ action  │ │
//! │  ├──────────────┼───────────────┼──────────────┼─────────┤ │
//! │  │ Released      │ fn(&ctx)->bool│ PressedWait  │ Some(fn)│ │
//! │  │ PressedWait   │ fn(&ctx)->bool│ Pressed      │ None    │ │
//! │  │ ...           │               │              │         │ │
//! │  └──────────────┴───────────────┴──────────────┴─────────┘ │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each `fire()` scans the table **in declaration order** for the first row
//! whose `from` equals the current state and whose guard holds.  That row's
//! action runs, the current state becomes its `to`, and the scan stops:
//! at most one transition per call.  When nothing matches the machine stays
//! put.  The initial state is the `from` of the first row.
//!
//! Guards only read the machine's context; actions may mutate it and call
//! out to the hardware ports it holds.
//!
//! Each machine kind writes its rows once, as an associated `const TABLE`.
//! Rows are plain function pointers, so every instance starts from the same
//! immutable table and only its current state differs.

pub mod button;
pub mod buzzer;
pub mod display;
pub mod ultrasound;
pub mod urbanite;

use core::fmt::Debug;

use log::{debug, error, warn};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Pure predicate over the machine context.
pub type GuardFn<C> = fn(&C) -> bool;

/// Side effect run when a transition fires.
pub type ActionFn<C> = fn(&mut C);

// ---------------------------------------------------------------------------
// Transition row
// ---------------------------------------------------------------------------

/// One row of a transition table.  No heap, no `dyn`.
pub struct Transition<S, C> {
    pub from: S,
    pub guard: GuardFn<C>,
    pub to: S,
    pub action: Option<ActionFn<C>>,
}

impl<S: Copy, C> Clone for Transition<S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Copy, C> Copy for Transition<S, C> {}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The state machine engine.
///
/// Holds a fixed-size transition table and the current state.  The context
/// `C` lives outside the engine and is threaded through every guard and
/// action, so the owning machine can also read it between fires.
pub struct Fsm<S, C, const N: usize> {
    name: &'static str,
    table: [Transition<S, C>; N],
    current: S,
}

impl<S, C, const N: usize> Fsm<S, C, N>
where
    S: Copy + PartialEq + Debug,
{
    /// Build an engine over `table`, starting in the first row's source state.
    pub fn new(name: &'static str, table: [Transition<S, C>; N]) -> Self {
        const { assert!(N > 0, "transition table must not be empty") };
        let current = table[0].from;
        Self {
            name,
            table,
            current,
        }
    }

    /// Evaluate the table once.  Returns the new state if a row fired.
    pub fn fire(&mut self, ctx: &mut C) -> Option<S> {
        let current = self.current;
        let row = *self
            .table
            .iter()
            .find(|row| row.from == current && (row.guard)(ctx))?;

        if let Some(action) = row.action {
            action(ctx);
        }
        if row.to != current {
            debug!("{}: {:?} -> {:?}", self.name, current, row.to);
        }
        self.current = row.to;
        Some(row.to)
    }

    /// The current state.
    pub fn state(&self) -> S {
        self.current
    }

    /// Overwrite the current state without running any action.
    pub fn set_state(&mut self, state: S) {
        self.current = state;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The transition rows.  There is no mutable access after construction.
    pub fn table(&self) -> &[Transition<S, C>; N] {
        &self.table
    }
}

// ---------------------------------------------------------------------------
// Port call helpers
// ---------------------------------------------------------------------------

/// Unwrap a port read made from a guard.  A failed read is logged and
/// yields `None`, so the guard evaluates false and the machine parks.
pub(crate) fn port_read<T>(machine: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!("{machine}: {e}");
            None
        }
    }
}

/// Log a failed port write made from an action and carry on.
pub(crate) fn port_write(machine: &'static str, result: Result<()>) {
    if let Err(e) = result {
        warn!("{machine}: {e}");
    }
}
