//! Command Dispatcher
//!
//! Resolves a [`Frame`] to the first [`CommandKind`] that matches it and runs
//! the command against the shared store.
//!
//! ```text
//!   Frame ──> resolve() ──> Command::from_frame() ──> execute(&mut Store)
//!                │                    │
//!                ▼                    ▼
//!         no match: None       bad argument: ERR reply
//! ```
//!
//! The store is shared by every connection on the event loop thread. A
//! command borrows it only for the duration of `execute`, which never awaits,
//! so commands from different clients never interleave.

use crate::commands::command::{Command, CommandKind};
use crate::protocol::{Frame, RespValue};
use crate::storage::Store;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

/// Routes frames to commands.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: Rc<RefCell<Store>>,
}

impl Dispatcher {
    pub fn new(store: Rc<RefCell<Store>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Rc<RefCell<Store>> {
        &self.store
    }

    /// Returns the first command kind, in [`CommandKind::ALL`] order, that
    /// matches `frame`.
    pub fn resolve(frame: &Frame) -> Option<CommandKind> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.matches(frame))
    }

    /// Runs `frame` at the current time.
    ///
    /// Returns `None` when the frame is not a recognized command; the caller
    /// must not write anything back in that case.
    pub fn dispatch(&self, frame: &Frame) -> Option<RespValue> {
        self.dispatch_at(frame, Instant::now())
    }

    /// Runs `frame` as if the current time were `now`.
    pub fn dispatch_at(&self, frame: &Frame, now: Instant) -> Option<RespValue> {
        let Some(kind) = Self::resolve(frame) else {
            warn!(
                command = %frame.name_lossy(),
                args = frame.args().len(),
                "Unrecognized command"
            );
            return None;
        };

        let reply = match Command::from_frame(kind, frame) {
            Ok(command) => command.execute(&mut self.store.borrow_mut(), now),
            Err(e) => {
                debug!(command = kind.name(), error = %e, "Rejected command arguments");
                RespValue::error(e.to_string())
            }
        };

        debug!(command = kind.name(), "Executed command");
        Some(reply)
    }
}
