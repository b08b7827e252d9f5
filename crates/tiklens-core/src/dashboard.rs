// ── Two-slot coordinator ──
//
// Owns both router states, the acquisition strategy and the failure
// policy. Each slot carries a monotonically increasing request token; a
// result is applied only if it answers the slot's latest request.

use std::mem;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::acquire::Acquire;
use crate::compare::{self, Comparison};
use crate::error::CoreError;
use crate::export::ExportDocument;
use crate::fallback::{self, FailurePolicy};
use crate::model::{Credentials, RouterSlot, RouterState};
use crate::result::ConnectionResult;

/// Handle for one in-flight connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectTicket {
    pub slot: RouterSlot,
    token: u64,
}

pub struct Dashboard<A> {
    acquirer: A,
    policy: FailurePolicy,
    primary: RouterState,
    secondary: RouterState,
    latest: [u64; 2],
}

impl<A: Acquire> Dashboard<A> {
    pub fn new(acquirer: A, policy: FailurePolicy) -> Self {
        Self {
            acquirer,
            policy,
            primary: RouterState::new(Credentials::for_slot(RouterSlot::Primary)),
            secondary: RouterState::new(Credentials::for_slot(RouterSlot::Secondary)),
            latest: [0; 2],
        }
    }

    pub fn state(&self, slot: RouterSlot) -> &RouterState {
        match slot {
            RouterSlot::Primary => &self.primary,
            RouterSlot::Secondary => &self.secondary,
        }
    }

    fn state_mut(&mut self, slot: RouterSlot) -> &mut RouterState {
        match slot {
            RouterSlot::Primary => &mut self.primary,
            RouterSlot::Secondary => &mut self.secondary,
        }
    }

    fn replace(&mut self, slot: RouterSlot, f: impl FnOnce(RouterState) -> RouterState) {
        let state = self.state_mut(slot);
        *state = f(mem::take(state));
    }

    /// Move `slot` to connecting and issue a fresh request token.
    pub fn begin_connect(&mut self, slot: RouterSlot, credentials: Credentials) -> ConnectTicket {
        let index = slot_index(slot);
        self.latest[index] += 1;
        let token = self.latest[index];
        debug!(%slot, token, host = %credentials.host, "connect requested");
        self.replace(slot, |state| state.begin_connect(credentials));
        ConnectTicket { slot, token }
    }

    /// Apply the result of `ticket`'s request.
    ///
    /// Returns `false` (and leaves the slot untouched) when a newer request
    /// was issued for the same slot in the meantime.
    pub fn finish_connect(&mut self, ticket: ConnectTicket, result: ConnectionResult) -> bool {
        let latest = self.latest[slot_index(ticket.slot)];
        if ticket.token != latest {
            warn!(
                slot = %ticket.slot,
                token = ticket.token,
                latest,
                "discarding stale connect result"
            );
            return false;
        }
        let outcome = fallback::resolve(self.policy, result);
        self.replace(ticket.slot, |state| state.resolve(outcome));
        true
    }

    /// Begin, acquire, finish.
    pub async fn connect(&mut self, slot: RouterSlot, credentials: Credentials) -> &RouterState {
        let ticket = self.begin_connect(slot, credentials.clone());
        let result = self.acquirer.acquire(&credentials).await;
        self.finish_connect(ticket, result);
        self.state(slot)
    }

    /// Connect both slots concurrently.
    pub async fn connect_both(&mut self, primary: Credentials, secondary: Credentials) {
        let first = self.begin_connect(RouterSlot::Primary, primary.clone());
        let second = self.begin_connect(RouterSlot::Secondary, secondary.clone());

        let (a, b) = tokio::join!(
            self.acquirer.acquire(&primary),
            self.acquirer.acquire(&secondary)
        );

        self.finish_connect(first, a);
        self.finish_connect(second, b);
    }

    /// Put an exported document into `slot` as connected data.
    ///
    /// Supersedes any request still in flight for that slot.
    pub fn load_snapshot(&mut self, slot: RouterSlot, document: ExportDocument) {
        self.latest[slot_index(slot)] += 1;
        *self.state_mut(slot) = document.into_state();
    }

    pub fn connected_count(&self) -> usize {
        RouterSlot::ALL
            .into_iter()
            .filter(|slot| self.state(*slot).is_connected())
            .count()
    }

    /// Export document for `slot`, or `None` if it is not connected.
    pub fn export(&self, slot: RouterSlot, now: DateTime<Utc>) -> Option<ExportDocument> {
        ExportDocument::capture(self.state(slot), now)
    }

    /// Primary vs. secondary address lists.
    pub fn compare(&self) -> Result<Comparison, CoreError> {
        compare::compare(&self.primary, &self.secondary)
    }
}

fn slot_index(slot: RouterSlot) -> usize {
    match slot {
        RouterSlot::Primary => 0,
        RouterSlot::Secondary => 1,
    }
}
