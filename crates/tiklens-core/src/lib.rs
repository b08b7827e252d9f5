//! Router state, acquisition strategies and reconciliation for tiklens.
//!
//! Sits between `tiklens-api` and the CLI:
//!
//! - **[`Acquirer`]**: the deployment's acquisition strategy (direct or
//!   proxied) behind the [`Acquire`] trait. Every attempt yields a
//!   [`ConnectionResult`]; transport errors become a [`FailureKind`].
//!
//! - **[`fallback`]**: the [`FailurePolicy`] that decides whether a failed
//!   attempt shows the [`demo_dataset`] or surfaces the error.
//!
//! - **[`Dashboard`]**: owns the two [`RouterState`] slots and discards
//!   results of superseded connect requests.
//!
//! - **[`compare()`]** and **[`ExportDocument`]**: address-list
//!   reconciliation and JSON export of a connected router.

pub mod acquire;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod fallback;
pub mod model;
pub mod result;

// ── Primary re-exports ──────────────────────────────────────────────
pub use acquire::{Acquire, Acquirer, DirectAcquirer, ProxiedAcquirer};
pub use compare::{Comparison, EntryKey, RouterSummary, compare};
pub use config::{AcquisitionConfig, AcquisitionMode, TlsVerification};
pub use dashboard::{ConnectTicket, Dashboard};
pub use error::CoreError;
pub use export::ExportDocument;
pub use fallback::{ConnectOutcome, FailurePolicy, demo_dataset};
pub use result::{ConnectionResult, FailureKind};

pub use tiklens_api::{ConnectRequest, ConnectResponse, DEFAULT_AUTH_PORT};

pub use model::{
    ActionKind, AddressListEntry, ChainKind, Credentials, DataOrigin, FirewallRule, RouterData,
    RouterSlot, RouterState, SlotStatus, list_bindings,
};
