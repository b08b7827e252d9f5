// ── Domain model ──
//
// Wire records (`AddressListEntry`, `FirewallRule`) come straight from
// `tiklens-api`; their field names must stay byte-compatible with the
// router, so there is no separate domain copy of them.

pub mod classify;
pub mod credentials;
pub mod router_state;

pub use classify::{ActionKind, ChainKind, list_bindings};
pub use credentials::{Credentials, RouterSlot};
pub use router_state::{DataOrigin, RouterState, SlotStatus};

pub use tiklens_api::{AddressListEntry, FirewallRule, RouterData};
