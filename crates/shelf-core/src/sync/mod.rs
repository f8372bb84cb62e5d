//! One-way sheet synchronization
//!
//! Best-effort, fire-and-forget mirroring of a book's current state to an
//! external sheet-backed endpoint after a local mutation. The relay never
//! rolls back or blocks the local commit; a failed push is reported and
//! then forgotten (no retry queue).

mod payload;
mod relay;

pub use payload::{SheetPayload, SyncAction};
pub use relay::{SheetRelay, SyncError};
