//! Session persistence: store service, two-phase staging protocol, and the
//! periodic snapshot loop.

pub mod snapshot;
pub mod store;

pub use snapshot::{run_snapshot_loop, SessionExporter};
pub use store::SessionStore;
