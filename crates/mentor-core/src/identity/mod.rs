//! Accounts: records, credential rules and the identity store seam.

mod memory;
mod model;
pub mod password;
mod service;
mod store;

pub use memory::InMemoryIdentityStore;
pub use model::{UserRecord, UserRecordPatch, UserRecordUpdate};
pub use service::{Authentication, IdentityService};
pub use store::IdentityStore;
