//! Data transfer objects for remote stores.

mod user;

pub use user::{UserDto, UserPatchDto};
