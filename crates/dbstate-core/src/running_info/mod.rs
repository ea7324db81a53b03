//! The running database instance descriptor.
//!
//! A started server is described by a [`RunningInstanceInfo`] which is saved
//! to a well-known file through [`RunningInfoStore`]. Other processes load
//! that file to find and connect to the server, and it is removed when the
//! server shuts down.

pub mod atomic;
pub mod descriptor;
pub mod store;

pub use descriptor::RunningInstanceInfo;
pub use store::{AbsentReason, LoadOutcome, RunningInfoStore};
