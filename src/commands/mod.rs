//! CLI command handlers.

mod verify;

pub use verify::{cmd_verify, VerifyArgs};
