//! jukebox-verify library exports.
//!
//! The binary is a thin CLI over [`verify::run`]; everything is exported so
//! integration tests can drive the engine with a fake inspector.

pub mod check;
pub mod config;
pub mod inspect;
pub mod process;
pub mod record;
pub mod requirements;
pub mod sections;
pub mod timing;
pub mod verify;
