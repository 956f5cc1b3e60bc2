//! # SPX Common Library
//!
//! Shared code for the sound pool extension crates:
//! - Error type and result alias
//! - TOML configuration loading
//! - Logging initialisation
//! - Clock abstraction and millisecond formatting

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use error::{Error, Result};
pub use time::{Clock, ManualClock, SystemClock};
