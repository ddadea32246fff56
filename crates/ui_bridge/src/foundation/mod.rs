//! Foundation module - Core utilities and types
//!
//! - Math types shared by the projector, translator and input bridge
//! - Frame timing
//! - Logging setup

pub mod math;
pub mod time;
pub mod logging;
