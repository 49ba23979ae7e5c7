//! Interactive command surface.
//!
//! # Responsibility
//! - Parse whitespace-separated text commands.
//! - Dispatch them to the store and render replies.

pub mod dispatch;
pub mod parse;
