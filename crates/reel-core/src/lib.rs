//! # reel-core
//!
//! Core types shared across the Reel crates: frame buffers, colors,
//! codec and quality tables, encoder configuration, and error types.

pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use codec::{CodecType, CompressionQuality};
pub use color::Color;
pub use config::EncoderConfig;
pub use error::{ReelError, ReelResult};
pub use frame::{FrameBuffer, PixelFormat};
