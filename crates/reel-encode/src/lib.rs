//! # reel-encode
//!
//! Turns a sequence of frames into a movie: frames are staged as numbered
//! PNG files, then handed to an external ffmpeg-compatible encoder in a
//! single invocation. Staged files are removed on every exit path.

pub mod bitrate;
pub mod command;
pub mod movie;
pub mod runner;
pub mod stager;
pub mod template;

pub use bitrate::{BitratePolicy, FixedBitrate, PixelAreaBitrate};
pub use command::EncodeCommand;
pub use movie::{EncodeReport, Movie, MovieBuilder, MovieSettings};
pub use runner::{ProcessOutput, ProcessRunner, SystemRunner};
pub use stager::FrameStager;
pub use template::FrameTemplate;
