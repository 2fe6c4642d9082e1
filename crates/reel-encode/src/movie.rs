//! Movie export sessions.
//!
//! ```no_run
//! use reel_core::{Color, FrameBuffer};
//! use reel_encode::Movie;
//!
//! let mut movie = Movie::new("hello.mp4", 640, 480)?;
//! for _ in 0..20 {
//!     movie.add_frame(&FrameBuffer::solid(640, 480, &Color::WHITE))?;
//! }
//! movie.encode()?;
//! # Ok::<(), reel_core::ReelError>(())
//! ```

use std::path::{Path, PathBuf};

use reel_core::frame::FrameBuffer;
use reel_core::{CodecType, CompressionQuality, EncoderConfig, ReelError, ReelResult};

use crate::bitrate::{BitratePolicy, FixedBitrate};
use crate::command::EncodeCommand;
use crate::runner::{ProcessRunner, SystemRunner};
use crate::stager::FrameStager;
use crate::template::FrameTemplate;

/// The immutable parameters of one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSettings {
    pub target_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub codec: CodecType,
    pub quality: CompressionQuality,
    /// Log the encoder command line and output at info level.
    pub verbose: bool,
}

/// Summary of a finished encode.
#[derive(Debug, Clone)]
pub struct EncodeReport {
    pub output_path: PathBuf,
    pub frame_count: usize,
    pub exit_code: Option<i32>,
    /// Everything the encoder printed.
    pub log: String,
}

/// Configures a [`Movie`] before any frame is staged.
#[derive(Debug)]
pub struct MovieBuilder {
    settings: MovieSettings,
    config: EncoderConfig,
    bitrate: Box<dyn BitratePolicy>,
}

impl MovieBuilder {
    pub fn codec(mut self, codec: CodecType) -> Self {
        self.settings.codec = codec;
        self
    }

    pub fn quality(mut self, quality: CompressionQuality) -> Self {
        self.settings.quality = quality;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.settings.verbose = verbose;
        self
    }

    pub fn config(mut self, config: EncoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Bitrate used for codecs without a quality preset.
    pub fn bitrate_policy(mut self, policy: impl BitratePolicy + 'static) -> Self {
        self.bitrate = Box::new(policy);
        self
    }

    pub fn build(self) -> ReelResult<Movie> {
        let MovieSettings { width, height, .. } = self.settings;
        if width == 0 || height == 0 {
            return Err(ReelError::InvalidArgument(format!(
                "movie dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let staging_dir = self.config.staging_dir();
        std::fs::create_dir_all(&staging_dir)?;
        let template = FrameTemplate::unique(&staging_dir, &self.config.temp_prefix);
        tracing::debug!(
            "new movie {} ({}x{}, {}), staging at {}",
            self.settings.target_path.display(),
            width,
            height,
            self.settings.codec,
            template.pattern().to_string_lossy()
        );

        Ok(Movie {
            stager: FrameStager::new(template, width, height),
            settings: self.settings,
            config: self.config,
            bitrate: self.bitrate,
        })
    }
}

/// One export: frames are staged to disk, then encoded once.
///
/// A movie is single-use. [`Movie::encode`] consumes it, and after
/// [`Movie::cleanup`] every further [`Movie::add_frame`] fails with
/// [`ReelError::SessionClosed`]. Dropping a movie that was never encoded
/// removes its staged frames.
#[derive(Debug)]
pub struct Movie {
    settings: MovieSettings,
    config: EncoderConfig,
    bitrate: Box<dyn BitratePolicy>,
    stager: FrameStager,
}

impl Movie {
    /// H.264 at best quality, quiet, default encoder config.
    pub fn new(target_path: impl Into<PathBuf>, width: u32, height: u32) -> ReelResult<Self> {
        Self::builder(target_path, width, height).build()
    }

    pub fn builder(target_path: impl Into<PathBuf>, width: u32, height: u32) -> MovieBuilder {
        MovieBuilder {
            settings: MovieSettings {
                target_path: target_path.into(),
                width,
                height,
                codec: CodecType::H264,
                quality: CompressionQuality::Best,
                verbose: false,
            },
            config: EncoderConfig::default(),
            bitrate: Box::new(FixedBitrate::default()),
        }
    }

    pub fn settings(&self) -> &MovieSettings {
        &self.settings
    }

    pub fn target_path(&self) -> &Path {
        &self.settings.target_path
    }

    pub fn is_verbose(&self) -> bool {
        self.settings.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.settings.verbose = verbose;
    }

    pub fn frame_count(&self) -> usize {
        self.stager.frame_count()
    }

    pub fn template(&self) -> &FrameTemplate {
        self.stager.template()
    }

    /// Where frame `index` is (or would be) staged.
    pub fn path_for_frame(&self, index: usize) -> PathBuf {
        self.stager.path_for_frame(index)
    }

    /// Stage `frame` as the next frame of the movie.
    ///
    /// The frame must match the movie's dimensions exactly.
    pub fn add_frame(&mut self, frame: &FrameBuffer) -> ReelResult<()> {
        self.stager.stage(frame)
    }

    /// Discard all staged frames without encoding. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        self.stager.cleanup();
    }

    /// The command [`Movie::encode`] would run.
    pub fn encode_command(&self) -> EncodeCommand {
        EncodeCommand::build(
            self.config.resolve_binary(),
            self.stager.template(),
            &self.settings,
            &self.config,
            self.bitrate.as_ref(),
        )
    }

    /// Run the external encoder over the staged frames.
    pub fn encode(self) -> ReelResult<EncodeReport> {
        self.encode_with(&SystemRunner)
    }

    /// Like [`Movie::encode`], launching the encoder through `runner`.
    ///
    /// Staged frames are removed when this returns, whatever the outcome.
    pub fn encode_with(self, runner: &dyn ProcessRunner) -> ReelResult<EncodeReport> {
        if self.stager.is_closed() {
            return Err(ReelError::SessionClosed);
        }
        let frame_count = self.frame_count();
        if frame_count == 0 {
            return Err(ReelError::NoFrames);
        }

        let command = self.encode_command();
        // Dropped on every return path below, deleting the staged frames.
        let Movie {
            settings,
            config,
            stager: _staged,
            ..
        } = self;

        if let Some(parent) = settings.target_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        diagnostic(settings.verbose, &command.to_string());
        let output = runner.run(&command)?;
        if !output.output.is_empty() {
            diagnostic(settings.verbose, output.output.trim_end());
        }

        if !output.success() {
            if config.check_exit_status {
                return Err(ReelError::EncodeFailed {
                    status: output.exit_code,
                    output: output.output,
                });
            }
            tracing::warn!(
                "encoder exited with {:?} while encoding {}",
                output.exit_code,
                settings.target_path.display()
            );
        }

        tracing::info!(
            "Encoded {} frames to {} ({}x{}, {})",
            frame_count,
            settings.target_path.display(),
            settings.width,
            settings.height,
            settings.codec
        );

        Ok(EncodeReport {
            output_path: settings.target_path,
            frame_count,
            exit_code: output.exit_code,
            log: output.output,
        })
    }
}

fn diagnostic(verbose: bool, message: &str) {
    if verbose {
        tracing::info!("{}", message);
    } else {
        tracing::debug!("{}", message);
    }
}
