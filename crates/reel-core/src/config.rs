use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::codec::{CodecType, CompressionQuality};
use crate::error::{ReelError, ReelResult};

/// Environment variable that pins the encoder binary.
pub const ENCODER_ENV_VAR: &str = "REEL_FFMPEG";

/// Settings for the external encoder and the frame staging area.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Explicit encoder binary. Skips platform resolution when set.
    pub binary: Option<PathBuf>,
    /// Directory holding packaged binaries as `<os>/bin/ffmpeg`.
    pub platform_dir: PathBuf,
    /// Used when neither `binary` nor a packaged binary exists.
    pub fallback_binary: PathBuf,
    /// Path of the H.264 preset file; `{}` is replaced by the preset name.
    pub preset_template: String,
    /// Where staged frames go. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,
    pub temp_prefix: String,
    /// Treat a non-zero encoder exit as a failed export.
    pub check_exit_status: bool,
    /// Overrides for the `-vcodec` identifiers.
    pub codec_names: BTreeMap<CodecType, String>,
    /// Overrides for the quality preset names.
    pub quality_presets: BTreeMap<CompressionQuality, String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary: None,
            platform_dir: PathBuf::from("platform"),
            fallback_binary: PathBuf::from("/usr/bin/ffmpeg"),
            preset_template: "res/ffpresets/libx264-{}.ffpreset".to_string(),
            temp_dir: None,
            temp_prefix: "sme".to_string(),
            check_exit_status: true,
            codec_names: BTreeMap::new(),
            quality_presets: BTreeMap::new(),
        }
    }
}

impl EncoderConfig {
    pub fn load_from_file(path: &Path) -> ReelResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ReelError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to_file(&self, path: &Path) -> ReelResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ReelError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config with `binary` taken from `REEL_FFMPEG` if set.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `REEL_FFMPEG` on top of this config.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(bin) = std::env::var_os(ENCODER_ENV_VAR).filter(|v| !v.is_empty()) {
            self.binary = Some(PathBuf::from(bin));
        }
        self
    }

    /// Encoder identifier for `codec`, honoring overrides.
    pub fn codec_name(&self, codec: CodecType) -> &str {
        self.codec_names
            .get(&codec)
            .map(String::as_str)
            .unwrap_or_else(|| codec.encoder_name())
    }

    /// Preset name for `quality`, honoring overrides.
    pub fn preset_name(&self, quality: CompressionQuality) -> &str {
        self.quality_presets
            .get(&quality)
            .map(String::as_str)
            .unwrap_or_else(|| quality.preset_name())
    }

    /// Preset file path for `quality`.
    pub fn preset_path(&self, quality: CompressionQuality) -> String {
        self.preset_template.replacen("{}", self.preset_name(quality), 1)
    }

    /// Directory that receives staged frames.
    pub fn staging_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Packaged binary location for the current platform.
    pub fn packaged_binary(&self) -> PathBuf {
        let name = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };
        self.platform_dir
            .join(std::env::consts::OS)
            .join("bin")
            .join(name)
    }

    /// Resolve the encoder executable: explicit binary, then the packaged
    /// binary for this platform, then the fallback path.
    pub fn resolve_binary(&self) -> PathBuf {
        if let Some(bin) = &self.binary {
            tracing::debug!("using configured encoder {}", bin.display());
            return bin.clone();
        }
        let packaged = self.packaged_binary();
        if packaged.is_file() {
            tracing::debug!("using packaged encoder {}", packaged.display());
            return std::path::absolute(&packaged).unwrap_or(packaged);
        }
        tracing::debug!(
            "no packaged encoder at {}, falling back to {}",
            packaged.display(),
            self.fallback_binary.display()
        );
        self.fallback_binary.clone()
    }
}
