use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target video codec of an exported movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    /// QuickTime Animation (run-length encoded).
    Animation,
    Flv,
    H263,
    H264,
    Mpeg4,
    /// Uncompressed frames.
    Raw,
    Theora,
    Wmv,
}

impl CodecType {
    pub const ALL: [CodecType; 8] = [
        CodecType::Animation,
        CodecType::Flv,
        CodecType::H263,
        CodecType::H264,
        CodecType::Mpeg4,
        CodecType::Raw,
        CodecType::Theora,
        CodecType::Wmv,
    ];

    /// The encoder's identifier for this codec (the `-vcodec` value).
    pub fn encoder_name(&self) -> &'static str {
        match self {
            CodecType::Animation => "qtrle",
            CodecType::Flv => "flv",
            CodecType::H263 => "h263",
            CodecType::H264 => "libx264",
            CodecType::Mpeg4 => "mpeg4",
            CodecType::Raw => "rawvideo",
            CodecType::Theora => "libtheora",
            CodecType::Wmv => "wmv",
        }
    }

    /// Whether this codec is tuned by a quality preset file rather than a bitrate.
    pub fn uses_quality_preset(&self) -> bool {
        matches!(self, CodecType::H264)
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecType::Animation => write!(f, "animation"),
            CodecType::Flv => write!(f, "flv"),
            CodecType::H263 => write!(f, "h263"),
            CodecType::H264 => write!(f, "h264"),
            CodecType::Mpeg4 => write!(f, "mpeg4"),
            CodecType::Raw => write!(f, "raw"),
            CodecType::Theora => write!(f, "theora"),
            CodecType::Wmv => write!(f, "wmv"),
        }
    }
}

impl FromStr for CodecType {
    type Err = crate::ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CodecType::ALL
            .into_iter()
            .find(|c| c.to_string() == wanted || (*c == CodecType::Animation && wanted == "rle"))
            .ok_or_else(|| crate::ReelError::InvalidArgument(format!("unknown codec: {}", s)))
    }
}

/// Compression quality; only consumed by codecs that use a preset (H.264).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionQuality {
    Low,
    Medium,
    High,
    Best,
}

impl CompressionQuality {
    pub const ALL: [CompressionQuality; 4] = [
        CompressionQuality::Low,
        CompressionQuality::Medium,
        CompressionQuality::High,
        CompressionQuality::Best,
    ];

    /// Name of the x264 preset file for this quality.
    pub fn preset_name(&self) -> &'static str {
        match self {
            CompressionQuality::Low => "baseline",
            CompressionQuality::Medium => "default",
            CompressionQuality::High => "hq",
            CompressionQuality::Best => "lossless_max",
        }
    }
}

impl fmt::Display for CompressionQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionQuality::Low => write!(f, "low"),
            CompressionQuality::Medium => write!(f, "medium"),
            CompressionQuality::High => write!(f, "high"),
            CompressionQuality::Best => write!(f, "best"),
        }
    }
}

impl FromStr for CompressionQuality {
    type Err = crate::ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CompressionQuality::ALL
            .into_iter()
            .find(|q| q.to_string() == wanted)
            .ok_or_else(|| crate::ReelError::InvalidArgument(format!("unknown quality: {}", s)))
    }
}
