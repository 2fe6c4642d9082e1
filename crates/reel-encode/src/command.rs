use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use reel_core::EncoderConfig;

use crate::bitrate::BitratePolicy;
use crate::movie::MovieSettings;
use crate::template::FrameTemplate;

/// A fully resolved encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl EncodeCommand {
    /// Build `<program> -y -i <pattern> -vcodec <codec> [-fpre <preset> | -b <N>k] <output>`.
    pub fn build(
        program: impl Into<PathBuf>,
        template: &FrameTemplate,
        settings: &MovieSettings,
        config: &EncoderConfig,
        bitrate: &dyn BitratePolicy,
    ) -> Self {
        let mut args: Vec<OsString> = Vec::with_capacity(9);
        args.push("-y".into()); // Overwrite output
        args.push("-i".into());
        args.push(template.pattern());
        args.push("-vcodec".into());
        args.push(config.codec_name(settings.codec).into());

        if settings.codec.uses_quality_preset() {
            args.push("-fpre".into());
            args.push(config.preset_path(settings.quality).into());
        } else {
            let kbps = bitrate.bitrate_kbps(settings.width, settings.height);
            args.push("-b".into());
            args.push(format!("{}k", kbps).into());
        }

        args.push(settings.target_path.clone().into_os_string());

        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    /// Value following `flag`, if present.
    pub fn flag_value(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }
}

impl fmt::Display for EncodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitrate::FixedBitrate;
    use reel_core::{CodecType, CompressionQuality};

    fn settings(codec: CodecType, quality: CompressionQuality) -> MovieSettings {
        MovieSettings {
            target_path: PathBuf::from("out.mp4"),
            width: 100,
            height: 100,
            codec,
            quality,
            verbose: false,
        }
    }

    #[test]
    fn test_h264_uses_preset_file() {
        let template = FrameTemplate::from_base("/tmp/sme1");
        let cmd = EncodeCommand::build(
            "/usr/bin/ffmpeg",
            &template,
            &settings(CodecType::H264, CompressionQuality::Best),
            &EncoderConfig::default(),
            &FixedBitrate::default(),
        );
        assert_eq!(
            cmd.to_string(),
            "/usr/bin/ffmpeg -y -i /tmp/sme1-%05d.png -vcodec libx264 \
             -fpre res/ffpresets/libx264-lossless_max.ffpreset out.mp4"
        );
        assert!(cmd.flag_value("-b").is_none());
    }

    #[test]
    fn test_other_codecs_use_bitrate() {
        let template = FrameTemplate::from_base("/tmp/sme1");
        let cmd = EncodeCommand::build(
            "ffmpeg",
            &template,
            &settings(CodecType::Mpeg4, CompressionQuality::Best),
            &EncoderConfig::default(),
            &FixedBitrate::default(),
        );
        assert_eq!(cmd.flag_value("-vcodec"), Some(OsStr::new("mpeg4")));
        assert_eq!(cmd.flag_value("-b"), Some(OsStr::new("1000k")));
        assert!(cmd.flag_value("-fpre").is_none());
        assert_eq!(cmd.args().last(), Some(OsStr::new("out.mp4")));
    }

    #[test]
    fn test_bitrate_policy_is_consulted() {
        let template = FrameTemplate::from_base("/tmp/sme1");
        let cmd = EncodeCommand::build(
            "ffmpeg",
            &template,
            &settings(CodecType::Flv, CompressionQuality::Low),
            &EncoderConfig::default(),
            &FixedBitrate(2500),
        );
        assert_eq!(cmd.flag_value("-b"), Some(OsStr::new("2500k")));
    }

    #[test]
    fn test_config_overrides_codec_and_preset() {
        let mut config = EncoderConfig {
            preset_template: "/presets/{}.ffpreset".into(),
            ..Default::default()
        };
        config.codec_names.insert(CodecType::H264, "libopenh264".into());
        config
            .quality_presets
            .insert(CompressionQuality::Medium, "medium".into());

        let cmd = EncodeCommand::build(
            "ffmpeg",
            &FrameTemplate::from_base("/tmp/sme1"),
            &settings(CodecType::H264, CompressionQuality::Medium),
            &config,
            &FixedBitrate::default(),
        );
        assert_eq!(cmd.flag_value("-vcodec"), Some(OsStr::new("libopenh264")));
        assert_eq!(
            cmd.flag_value("-fpre"),
            Some(OsStr::new("/presets/medium.ffpreset"))
        );
    }
}
