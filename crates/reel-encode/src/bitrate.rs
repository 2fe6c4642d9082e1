//! Bitrate selection for codecs that are not driven by a quality preset.

/// Chooses the target bitrate (kbit/s) for a movie of the given size.
pub trait BitratePolicy: Send + Sync + std::fmt::Debug {
    fn bitrate_kbps(&self, width: u32, height: u32) -> u32;
}

/// The same bitrate regardless of resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBitrate(pub u32);

impl Default for FixedBitrate {
    fn default() -> Self {
        FixedBitrate(1000)
    }
}

impl BitratePolicy for FixedBitrate {
    fn bitrate_kbps(&self, _width: u32, _height: u32) -> u32 {
        self.0
    }
}

/// Bitrate proportional to pixel area, clamped to `[min_kbps, max_kbps]`.
/// Swapped bounds are treated as the same range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelAreaBitrate {
    /// Kilobits per second for each megapixel of frame area.
    pub kbps_per_megapixel: f64,
    pub min_kbps: u32,
    pub max_kbps: u32,
}

impl Default for PixelAreaBitrate {
    fn default() -> Self {
        // ~3.3 Mbit/s at 720p.
        Self {
            kbps_per_megapixel: 3600.0,
            min_kbps: 200,
            max_kbps: 50_000,
        }
    }
}

impl BitratePolicy for PixelAreaBitrate {
    fn bitrate_kbps(&self, width: u32, height: u32) -> u32 {
        let megapixels = (width as f64 * height as f64) / 1_000_000.0;
        let kbps = (megapixels * self.kbps_per_megapixel).round();
        let low = self.min_kbps.min(self.max_kbps);
        let high = self.min_kbps.max(self.max_kbps);
        (kbps as u32).clamp(low, high)
    }
}
