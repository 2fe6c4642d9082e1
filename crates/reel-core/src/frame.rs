use serde::{Deserialize, Serialize};

/// Pixel format of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (4 bytes per pixel).
    Rgba8,
    /// 8-bit RGB (3 bytes per pixel, no alpha).
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// A single movie frame as a raw pixel buffer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Raw pixel data, row-major.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            data: vec![0u8; size],
            width,
            height,
            format,
        }
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &crate::Color) -> Self {
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
            format: PixelFormat::Rgba8,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Width and height as a tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel data length agrees with the dimensions and format.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.pixel_count() * self.format.bytes_per_pixel()
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        let px = self.data.get(offset..offset + bpp)?;
        match self.format {
            PixelFormat::Rgba8 => Some([px[0], px[1], px[2], px[3]]),
            PixelFormat::Rgb8 => Some([px[0], px[1], px[2], 255]),
        }
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = ((y as usize) * (self.width as usize) + (x as usize)) * bpp;
        if let Some(px) = self.data.get_mut(offset..offset + bpp) {
            px[..3].copy_from_slice(&rgba[..3]);
            if bpp == 4 {
                px[3] = rgba[3];
            }
        }
    }

    /// Fill an ellipse inscribed in the `w`x`h` box whose top-left corner is
    /// at (`x`, `y`). Parts outside the buffer are clipped.
    pub fn fill_ellipse(&mut self, x: i32, y: i32, w: u32, h: u32, color: &crate::Color) {
        if w == 0 || h == 0 {
            return;
        }
        let rgba = color.to_rgba8();
        let rx = w as f32 / 2.0;
        let ry = h as f32 / 2.0;
        let cx = x as f32 + rx;
        let cy = y as f32 + ry;

        let y0 = y.max(0);
        let y1 = (y + h as i32).min(self.height as i32);
        let x0 = x.max(0);
        let x1 = (x + w as i32).min(self.width as i32);

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = (px as f32 + 0.5 - cx) / rx;
                let dy = (py as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.set_pixel(px as u32, py as u32, rgba);
                }
            }
        }
    }

    /// Convert into an `image` buffer suitable for lossless encoding.
    ///
    /// Returns `None` if the data length does not match the dimensions.
    pub fn to_dynamic_image(&self) -> Option<image::DynamicImage> {
        match self.format {
            PixelFormat::Rgba8 => {
                image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
                    .map(image::DynamicImage::ImageRgba8)
            }
            PixelFormat::Rgb8 => {
                image::RgbImage::from_raw(self.width, self.height, self.data.clone())
                    .map(image::DynamicImage::ImageRgb8)
            }
        }
    }
}

impl From<image::RgbaImage> for FrameBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            format: PixelFormat::Rgba8,
        }
    }
}

impl From<image::DynamicImage> for FrameBuffer {
    fn from(img: image::DynamicImage) -> Self {
        match img {
            image::DynamicImage::ImageRgb8(rgb) => {
                let (width, height) = rgb.dimensions();
                Self {
                    data: rgb.into_raw(),
                    width,
                    height,
                    format: PixelFormat::Rgb8,
                }
            }
            other => Self::from(other.to_rgba8()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_frame_buffer_new() {
        let fb = FrameBuffer::new(1920, 1080, PixelFormat::Rgba8);
        assert_eq!(fb.width, 1920);
        assert_eq!(fb.height, 1080);
        assert_eq!(fb.byte_size(), 1920 * 1080 * 4);
        assert_eq!(fb.pixel_count(), 1920 * 1080);
        assert!(fb.is_well_formed());
    }

    #[test]
    fn test_frame_buffer_solid() {
        let fb = FrameBuffer::solid(2, 2, &Color::RED);
        assert_eq!(fb.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.get_pixel(1, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_frame_buffer_get_set_pixel_rgb() {
        let mut fb = FrameBuffer::new(10, 10, PixelFormat::Rgb8);
        fb.set_pixel(5, 5, [128, 64, 32, 7]);
        assert_eq!(fb.get_pixel(5, 5), Some([128, 64, 32, 255]));
    }

    #[test]
    fn test_frame_buffer_out_of_bounds() {
        let fb = FrameBuffer::new(10, 10, PixelFormat::Rgba8);
        assert_eq!(fb.get_pixel(10, 0), None);
        assert_eq!(fb.get_pixel(0, 10), None);
    }

    #[test]
    fn test_truncated_buffer_is_not_well_formed() {
        let mut fb = FrameBuffer::new(4, 4, PixelFormat::Rgba8);
        fb.data.truncate(10);
        assert!(!fb.is_well_formed());
        assert!(fb.to_dynamic_image().is_none());
        assert_eq!(fb.get_pixel(3, 3), None);
    }

    #[test]
    fn test_fill_ellipse_clips_and_paints_center() {
        let mut fb = FrameBuffer::solid(20, 20, &Color::WHITE);
        fb.fill_ellipse(-5, -5, 10, 10, &Color::BLUE);
        assert_eq!(fb.get_pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(fb.get_pixel(10, 10), Some([255, 255, 255, 255]));

        fb.fill_ellipse(10, 10, 6, 6, &Color::RED);
        assert_eq!(fb.get_pixel(13, 13), Some([255, 0, 0, 255]));
        // Bounding-box corner lies outside the ellipse.
        assert_eq!(fb.get_pixel(10, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_dynamic_image_conversion() {
        let fb = FrameBuffer::solid(3, 2, &Color::GREEN);
        let img = fb.to_dynamic_image().unwrap();
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);

        let back = FrameBuffer::from(img);
        assert_eq!(back.format, PixelFormat::Rgba8);
        assert_eq!(back.get_pixel(2, 1), Some([0, 255, 0, 255]));
    }
}
