//! Synthetic animation used by `reel demo`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reel_core::{Color, FrameBuffer};

/// Circles per frame.
const CIRCLES: usize = 100;
const CIRCLE_SIZE: u32 = 30;

/// Render frame `index`: the same scattered circles every frame (the RNG is
/// reseeded), shifted down-right by one pixel per frame.
pub fn render_frame(width: u32, height: u32, index: u32, seed: u64, background: &Color) -> FrameBuffer {
    let mut frame = FrameBuffer::solid(width, height, background);
    let mut rng = StdRng::seed_from_u64(seed);
    let shift = index as i32;
    for _ in 0..CIRCLES {
        let color = Color::from_rgb8(rng.gen_range(0..255), 255, rng.gen_range(0..255));
        let x = rng.gen_range(0..width.max(1)) as i32 + shift;
        let y = rng.gen_range(0..height.max(1)) as i32 + shift;
        frame.fill_ellipse(x, y, CIRCLE_SIZE, CIRCLE_SIZE, &color);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_deterministic() {
        let a = render_frame(64, 48, 3, 7, &Color::WHITE);
        let b = render_frame(64, 48, 3, 7, &Color::WHITE);
        assert_eq!(a.data, b.data);
        assert_eq!(a.dimensions(), (64, 48));
    }

    #[test]
    fn test_frames_move() {
        let a = render_frame(64, 48, 0, 0, &Color::WHITE);
        let b = render_frame(64, 48, 5, 0, &Color::WHITE);
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn test_circles_are_drawn_over_background() {
        let frame = render_frame(64, 48, 0, 0, &Color::WHITE);
        let white = [255, 255, 255, 255];
        let painted = (0..48)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.get_pixel(x, y) != Some(white))
            .count();
        assert!(painted > 0);
    }
}
