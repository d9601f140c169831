//! Frame compositing: particles and overlay geometry onto a camera frame.

use blinkbeat_model::effect::ParticleSprite;
use blinkbeat_model::geometry::PixelRect;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::overlay::OverlayAnnotations;

const EYE_BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const PROGRESS_COLOR: Rgb<u8> = Rgb([255, 215, 0]);
const PROGRESS_HEIGHT: u32 = 6;
const PROGRESS_MARGIN: u32 = 10;

/// Composite particles (alpha-blended) and overlay geometry onto a copy
/// of `frame`.
pub fn compose(
    frame: &RgbImage,
    sprites: &[ParticleSprite],
    overlay: Option<&OverlayAnnotations>,
) -> RgbImage {
    let mut out = if sprites.iter().any(|s| s.radius > 0) {
        blend_particles(frame, sprites)
    } else {
        frame.clone()
    };

    if let Some(overlay) = overlay {
        for eye_box in [overlay.left_eye_box, overlay.right_eye_box].into_iter().flatten() {
            if let Some(rect) = to_rect(&eye_box) {
                draw_hollow_rect_mut(&mut out, rect, EYE_BOX_COLOR);
            }
        }
        if let Some(progress) = overlay.calibration_progress {
            draw_progress_bar(&mut out, progress);
        }
    }

    out
}

fn blend_particles(frame: &RgbImage, sprites: &[ParticleSprite]) -> RgbImage {
    let mut out = frame.clone();
    for sprite in sprites.iter().filter(|s| s.radius > 0) {
        blend_disc(&mut out, sprite);
    }
    out
}

/// Rasterize the disc once into a mask, then blend each covered pixel
/// exactly once at the sprite's opacity.
fn blend_disc(image: &mut RgbImage, sprite: &ParticleSprite) {
    let r = sprite.radius as i32;
    let side = sprite.radius * 2 + 1;
    let mut mask = GrayImage::new(side, side);
    draw_filled_circle_mut(&mut mask, (r, r), r, Luma([255]));

    let alpha = sprite.opacity.clamp(0.0, 1.0);
    let cx = sprite.position.x.round() as i32;
    let cy = sprite.position.y.round() as i32;
    let (w, h) = image.dimensions();

    for (mx, my, m) in mask.enumerate_pixels() {
        if m[0] == 0 {
            continue;
        }
        let x = cx - r + mx as i32;
        let y = cy - r + my as i32;
        if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
            continue;
        }
        let px = image.get_pixel_mut(x as u32, y as u32);
        for (dst, src) in px.0.iter_mut().zip(sprite.color.0) {
            *dst = (*dst as f64 * (1.0 - alpha) + src as f64 * alpha).round() as u8;
        }
    }
}

fn draw_progress_bar(image: &mut RgbImage, progress: f64) {
    let (w, h) = image.dimensions();
    if w <= 2 * PROGRESS_MARGIN || h <= PROGRESS_HEIGHT + PROGRESS_MARGIN {
        return;
    }
    let full = w - 2 * PROGRESS_MARGIN;
    let filled = (full as f64 * progress.clamp(0.0, 1.0)).round() as u32;
    if filled == 0 {
        return;
    }
    let y = (h - PROGRESS_MARGIN - PROGRESS_HEIGHT) as i32;
    let rect = Rect::at(PROGRESS_MARGIN as i32, y).of_size(filled, PROGRESS_HEIGHT);
    draw_filled_rect_mut(image, rect, PROGRESS_COLOR);
}

fn to_rect(b: &PixelRect) -> Option<Rect> {
    let w = b.w.round();
    let h = b.h.round();
    if !(w >= 1.0 && h >= 1.0) {
        return None;
    }
    Some(Rect::at(b.x.round() as i32, b.y.round() as i32).of_size(w as u32, h as u32))
}
