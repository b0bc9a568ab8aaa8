//! CPU versions of the bloom and composition shaders.

use crate::config::{BloomConfig, Config};
use crate::pipeline::bloom::shaders::{LUMA, THRESHOLD_SMOOTHING, WEIGHTS};
use crate::tone_mapping;

pub type Image = image::Rgb32FImage;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).max(0.0).min(1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Keeps only the pixels whose luminance exceeds the threshold.
pub fn extract_into(scene: &Image, threshold: f32, out: &mut Image) {
    assert_eq!(scene.dimensions(), out.dimensions());

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let image::Rgb(color) = *scene.get_pixel(x, y);
        let luminance = color[0] * LUMA[0] + color[1] * LUMA[1] + color[2] * LUMA[2];
        let alpha = smoothstep(threshold, threshold + THRESHOLD_SMOOTHING, luminance);

        *pixel = image::Rgb([color[0] * alpha, color[1] * alpha, color[2] * alpha]);
    }
}

pub fn extract(scene: &Image, threshold: f32) -> Image {
    let mut out = Image::new(scene.width(), scene.height());
    extract_into(scene, threshold, &mut out);
    out
}

/// Linearly filtered sample at a fractional offset along one axis, clamped
/// to the edge.
fn sample_along(image: &Image, x: u32, y: u32, offset: f32, horizontal: bool) -> [f32; 3] {
    let (position, limit) = if horizontal {
        (x as f32 + offset, image.width() - 1)
    } else {
        (y as f32 + offset, image.height() - 1)
    };

    let position = position.max(0.0).min(limit as f32);
    let lower = position.floor() as u32;
    let upper = (lower + 1).min(limit);
    let t = position - lower as f32;

    let at = |i: u32| {
        let image::Rgb(color) = if horizontal {
            *image.get_pixel(i, y)
        } else {
            *image.get_pixel(x, i)
        };
        color
    };

    let (a, b) = (at(lower), at(upper));
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// One direction of the separable Gaussian, written into `out`.
pub fn blur_into(image: &Image, horizontal: bool, radius: f32, scale: f32, out: &mut Image) {
    assert_eq!(image.dimensions(), out.dimensions());

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let mut sum = [0.0f32; 3];
        let mut add = |color: [f32; 3], weight: f32| {
            for c in 0..3 {
                sum[c] += color[c] * weight;
            }
        };

        add(sample_along(image, x, y, 0.0, horizontal), WEIGHTS[0]);
        for (i, &weight) in WEIGHTS.iter().enumerate().skip(1) {
            let offset = radius * i as f32;
            add(sample_along(image, x, y, offset, horizontal), weight);
            add(sample_along(image, x, y, -offset, horizontal), weight);
        }

        *pixel = image::Rgb([sum[0] * scale, sum[1] * scale, sum[2] * scale]);
    }
}

pub fn blur(image: &Image, horizontal: bool, radius: f32, scale: f32) -> Image {
    let mut out = Image::new(image.width(), image.height());
    blur_into(image, horizontal, radius, scale, &mut out);
    out
}

/// Extract followed by the blur rounds, intensity applied on the last one.
///
/// `scratch` holds the horizontal half of each round; the result ends up in
/// `out`. Both must have the size of `scene`.
pub fn bloom_into(scene: &Image, config: &BloomConfig, out: &mut Image, scratch: &mut Image) {
    let iterations = config.iterations.max(1);

    extract_into(scene, config.threshold, out);

    for i in 0..iterations {
        let scale = if i + 1 == iterations {
            config.intensity
        } else {
            1.0
        };

        blur_into(out, true, config.radius, 1.0, scratch);
        blur_into(scratch, false, config.radius, scale, out);
    }
}

pub fn bloom(scene: &Image, config: &BloomConfig) -> Image {
    let mut out = Image::new(scene.width(), scene.height());
    let mut scratch = Image::new(scene.width(), scene.height());
    bloom_into(scene, config, &mut out, &mut scratch);
    out
}

/// `base + bloom`, tone mapped and gamma corrected.
///
/// `target` is only reallocated when its size differs from `base`.
pub fn composite_into(base: &Image, bloom: &Image, config: &Config, target: &mut Image) {
    assert_eq!(base.dimensions(), bloom.dimensions());

    if target.dimensions() != base.dimensions() {
        *target = Image::new(base.width(), base.height());
    }

    for (x, y, pixel) in target.enumerate_pixels_mut() {
        let image::Rgb(b) = *base.get_pixel(x, y);
        let image::Rgb(g) = *bloom.get_pixel(x, y);

        let mut color = config
            .tone_mapping
            .apply([b[0] + g[0], b[1] + g[1], b[2] + g[2]]);
        if let Some(gamma) = config.gamma_correction {
            color = tone_mapping::gamma_correct(color, gamma);
        }

        *pixel = image::Rgb(color);
    }
}

pub fn composite(base: &Image, bloom: &Image, config: &Config) -> Image {
    let mut target = Image::new(base.width(), base.height());
    composite_into(base, bloom, config, &mut target);
    target
}
