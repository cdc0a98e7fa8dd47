//! Image preprocessing ahead of OCR.
//!
//! Every preset converts to grayscale and ends in a binary (0/255) image.
//! - [`Preprocessor::chat`]: Gaussian blur, then Otsu binarization
//! - [`Preprocessor::order`]: 2x upscale, Otsu binarization, then a 3x3 median filter

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sigma matching a 5x5 Gaussian kernel.
const GAUSSIAN_SIGMA: f32 = 1.1;

/// Upscale factor used before binarization for small prescription text.
const UPSCALE_FACTOR: u32 = 2;

/// Median filter radius (1 = 3x3 window).
const MEDIAN_RADIUS: u32 = 1;

/// A single preprocessing step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Gaussian blur with the given sigma
    GaussianBlur(f32),
    /// Integer upscale with Catmull-Rom resampling
    Upscale(u32),
    /// Otsu global binarization
    OtsuBinarize,
    /// Median filter with the given radius
    Median(u32),
}

/// Named step sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Blur then binarize
    #[default]
    Chat,
    /// Upscale, binarize, then despeckle
    Order,
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(Preset::Chat),
            "order" => Ok(Preset::Order),
            other => Err(format!("unknown preprocessing preset: {other}")),
        }
    }
}

/// Grayscale conversion followed by a configurable list of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    steps: Vec<Step>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::chat()
    }
}

impl Preprocessor {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Chat => Self::chat(),
            Preset::Order => Self::order(),
        }
    }

    /// Denoise with a Gaussian blur, then binarize.
    pub fn chat() -> Self {
        Self::new(vec![Step::GaussianBlur(GAUSSIAN_SIGMA), Step::OtsuBinarize])
    }

    /// Upscale small text, binarize, then remove salt-and-pepper specks.
    pub fn order() -> Self {
        Self::new(vec![
            Step::Upscale(UPSCALE_FACTOR),
            Step::OtsuBinarize,
            Step::Median(MEDIAN_RADIUS),
        ])
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run grayscale conversion and every step in order.
    pub fn apply(&self, image: &DynamicImage) -> GrayImage {
        let mut gray = image.to_luma8();
        for step in &self.steps {
            gray = match *step {
                Step::GaussianBlur(sigma) => imageops::blur(&gray, sigma),
                Step::Upscale(factor) => {
                    let (w, h) = gray.dimensions();
                    imageops::resize(&gray, w * factor, h * factor, FilterType::CatmullRom)
                }
                Step::OtsuBinarize => {
                    let threshold = otsu_threshold(&gray);
                    debug!(threshold, "Otsu threshold");
                    binarize(&gray, threshold)
                }
                Step::Median(radius) => median_filter(&gray, radius),
            };
        }
        gray
    }
}

/// Otsu's global threshold: the level maximizing between-class variance.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0.0f64;
    let mut best_variance = -1.0f64;
    let mut best_level = 0u8;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_sum - background_sum) / foreground_weight as f64;
        let diff = background_mean - foreground_mean;
        let variance = background_weight as f64 * foreground_weight as f64 * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Pixels strictly above `threshold` become white, the rest black.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (w, h) = gray.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        if gray.get_pixel(x, y).0[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Median filter over a `(2r+1)^2` window, clamping at the borders.
pub fn median_filter(gray: &GrayImage, radius: u32) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 || radius == 0 {
        return gray.clone();
    }

    let side = (2 * radius + 1) as usize;
    let mut window = Vec::with_capacity(side * side);

    GrayImage::from_fn(w, h, |x, y| {
        window.clear();
        for dy in 0..=2 * radius {
            let ny = (y + dy).saturating_sub(radius).min(h - 1);
            for dx in 0..=2 * radius {
                let nx = (x + dx).saturating_sub(radius).min(w - 1);
                window.push(gray.get_pixel(nx, ny).0[0]);
            }
        }
        window.sort_unstable();
        Luma([window[window.len() / 2]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half dark text-ish gray, right half light paper gray.
    fn bimodal(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([40])
            } else {
                Luma([210])
            }
        })
    }

    fn is_binary(gray: &GrayImage) -> bool {
        gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
    }

    #[test]
    fn otsu_splits_bimodal_image() {
        let threshold = otsu_threshold(&bimodal(20, 10));
        assert!((40..210).contains(&threshold), "got {threshold}");
    }

    #[test]
    fn otsu_empty_image_is_zero() {
        assert_eq!(otsu_threshold(&GrayImage::new(0, 0)), 0);
    }

    #[test]
    fn binarize_is_strictly_greater() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([[99u8, 100, 101][x as usize]]));
        let out = binarize(&gray, 100);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 0);
        assert_eq!(out.get_pixel(2, 0).0[0], 255);
    }

    #[test]
    fn median_removes_isolated_speck() {
        let mut gray = GrayImage::from_pixel(5, 5, Luma([255]));
        gray.put_pixel(2, 2, Luma([0]));

        let out = median_filter(&gray, 1);
        assert_eq!(out.get_pixel(2, 2).0[0], 255);
    }

    #[test]
    fn chat_preset_yields_binary_image() {
        let image = DynamicImage::ImageLuma8(bimodal(16, 8));
        let out = Preprocessor::chat().apply(&image);

        assert_eq!(out.dimensions(), (16, 8));
        assert!(is_binary(&out));
    }

    #[test]
    fn order_preset_upscales_and_binarizes() {
        let image = DynamicImage::ImageLuma8(bimodal(16, 8));
        let out = Preprocessor::order().apply(&image);

        assert_eq!(out.dimensions(), (32, 16));
        assert!(is_binary(&out));
        // Far edges keep their side of the split
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(31, 15).0[0], 255);
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("order".parse::<Preset>(), Ok(Preset::Order));
        assert_eq!("CHAT".parse::<Preset>(), Ok(Preset::Chat));
        assert!("fax".parse::<Preset>().is_err());
    }
}
