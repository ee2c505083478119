// ============================================================================
// scenecut-core/src/processing/similarity.rs
// ============================================================================
//
// SIMILARITY SCORER: Composite Perceptual Similarity of Two Frames
//
// Blends a structural similarity index (mean SSIM over a sliding square
// window, averaged across colour channels) with the correlation of the two
// frames' hue/saturation histograms. Brightness is ignored by the histogram
// half so a fade or exposure change does not hide a repeated scene.
//
// KEY COMPONENTS:
// - SimilarityScorer: configured scorer used by the deduplication loop
// - structural_similarity: mean SSIM with a uniform window
// - hue_saturation_histogram / histogram_correlation: 50x60 H-S histograms
//
// AI-ASSISTANT-INFO: Image similarity used to drop near-duplicate scenes

// ---- Internal crate imports ----
use crate::config::SceneDetectionConfig;
use crate::error::{CoreError, CoreResult};
use crate::media::Frame;

// ---- External crate imports ----
use image::{DynamicImage, ImageBuffer, Pixel};

const SSIM_K1: f64 = 0.01;
const SSIM_K2: f64 = 0.03;

/// Hue bins (hue spans 0..180, degrees halved)
pub const HUE_BINS: usize = 50;
/// Saturation bins (saturation spans 0..256)
pub const SATURATION_BINS: usize = 60;

/// Composite frame similarity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    window_size: usize,
    histogram_weight: f64,
}

impl SimilarityScorer {
    /// Creates a scorer.
    ///
    /// # Arguments
    ///
    /// * `window_size` - Side of the structural similarity window (odd)
    /// * `histogram_weight` - Share of the histogram score in the result (0..=1)
    ///
    /// # Returns
    ///
    /// * `Ok(SimilarityScorer)` - When both parameters are valid
    /// * `Err(CoreError::Config)` - Otherwise
    pub fn new(window_size: usize, histogram_weight: f64) -> CoreResult<Self> {
        if window_size == 0 || window_size % 2 == 0 {
            return Err(CoreError::Config(format!(
                "similarity window size must be a positive odd number, got {window_size}"
            )));
        }
        if !(0.0..=1.0).contains(&histogram_weight) {
            return Err(CoreError::Config(format!(
                "histogram weight must be within 0..=1, got {histogram_weight}"
            )));
        }
        Ok(Self {
            window_size,
            histogram_weight,
        })
    }

    /// Creates a scorer from the deduplication settings of a config.
    pub fn from_config(config: &SceneDetectionConfig) -> CoreResult<Self> {
        Self::new(config.similarity_window_size, config.histogram_weight)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn histogram_weight(&self) -> f64 {
        self.histogram_weight
    }

    /// Scores two same-shaped frames: `(1 - w) * ssim + w * histogram`,
    /// clamped to `[0, 1]`.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The composite score
    /// * `Err(CoreError::InvalidInput)` - If width, height or channel count differ
    pub fn similarity(&self, a: &Frame, b: &Frame) -> CoreResult<f64> {
        let planes_a = ChannelPlanes::from_image(a);
        let planes_b = ChannelPlanes::from_image(b);
        check_same_shape(&planes_a, &planes_b)?;

        let data_range = planes_a.data_range(&planes_b);
        let structural = mean_ssim(&planes_a, &planes_b, self.window_size, data_range);

        let hist_a = histogram_from_planes(&planes_a, data_range);
        let hist_b = histogram_from_planes(&planes_b, data_range);
        let histogram = histogram_correlation(&hist_a, &hist_b);

        let score = (1.0 - self.histogram_weight) * structural + self.histogram_weight * histogram;
        log::trace!(
            "similarity: ssim={:.4} hist={:.4} composite={:.4}",
            structural,
            histogram,
            score
        );
        Ok(score.clamp(0.0, 1.0))
    }
}

// ---- Pixel data ----

/// Numeric class of the source pixels, used to pick the SSIM data range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleKind {
    U8,
    U16,
    Float,
}

/// One `Vec<f64>` per colour channel, row-major. Alpha is dropped.
struct ChannelPlanes {
    width: usize,
    height: usize,
    kind: SampleKind,
    planes: Vec<Vec<f64>>,
}

impl ChannelPlanes {
    fn from_image(image: &DynamicImage) -> Self {
        let (kind, planes) = match image {
            DynamicImage::ImageLuma8(b) => (SampleKind::U8, planes_of(b, 1)),
            DynamicImage::ImageLumaA8(b) => (SampleKind::U8, planes_of(b, 1)),
            DynamicImage::ImageRgb8(b) => (SampleKind::U8, planes_of(b, 3)),
            DynamicImage::ImageRgba8(b) => (SampleKind::U8, planes_of(b, 3)),
            DynamicImage::ImageLuma16(b) => (SampleKind::U16, planes_of(b, 1)),
            DynamicImage::ImageLumaA16(b) => (SampleKind::U16, planes_of(b, 1)),
            DynamicImage::ImageRgb16(b) => (SampleKind::U16, planes_of(b, 3)),
            DynamicImage::ImageRgba16(b) => (SampleKind::U16, planes_of(b, 3)),
            DynamicImage::ImageRgb32F(b) => (SampleKind::Float, planes_of(b, 3)),
            DynamicImage::ImageRgba32F(b) => (SampleKind::Float, planes_of(b, 3)),
            other => (SampleKind::U8, planes_of(&other.to_rgb8(), 3)),
        };
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            kind,
            planes,
        }
    }

    /// Value range for SSIM normalisation. Float images count as 0..1 unless
    /// either frame has a sample above 1.
    fn data_range(&self, other: &Self) -> f64 {
        match self.kind {
            SampleKind::U8 => 255.0,
            SampleKind::U16 => 65535.0,
            SampleKind::Float => {
                let max = self
                    .planes
                    .iter()
                    .chain(other.planes.iter())
                    .flat_map(|plane| plane.iter())
                    .fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
                if max <= 1.0 { 1.0 } else { 255.0 }
            }
        }
    }
}

fn planes_of<P>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>, count: usize) -> Vec<Vec<f64>>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    let len = buffer.width() as usize * buffer.height() as usize;
    let mut planes = vec![Vec::with_capacity(len); count];
    for pixel in buffer.pixels() {
        let channels = pixel.channels();
        for (c, plane) in planes.iter_mut().enumerate() {
            plane.push(channels[c].into());
        }
    }
    planes
}

fn check_same_shape(a: &ChannelPlanes, b: &ChannelPlanes) -> CoreResult<()> {
    if a.width != b.width || a.height != b.height || a.planes.len() != b.planes.len() {
        return Err(CoreError::InvalidInput(format!(
            "cannot compare frames of different shape: {}x{}x{} vs {}x{}x{}",
            a.width,
            a.height,
            a.planes.len(),
            b.width,
            b.height,
            b.planes.len()
        )));
    }
    Ok(())
}

// ---- Structural similarity ----

/// Mean structural similarity of two same-shaped frames, averaged over
/// channels. The window shrinks to the largest odd size that fits.
pub fn structural_similarity(a: &Frame, b: &Frame, window_size: usize) -> CoreResult<f64> {
    let planes_a = ChannelPlanes::from_image(a);
    let planes_b = ChannelPlanes::from_image(b);
    check_same_shape(&planes_a, &planes_b)?;
    let data_range = planes_a.data_range(&planes_b);
    Ok(mean_ssim(&planes_a, &planes_b, window_size, data_range))
}

/// Largest odd window no bigger than `requested` or the smaller image side.
fn effective_window(requested: usize, width: usize, height: usize) -> usize {
    let mut window = requested.min(width).min(height).max(1);
    if window % 2 == 0 {
        window -= 1;
    }
    window
}

fn mean_ssim(a: &ChannelPlanes, b: &ChannelPlanes, window_size: usize, data_range: f64) -> f64 {
    if a.width == 0 || a.height == 0 || a.planes.is_empty() {
        return 1.0;
    }
    let window = effective_window(window_size, a.width, a.height);
    if window != window_size {
        log::debug!(
            "Reducing SSIM window from {} to {} for {}x{} frames",
            window_size,
            window,
            a.width,
            a.height
        );
    }

    let total: f64 = a
        .planes
        .iter()
        .zip(&b.planes)
        .map(|(x, y)| channel_ssim(x, y, a.width, a.height, window, data_range))
        .sum();
    total / a.planes.len() as f64
}

/// Mean SSIM of one channel over every window that lies fully inside the image.
fn channel_ssim(x: &[f64], y: &[f64], width: usize, height: usize, window: usize, range: f64) -> f64 {
    let c1 = (SSIM_K1 * range).powi(2);
    let c2 = (SSIM_K2 * range).powi(2);

    let n = (window * window) as f64;
    // Sample covariance, as in the reference SSIM formulation
    let cov_norm = if n > 1.0 { n / (n - 1.0) } else { 1.0 };

    let sum_x = SummedArea::new(width, height, |i| x[i]);
    let sum_y = SummedArea::new(width, height, |i| y[i]);
    let sum_xx = SummedArea::new(width, height, |i| x[i] * x[i]);
    let sum_yy = SummedArea::new(width, height, |i| y[i] * y[i]);
    let sum_xy = SummedArea::new(width, height, |i| x[i] * y[i]);

    let mut total = 0.0;
    let mut count = 0usize;
    for top in 0..=height - window {
        for left in 0..=width - window {
            let ux = sum_x.window(left, top, window) / n;
            let uy = sum_y.window(left, top, window) / n;
            let uxx = sum_xx.window(left, top, window) / n;
            let uyy = sum_yy.window(left, top, window) / n;
            let uxy = sum_xy.window(left, top, window) / n;

            let vx = cov_norm * (uxx - ux * ux);
            let vy = cov_norm * (uyy - uy * uy);
            let vxy = cov_norm * (uxy - ux * uy);

            let numerator = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let denominator = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += numerator / denominator;
            count += 1;
        }
    }
    total / count as f64
}

/// Summed-area table with a zero row and column in front.
struct SummedArea {
    stride: usize,
    table: Vec<f64>,
}

impl SummedArea {
    fn new(width: usize, height: usize, value: impl Fn(usize) -> f64) -> Self {
        let stride = width + 1;
        let mut table = vec![0.0; stride * (height + 1)];
        for row in 0..height {
            let mut running = 0.0;
            for col in 0..width {
                running += value(row * width + col);
                table[(row + 1) * stride + col + 1] = table[row * stride + col + 1] + running;
            }
        }
        Self { stride, table }
    }

    fn window(&self, left: usize, top: usize, size: usize) -> f64 {
        let s = self.stride;
        let (right, bottom) = (left + size, top + size);
        self.table[bottom * s + right] - self.table[top * s + right] - self.table[bottom * s + left]
            + self.table[top * s + left]
    }
}

// ---- Hue/saturation histogram ----

/// Normalised 50x60 hue/saturation histogram (hue-major), summing to 1.
pub fn hue_saturation_histogram(frame: &Frame) -> Vec<f64> {
    let planes = ChannelPlanes::from_image(frame);
    let range = planes.data_range(&planes);
    histogram_from_planes(&planes, range)
}

fn histogram_from_planes(planes: &ChannelPlanes, data_range: f64) -> Vec<f64> {
    let mut histogram = vec![0.0; HUE_BINS * SATURATION_BINS];
    let pixels = planes.width * planes.height;
    if pixels == 0 {
        return histogram;
    }
    let scale = 255.0 / data_range;
    let channel = |c: usize, i: usize| {
        let plane = &planes.planes[c.min(planes.planes.len() - 1)];
        (plane[i] * scale).clamp(0.0, 255.0)
    };

    for i in 0..pixels {
        let (hue, saturation) = hue_saturation(channel(0, i), channel(1, i), channel(2, i));
        let hue_bin = ((hue * HUE_BINS as f64 / 180.0) as usize).min(HUE_BINS - 1);
        let sat_bin = ((saturation * SATURATION_BINS as f64 / 256.0) as usize).min(SATURATION_BINS - 1);
        histogram[hue_bin * SATURATION_BINS + sat_bin] += 1.0;
    }

    for bin in histogram.iter_mut() {
        *bin /= pixels as f64;
    }
    histogram
}

/// 8-bit HSV hue (0..180) and saturation (0..=255) of an RGB triple in 0..=255.
fn hue_saturation(r: f64, g: f64, b: f64) -> (f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max > 0.0 { (255.0 * delta / max).round() } else { 0.0 };
    if delta == 0.0 {
        return (0.0, saturation);
    }

    let mut degrees = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }
    let hue = (degrees / 2.0).round();
    (if hue >= 180.0 { 0.0 } else { hue }, saturation)
}

/// Pearson correlation of two histograms. Flat histograms (zero variance)
/// compare as identical.
pub fn histogram_correlation(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 1.0;
    }
    let mean_a = a[..len].iter().sum::<f64>() / len as f64;
    let mean_b = b[..len].iter().sum::<f64>() / len as f64;

    let (mut num, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a[..len].iter().zip(&b[..len]) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        num += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    let denom = (var_a * var_b).sqrt();
    if denom.abs() > f64::EPSILON { num / denom } else { 1.0 }
}
