use crate::canvas::{Region, Rgb};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    #[error("unknown image handle '{0}'")]
    UnknownImage(String),

    #[error("pixel sampler unavailable: {0}")]
    Unavailable(String),
}

/// Averages the background pixels behind a region.
///
/// Implementations clamp the region to the image bounds and return
/// [`Rgb::NEUTRAL_GRAY`] when nothing of the region is left.
pub trait PixelSampler: Send + Sync {
    fn sample_region_average(&self, image: &str, region: Region) -> Result<Rgb, SamplerError>;
}

/// Every handle resolves to the same flat color.
#[derive(Debug, Clone, Copy)]
pub struct SolidBackground {
    pub color: Rgb,
}

impl SolidBackground {
    pub fn new(color: Rgb) -> Self {
        Self { color }
    }
}

impl PixelSampler for SolidBackground {
    fn sample_region_average(&self, _image: &str, region: Region) -> Result<Rgb, SamplerError> {
        if region.is_degenerate() {
            return Ok(Rgb::NEUTRAL_GRAY);
        }
        Ok(self.color)
    }
}

/// Row-major RGB pixel buffer.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgb>,
}

impl RasterImage {
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn fill_region(&mut self, region: Region, color: Rgb) {
        if let Some(r) = region.clamp_to(self.width, self.height) {
            for y in r.y as u32..(r.y as u32 + r.h) {
                let row = (y * self.width) as usize;
                for x in r.x as u32..(r.x as u32 + r.w) {
                    self.pixels[row + x as usize] = color;
                }
            }
        }
    }

    /// Truncated per-channel mean over the clamped region.
    pub fn average(&self, region: Region) -> Rgb {
        let Some(r) = region.clamp_to(self.width, self.height) else {
            return Rgb::NEUTRAL_GRAY;
        };

        let mut sums = [0u64; 3];
        for y in r.y as u32..(r.y as u32 + r.h) {
            let row = (y * self.width) as usize;
            for px in &self.pixels[row + r.x as usize..row + (r.x as u32 + r.w) as usize] {
                sums[0] += u64::from(px.0);
                sums[1] += u64::from(px.1);
                sums[2] += u64::from(px.2);
            }
        }
        let n = u64::from(r.w) * u64::from(r.h);
        Rgb(
            (sums[0] / n) as u8,
            (sums[1] / n) as u8,
            (sums[2] / n) as u8,
        )
    }
}

/// In-memory rasters keyed by image handle.
#[derive(Debug, Clone, Default)]
pub struct RasterSampler {
    images: HashMap<String, RasterImage>,
}

impl RasterSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, handle: &str, image: RasterImage) -> Self {
        self.images.insert(handle.to_string(), image);
        self
    }
}

impl PixelSampler for RasterSampler {
    fn sample_region_average(&self, image: &str, region: Region) -> Result<Rgb, SamplerError> {
        let raster = self
            .images
            .get(image)
            .ok_or_else(|| SamplerError::UnknownImage(image.to_string()))?;
        Ok(raster.average(region))
    }
}

/// Memoizes samples by `(handle, region)`. Lives for one autofix run;
/// failures are not cached.
pub struct SampleCache<'a> {
    inner: &'a dyn PixelSampler,
    entries: Mutex<HashMap<(String, Region), Rgb>>,
}

impl<'a> SampleCache<'a> {
    pub fn new(inner: &'a dyn PixelSampler) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PixelSampler for SampleCache<'_> {
    fn sample_region_average(&self, image: &str, region: Region) -> Result<Rgb, SamplerError> {
        let key = (image.to_string(), region);
        if let Ok(entries) = self.entries.lock() {
            if let Some(&hit) = entries.get(&key) {
                return Ok(hit);
            }
        }

        let color = self.inner.sample_region_average(image, region)?;
        debug!("sampled {} {:?} -> {}", image, region, color);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, color);
        }
        Ok(color)
    }
}
