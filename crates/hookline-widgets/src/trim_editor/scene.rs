//! Geometry of the trim editor, independent of the renderer
//!
//! [`build_scene`] turns waveform buckets, the region and the playhead into
//! plain rectangles and x positions. The canvas only paints what it is given,
//! which keeps the layout testable without a GPU.

use hookline_core::trim::TrimRegion;

use super::drag::time_to_pixel;

/// Share of each bucket slot covered by its bar
const BAR_FILL: f32 = 0.7;

/// Logical surface size plus the display scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale_factor,
        }
    }

    /// Round a logical coordinate to the nearest physical pixel
    pub fn snap(&self, value: f32) -> f32 {
        (value * self.scale_factor).round() / self.scale_factor
    }

    /// One physical pixel in logical units
    pub fn pixel(&self) -> f32 {
        1.0 / self.scale_factor
    }
}

/// One waveform bar, centered vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub width: f32,
    /// Extent above (and below) the center line
    pub half_height: f32,
    /// Bar lies inside the preview window
    pub selected: bool,
}

/// Horizontal span in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub x: f32,
    pub width: f32,
}

impl Span {
    pub fn end(&self) -> f32 {
        self.x + self.width
    }
}

/// Everything the trim canvas paints for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RegionScene {
    pub size: SurfaceSize,
    pub bars: Vec<Bar>,
    /// Highlight over `[start, end)`
    pub band: Span,
    /// Start and end handle x positions
    pub handles: [f32; 2],
    /// Playback cursor x, only while playing inside the window
    pub cursor: Option<f32>,
}

/// Lay out the waveform, window band, handles and cursor
pub fn build_scene(
    samples: &[f32],
    region: &TrimRegion,
    playhead: f64,
    is_playing: bool,
    surface: SurfaceSize,
) -> RegionScene {
    let total = region.total_duration();
    let width = surface.width;
    let half = surface.height / 2.0;

    let band_x = surface.snap(time_to_pixel(region.start(), width, total));
    let band_end = surface.snap(time_to_pixel(region.end(), width, total));
    let band = Span {
        x: band_x,
        width: (band_end - band_x).max(0.0),
    };

    let bars = if samples.is_empty() {
        Vec::new()
    } else {
        let slot = width / samples.len() as f32;
        let bar_width = surface.snap(slot * BAR_FILL).max(surface.pixel());
        samples
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let amplitude = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
                let x = surface.snap(i as f32 * slot);
                let center = x + bar_width / 2.0;
                Bar {
                    x,
                    width: bar_width,
                    half_height: surface.snap(amplitude * half),
                    selected: band.width > 0.0 && center >= band.x && center < band.end(),
                }
            })
            .collect()
    };

    let cursor = (is_playing && region.contains(playhead))
        .then(|| surface.snap(time_to_pixel(playhead, width, total)));

    RegionScene {
        size: surface,
        bars,
        band,
        handles: [band.x, band.end()],
        cursor,
    }
}

/// Identity of a scene, used to decide when the cached geometry is stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneKey {
    waveform_revision: u64,
    start_bits: u64,
    end_bits: u64,
    /// Cursor position in physical pixels
    cursor_px: Option<i64>,
    width_bits: u32,
    height_bits: u32,
    scale_bits: u32,
}

impl SceneKey {
    pub fn new(
        waveform_revision: u64,
        region: &TrimRegion,
        playhead: f64,
        is_playing: bool,
        surface: SurfaceSize,
    ) -> Self {
        let cursor_px = (is_playing && region.contains(playhead)).then(|| {
            let x = time_to_pixel(playhead, surface.width, region.total_duration());
            (x * surface.scale_factor).round() as i64
        });
        Self {
            waveform_revision,
            start_bits: region.start().to_bits(),
            end_bits: region.end().to_bits(),
            cursor_px,
            width_bits: surface.width.to_bits(),
            height_bits: surface.height.to_bits(),
            scale_bits: surface.scale_factor.to_bits(),
        }
    }
}
