use crate::foundation::core::{Affine, Size};

/// Geometry of the render target, re-derived on every resize.
///
/// Drawing math is done in logical units. The backing store is
/// `floor(logical * device_pixel_ratio)` pixels and the target applies
/// [`Viewport::transform`] to map logical units onto it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub logical_width: f64,
    pub logical_height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Non-finite or negative sizes become 0; a missing or non-positive
    /// pixel ratio falls back to 1.
    pub fn new(logical_width: f64, logical_height: f64, device_pixel_ratio: f64) -> Self {
        fn sanitize(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        let dpr = sanitize(device_pixel_ratio);
        Self {
            logical_width: sanitize(logical_width),
            logical_height: sanitize(logical_height),
            device_pixel_ratio: if dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    pub fn logical_size(&self) -> Size {
        Size::new(self.logical_width, self.logical_height)
    }

    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.logical_width * self.device_pixel_ratio).floor() as u32,
            (self.logical_height * self.device_pixel_ratio).floor() as u32,
        )
    }

    pub fn transform(&self) -> Affine {
        Affine::scale(self.device_pixel_ratio)
    }

    pub fn is_empty(&self) -> bool {
        let (w, h) = self.backing_size();
        w == 0 || h == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/viewport.rs"]
mod tests;
