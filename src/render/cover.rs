use crate::{
    assets::raster::Raster,
    foundation::core::{Rect, Size},
    foundation::error::{ReelError, ReelResult},
    render::target::RenderTarget,
    render::viewport::Viewport,
};

/// Placement of an image that fills a viewport without distortion.
///
/// The overflowing dimension is centered and cropped by the viewport edges,
/// so one offset is always zero and the other is `<= 0`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoverFit {
    pub offset_x: f64,
    pub offset_y: f64,
    pub draw_width: f64,
    pub draw_height: f64,
}

impl CoverFit {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.draw_width,
            self.offset_y + self.draw_height,
        )
    }
}

/// Cover-fit `image` into `viewport` (both in the same units as the result).
///
/// Returns `None` when either size has no area.
pub fn cover_fit(image: Size, viewport: Size) -> Option<CoverFit> {
    let (iw, ih) = (image.width, image.height);
    let (vw, vh) = (viewport.width, viewport.height);
    if !(iw > 0.0 && ih > 0.0 && vw > 0.0 && vh > 0.0) {
        return None;
    }

    // `iw / ih > vw / vh`, cross-multiplied so equal ratios compare equal
    // and the equal-ratio case lands exactly on the viewport size.
    if iw * vh > vw * ih {
        // Wider than the viewport: match height, crop left/right.
        let draw_width = vh * iw / ih;
        Some(CoverFit {
            offset_x: (vw - draw_width) / 2.0,
            offset_y: 0.0,
            draw_width,
            draw_height: vh,
        })
    } else {
        // Taller (or equal): match width, crop top/bottom.
        let draw_height = vw * ih / iw;
        Some(CoverFit {
            offset_x: 0.0,
            offset_y: (vh - draw_height) / 2.0,
            draw_width: vw,
            draw_height,
        })
    }
}

/// Paints one frame per call with cover-fit placement.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoverRenderer;

impl CoverRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Cover-fit `raster` into `viewport` and paint it on `target`.
    pub fn draw(
        &self,
        raster: &Raster,
        viewport: &Viewport,
        target: &mut dyn RenderTarget,
    ) -> ReelResult<CoverFit> {
        let fit = cover_fit(raster.size(), viewport.logical_size()).ok_or_else(|| {
            ReelError::render(format!(
                "cannot cover-fit {}x{} raster into {}x{} viewport",
                raster.width, raster.height, viewport.logical_width, viewport.logical_height
            ))
        })?;
        target.draw_raster(raster, fit.rect())?;
        Ok(fit)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
