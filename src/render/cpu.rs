use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::raster::{Raster, unpremultiply_rgba8_in_place},
    foundation::core::{Affine, Rect},
    foundation::error::{ReelError, ReelResult},
    render::target::RenderTarget,
    render::viewport::Viewport,
};

/// Offscreen canvas backed by a `vello_cpu` pixmap.
///
/// Host geometry is set explicitly with [`PixmapTarget::set_host_geometry`],
/// standing in for the parent element's layout box and the display's pixel
/// ratio. Nothing is allocated until the target is configured.
pub struct PixmapTarget {
    host: Option<Viewport>,
    surface: Option<CpuSurface>,
    last_paint: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
    listening: bool,
    draw_count: u64,
}

struct CpuSurface {
    viewport: Viewport,
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for PixmapTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapTarget")
            .field("host", &self.host)
            .field("backing", &self.backing_size())
            .field("listening", &self.listening)
            .field("draw_count", &self.draw_count)
            .finish()
    }
}

impl PixmapTarget {
    pub fn new(logical_width: f64, logical_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            host: Some(Viewport::new(
                logical_width,
                logical_height,
                device_pixel_ratio,
            )),
            surface: None,
            last_paint: None,
            listening: false,
            draw_count: 0,
        }
    }

    /// Simulate the hosting element changing size or moving to a display
    /// with another pixel ratio. Takes effect on the next `measure`.
    pub fn set_host_geometry(&mut self, logical_width: f64, logical_height: f64, dpr: f64) {
        self.host = Some(Viewport::new(logical_width, logical_height, dpr));
    }

    /// Simulate the element being removed from its document.
    pub fn detach(&mut self) {
        self.host = None;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    pub fn configured_viewport(&self) -> Option<Viewport> {
        self.surface.as_ref().map(|s| s.viewport)
    }

    pub fn backing_size(&self) -> Option<(u32, u32)> {
        self.surface
            .as_ref()
            .map(|s| (u32::from(s.width), u32::from(s.height)))
    }

    /// Backing store as straight-alpha RGBA8, or `None` before the first
    /// configure.
    pub fn to_rgba8(&self) -> Option<Vec<u8>> {
        let surface = self.surface.as_ref()?;
        let mut data = surface.pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Some(data)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> ReelResult<()> {
        let path = path.as_ref();
        let (width, height) = self
            .backing_size()
            .ok_or_else(|| ReelError::render("pixmap target was never configured"))?;
        let data = self
            .to_rgba8()
            .ok_or_else(|| ReelError::render("pixmap target was never configured"))?;
        image::save_buffer_with_format(
            path,
            &data,
            width,
            height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn paint_for(&mut self, raster: &Raster) -> ReelResult<vello_cpu::Image> {
        if let Some((bytes, paint)) = &self.last_paint
            && Arc::ptr_eq(bytes, &raster.rgba8_premul)
        {
            return Ok(paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(raster.rgba8_premul.as_slice(), raster.width, raster.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.last_paint = Some((Arc::clone(&raster.rgba8_premul), paint.clone()));
        Ok(paint)
    }
}

impl RenderTarget for PixmapTarget {
    fn measure(&self) -> Option<Viewport> {
        self.host
    }

    fn configure(&mut self, viewport: &Viewport) -> ReelResult<()> {
        let (w, h) = viewport.backing_size();
        if w == 0 || h == 0 {
            return Err(ReelError::render(format!(
                "backing store {w}x{h} has no area"
            )));
        }
        let width: u16 = w
            .try_into()
            .map_err(|_| ReelError::render("backing store width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| ReelError::render("backing store height exceeds u16"))?;

        self.surface = Some(CpuSurface {
            viewport: *viewport,
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        });
        Ok(())
    }

    fn draw_raster(&mut self, raster: &Raster, dest: Rect) -> ReelResult<()> {
        if raster.is_empty() {
            return Err(ReelError::render("cannot draw an empty raster"));
        }
        if self.surface.is_none() {
            return Err(ReelError::render("draw before configure"));
        }

        let paint = self.paint_for(raster)?;
        let Some(surface) = self.surface.as_mut() else {
            return Err(ReelError::render("draw before configure"));
        };

        let (iw, ih) = (f64::from(raster.width), f64::from(raster.height));
        let placement = surface.viewport.transform()
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);

        let mut ctx = vello_cpu::RenderContext::new(surface.width, surface.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(placement));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);

        self.draw_count += 1;
        Ok(())
    }

    fn attach_resize_listener(&mut self) {
        self.listening = true;
    }

    fn detach_resize_listener(&mut self) {
        self.listening = false;
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("raster height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::render("raster byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
