use std::{cell::RefCell, rc::Rc};

use crate::{
    assets::raster::Raster, foundation::core::Rect, foundation::error::ReelResult,
    render::viewport::Viewport,
};

/// The canvas a player paints into.
///
/// Hosts implement this over whatever surface they own (a browser canvas,
/// a window, an offscreen pixmap). All coordinates passed in are logical.
pub trait RenderTarget {
    /// Current geometry of the element hosting the target, or `None` when
    /// it has been detached or destroyed.
    fn measure(&self) -> Option<Viewport>;

    /// Resize the backing store to `viewport.backing_size()` and install
    /// `viewport.transform()`. Previous pixels are discarded.
    fn configure(&mut self, viewport: &Viewport) -> ReelResult<()>;

    /// Paint `raster` scaled into `dest`. The raster is opaque over the
    /// previous contents; callers do not clear first.
    fn draw_raster(&mut self, raster: &Raster, dest: Rect) -> ReelResult<()>;

    fn attach_resize_listener(&mut self) {}

    fn detach_resize_listener(&mut self) {}
}

/// Shared handle: the host keeps a clone to inspect the target while the
/// player paints through its own.
impl<T: RenderTarget> RenderTarget for Rc<RefCell<T>> {
    fn measure(&self) -> Option<Viewport> {
        self.borrow().measure()
    }

    fn configure(&mut self, viewport: &Viewport) -> ReelResult<()> {
        self.borrow_mut().configure(viewport)
    }

    fn draw_raster(&mut self, raster: &Raster, dest: Rect) -> ReelResult<()> {
        self.borrow_mut().draw_raster(raster, dest)
    }

    fn attach_resize_listener(&mut self) {
        self.borrow_mut().attach_resize_listener();
    }

    fn detach_resize_listener(&mut self) {
        self.borrow_mut().detach_resize_listener();
    }
}
