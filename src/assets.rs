pub(crate) mod buffer;
pub(crate) mod raster;
pub(crate) mod source;
