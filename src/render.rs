pub(crate) mod cover;
pub(crate) mod cpu;
pub(crate) mod target;
pub(crate) mod viewport;
