pub(crate) mod clock;
pub(crate) mod player;
pub(crate) mod scheduler;
