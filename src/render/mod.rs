pub(crate) mod compositor;
pub(crate) mod frame;
pub(crate) mod pipeline;
pub(crate) mod plan;
pub(crate) mod surface_pool;
pub(crate) mod texture;
