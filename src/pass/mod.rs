pub(crate) mod contents;
pub(crate) mod delegate;
pub(crate) mod paint;
