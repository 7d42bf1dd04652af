//! Shared text pipeline applied to both extracted texts.

pub mod count;
pub mod normalize;

pub use count::WordCount;
pub use normalize::normalize;
