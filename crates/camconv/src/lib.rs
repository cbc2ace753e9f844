#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use camconv_3d as geometry;

#[doc(inline)]
pub use camconv_render as render;

#[doc(inline)]
pub use camconv_resolver as resolver;
