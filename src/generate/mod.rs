//! Source images: procedural generation and file decoding.

pub mod load;
pub mod shapes;

pub use load::{decode_image, encode_png, load_image};
pub use shapes::{Shape, ShapeGenerator, ShapeStyle};
