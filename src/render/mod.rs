//! Drawing surfaces and the per-frame compositor.

pub mod compositor;
pub mod cpu;
pub mod surface;

pub use compositor::{AppliedMotion, Compositor};
pub use cpu::CpuSurface;
pub use surface::Surface;
