//! Sheen Core - GPU-agnostic geometry and asset loading for the demo scenes.
//!
//! This crate provides:
//!
//! - **Procedural geometry**: sphere and torus builders plus the fixed cube,
//!   floor and skybox vertex data, all in the interleaved layout the viewport
//!   uploads directly (position / normal / uv, 8 floats per vertex)
//! - **Mesh cache**: the build-once policy shared by both demo programs
//! - **Texture loading**: image decoding with non-fatal fallback

pub mod cache;
pub mod geometry;
pub mod texture;

pub use cache::MeshCache;
pub use geometry::{MeshData, SphereParams, StripWinding, TorusParams, Vertex};
pub use texture::{Image, TextureError};
