//! Shamash engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the scene surface a
//! viewer application configures against: device/window management, a retained
//! 3D scene (meshes, PBR materials, sun light, sky, ground shadow catcher),
//! and the renderer that draws it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod color;
pub mod coords;

pub mod camera;
pub mod mesh;
pub mod texture;
pub mod material;
pub mod scene;
pub mod render;
pub mod text;
