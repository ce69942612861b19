//! Scene-side matrix setup for the graphics playground labs.
//!
//! Builds the world, view, projection and normal matrices of the labs on top
//! of [`playground_math`] and hands them to the rendering engine through a
//! [`UniformSink`], along with the hand-built meshes some labs draw. Nothing
//! here renders.

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod io;
pub mod lab;
pub mod mesh;
pub mod uniform;

pub use camera::{CameraKey, KeyboardCamera, OrbitCamera};
pub use config::{CameraConfig, ObjectConfig, ResolvedObject, ResolvedScene, SceneConfig};
pub use error::SceneError;
pub use frame::{BeforeRender, FrameClock, FrameContext};
pub use lab::{Lab, Lab05, Lab06, Lab07, LabScene};
pub use mesh::MeshData;
pub use uniform::{UniformSink, UniformTable, UniformValue};
