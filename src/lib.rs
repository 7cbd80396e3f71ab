pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod panel;
pub mod renderer;
pub mod runner;
pub mod scene;
pub mod texture;

pub use config::{DemoConfig, Preset};
pub use renderer::{SceneRenderer, WgpuRenderer};
pub use runner::{DemoRunner, GeometryStats};
