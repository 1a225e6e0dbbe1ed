pub mod camera;
pub mod debug;
pub mod physics;
pub mod platform;
pub mod player;
pub mod plugin;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod time;
pub mod ui;
