pub mod app;
pub mod core;
pub mod directory;
pub mod location;
pub mod persistence;
pub mod reviews;
pub mod telemetry;

pub use app::{
    Session,
    Settings,
};
pub use crate::core::TaberuError;
