//! Platform-free model behind the puck pad: pucks, the position → effect
//! mapping, hit-testing and the interaction controller.

pub mod audio;
pub mod constants;
pub mod controller;
pub mod draw;
pub mod effects;
pub mod error;
pub mod puck;

pub use audio::*;
pub use controller::*;
pub use draw::*;
pub use effects::*;
pub use error::*;
pub use puck::*;
