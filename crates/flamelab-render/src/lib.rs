#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod beaker;
pub mod draw;
pub mod error;
pub mod flame;
pub mod particles;
pub mod text;
pub mod ui;

pub use beaker::BeakerRenderer;
pub use error::RenderError;
pub use flame::FlameRenderer;
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use text::TextRenderer;
pub use ui::{SidebarLayout, TextLine, UiRenderer};
