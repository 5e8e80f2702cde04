pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod life;
pub mod projectiles;
pub mod render;
pub mod sequencer;
pub mod templates;
pub mod textures;
pub mod waves;
