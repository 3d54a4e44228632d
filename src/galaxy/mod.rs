use bevy::prelude::*;

mod galaxy_config;
mod galaxy_generator;
mod particle_buffer;

pub use galaxy_config::{GalaxyConfig, GalaxyParameters, GalaxyParametersCommitted};
pub use galaxy_generator::{ActiveGalaxy, GalaxyHandle, GalaxyPoints, PointStyle, SceneGraph};
pub use particle_buffer::ParticleBuffer;

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            galaxy_config::GalaxyConfigPlugin,
            galaxy_generator::GalaxyGeneratorPlugin,
        ));
    }
}
