use bevy::prelude::*;

mod galaxy_scene;
mod points_material;
mod viewport;

pub use galaxy_scene::GalaxyScene;
pub use points_material::PointsMaterial;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            points_material::PointsMaterialPlugin,
            viewport::ViewportPlugin,
        ));
    }
}
