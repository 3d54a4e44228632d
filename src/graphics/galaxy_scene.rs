use super::points_material::{points_mesh, PointsMaterial};
use crate::prelude::*;
use bevy::{ecs::system::SystemParam, prelude::*, render::view::NoFrustumCulling};

/// The Bevy world seen as a scene graph. Asset removal is immediate; the
/// despawn and spawn are queued on the same command buffer, so both land at
/// the same sync point.
#[derive(SystemParam)]
pub struct GalaxyScene<'w, 's> {
    commands: Commands<'w, 's>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<PointsMaterial>>,
}

impl SceneGraph for GalaxyScene<'_, '_> {
    fn release(&mut self, galaxy: GalaxyHandle) {
        self.meshes.remove(&galaxy.mesh);
        self.materials.remove(&galaxy.material);
        self.commands.entity(galaxy.entity).despawn();
    }

    fn attach(&mut self, particles: &ParticleBuffer, style: &PointStyle) -> GalaxyHandle {
        let mesh = self.meshes.add(points_mesh(particles));
        let material = self.materials.add(PointsMaterial::new(style));

        // nothing to draw, but the handle stays valid
        let visibility = if particles.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };

        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::IDENTITY,
                visibility,
                // quads extend past the point positions the bounds are built from
                NoFrustumCulling,
                GalaxyPoints,
            ))
            .id();

        GalaxyHandle {
            entity,
            mesh,
            material,
            particle_count: particles.len(),
        }
    }
}
