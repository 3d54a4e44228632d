use crate::prelude::*;
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, MeshVertexBufferLayoutRef, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType,
            SpecializedMeshPipelineError,
        },
    },
};
use bytemuck::{Pod, Zeroable};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

/// Corner offsets of the quad every particle is expanded into. The vertex
/// shader scales them by half the point size.
const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub struct PointsMaterialPlugin;

impl Plugin for PointsMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<PointsMaterial>::default());
    }
}

// Duplicated in galaxy_points.wgsl, so make sure to update both
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug)]
#[repr(C)]
pub struct PointsUniform {
    color: Vec4,
    size: f32,
    size_attenuation: u32,
    _padding: Vec2,
}

impl PointsUniform {
    pub fn read(style: &PointStyle) -> Self {
        Self {
            // white, tinted only by additive overlap
            color: Vec4::ONE,
            size: style.size,
            size_attenuation: style.size_attenuation as u32,
            _padding: Vec2::ZERO,
        }
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
#[bind_group_data(PointsMaterialKey)]
pub struct PointsMaterial {
    #[uniform(0)]
    pub uniform: PointsUniform,
    pub alpha_mode: AlphaMode,
    pub depth_write: bool,
}

impl PointsMaterial {
    pub fn new(style: &PointStyle) -> Self {
        Self {
            uniform: PointsUniform::read(style),
            alpha_mode: style.alpha_mode,
            depth_write: style.depth_write,
        }
    }
}

#[derive(Eq, PartialEq, Hash, Clone)]
pub struct PointsMaterialKey {
    depth_write: bool,
}

impl From<&PointsMaterial> for PointsMaterialKey {
    fn from(material: &PointsMaterial) -> Self {
        Self {
            depth_write: material.depth_write,
        }
    }
}

impl Material for PointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        // quads are built facing the camera, winding depends on the view
        descriptor.primitive.cull_mode = None;
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = key.bind_group_data.depth_write;
        }
        Ok(())
    }
}

/// Builds one quad per particle, all four corners sharing the particle
/// position.
pub fn points_mesh(particles: &ParticleBuffer) -> Mesh {
    let centers: &[[f32; 3]] = bytemuck::cast_slice(particles.as_slice());

    let mut positions = Vec::with_capacity(centers.len() * 4);
    let mut corners = Vec::with_capacity(centers.len() * 4);
    let mut indices = Vec::with_capacity(centers.len() * 6);

    for (i, center) in centers.iter().enumerate() {
        let base = (i * 4) as u32;
        positions.extend([*center; 4]);
        corners.extend(QUAD_CORNERS);
        indices.extend(QUAD_INDICES.map(|index| base + index));
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
        .with_inserted_indices(Indices::U32(indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_has_a_quad_per_particle() {
        let params = GalaxyParameters {
            count: 250,
            ..default()
        };
        let mesh = points_mesh(&ParticleBuffer::generate(&params));

        assert_eq!(mesh.count_vertices(), 1000);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(1500));
    }

    #[test]
    fn quad_corners_share_the_particle_position() {
        let params = GalaxyParameters {
            count: 3,
            ..default()
        };
        let particles = ParticleBuffer::generate(&params);
        let mesh = points_mesh(&particles);

        let Some(positions) = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
        else {
            panic!("mesh has no float3 positions");
        };
        for (i, point) in particles.points().enumerate() {
            for corner in &positions[i * 4..i * 4 + 4] {
                assert_eq!(Vec3::from_array(*corner), point);
            }
        }
    }

    #[test]
    fn attenuated_points_span_size_times_half_height_over_depth() {
        use bevy::render::camera::CameraProjection;

        let shader = include_str!("../../assets/shaders/galaxy_points.wgsl");
        assert!(shader.contains("half_size / view.clip_from_view[1][1]"));

        let projection = PerspectiveProjection {
            aspect_ratio: 16.0 / 9.0,
            ..default()
        };
        let clip_from_view = projection.get_clip_from_view();
        let (size, height) = (0.01, 720.0);

        for depth in [1.0, 5.0, 40.0] {
            let world_half_size = 0.5 * size / clip_from_view.col(1).y;
            let clip = clip_from_view * vec4(0.0, world_half_size, -depth, 1.0);
            let pixels = clip.y / clip.w * height;
            let expected = size * (height / 2.0) / depth;
            assert!((pixels - expected).abs() < 1e-4 * expected.max(1.0), "{pixels} vs {expected}");
        }
    }

    #[test]
    fn empty_buffer_builds_empty_mesh() {
        let mesh = points_mesh(&ParticleBuffer::default());
        assert_eq!(mesh.count_vertices(), 0);
    }

    #[test]
    fn material_follows_point_style() {
        let style = PointStyle::new(&GalaxyParameters {
            size: 0.05,
            ..default()
        });
        let material = PointsMaterial::new(&style);

        assert_eq!(material.uniform.size, 0.05);
        assert_eq!(material.uniform.size_attenuation, 1);
        assert_eq!(material.alpha_mode, AlphaMode::Add);
        assert!(!PointsMaterialKey::from(&material).depth_write);
    }
}
