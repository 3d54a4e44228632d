use super::GalaxyParameters;
use bevy::prelude::*;
use rand::prelude::*;
use rayon::prelude::*;
use std::f32::consts::TAU;

/// Particle positions packed as consecutive `x, y, z` triples, in particle
/// index order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
}

impl ParticleBuffer {
    /// Fills the buffer in parallel, each worker drawing radii from its own
    /// thread rng.
    pub fn generate(params: &GalaxyParameters) -> Self {
        let mut positions = vec![0.0f32; params.count as usize * 3];

        positions
            .par_chunks_exact_mut(3)
            .enumerate()
            .for_each_init(rand::rng, |rng, (index, point)| {
                write_particle(point, index, params, rng.random());
            });

        Self { positions }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.positions
    }

    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| vec3(p[0], p[1], p[2]))
    }
}

/// Angle of the spoke particle `index` belongs to. Particles are dealt to
/// spokes round-robin.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    if branches == 0 {
        return 0.0;
    }
    let branch = index % branches as usize;
    branch as f32 / branches as f32 * TAU
}

/// `unit_sample` is in [0, 1) and scales the galaxy radius.
fn write_particle(point: &mut [f32], index: usize, params: &GalaxyParameters, unit_sample: f32) {
    let radius = unit_sample * params.radius;
    let angle = branch_angle(index, params.branches);

    point[0] = angle.cos() * radius;
    point[1] = 0.0;
    point[2] = angle.sin() * radius;
}
