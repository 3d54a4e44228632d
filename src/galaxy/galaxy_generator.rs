use super::galaxy_config::apply_committed_parameters;
use super::{GalaxyConfig, GalaxyParameters, ParticleBuffer};
use crate::graphics::{GalaxyScene, PointsMaterial};
use bevy::prelude::*;

pub struct GalaxyGeneratorPlugin;

impl Plugin for GalaxyGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ActiveGalaxy::default())
            .add_systems(Startup, regenerate_galaxy)
            .add_systems(
                Update,
                (apply_committed_parameters, regenerate_galaxy).chain(),
            );
    }
}

/// Marks the entity drawing the current galaxy.
#[derive(Component)]
pub struct GalaxyPoints;

/// The live mesh, material and entity of one generated galaxy.
#[derive(Debug)]
pub struct GalaxyHandle {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<PointsMaterial>,
    pub particle_count: usize,
}

/// How the particles of a galaxy are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
    pub size: f32,
    pub size_attenuation: bool,
    pub depth_write: bool,
    pub alpha_mode: AlphaMode,
}

impl PointStyle {
    pub fn new(params: &GalaxyParameters) -> Self {
        Self {
            size: params.size,
            size_attenuation: true,
            depth_write: false,
            alpha_mode: AlphaMode::Add,
        }
    }
}

/// Where galaxies are displayed. `release` must free everything `attach`
/// created for that handle.
pub trait SceneGraph {
    fn release(&mut self, galaxy: GalaxyHandle);
    fn attach(&mut self, particles: &ParticleBuffer, style: &PointStyle) -> GalaxyHandle;
}

/// Replaces `previous` with a freshly generated galaxy. The previous galaxy
/// is released before the new one is attached.
pub fn generate(
    params: &GalaxyParameters,
    previous: Option<GalaxyHandle>,
    scene: &mut impl SceneGraph,
) -> GalaxyHandle {
    if let Some(previous) = previous {
        scene.release(previous);
    }

    let particles = ParticleBuffer::generate(params);
    scene.attach(&particles, &PointStyle::new(params))
}

/// Owner of the galaxy currently in the scene.
#[derive(Resource)]
pub struct ActiveGalaxy {
    generation: i32,
    handle: Option<GalaxyHandle>,
}

impl Default for ActiveGalaxy {
    fn default() -> Self {
        Self {
            generation: -1,
            handle: None,
        }
    }
}

impl ActiveGalaxy {
    pub fn particle_count(&self) -> usize {
        self.handle.as_ref().map_or(0, |galaxy| galaxy.particle_count)
    }
}

/// Rebuilds the galaxy whenever the config generation moves on.
fn regenerate_galaxy(
    galaxy_config: Res<GalaxyConfig>,
    mut active: ResMut<ActiveGalaxy>,
    mut scene: GalaxyScene,
) {
    if active.generation == galaxy_config.generation {
        return;
    }

    let params = galaxy_config.parameters;
    info!(
        "Generating galaxy: {} particles on {} branches (generation {})",
        params.count, params.branches, galaxy_config.generation
    );

    let previous = active.handle.take();
    active.handle = Some(generate(&params, previous, &mut scene));
    active.generation = galaxy_config.generation;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::galaxy_config::GalaxyConfigPlugin;
    use crate::galaxy::GalaxyParametersCommitted;
    use bevy::asset::AssetPlugin;

    #[derive(Debug, PartialEq)]
    enum SceneOp {
        Release(Entity),
        Attach(Entity, usize),
    }

    #[derive(Default)]
    struct RecordingScene {
        ops: Vec<SceneOp>,
        next_entity: u32,
        attached: usize,
    }

    impl SceneGraph for RecordingScene {
        fn release(&mut self, galaxy: GalaxyHandle) {
            self.attached -= 1;
            self.ops.push(SceneOp::Release(galaxy.entity));
        }

        fn attach(&mut self, particles: &ParticleBuffer, _style: &PointStyle) -> GalaxyHandle {
            let entity = Entity::from_raw(self.next_entity);
            self.next_entity += 1;
            self.attached += 1;
            self.ops.push(SceneOp::Attach(entity, particles.len()));
            GalaxyHandle {
                entity,
                mesh: Handle::default(),
                material: Handle::default(),
                particle_count: particles.len(),
            }
        }
    }

    fn params(count: u32) -> GalaxyParameters {
        GalaxyParameters {
            count,
            ..default()
        }
    }

    #[test]
    fn style_is_additive_without_depth_write() {
        let style = PointStyle::new(&params(100));
        assert_eq!(style.size, 0.01);
        assert!(style.size_attenuation);
        assert!(!style.depth_write);
        assert_eq!(style.alpha_mode, AlphaMode::Add);
    }

    #[test]
    fn first_generation_only_attaches() {
        let mut scene = RecordingScene::default();
        let galaxy = generate(&params(100), None, &mut scene);

        assert_eq!(galaxy.particle_count, 100);
        assert_eq!(scene.ops, vec![SceneOp::Attach(galaxy.entity, 100)]);
    }

    #[test]
    fn previous_galaxy_is_released_before_attach() {
        let mut scene = RecordingScene::default();
        let first = generate(&params(100), None, &mut scene);
        let first_entity = first.entity;
        let second = generate(&params(200), Some(first), &mut scene);

        assert_eq!(scene.attached, 1);
        assert_eq!(
            scene.ops,
            vec![
                SceneOp::Attach(first_entity, 100),
                SceneOp::Release(first_entity),
                SceneOp::Attach(second.entity, 200),
            ]
        );
    }

    #[test]
    fn zero_count_attaches_empty_galaxy() {
        let mut scene = RecordingScene::default();
        let galaxy = generate(&params(0), None, &mut scene);

        assert_eq!(galaxy.particle_count, 0);
        assert_eq!(scene.attached, 1);
    }

    fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<PointsMaterial>()
            .add_plugins((GalaxyConfigPlugin, GalaxyGeneratorPlugin));
        app
    }

    fn galaxy_entities(app: &mut App) -> Vec<Entity> {
        app.world_mut()
            .query_filtered::<Entity, With<GalaxyPoints>>()
            .iter(app.world())
            .collect()
    }

    #[test]
    fn startup_spawns_one_galaxy() {
        let mut app = headless_app();
        app.world_mut().resource_mut::<GalaxyConfig>().parameters = params(500);
        app.update();

        assert_eq!(galaxy_entities(&mut app).len(), 1);
        assert_eq!(app.world().resource::<ActiveGalaxy>().particle_count(), 500);
    }

    #[test]
    fn commit_replaces_the_galaxy() {
        let mut app = headless_app();
        app.world_mut().resource_mut::<GalaxyConfig>().parameters = params(500);
        app.update();
        let before = galaxy_entities(&mut app);

        app.world_mut()
            .send_event(GalaxyParametersCommitted(params(800)));
        app.update();
        let after = galaxy_entities(&mut app);

        assert_eq!(after.len(), 1);
        assert_ne!(before, after);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(app.world().resource::<Assets<PointsMaterial>>().len(), 1);
        assert_eq!(app.world().resource::<ActiveGalaxy>().particle_count(), 800);
    }

    #[test]
    fn empty_galaxy_is_hidden() {
        let mut app = headless_app();
        app.world_mut().resource_mut::<GalaxyConfig>().parameters = params(0);
        app.update();

        let entity = galaxy_entities(&mut app)[0];
        assert_eq!(
            app.world().get::<Visibility>(entity),
            Some(&Visibility::Hidden)
        );
    }
}
