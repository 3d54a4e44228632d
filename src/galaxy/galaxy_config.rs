use bevy::prelude::*;

/// Inputs of one galaxy generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalaxyParameters {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
        }
    }
}

impl GalaxyParameters {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
    };
    pub const MAX: Self = Self {
        count: 100_000,
        size: 0.1,
        radius: 20.0,
        branches: 10,
    };
    pub const STEP: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
    };
}

/// Live parameters. `generation` is bumped on every accepted commit and is
/// what the generator watches.
#[derive(Resource, Clone, Default, PartialEq)]
pub struct GalaxyConfig {
    pub generation: i32,
    pub parameters: GalaxyParameters,
}

/// Sent by the parameter panel once the user finishes editing a control.
#[derive(Event, Clone, Copy, Debug)]
pub struct GalaxyParametersCommitted(pub GalaxyParameters);

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyConfig::default())
            .add_event::<GalaxyParametersCommitted>();
    }
}

pub fn apply_committed_parameters(
    mut commits: EventReader<GalaxyParametersCommitted>,
    mut galaxy_config: ResMut<GalaxyConfig>,
) {
    // only the latest commit of the frame matters
    let Some(GalaxyParametersCommitted(parameters)) = commits.read().last().copied() else {
        return;
    };

    if parameters == galaxy_config.parameters {
        debug!("Ignoring commit, parameters unchanged");
        return;
    }

    galaxy_config.parameters = parameters;
    galaxy_config.generation += 1;
    debug!(
        "Parameters committed: {:?} (generation {})",
        parameters, galaxy_config.generation
    );
}
