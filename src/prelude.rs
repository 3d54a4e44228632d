pub use crate::galaxy::{
    ActiveGalaxy, GalaxyHandle, GalaxyParameters, GalaxyParametersCommitted, GalaxyPoints,
    ParticleBuffer, PointStyle, SceneGraph,
};
