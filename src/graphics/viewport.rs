use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};

/// Rendering above this pixel ratio costs fill rate without a visible gain.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (cap_pixel_ratio, log_resizes));
    }
}

/// Scale factor override for a display with the given backend factor, or
/// `None` when the display is within the cap.
pub fn pixel_ratio_override(backend_scale_factor: f32) -> Option<f32> {
    (backend_scale_factor > MAX_PIXEL_RATIO).then_some(MAX_PIXEL_RATIO)
}

fn cap_pixel_ratio(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };

    let wanted = pixel_ratio_override(window.resolution.base_scale_factor());
    if window.resolution.scale_factor_override() != wanted {
        debug!("Pixel ratio override set to {:?}", wanted);
        window.resolution.set_scale_factor_override(wanted);
    }
}

fn log_resizes(mut resize_evr: EventReader<WindowResized>) {
    // projection aspect and surface size follow the window on their own
    for ev in resize_evr.read() {
        debug!("Window resized to {}x{}", ev.width, ev.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_within_cap_is_left_alone() {
        assert_eq!(pixel_ratio_override(1.0), None);
        assert_eq!(pixel_ratio_override(1.5), None);
        assert_eq!(pixel_ratio_override(2.0), None);
    }

    #[test]
    fn ratio_above_cap_is_clamped() {
        assert_eq!(pixel_ratio_override(3.0), Some(MAX_PIXEL_RATIO));
        assert_eq!(pixel_ratio_override(2.25), Some(MAX_PIXEL_RATIO));
    }

    #[test]
    fn high_dpi_window_gets_capped() {
        let mut app = App::new();
        app.add_event::<WindowResized>().add_plugins(ViewportPlugin);

        let mut window = Window::default();
        window.resolution.set_scale_factor(3.0);
        let entity = app.world_mut().spawn((window, PrimaryWindow)).id();
        app.update();

        let Some(window) = app.world().get::<Window>(entity) else {
            panic!("window despawned");
        };
        assert_eq!(window.resolution.scale_factor_override(), Some(2.0));
        assert_eq!(window.resolution.scale_factor(), 2.0);
    }
}
