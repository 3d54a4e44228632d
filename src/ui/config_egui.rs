use crate::prelude::*;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParameterDraft>()
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

/// Values shown in the panel. They only reach the galaxy once an edit is
/// committed.
#[derive(Resource, Default)]
struct ParameterDraft(GalaxyParameters);

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// True once the user is done with a control: a drag was released, the
/// typed value lost focus, or the value changed while nothing holds the
/// control (click on the rail, keyboard step).
fn finished_editing(response: &egui::Response) -> bool {
    response.drag_stopped()
        || response.lost_focus()
        || (response.changed()
            && !response.dragged()
            && !response.has_focus()
            && !response.is_pointer_button_down_on())
}

/// One slider per parameter. Typed values are applied only when the value
/// box loses focus.
fn parameter_sliders(ui: &mut egui::Ui, params: &mut GalaxyParameters) -> [egui::Response; 4] {
    let minval = GalaxyParameters::MIN;
    let maxval = GalaxyParameters::MAX;
    let step = GalaxyParameters::STEP;

    let count = ui.add(
        egui::Slider::new(&mut params.count, minval.count..=maxval.count)
            .step_by(step.count as f64)
            .update_while_editing(false)
            .text("count"),
    );
    let size = ui.add(
        egui::Slider::new(&mut params.size, minval.size..=maxval.size)
            .step_by(step.size as f64)
            .fixed_decimals(3)
            .update_while_editing(false)
            .text("size"),
    );
    let radius = ui.add(
        egui::Slider::new(&mut params.radius, minval.radius..=maxval.radius)
            .step_by(step.radius as f64)
            .fixed_decimals(2)
            .update_while_editing(false)
            .text("radius"),
    );
    let branches = ui.add(
        egui::Slider::new(&mut params.branches, minval.branches..=maxval.branches)
            .step_by(step.branches as f64)
            .update_while_editing(false)
            .text("branches"),
    );

    [count, size, radius, branches]
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<ParameterDraft>,
    mut commits: EventWriter<GalaxyParametersCommitted>,
) {
    let ctx = contexts.ctx_mut();
    let params = &mut draft.0;
    let mut finished = false;

    egui::Window::new("Galaxy")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            finished = parameter_sliders(ui, params).iter().any(finished_editing);
        });

    if finished {
        commits.write(GalaxyParametersCommitted(*params));
    }
}
