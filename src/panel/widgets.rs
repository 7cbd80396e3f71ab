//! egui rendering for the control panel

use super::{Bindable, Control, ControlKind, ControlPanel, Effect, Entry, Value};

/// Read-only numbers shown under the controls
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelStats {
    pub fps: f32,
    pub width: u32,
    pub height: u32,
    pub triangles: usize,
    pub geometries_created: u64,
    pub geometries_disposed: u64,
}

impl ControlPanel {
    /// Draw the panel and write edited values back into `target`.
    ///
    /// Returns the effects of every write made this pass.
    pub fn show(
        &self,
        ctx: &egui::Context,
        target: &mut impl Bindable,
        stats: &PanelStats,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        egui::Window::new(&self.title)
            .id(egui::Id::new("mesh_viewer_controls"))
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .default_width(260.0)
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                for entry in self.entries() {
                    match entry {
                        Entry::Control(control) => {
                            show_control(ui, control, target, &mut effects);
                        }
                        Entry::Folder(folder) => {
                            egui::CollapsingHeader::new(&folder.name)
                                .default_open(true)
                                .show(ui, |ui| {
                                    for control in &folder.controls {
                                        show_control(ui, control, target, &mut effects);
                                    }
                                });
                        }
                    }
                }

                ui.separator();
                egui::CollapsingHeader::new("Stats")
                    .default_open(false)
                    .show(ui, |ui| show_stats(ui, stats));
            });

        effects
    }
}

fn show_control(
    ui: &mut egui::Ui,
    control: &Control,
    target: &mut impl Bindable,
    effects: &mut Vec<Effect>,
) {
    let current = target.read(control.field);

    let edited = match (control.kind, current) {
        (ControlKind::Number(domain), Some(Value::Number(live))) => {
            let mut v = live;
            // Only user edits are clamped and snapped; drawing leaves the live value alone
            let changed = ui
                .add(
                    egui::Slider::new(&mut v, domain.min..=domain.max)
                        .step_by(domain.step as f64)
                        .clamping(egui::SliderClamping::Edits)
                        .text(&control.label),
                )
                .changed();
            (changed && v != live).then(|| Value::Number(domain.clamp(v)))
        }
        (ControlKind::Toggle, Some(Value::Toggle(mut on))) => ui
            .checkbox(&mut on, &control.label)
            .changed()
            .then_some(Value::Toggle(on)),
        (ControlKind::Color, Some(Value::Color(color))) => {
            let mut rgb = color.to_array();
            let changed = ui
                .horizontal(|ui| {
                    let changed = ui.color_edit_button_srgb(&mut rgb).changed();
                    ui.label(&control.label);
                    changed
                })
                .inner;
            changed.then(|| Value::Color(crate::math::Color::from_array(rgb)))
        }
        (ControlKind::Texture(_), Some(Value::Toggle(mut on))) => ui
            .checkbox(&mut on, &control.label)
            .changed()
            .then_some(Value::Toggle(on)),
        (ControlKind::Texture(_), None) => {
            ui.add_enabled(
                false,
                egui::Checkbox::new(&mut false, format!("{} (missing)", control.label)),
            );
            None
        }
        _ => {
            ui.weak(format!("{}: unavailable", control.label));
            None
        }
    };

    if let Some(value) = edited {
        effects.push(target.write(control.field, value));
    }
}

fn show_stats(ui: &mut egui::Ui, stats: &PanelStats) {
    egui::Grid::new("viewer_stats").num_columns(2).show(ui, |ui| {
        ui.label("fps");
        ui.label(format!("{:.1}", stats.fps));
        ui.end_row();

        ui.label("viewport");
        ui.label(format!("{}×{}", stats.width, stats.height));
        ui.end_row();

        ui.label("triangles");
        ui.label(stats.triangles.to_string());
        ui.end_row();

        ui.label("geometries");
        ui.label(format!(
            "{} built, {} disposed",
            stats.geometries_created, stats.geometries_disposed
        ));
        ui.end_row();
    });
}
