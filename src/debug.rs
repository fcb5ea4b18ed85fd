//! The debug panel: live controls for the portal colours, the clear colour
//! and the firefly size.
//!
//! Every control produces a [`DebugEdit`]; [`DebugPanel::apply`] is the only
//! place edits reach the scene, so the panel logic is testable without egui.

use std::ops::RangeInclusive;

use crate::{color::Color, config::SceneConfig, scene::SceneState};

/// Current values of the colour controls, as shown in the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugObject {
    pub portal_color_start: Color,
    pub portal_color_end: Color,
    pub clear_color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DebugEdit {
    PortalColorStart(Color),
    PortalColorEnd(Color),
    ClearColor(Color),
    FirefliesSize(f32),
}

/// A numeric slider's range and step.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeControl {
    pub range: RangeInclusive<f32>,
    pub step: f32,
}

impl SizeControl {
    /// Bounds are put in order; a non-finite bound falls back to the default
    /// range and a non-positive step disables snapping.
    pub fn new(range: RangeInclusive<f32>, step: f32) -> Self {
        let (start, end) = range.into_inner();
        let range = if !start.is_finite() || !end.is_finite() {
            let fallback = SceneConfig::default().fireflies_size_range;
            log::warn!(
                "firefly size range {}..={} is not finite, using {:?}",
                start,
                end,
                fallback
            );
            fallback
        } else if start > end {
            log::warn!("firefly size range {}..={} is inverted", start, end);
            end..=start
        } else {
            start..=end
        };
        let step = if step.is_finite() && step > 0.0 { step } else { 0.0 };
        Self { range, step }
    }

    /// Clamp `value` into the range and snap it to the nearest step.
    /// Returns `None` for NaN and infinities.
    pub fn accept(&self, value: f32) -> Option<f32> {
        if !value.is_finite() {
            return None;
        }
        let (min, max) = (*self.range.start(), *self.range.end());
        let value = value.clamp(min, max);
        if self.step <= 0.0 {
            return Some(value);
        }
        let snapped = min + ((value - min) / self.step).round() * self.step;
        Some(snapped.clamp(min, max))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DebugPanel {
    pub object: DebugObject,
    pub size_control: SizeControl,
    /// Whether the panel starts expanded.
    pub open: bool,
}

impl DebugPanel {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            object: DebugObject {
                portal_color_start: config.portal_color_start,
                portal_color_end: config.portal_color_end,
                clear_color: config.clear_color,
            },
            size_control: SizeControl::new(
                config.fireflies_size_range.clone(),
                config.fireflies_size_step,
            ),
            open: config.debug_panel_open,
        }
    }

    /// Write one edit through to the scene. Each edit touches at most one value;
    /// a non-finite firefly size is dropped.
    pub fn apply(&mut self, edit: DebugEdit, scene: &mut SceneState) {
        log::debug!("debug edit {:?}", edit);
        match edit {
            DebugEdit::PortalColorStart(color) => {
                self.object.portal_color_start = color;
                scene.portal.color_start = color.to_linear();
            }
            DebugEdit::PortalColorEnd(color) => {
                self.object.portal_color_end = color;
                scene.portal.color_end = color.to_linear();
            }
            DebugEdit::ClearColor(color) => {
                self.object.clear_color = color;
                scene.clear_color = color;
            }
            DebugEdit::FirefliesSize(size) => match self.size_control.accept(size) {
                Some(size) => scene.fireflies.size = size,
                None => log::warn!("ignoring firefly size {}", size),
            },
        }
    }

    /// Draw the panel and apply whatever the user changed this frame.
    pub fn show(&mut self, ctx: &egui::Context, scene: &mut SceneState) {
        let mut edits = Vec::new();
        egui::Window::new("Debug")
            .default_open(self.open)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .show(ctx, |ui| {
                let object = &self.object;
                edits.extend(
                    color_row(ui, "portalColorStart", object.portal_color_start)
                        .map(DebugEdit::PortalColorStart),
                );
                edits.extend(
                    color_row(ui, "portalColorEnd", object.portal_color_end)
                        .map(DebugEdit::PortalColorEnd),
                );

                let mut size = scene.fireflies.size;
                let slider = egui::Slider::new(&mut size, self.size_control.range.clone())
                    .step_by(self.size_control.step as f64)
                    .text("firefliesSize");
                if ui.add(slider).changed() {
                    edits.push(DebugEdit::FirefliesSize(size));
                }

                edits.extend(
                    color_row(ui, "clearColor", object.clear_color).map(DebugEdit::ClearColor),
                );
            });
        for edit in edits {
            self.apply(edit, scene);
        }
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: Color) -> Option<Color> {
    let mut srgb = color.srgb;
    let changed = ui
        .horizontal(|ui| {
            let changed = ui.color_edit_button_srgb(&mut srgb).changed();
            ui.label(label);
            changed
        })
        .inner;
    changed.then(|| Color { srgb })
}
