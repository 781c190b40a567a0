//! Counter panel and feedback toasts using bevy_egui

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use strainmap_core::{recommended_exercises, Category, Toast};

use crate::types::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiLayout>()
            .add_systems(Update, update_ui_layout)
            // Main UI system runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// UI layout settings for responsive design
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Whether we're on a small screen (mobile/tablet)
    pub is_mobile: bool,
    /// Scale factor for UI elements on mobile
    pub ui_scale: f32,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            is_mobile: false,
            ui_scale: 1.0,
        }
    }
}

impl UiLayout {
    /// Update layout based on screen dimensions
    pub fn update_for_screen(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        self.is_mobile = width < 800.0 || (width < height && width < 600.0);
        self.ui_scale = if self.is_mobile { 1.3 } else { 1.0 };
    }

    pub fn panel_width(&self) -> f32 {
        if self.is_mobile {
            (self.screen_width * 0.45).min(220.0)
        } else {
            240.0
        }
    }
}

fn update_ui_layout(windows: Query<&Window, With<PrimaryWindow>>, mut ui_layout: ResMut<UiLayout>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        // Only update if dimensions changed significantly
        if (ui_layout.screen_width - width).abs() > 1.0 || (ui_layout.screen_height - height).abs() > 1.0 {
            ui_layout.update_for_screen(width, height);
        }
    }
}

/// Outline of a counter field: red while pulsing, gray otherwise
pub fn field_stroke(pulsing: bool) -> egui::Stroke {
    if pulsing {
        egui::Stroke::new(2.0, egui::Color32::RED)
    } else {
        egui::Stroke::new(1.0, egui::Color32::GRAY)
    }
}

fn ui_system(
    mut contexts: EguiContexts,
    mut session: ResMut<SessionResource>,
    ui_layout: Res<UiLayout>,
    time: Res<Time>,
) {
    let ui_scale = ui_layout.ui_scale;

    // Get the egui context - early return if not available
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::SidePanel::left("strain_panel")
        .default_width(ui_layout.panel_width())
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading(egui::RichText::new("Strain Check").size(18.0 * ui_scale));
            ui.label(
                egui::RichText::new("Click the figure where it hurts")
                    .small()
                    .color(egui::Color32::GRAY),
            );
            ui.separator();

            let max = session.counters().max();
            for category in Category::ALL {
                let mut value = session.counters().get(category);
                let stroke = field_stroke(session.field_pulsing(category));

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(category.label()).size(14.0 * ui_scale));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        egui::Frame::new()
                            .stroke(stroke)
                            .corner_radius(3.0)
                            .inner_margin(2.0)
                            .show(ui, |ui| {
                                let response = ui.add(egui::DragValue::new(&mut value).range(0..=max).speed(0.1));
                                if response.changed() {
                                    session.counters_mut().set(category, value);
                                }
                            });
                    });
                });
            }

            ui.separator();
            ui.label(egui::RichText::new("Suggested exercises").strong());
            let exercises = recommended_exercises(session.counters());
            if exercises.is_empty() {
                ui.label(
                    egui::RichText::new("Counters above 5 unlock suggestions")
                        .small()
                        .color(egui::Color32::GRAY),
                );
            } else {
                for exercise in &exercises {
                    ui.label(format!("• {}", exercise.name));
                }
            }
        });

    render_toasts(ctx, session.toasts().iter(), time.elapsed(), ui_scale);
}

/// Stack toasts centered near the top tenth of the viewport
fn render_toasts<'a>(
    ctx: &egui::Context,
    toasts: impl Iterator<Item = &'a Toast>,
    now: std::time::Duration,
    ui_scale: f32,
) {
    let screen = ctx.screen_rect();
    let top = screen.height() * 0.1;

    for (index, toast) in toasts.enumerate() {
        // Fade out over the last fifth of the lifetime
        let opacity = (toast.remaining_fraction(now) * 5.0).min(1.0);
        let offset = egui::vec2(0.0, top + index as f32 * 44.0 * ui_scale);

        egui::Area::new(egui::Id::new(("toast", toast.id)))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_TOP, offset)
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                egui::Frame::new()
                    .fill(egui::Color32::from_black_alpha(178))
                    .corner_radius(5.0)
                    .inner_margin(egui::Margin::symmetric(20, 10))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(&toast.text)
                                .color(egui::Color32::WHITE)
                                .size(14.0 * ui_scale),
                        );
                    });
            });
    }
}
