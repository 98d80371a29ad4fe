use crate::{
    camera::Camera,
    color::Rgb,
    config::{Scenario, Settings},
    controller::{ControllerEvent, LaunchController},
    drawing::DrawHandler,
    space::{CollisionPolicy, SpaceSystem},
};
use cgmath::{Vector2, Zero};
use eframe::egui;

pub struct World {
    pub space: SpaceSystem,
    pub controller: LaunchController,
    pub camera: Camera,
    pub playing: bool,
    cursor: Option<Vector2<f64>>,
}

impl World {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut world = Self {
            space: SpaceSystem::new(settings.physics).with_trails(settings.trails),
            controller: LaunchController::new(settings.launch_scale),
            camera: Camera::new(0.0, 0.0),
            playing: true,
            cursor: None,
        };
        settings.scenario.populate(&mut world.space)?;
        Ok(world)
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.space.physics = settings.physics;
        self.space.set_trails(settings.trails);
        self.controller.launch_scale = settings.launch_scale;
    }

    pub fn reset(&mut self, scenario: &Scenario) -> anyhow::Result<()> {
        self.space.clear();
        self.controller.cancel();
        scenario.populate(&mut self.space)
    }

    pub fn step(&mut self, dt: f64) {
        if self.playing && dt > 0.0 {
            self.space.tick(dt);
        }
    }

    /// The settings window. Returns whether any setting changed.
    pub fn ui(&mut self, ctx: &egui::Context, open: &mut bool, settings: &mut Settings) -> bool {
        let mut changed = false;
        let mut reset = false;
        egui::Window::new("Settings")
            .open(open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Time");
                ui.horizontal(|ui| {
                    ui.label("Speed:");
                    changed |= ui
                        .add(egui::DragValue::new(&mut settings.speed).speed(0.1).range(0.0..=100.0))
                        .changed();
                    if ui
                        .button(if self.playing { "Pause" } else { "Play" })
                        .clicked()
                    {
                        self.playing = !self.playing;
                    }
                });
                ui.horizontal(|ui| {
                    let mut capped = settings.target_fps.is_some();
                    changed |= ui.checkbox(&mut capped, "Cap FPS").changed();
                    let mut fps = settings.target_fps.unwrap_or(60);
                    ui.add_enabled_ui(capped, |ui| {
                        changed |= ui
                            .add(egui::DragValue::new(&mut fps).range(1..=1000))
                            .changed();
                    });
                    settings.target_fps = capped.then_some(fps);
                });
                ui.horizontal(|ui| {
                    let mut fixed = settings.fixed_step.is_some();
                    changed |= ui.checkbox(&mut fixed, "Fixed step").changed();
                    let mut step = settings.fixed_step.unwrap_or(1.0 / 60.0);
                    ui.add_enabled_ui(fixed, |ui| {
                        changed |= ui
                            .add(
                                egui::DragValue::new(&mut step)
                                    .speed(0.001)
                                    .range(0.0001..=1.0)
                                    .suffix("s"),
                            )
                            .changed();
                    });
                    settings.fixed_step = fixed.then_some(step);
                });

                ui.separator();
                ui.heading("Physics");
                ui.horizontal(|ui| {
                    ui.label("G:");
                    changed |= ui
                        .add(egui::DragValue::new(&mut settings.physics.gravity).speed(0.01))
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Collisions:");
                    changed |= ui
                        .radio_value(&mut settings.physics.collision, CollisionPolicy::Merge, "Merge")
                        .changed();
                    changed |= ui
                        .radio_value(&mut settings.physics.collision, CollisionPolicy::Recoil, "Recoil")
                        .changed();
                });
                ui.add_enabled_ui(settings.physics.collision == CollisionPolicy::Merge, |ui| {
                    changed |= ui
                        .checkbox(
                            &mut settings.physics.merge_conserves_momentum,
                            "Merged bodies keep momentum",
                        )
                        .changed();
                });

                ui.separator();
                ui.heading("Trails");
                ui.horizontal(|ui| {
                    changed |= ui.checkbox(&mut settings.trails.enabled, "Enabled").changed();
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut settings.trails.fade, 0.01..=1.0)
                                .text("Fade"),
                        )
                        .changed();
                });

                ui.separator();
                ui.heading("Bodies");
                ui.horizontal(|ui| {
                    ui.label("Launch strength:");
                    changed |= ui
                        .add(egui::DragValue::new(&mut settings.launch_scale).speed(0.01))
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Scenario:");
                    changed |= ui
                        .radio_value(&mut settings.scenario, Scenario::Empty, "Empty")
                        .changed();
                    changed |= ui
                        .radio_value(&mut settings.scenario, Scenario::Pair, "Pair")
                        .changed();
                    let ring = matches!(settings.scenario, Scenario::Ring { .. });
                    if ui.radio(ring, "Ring").clicked() && !ring {
                        settings.scenario = Scenario::DEFAULT_RING;
                        changed = true;
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Spawn Ring").clicked() {
                        let center = self.camera.center();
                        let radius = 0.35 * self.camera.width.min(self.camera.height);
                        self.space.spawn_bodies_on_circle(12, center, radius, 1.0);
                    }
                    if ui.button("Reset").clicked() {
                        reset = true;
                    }
                    if ui.button("Clear").clicked() {
                        self.space.clear();
                    }
                });
            });

        if changed {
            *settings = settings.clone().sanitized();
            self.apply_settings(settings);
            tracing::debug!(?settings, "settings changed");
        }
        if reset {
            if let Err(err) = self.reset(&settings.scenario) {
                tracing::warn!(%err, "could not reset scenario");
            }
        }
        changed
    }

    pub fn world_input(
        &mut self,
        response: &egui::Response,
        rect: egui::Rect,
        ui: &mut egui::Ui,
        settings: &Settings,
    ) {
        self.camera.width = rect.width() as f64;
        self.camera.height = rect.height() as f64;

        self.cursor = ui.input(|i| i.pointer.latest_pos()).map(|pos| Vector2 {
            x: (pos.x - rect.left_top().x) as f64,
            y: (pos.y - rect.left_top().y) as f64,
        });
        let cursor = self.cursor.unwrap_or(Vector2::zero());

        let aiming = self.controller.pending().is_some();
        let over_world = response.contains_pointer();
        let events = ui.input(|i| {
            let mut events = vec![];
            if i.pointer.primary_pressed() && over_world {
                events.push(ControllerEvent::PrimaryDown(cursor));
            }
            if i.raw_scroll_delta.y != 0.0 && (over_world || aiming) {
                events.push(ControllerEvent::Wheel {
                    delta: (i.raw_scroll_delta.y / settings.scroll_points_per_step) as f64,
                    adjust_density: i.modifiers.alt,
                });
            }
            if i.pointer.primary_released() {
                events.push(ControllerEvent::PrimaryUp(cursor));
            }
            events
        });

        for event in events {
            if let Err(err) = self.controller.handle(event, &mut self.space) {
                tracing::warn!(%err, ?event, "input rejected");
            }
        }
    }

    pub fn draw_states(&mut self, d: &mut DrawHandler) {
        self.space.draw(d);
        if let Some(body) = self.controller.pending() {
            if let Some(cursor) = self.cursor {
                d.line(body.pos, body.pos * 2.0 - cursor, 1.0, Rgb::WHITE);
            }
            body.draw(d);
        }
    }
}
