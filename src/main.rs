use eframe::{
    egui::{self},
    wgpu,
};
use gravity_sandbox::{
    clock::FrameClock,
    config::{Settings, WINDOW_SIZE},
    drawing::DrawHandler,
    rendering::{RenderData, RenderState},
    world::World,
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

struct App {
    clock: FrameClock,
    settings: Settings,
    world: World,
    stats_open: bool,
    settings_open: bool,
    help_open: bool,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let renderer = cc
            .wgpu_render_state
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("the wgpu renderer is not available"))?;
        let state = RenderState::new(renderer.target_format, &renderer.device, &renderer.queue)?;
        renderer.renderer.write().callback_resources.insert(state);

        let settings = Settings::load(cc.storage);
        let world = World::new(&settings)?;

        Ok(Self {
            clock: FrameClock::new(settings.target_fps),
            settings,
            world,
            stats_open: true,
            settings_open: false,
            help_open: true,
        })
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.clock.target_fps = self.settings.target_fps;
        let dt = self.clock.tick();

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "FPS: {:.1}",
            self.clock.fps()
        )));

        egui::TopBottomPanel::top("Menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("Windows", |ui| {
                    self.stats_open |= ui.button("Stats").clicked();
                    self.settings_open |= ui.button("Settings").clicked();
                });
                self.help_open |= ui.button("Help").clicked();
            });
        });

        egui::Window::new("Stats")
            .open(&mut self.stats_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Frame Time: {:.3}ms", 1000.0 * dt));
                ui.label(format!("FPS: {:.3}", self.clock.fps()));
                ui.label(format!("Bodies: {}", self.world.space.len()));
                ui.label(format!("Total Mass: {:.1}", self.world.space.total_mass()));
                if !self.world.playing {
                    ui.label("Paused");
                }
                if let Some(body) = self.world.controller.pending() {
                    ui.separator();
                    ui.label(format!("Radius: {:.1}", body.radius()));
                    ui.label(format!("Density: {:.1}", body.density()));
                    ui.label(format!("Mass: {:.1}", body.mass()));
                }
            });

        egui::Window::new("Guide")
            .open(&mut self.help_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("How to use:");
                ui.label(
                    "- Launching\n\
                        Press the left mouse button to create a body under the cursor.\n\n\
                        While holding the button, scroll to change its radius, or hold Alt and scroll to change its density.\n\n\
                        Drag away and release to launch it; it flies opposite to the drag, like a slingshot.\n\n\n\
                        - Simulation\n\
                        Bodies attract each other. Overlapping bodies merge into one, or bounce apart when the Recoil collision mode is selected in Settings.\n\n\
                        Settings (Windows menu) controls speed, pausing, gravity and trails. Reset restarts from the selected scenario.\
                        ",
                );
            });

        if self.world.ui(ctx, &mut self.settings_open, &mut self.settings) {
            self.clock.target_fps = self.settings.target_fps;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

                self.world.world_input(&response, rect, ui, &self.settings);
                self.world.step(self.settings.step(dt));

                let mut d = DrawHandler::new(self.world.camera.size());
                self.world.draw_states(&mut d);

                ui.painter()
                    .add(eframe::egui_wgpu::Callback::new_paint_callback(
                        rect,
                        RenderData {
                            camera: self.world.camera.gpu(),
                            quads: d.quads,
                            circles: d.circles,
                        },
                    ));
            });

        ctx.request_repaint();
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.store(storage);
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("starting gravity sandbox");

    eframe::run_native(
        "Gravity Sandbox",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size(WINDOW_SIZE),
            renderer: eframe::Renderer::Wgpu,
            vsync: false,
            depth_buffer: 24,
            wgpu_options: eframe::egui_wgpu::WgpuConfiguration {
                present_mode: wgpu::PresentMode::AutoNoVsync,
                wgpu_setup: eframe::egui_wgpu::WgpuSetup::CreateNew(
                    eframe::egui_wgpu::WgpuSetupCreateNew {
                        device_descriptor: Arc::new(|adapter| wgpu::DeviceDescriptor {
                            label: Some("wgpu device"),
                            required_features: wgpu::Features::default(),
                            required_limits: adapter.limits(),
                            memory_hints: wgpu::MemoryHints::default(),
                        }),
                        ..Default::default()
                    },
                ),
                ..Default::default()
            },
            ..Default::default()
        },
        Box::new(|cc| Ok(Box::new(App::new(cc)?))),
    )
}
