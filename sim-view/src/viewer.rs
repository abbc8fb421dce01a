//! Interactive tubule network viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the substrate and the
//! driver-side state (timing, camera, split requests) and implements
//! [`eframe::App`] to draw and control the simulation.

use eframe::App;
use glam::Vec2;
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use tubule_core::{Pipeline, Substrate, SubstrateConfig, SubstrateResult, driver::FrameReport};

pub const SUBSTRATE_WIDTH: f32 = 400.0;
pub const SUBSTRATE_HEIGHT: f32 = 400.0;

/// Main application state for the interactive viewer.
///
/// The per-frame driver loop is:
/// 1. Handle UI input; a click on the canvas requests a split.
/// 2. If `running` is `true` and enough time has passed, call
///    [`Viewer::step_once`], which sweeps removed entities, performs a
///    pending split and ticks the substrate.
/// 3. Draw the tubules and junctions.
///
/// ### Fields
/// - `substrate` - The simulation being driven.
/// - `cfg` - Config used on the next reset; edited from the side panel.
/// - `rng` - Random source handed to seeding and splitting.
/// - `split_requested` - A split queued for the next step.
/// - `auto_split_every` - Request a split every this many steps (0 = off).
/// - `ticks_per_step` - Substrate ticks per viewer step.
/// - `last_report` - What the last viewer step did, over all its ticks.
pub struct Viewer {
    substrate: Substrate,
    cfg: SubstrateConfig,

    rng: StdRng,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    split_requested: bool,
    auto_split_every: usize,
    ticks_per_step: usize,
    steps: usize,
    last_report: FrameReport,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer with a freshly seeded substrate running the default
    /// growth pipeline, using OS entropy for the random source.
    pub fn new(cfg: SubstrateConfig) -> SubstrateResult<Self> {
        Self::with_rng(cfg, StdRng::from_os_rng())
    }

    /// Like [`Viewer::new`] with a caller-provided random source.
    pub fn with_rng(cfg: SubstrateConfig, mut rng: StdRng) -> SubstrateResult<Self> {
        let substrate = Self::seeded(cfg, &mut rng)?;

        Ok(Self {
            substrate,
            cfg,
            rng,
            running: true,
            zoom: 1.5,
            pan: egui::vec2(0.0, 0.0),
            split_requested: false,
            auto_split_every: 0,
            ticks_per_step: 1,
            steps: 0,
            last_report: FrameReport::default(),
            step_interval: 0.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Builds a substrate from `cfg` with the default pipeline and the two
    /// initial strands.
    fn seeded(cfg: SubstrateConfig, rng: &mut StdRng) -> SubstrateResult<Substrate> {
        let mut substrate = Substrate::new(cfg)?;
        *substrate.pipeline_mut() = Pipeline::default_growth();
        substrate.init_substrate(rng)?;
        Ok(substrate)
    }

    /// Rebuilds the substrate from the current config.
    ///
    /// An invalid config is reported and the config is restored from the
    /// running substrate.
    fn reset(&mut self) {
        match Self::seeded(self.cfg, &mut self.rng) {
            Ok(s) => self.substrate = s,
            Err(e) => {
                warn!("reset rejected: {e}");
                self.cfg = *self.substrate.config();
            }
        }
        self.split_requested = false;
        self.steps = 0;
        self.last_report = FrameReport::default();
    }

    /// Advances the simulation by one viewer step of `ticks_per_step`
    /// frames. A requested split happens on the first frame.
    fn step_once(&mut self) {
        if self.auto_split_every > 0 && self.steps % self.auto_split_every == 0 {
            self.split_requested = true;
        }

        let mut report = FrameReport::default();
        for i in 0..self.ticks_per_step.max(1) {
            let split = i == 0 && self.split_requested;
            let frame = self.substrate.step_frame(split, &mut self.rng);
            report.swept.junctions.extend(frame.swept.junctions);
            report.swept.tubules.extend(frame.swept.tubules);
            report.split = report.split.or(frame.split);
        }
        self.last_report = report;
        self.split_requested = false;
        self.steps += 1;
    }

    /// Converts a substrate position to screen-space.
    ///
    /// The substrate is centered in `rect`, scaled by `zoom` and offset by
    /// `pan`. y grows upward in substrate space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let half = Vec2::new(self.substrate.width(), self.substrate.height()) * 0.5;
        let q = p - half;
        egui::pos2(
            center.x + q.x * self.zoom + self.pan.x,
            center.y - q.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let half = Vec2::new(self.substrate.width(), self.substrate.height()) * 0.5;
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y) + half
    }

    /// Draws a labeled `f32` [`egui::DragValue`] on one row.
    ///
    /// ### Parameters
    /// - `ui` - Ui to draw into.
    /// - `label` - Text shown left of the value.
    /// - `value` - Value edited in place.
    /// - `range` - Allowed range; drags are clamped to it.
    /// - `speed` - Change per pixel dragged.
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Draws a labeled `usize` [`egui::DragValue`] on one row.
    ///
    /// ### Parameters
    /// Same as [`Viewer::labeled_drag_f32`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Top panel: run controls, stepping, splitting, zoom.
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.01),
                );

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Split").clicked() {
                    self.split_requested = true;
                }

                if ui.button("Count").clicked() {
                    info!("{} tubules", self.substrate.tubule_count());
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("ticks = {}", self.substrate.tick_count()));
                ui.label(format!("junctions = {}", self.substrate.junction_count()));
                ui.label(format!("tubules = {}", self.substrate.tubule_count()));
                ui.label(format!(
                    "tips = {}",
                    self.substrate.junctions().filter(|(_, j)| j.growing).count()
                ));
            });
        });
    }

    /// Right-hand panel editing the config used by the next reset.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label("Applied on reset.");

                ui.separator();
                ui.label("Substrate");
                Self::labeled_drag_f32(ui, "width:", &mut self.cfg.width, 10.0..=2000.0, 1.0);
                Self::labeled_drag_f32(ui, "height:", &mut self.cfg.height, 10.0..=2000.0, 1.0);
                ui.checkbox(&mut self.cfg.bound_x, "bound_x");
                ui.checkbox(&mut self.cfg.wrap_x, "wrap_x");

                ui.separator();
                ui.label("Physics");
                Self::labeled_drag_f32(ui, "hookes:", &mut self.cfg.hookes, 0.0..=0.01, 0.000_01);
                Self::labeled_drag_f32(ui, "growth:", &mut self.cfg.growth, 0.0..=5.0, 0.01);
                Self::labeled_drag_f32(ui, "dragrate:", &mut self.cfg.dragrate, 0.01..=1.0, 0.001);
                ui.checkbox(&mut self.cfg.contracting, "contracting");
                ui.checkbox(&mut self.cfg.flowing, "flowing");

                ui.separator();
                ui.label("Driver");
                Self::labeled_drag_usize(
                    ui,
                    "auto split every:",
                    &mut self.auto_split_every,
                    0..=10_000,
                    1.0,
                );
                Self::labeled_drag_usize(ui, "ticks per step:", &mut self.ticks_per_step, 1..=100, 1.0);

                ui.separator();
                if ui.button("Apply & reset").clicked() {
                    self.reset();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = SubstrateConfig::new(SUBSTRATE_WIDTH, SUBSTRATE_HEIGHT);
                }
            });
    }

    /// Central panel: the substrate itself.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Click to branch a new tip somewhere on the network.
            if response.clicked() {
                self.split_requested = true;
            }
            if response.secondary_clicked() {
                info!("{} tubules", self.substrate.tubule_count());
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);
                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);
                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            // Substrate outline.
            let (w, h) = (self.substrate.width(), self.substrate.height());
            let corners = [
                Vec2::new(0.0, 0.0),
                Vec2::new(w, 0.0),
                Vec2::new(w, h),
                Vec2::new(0.0, h),
            ];
            let outline: Vec<egui::Pos2> = corners
                .iter()
                .map(|&c| self.world_to_screen(c, rect))
                .collect();
            painter.add(egui::Shape::closed_line(
                outline,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
            ));

            for seg in self.substrate.render_segments() {
                let a = self.world_to_screen(seg.a, rect);
                let b = self.world_to_screen(seg.b, rect);
                painter.line_segment([a, b], egui::Stroke::new(1.0, egui::Color32::LIGHT_GREEN));
            }

            for (_, j) in self.substrate.junctions() {
                let p = Vec2::new(j.pos.x.rem_euclid(w), j.pos.y);
                let color = if j.growing {
                    egui::Color32::RED
                } else if j.anchor {
                    egui::Color32::GRAY
                } else {
                    egui::Color32::LIGHT_BLUE
                };
                painter.circle_stroke(
                    self.world_to_screen(p, rect),
                    (1.5 * self.zoom).max(2.0),
                    egui::Stroke::new(1.0, color),
                );
            }

            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }
                ctx.request_repaint();
            } else if self.split_requested {
                // Paused: still show the split right away.
                self.last_report.split = self.substrate.split_tubule(&mut self.rng);
                self.split_requested = false;
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
