use std::path::Path;

use eframe::egui::{self, Align, Context, Layout, Visuals};

use crate::filter::{FilterState, compute_visible};
use crate::layout::{ForceLayout, LayoutConfig};
use crate::lineage::LineageGraph;
use crate::scene::Scene;

use super::super::ViewModel;
use super::super::render_utils::ViewTransform;

impl ViewModel {
    pub(in crate::app) const SEARCH_RESULT_LIMIT: usize = 8;

    pub(in crate::app) fn new(
        graph: LineageGraph,
        layout_config: LayoutConfig,
        is_light: bool,
    ) -> Self {
        let filter = FilterState::for_graph(&graph);
        let visible = compute_visible(&graph, &filter);
        let layout = ForceLayout::new(&graph, layout_config);
        let scene = Scene::new(&graph, is_light);

        Self {
            graph,
            filter,
            visible,
            layout,
            scene,
            view: ViewTransform::default(),
            search_input: String::new(),
            search_hits: Vec::new(),
            is_light,
            filter_dirty: true,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if ctx.style().visuals.dark_mode == self.is_light {
            ctx.set_visuals(if self.is_light {
                Visuals::light()
            } else {
                Visuals::dark()
            });
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Generative Model Lineage");
                    ui.separator();
                    ui.label(format!(
                        "{} models • {} connections",
                        self.graph.node_count(),
                        self.graph.link_count()
                    ));
                    ui.label(format!("dataset: {}", data_path.display()))
                        .on_hover_text("Static dataset read at startup.");
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let mut light = self.is_light;
                        if ui.checkbox(&mut light, "Light theme").changed() {
                            self.set_theme(light);
                        }
                        ui.separator();
                        ui.label(format!(
                            "layout {:?} (alpha {:.3})",
                            self.layout.phase(),
                            self.layout.alpha()
                        ))
                        .on_hover_text("Force simulation state; it stops once the layout cools.");
                        ui.separator();
                        ui.label(format!(
                            "showing {} models • {} connections",
                            self.layout.active_nodes().len(),
                            self.visible.links.len()
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.filter_dirty {
            self.refresh_visible();
        }

        if self.scene.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(380.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading model lineage...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_graph(ui);
                }
            });
    }

    pub(in crate::app) fn set_theme(&mut self, is_light: bool) {
        self.is_light = is_light;
        self.scene.update_theme(is_light);
    }
}
