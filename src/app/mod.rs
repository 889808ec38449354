use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use crate::filter::{FilterState, SearchHit, VisibleSubgraph};
use crate::layout::{ForceLayout, LayoutConfig};
use crate::lineage::{LineageGraph, LoadError, load_dataset};
use crate::scene::Scene;

mod graph;
mod render_utils;
mod ui;

use render_utils::ViewTransform;

type LoadResult = Result<LineageGraph, LoadError>;

pub struct LineageApp {
    data_path: PathBuf,
    layout_config: LayoutConfig,
    start_light: bool,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: LineageGraph,
    filter: FilterState,
    visible: VisibleSubgraph,
    layout: ForceLayout,
    scene: Scene,
    view: ViewTransform,
    search_input: String,
    search_hits: Vec<SearchHit>,
    is_light: bool,
    filter_dirty: bool,
}

impl LineageApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        data_path: PathBuf,
        layout_config: LayoutConfig,
        start_light: bool,
    ) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            layout_config,
            start_light,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(load_dataset(&data_path));
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }

    fn finish_load(&self, result: LoadResult, is_light: bool) -> AppState {
        match result {
            Ok(graph) => AppState::Ready(Box::new(ViewModel::new(
                graph,
                self.layout_config,
                is_light,
            ))),
            Err(load_error) => {
                let report = format!("{:#}", anyhow::Error::from(load_error));
                error!(error = %report, "dataset failed to load");
                AppState::Error(report)
            }
        }
    }
}

impl eframe::App for LineageApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(self.finish_load(result, self.start_light)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading model lineage...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Failed to load the model lineage dataset");
                        ui.add_space(6.0);
                        ui.label(message.as_str());
                        ui.add_space(10.0);
                        if ui.button("Reload").clicked() {
                            info!("reloading dataset after failure");
                            transition = Some(Self::start_load(self.data_path.clone()));
                        }
                    });
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);
                let is_light = model.is_light;

                if reload_requested && self.reload_rx.is_none() {
                    info!("reloading dataset");
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(self.finish_load(result, is_light)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
