use eframe::egui::{self, Align, Color32, Layout, Margin, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(index) = self.scene.selected() else {
            return;
        };
        let Some(node) = self.graph.node(index) else {
            ui.label("The selected model is no longer part of the dataset.");
            return;
        };

        let mut close = false;
        ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
            close = ui.button("Close").clicked();
        });

        let palette = *self.scene.palette();
        let (category_name, category_color) = match self.graph.category_of(node) {
            Some(category) => (
                category.name.as_str(),
                palette.category_color(&category.color),
            ),
            None => (node.category.as_str(), palette.category_color("")),
        };

        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(node.full_name.as_str()).strong());
                ui.label(format!("{} • {}", node.name, node.year));
                ui.add_space(6.0);

                egui::Frame::new()
                    .fill(category_color)
                    .corner_radius(10.0)
                    .inner_margin(Margin::symmetric(10, 3))
                    .show(ui, |ui| {
                        ui.label(RichText::new(category_name).color(Color32::WHITE).strong());
                    });
                ui.add_space(8.0);

                if !node.description.is_empty() {
                    ui.label(node.description.as_str());
                    ui.add_space(8.0);
                }

                if !node.main_idea.is_empty() {
                    egui::Frame::group(ui.style())
                        .stroke(egui::Stroke::new(2.0, category_color))
                        .show(ui, |ui| {
                            ui.label(RichText::new("Main Idea").strong());
                            ui.label(node.main_idea.as_str());
                        });
                    ui.add_space(8.0);
                }

                if !node.key_contributions.is_empty() {
                    ui.label(RichText::new("Key Contributions").strong());
                    for contribution in &node.key_contributions {
                        ui.label(format!("• {contribution}"));
                    }
                    ui.add_space(8.0);
                }

                ui.label(RichText::new("Publications").strong());
                if node.papers.is_empty() {
                    ui.small("No publications listed.");
                }
                for paper in &node.papers {
                    let title = match paper.year {
                        Some(year) => format!("{} ({year})", paper.title),
                        None => paper.title.clone(),
                    };
                    if paper.url.is_empty() {
                        ui.label(title);
                    } else {
                        ui.hyperlink_to(title, paper.url.as_str());
                    }
                }

                if !node.code.is_empty() {
                    ui.add_space(8.0);
                    ui.label(RichText::new("Code").strong());
                    for code in &node.code {
                        ui.horizontal(|ui| {
                            ui.label(format!("{}:", code.language));
                            ui.hyperlink(code.url.as_str());
                        });
                    }
                }

                if !node.tags.is_empty() {
                    ui.add_space(8.0);
                    ui.horizontal_wrapped(|ui| {
                        for tag in &node.tags {
                            ui.small(format!("#{tag}"));
                        }
                    });
                }
            });

        if close {
            self.select(None);
        }
    }
}
