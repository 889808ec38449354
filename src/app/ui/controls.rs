use eframe::egui::{self, Color32, RichText, Sense, Ui, vec2};

use super::super::ViewModel;

fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
    ui.painter().circle_filled(rect.center(), 6.0, color);
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .id_salt("controls_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_search(ui);
                ui.separator();
                self.draw_year_range(ui);
                ui.separator();
                self.draw_category_legend(ui);
                ui.separator();
                self.draw_link_type_legend(ui);
            });
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.heading("Search");
        let response = ui
            .add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("name, description, tag..."),
            )
            .on_hover_text("Dims models that do not match without hiding them.");
        if response.changed() {
            self.apply_search();
        }

        let search = self.scene.search_state();
        if !search.is_active() {
            return;
        }

        ui.small(format!("{} matching models", search.match_count()));
        let mut clicked = None;
        for hit in &self.search_hits {
            let Some(node) = self.graph.node(hit.index) else {
                continue;
            };
            if ui
                .link(format!("{} ({})", node.name, node.year))
                .on_hover_text(node.full_name.as_str())
                .clicked()
            {
                clicked = Some(hit.index);
            }
        }
        if let Some(index) = clicked {
            self.select(Some(index));
        }

        if ui.small_button("Clear search").clicked() {
            self.search_input.clear();
            self.apply_search();
        }
    }

    fn draw_year_range(&mut self, ui: &mut Ui) {
        ui.heading("Years");
        let Some(range) = self.graph.year_range() else {
            ui.label("The dataset has no models.");
            return;
        };

        let mut year_min = self.filter.year_min();
        let mut year_max = self.filter.year_max();
        if ui
            .add(egui::Slider::new(&mut year_min, range.clone()).text("from"))
            .changed()
        {
            self.filter.set_year_min(year_min);
            self.filter_dirty = true;
        }
        if ui
            .add(egui::Slider::new(&mut year_max, range).text("to"))
            .changed()
        {
            self.filter.set_year_max(year_max);
            self.filter_dirty = true;
        }
    }

    fn draw_category_legend(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Model families");
            if ui.small_button("Reset").clicked() {
                self.filter.reset_categories(&self.graph);
                self.filter_dirty = true;
            }
        });

        let palette = *self.scene.palette();
        let entries = self
            .graph
            .categories
            .values()
            .map(|category| {
                (
                    category.key.clone(),
                    category.name.clone(),
                    palette.category_color(&category.color),
                )
            })
            .collect::<Vec<_>>();

        for (key, name, color) in entries {
            ui.horizontal(|ui| {
                swatch(ui, color);
                let mut active = self.filter.is_category_active(&key);
                if ui.checkbox(&mut active, name).changed() {
                    self.filter.toggle_category(&key, active);
                    self.filter_dirty = true;
                }
            });
        }
    }

    fn draw_link_type_legend(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Connections");
            if ui.small_button("Reset").clicked() {
                self.filter.reset_link_types(&self.graph);
                self.filter_dirty = true;
            }
        });

        let palette = *self.scene.palette();
        let entries = self
            .graph
            .link_types
            .values()
            .map(|link_type| {
                (
                    link_type.key.clone(),
                    link_type.label.clone(),
                    palette.link_color(&link_type.color),
                )
            })
            .collect::<Vec<_>>();

        for (key, label, color) in entries {
            ui.horizontal(|ui| {
                let mut active = self.filter.is_link_type_active(&key);
                if ui.checkbox(&mut active, RichText::new(label).color(color)).changed() {
                    self.filter.toggle_link_type(&key, active);
                    self.filter_dirty = true;
                }
            });
        }
    }
}
