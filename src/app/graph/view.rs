use eframe::egui::{Align2, FontId, Sense, Shape, Stroke, Ui, vec2};

use crate::lineage::NodeIndex;
use crate::scene::{LinkEmphasis, NodeEmphasis};

use super::super::ViewModel;
use super::super::render_utils::{arrow_geometry, circle_visible, segment_visible};

const LABEL_GAP: f32 = 15.0;

impl ViewModel {
    fn node_size(&self, index: NodeIndex) -> f32 {
        self.graph.node(index).map_or(0.0, |node| node.size)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let palette = *self.scene.palette();
        painter.rect_filled(rect, 0.0, palette.background);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pointer(ui, rect, &response);

        let frame_delta_seconds = ui.input(|input| input.stable_dt).min(0.1);
        let simulating = self.layout.tick();
        let fading = self.scene.advance(frame_delta_seconds);
        if simulating || fading || self.layout.dragged().is_some() {
            ui.ctx().request_repaint();
        }

        if self.visible.is_empty() && self.scene.drawn_nodes(&self.graph).next().is_none() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No models match the current filters.",
                FontId::proportional(15.0),
                palette.label,
            );
            return;
        }

        let view = self.view;
        let zoom = view.zoom;
        let line_width = (1.5 * zoom).clamp(0.75, 4.0);
        let head_length = (9.0 * zoom).clamp(4.0, 16.0);

        for (link_index, _) in self.scene.drawn_links() {
            let Some(link) = self.graph.link(link_index) else {
                continue;
            };
            let (Some(source), Some(target)) = (
                self.layout.position(link.source),
                self.layout.position(link.target),
            ) else {
                continue;
            };

            let start = view.world_to_screen(rect, source);
            let end = view.world_to_screen(rect, target);
            if !segment_visible(rect, start, end, head_length) {
                continue;
            }

            let style = self.scene.link_style(&self.graph, link_index);
            if style.opacity <= 0.0 {
                continue;
            }

            let hex = self
                .graph
                .link_type_of(link)
                .map_or("", |link_type| link_type.color.as_str());
            let color = palette.link_color(hex).gamma_multiply(style.opacity);
            let width = if style.emphasis == LinkEmphasis::Highlighted {
                line_width * 1.6
            } else {
                line_width
            };

            match arrow_geometry(
                start,
                end,
                self.node_size(link.source) * zoom,
                self.node_size(link.target) * zoom,
                head_length,
            ) {
                Some((line, head)) => {
                    painter.line_segment(line, Stroke::new(width, color));
                    let marker = palette
                        .marker_color(hex)
                        .gamma_multiply(style.opacity * style.marker_opacity);
                    painter.add(Shape::convex_polygon(head.to_vec(), marker, Stroke::NONE));
                }
                None => {
                    painter.line_segment([start, end], Stroke::new(width, color));
                }
            }
        }

        let label_font = FontId::proportional((12.0 * zoom).clamp(8.0, 20.0));
        let stroke_width = (1.5 * zoom).clamp(0.5, 3.0);
        for (index, _) in self.scene.drawn_nodes(&self.graph) {
            let (Some(node), Some(world)) = (self.graph.node(index), self.layout.position(index))
            else {
                continue;
            };

            let center = view.world_to_screen(rect, world);
            let radius = node.size * zoom;
            if !circle_visible(rect, center, radius + (LABEL_GAP * zoom) + 12.0) {
                continue;
            }

            let style = self.scene.node_style(&self.graph, index);
            if style.opacity <= 0.0 {
                continue;
            }

            let fill_hex = self
                .graph
                .category_of(node)
                .map_or("", |category| category.color.as_str());
            painter.circle(
                center,
                radius,
                palette.category_color(fill_hex).gamma_multiply(style.opacity),
                Stroke::new(stroke_width, palette.node_stroke.gamma_multiply(style.opacity)),
            );
            if style.search_match {
                painter.circle_stroke(
                    center,
                    radius + (4.0 * zoom).max(2.0),
                    Stroke::new(2.0, palette.search_ring.gamma_multiply(style.opacity)),
                );
            }
            if style.selected {
                painter.circle_stroke(
                    center,
                    radius + (7.0 * zoom).max(3.5),
                    Stroke::new(3.0, palette.selection.gamma_multiply(style.opacity)),
                );
            }

            if style.emphasis == NodeEmphasis::Faded {
                continue;
            }
            painter.text(
                center + vec2(0.0, (node.size + LABEL_GAP) * zoom),
                Align2::CENTER_CENTER,
                node.name.as_str(),
                label_font.clone(),
                palette.label.gamma_multiply(style.opacity),
            );
        }

        if let Some(hovered) = self.scene.hovered()
            && let Some(node) = self.graph.node(hovered)
        {
            let category = self
                .graph
                .category_of(node)
                .map_or(node.category.as_str(), |category| category.name.as_str());
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  {}", node.full_name, node.year, category),
                FontId::proportional(13.0),
                palette.label,
            );
        }
    }
}
