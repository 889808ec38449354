use eframe::egui::{self, PointerButton, Rect, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let (scroll, pinch) = ui.input(|input| (input.raw_scroll_delta.y, input.zoom_delta()));
        let mut factor = pinch;
        if scroll.abs() > f32::EPSILON {
            factor *= (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        }
        if (factor - 1.0).abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.view.zoom_about(rect, pointer, factor);
    }

    /// Node drag, background pan, hover neighbourhood and click selection.
    pub(in crate::app) fn handle_graph_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            let current = response.interact_pointer_pos().or(origin);
            if let (Some(origin), Some(current)) = (origin, current)
                && let Some(index) = self.layout.node_at(self.view.screen_to_world(rect, origin))
            {
                self.layout.begin_drag(index, self.view.screen_to_world(rect, current));
            }
        }

        if response.dragged_by(PointerButton::Primary) {
            if self.layout.dragged().is_some() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    self.layout.drag_to(self.view.screen_to_world(rect, pointer));
                }
            } else {
                self.view.pan += response.drag_delta();
            }
        }
        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
        {
            self.view.pan += response.drag_delta();
        }
        if response.drag_stopped() && self.layout.dragged().is_some() {
            self.layout.end_drag();
        }

        let hovered = self.layout.dragged().or_else(|| {
            response
                .hover_pos()
                .and_then(|pointer| self.layout.node_at(self.view.screen_to_world(rect, pointer)))
        });
        if hovered != self.scene.hovered() {
            match hovered {
                Some(index) => self.scene.highlight_connections(&self.graph, index),
                None => self.scene.unhighlight_connections(),
            }
        }
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.layout.dragged().is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        if response.clicked_by(PointerButton::Primary) {
            self.select(hovered);
        }
    }
}
