use eframe::egui::{Pos2, Rect, Vec2};

pub(super) const MIN_ZOOM: f32 = 0.3;
pub(super) const MAX_ZOOM: f32 = 7.0;
pub(super) const INITIAL_ZOOM: f32 = 0.8;

/// Pan/zoom of the canvas. World origin sits at the canvas centre plus `pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ViewTransform {
    pub(super) pan: Vec2,
    pub(super) zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: INITIAL_ZOOM,
        }
    }
}

impl ViewTransform {
    pub(super) fn world_to_screen(self, rect: Rect, world: Pos2) -> Pos2 {
        rect.center() + self.pan + world.to_vec2() * self.zoom
    }

    pub(super) fn screen_to_world(self, rect: Rect, screen: Pos2) -> Pos2 {
        ((screen - rect.center() - self.pan) / self.zoom).to_pos2()
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed on screen.
    pub(super) fn zoom_about(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let world = self.screen_to_world(rect, anchor);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = anchor - rect.center() - (world.to_vec2() * self.zoom);
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

/// Line from the source rim to the base of an arrow head touching the target rim, plus the
/// head triangle. `None` when the circles overlap on screen.
pub(super) fn arrow_geometry(
    start: Pos2,
    end: Pos2,
    source_radius: f32,
    target_radius: f32,
    head_length: f32,
) -> Option<([Pos2; 2], [Pos2; 3])> {
    let delta = end - start;
    let length = delta.length();
    if length <= source_radius + target_radius + head_length {
        return None;
    }

    let direction = delta / length;
    let normal = Vec2::new(-direction.y, direction.x);
    let tip = end - direction * target_radius;
    let base = tip - direction * head_length;
    let half_width = head_length * 0.5;

    Some((
        [start + direction * source_radius, base],
        [tip, base + normal * half_width, base - normal * half_width],
    ))
}
