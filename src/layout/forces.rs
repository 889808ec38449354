use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadCell;

/// Unit direction pushing `from` away from `to` when both sit on the same point. Spread by
/// slot so a stack of coincident bodies fans out, and antisymmetric in its arguments.
pub(super) fn separation_direction(from: usize, to: usize) -> Vec2 {
    let (low, high) = (from.min(to), from.max(to));
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if from <= to { direction } else { -direction }
}

fn repulsion_between(point: Vec2, other: Vec2, strength: f32, softening: f32) -> Vec2 {
    let delta = point - other;
    let distance_sq = delta.length_sq();
    if distance_sq <= 1e-8 {
        return Vec2::ZERO;
    }
    delta * (strength / (distance_sq + softening))
}

#[derive(Clone, Copy)]
pub(super) struct ManyBody {
    /// Already scaled by the current alpha.
    pub(super) strength: f32,
    pub(super) softening: f32,
    pub(super) theta: f32,
}

/// Barnes-Hut accumulation of the velocity change pushing `slot` away from every other body.
pub(super) fn accumulate_repulsion(
    cell: &QuadCell,
    slot: usize,
    positions: &[Vec2],
    params: ManyBody,
    delta: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[slot];

    if cell.is_leaf() {
        for &other in &cell.slots {
            if other == slot {
                continue;
            }
            let push =
                repulsion_between(point, positions[other], params.strength, params.softening);
            if push == Vec2::ZERO {
                *delta += separation_direction(slot, other) * (params.strength / params.softening);
            } else {
                *delta += push;
            }
        }
        return;
    }

    let offset = point - cell.center_of_mass;
    let distance_sq = offset.length_sq().max(1e-4);
    let side = cell.bounds.side_length();
    let far_enough = !cell.bounds.contains(point)
        && (side * side) < params.theta * params.theta * distance_sq;

    if far_enough {
        *delta += offset * ((params.strength * cell.mass) / (distance_sq + params.softening));
        return;
    }

    for child in cell.children() {
        accumulate_repulsion(child, slot, positions, params, delta);
    }
}

/// Collects every pair of slots whose circles currently overlap.
pub(super) fn collect_overlaps(
    cell_a: &QuadCell,
    cell_b: &QuadCell,
    same_cell: bool,
    positions: &[Vec2],
    radii: &[f32],
    overlaps: &mut Vec<(usize, usize)>,
) {
    let reach = cell_a.max_radius + cell_b.max_radius;
    if cell_a.bounds.gap_sq(cell_b.bounds) > reach * reach {
        return;
    }

    let mut test_pair = |from: usize, to: usize| {
        let min_distance = radii[from] + radii[to];
        if (positions[from] - positions[to]).length_sq() < min_distance * min_distance {
            overlaps.push((from.min(to), from.max(to)));
        }
    };

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.slots.iter().enumerate() {
                for &to in &cell_a.slots[offset + 1..] {
                    test_pair(from, to);
                }
            }
        } else {
            for &from in &cell_a.slots {
                for &to in &cell_b.slots {
                    test_pair(from, to);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (first, child_a) in children.iter().enumerate() {
            collect_overlaps(child_a, child_a, true, positions, radii, overlaps);
            for child_b in &children[first + 1..] {
                collect_overlaps(child_a, child_b, false, positions, radii, overlaps);
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.bounds.half_extent >= cell_b.bounds.half_extent
    };

    if split_a {
        for child in cell_a.children() {
            collect_overlaps(child, cell_b, false, positions, radii, overlaps);
        }
    } else {
        for child in cell_b.children() {
            collect_overlaps(cell_a, child, false, positions, radii, overlaps);
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::{ManyBody, accumulate_repulsion, collect_overlaps};
    use crate::layout::quadtree::QuadCell;

    #[test]
    fn repulsion_pushes_bodies_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(50.0, 0.0)];
        let radii = vec![5.0, 5.0];
        let root = QuadCell::build(&positions, &radii).expect("points are finite");
        let params = ManyBody {
            strength: 100.0,
            softening: 1.0,
            theta: 0.9,
        };

        let mut left = vec2(0.0, 0.0);
        let mut right = vec2(0.0, 0.0);
        accumulate_repulsion(&root, 0, &positions, params, &mut left);
        accumulate_repulsion(&root, 1, &positions, params, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left.x + right.x).abs() < 1e-4);
    }

    #[test]
    fn overlaps_are_found_across_cells() {
        let mut positions = (0..40)
            .map(|index| vec2(index as f32 * 100.0, 0.0))
            .collect::<Vec<_>>();
        positions.push(vec2(3.0, 0.0));
        positions.push(vec2(1_990.0, 0.0));
        let radii = vec![10.0; positions.len()];
        let root = QuadCell::build(&positions, &radii).expect("points are finite");

        let mut overlaps = Vec::new();
        collect_overlaps(&root, &root, true, &positions, &radii, &mut overlaps);
        overlaps.sort_unstable();

        assert_eq!(overlaps, vec![(0, 40), (20, 41)]);
    }
}
