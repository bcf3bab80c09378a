use emath::{Vec2, vec2};

use super::quadtree::QuadCell;

/// Distance below which two points are treated as coincident.
const COINCIDENT: f32 = 1e-6;

/// Stand-in direction for coincident points, derived from their indices so
/// the layout stays reproducible.
pub(super) fn spread_direction(first: usize, second: usize) -> Vec2 {
    let angle = ((first as f32) * 0.618_034 + (second as f32) * 0.414_214 + 0.11)
        * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

fn separation(from: Vec2, to: Vec2, first: usize, second: usize) -> Vec2 {
    let delta = to - from;
    if delta.length_sq() > COINCIDENT * COINCIDENT {
        delta
    } else {
        spread_direction(first, second) * COINCIDENT
    }
}

/// Pair of link endpoints with the spring parameters derived from degree.
#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

impl Spring {
    /// Springs on busy nodes are softer, and the lighter end moves more.
    pub(super) fn build(edges: &[(usize, usize)], node_count: usize) -> Vec<Self> {
        let edges = edges
            .iter()
            .copied()
            .filter(|&(source, target)| source < node_count && target < node_count && source != target)
            .collect::<Vec<_>>();

        let mut degree = vec![0usize; node_count];
        for &(source, target) in &edges {
            degree[source] += 1;
            degree[target] += 1;
        }

        edges
            .into_iter()
            .map(|(source, target)| {
                let (ds, dt) = (degree[source] as f32, degree[target] as f32);
                Self {
                    source,
                    target,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect()
    }
}

/// Pulls linked nodes toward `distance` apart. Applied in place, one link at
/// a time, against positions extrapolated by the current velocity.
pub(super) fn apply_links(
    springs: &[Spring],
    positions: &[Vec2],
    velocities: &mut [Vec2],
    distance: f32,
    alpha: f32,
) {
    for spring in springs {
        let (source, target) = (spring.source, spring.target);
        let mut delta = separation(
            positions[source] + velocities[source],
            positions[target] + velocities[target],
            source,
            target,
        );
        let length = delta.length();
        delta *= (length - distance) / length * alpha * spring.strength;

        velocities[target] -= delta * spring.bias;
        velocities[source] += delta * (1.0 - spring.bias);
    }
}

fn push_from(point: Vec2, other: Vec2, weight: f32, strength: f32, index: usize, other_index: usize) -> Vec2 {
    let delta = separation(point, other, index, other_index);
    let mut distance_sq = delta.length_sq();
    if distance_sq < 1.0 {
        distance_sq = distance_sq.sqrt();
    }
    delta * (strength * weight / distance_sq)
}

/// Many-body charge for one node. Negative strength repels. Distant cells
/// are folded into their centroid when `side / distance < theta`.
pub(super) fn charge_for_node(
    cell: &QuadCell,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
) -> Vec2 {
    if cell.count <= 0.0 {
        return Vec2::ZERO;
    }

    let point = positions[index];
    if cell.is_leaf() {
        return cell
            .members
            .iter()
            .filter(|&&other| other != index)
            .fold(Vec2::ZERO, |total, &other| {
                total + push_from(point, positions[other], 1.0, strength, index, other)
            });
    }

    let distance_sq = (cell.centroid - point).length_sq().max(COINCIDENT);
    let side = cell.square.side();
    if !cell.square.contains(point) && side * side < theta * theta * distance_sq && cell.count > 1.0 {
        return push_from(point, cell.centroid, cell.count, strength, index, usize::MAX);
    }

    cell.children()
        .map(|child| charge_for_node(child, index, positions, strength, theta))
        .fold(Vec2::ZERO, |total, force| total + force)
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Collision {
    pub(super) strength: f32,
    pub(super) max_reach_sq: f32,
}

fn resolve_overlap(
    first: usize,
    second: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    impulses: &mut [Vec2],
) {
    let reach = radii[first] + radii[second];
    let mut delta = separation(predicted[second], predicted[first], second, first);
    let distance = delta.length();
    if distance >= reach {
        return;
    }

    delta *= (reach - distance) / distance * strength;
    let (r1, r2) = (radii[first] * radii[first], radii[second] * radii[second]);
    let share = r2 / (r1 + r2);
    impulses[first] += delta * share;
    impulses[second] -= delta * (1.0 - share);
}

/// Separates overlapping circles. Cell pairs further apart than the largest
/// possible reach are pruned without visiting their members.
pub(super) fn collide_cells(
    left: &QuadCell,
    right: &QuadCell,
    same_cell: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: Collision,
    impulses: &mut [Vec2],
) {
    if left.square.gap_sq(right.square) > params.max_reach_sq {
        return;
    }

    if left.is_leaf() && right.is_leaf() {
        if same_cell {
            for (offset, &first) in left.members.iter().enumerate() {
                for &second in &left.members[offset + 1..] {
                    resolve_overlap(first, second, predicted, radii, params.strength, impulses);
                }
            }
        } else {
            for &first in &left.members {
                for &second in &right.members {
                    resolve_overlap(first, second, predicted, radii, params.strength, impulses);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = left.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            collide_cells(child, child, true, predicted, radii, params, impulses);
            for other in &children[offset + 1..] {
                collide_cells(child, other, false, predicted, radii, params, impulses);
            }
        }
        return;
    }

    let split_left = match (left.is_leaf(), right.is_leaf()) {
        (false, true) => true,
        (true, false) => false,
        _ => left.square.half_extent >= right.square.half_extent,
    };

    if split_left {
        for child in left.children() {
            collide_cells(child, right, false, predicted, radii, params, impulses);
        }
    } else {
        for child in right.children() {
            collide_cells(left, child, false, predicted, radii, params, impulses);
        }
    }
}

/// Pulls a node toward a ring of `ring_radius` around `center`.
pub(super) fn radial_pull(position: Vec2, center: Vec2, ring_radius: f32, strength: f32, alpha: f32, index: usize) -> Vec2 {
    let delta = separation(center, position, usize::MAX, index);
    let distance = delta.length();
    delta * ((ring_radius - distance) * strength * alpha / distance)
}

/// Translates every position so their mean moves toward `center`.
pub(super) fn recenter(positions: &mut [Vec2], center: Vec2, strength: f32) {
    if positions.is_empty() {
        return;
    }

    let mean = positions.iter().fold(Vec2::ZERO, |sum, point| sum + *point) / positions.len() as f32;
    let shift = (mean - center) * strength;
    for point in positions {
        *point -= shift;
    }
}
