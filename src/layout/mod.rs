mod forces;
mod quadtree;

use std::f32::consts::PI;

use emath::{Vec2, vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::ContentGraph;
use forces::{Collision, Spring, apply_links, charge_for_node, collide_cells, radial_pull, recenter};
use quadtree::QuadCell;

pub const MIN_NODE_RADIUS: f32 = 8.0;
pub const NODE_RADIUS_SPAN: f32 = 16.0;

/// Simulation parameters. Defaults reproduce the site's connection map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    pub iterations: usize,
    pub link_distance: f32,
    /// Many-body strength; negative values repel.
    pub charge_strength: f32,
    pub barnes_hut_theta: f32,
    pub center_strength: f32,
    /// Added to each node radius when resolving collisions.
    pub collision_margin: f32,
    pub collision_strength: f32,
    /// Orphan ring radius as a fraction of the shorter canvas side.
    pub orphan_ring_ratio: f32,
    pub orphan_strength: f32,
    /// Gap kept between every node and the canvas edge.
    pub edge_margin: f32,
    pub velocity_decay: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            iterations: 300,
            link_distance: 90.0,
            charge_strength: -150.0,
            barnes_hut_theta: 0.9,
            center_strength: 1.0,
            collision_margin: 6.0,
            collision_strength: 1.0,
            orphan_ring_ratio: 0.35,
            orphan_strength: 0.3,
            edge_margin: 20.0,
            velocity_decay: 0.4,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(GraphError::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        if self.iterations == 0 {
            return Err(GraphError::ZeroIterations);
        }
        Ok(())
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn orphan_ring_radius(&self) -> f32 {
        self.width.min(self.height) * self.orphan_ring_ratio
    }

    /// Alpha cools from 1 to 0.001 over the configured iteration count.
    fn alpha_decay(&self) -> f32 {
        1.0 - 0.001_f32.powf(1.0 / self.iterations as f32)
    }
}

/// Final position of one node on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Busier nodes are drawn larger, scaled against the busiest node.
pub fn node_radius(connection_count: usize, max_connection_count: usize) -> f32 {
    let max = max_connection_count.max(1) as f32;
    MIN_NODE_RADIUS + (connection_count as f32 / max).min(1.0) * NODE_RADIUS_SPAN
}

/// Phyllotaxis spiral around the canvas center; no randomness involved.
fn initial_positions(count: usize, center: Vec2) -> Vec<Vec2> {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|index| {
            let radius = 10.0 * (0.5 + index as f32).sqrt();
            let angle = index as f32 * golden_angle;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn clamp_axis(value: f32, radius: f32, margin: f32, extent: f32) -> f32 {
    let low = radius + margin;
    let high = extent - radius - margin;
    if low > high {
        return extent * 0.5;
    }
    // max/min rather than clamp so a NaN lands on the boundary.
    value.max(low).min(high)
}

struct Simulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    radii: Vec<f32>,
    orphan: Vec<bool>,
    springs: Vec<Spring>,
    impulses: Vec<Vec2>,
}

impl Simulation {
    fn new(connection_counts: &[usize], edges: &[(usize, usize)], config: &LayoutConfig) -> Self {
        let node_count = connection_counts.len();
        let max_connections = connection_counts.iter().copied().max().unwrap_or(0);

        Self {
            positions: initial_positions(node_count, config.center()),
            velocities: vec![Vec2::ZERO; node_count],
            radii: connection_counts
                .iter()
                .map(|count| node_radius(*count, max_connections))
                .collect(),
            orphan: connection_counts.iter().map(|count| *count == 0).collect(),
            springs: Spring::build(edges, node_count),
            impulses: vec![Vec2::ZERO; node_count],
        }
    }

    fn tick(&mut self, alpha: f32, config: &LayoutConfig) {
        let node_count = self.positions.len();

        apply_links(
            &self.springs,
            &self.positions,
            &mut self.velocities,
            config.link_distance,
            alpha,
        );

        if let Some(tree) = QuadCell::build(&self.positions) {
            let strength = config.charge_strength * alpha;
            for index in 0..node_count {
                self.velocities[index] += charge_for_node(
                    &tree,
                    index,
                    &self.positions,
                    strength,
                    config.barnes_hut_theta,
                );
            }
        }

        recenter(&mut self.positions, config.center(), config.center_strength);

        self.collide(config);

        if config.orphan_strength > 0.0 {
            let center = config.center();
            let ring_radius = config.orphan_ring_radius();
            for index in 0..node_count {
                if self.orphan[index] {
                    self.velocities[index] += radial_pull(
                        self.positions[index],
                        center,
                        ring_radius,
                        config.orphan_strength,
                        alpha,
                        index,
                    );
                }
            }
        }

        let keep = 1.0 - config.velocity_decay;
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *velocity *= keep;
            *position += *velocity;
        }
    }

    fn collide(&mut self, config: &LayoutConfig) {
        let predicted = self
            .positions
            .iter()
            .zip(&self.velocities)
            .map(|(position, velocity)| *position + *velocity)
            .collect::<Vec<_>>();
        let reach = self
            .radii
            .iter()
            .map(|radius| radius + config.collision_margin)
            .collect::<Vec<_>>();
        let max_reach = reach.iter().copied().fold(0.0_f32, f32::max) * 2.0;

        let Some(tree) = QuadCell::build(&predicted) else {
            return;
        };

        self.impulses.fill(Vec2::ZERO);
        collide_cells(
            &tree,
            &tree,
            true,
            &predicted,
            &reach,
            Collision {
                strength: config.collision_strength,
                max_reach_sq: max_reach * max_reach,
            },
            &mut self.impulses,
        );

        for (velocity, impulse) in self.velocities.iter_mut().zip(&self.impulses) {
            *velocity += *impulse;
        }
    }
}

/// Runs the fixed-length simulation and returns clamped positions, one per
/// id in input order.
///
/// `connection_counts[i]` sizes node `i` and decides whether it is pulled
/// to the orphan ring. Edges refer to node indices; out-of-range and self
/// edges are ignored.
pub fn force_layout(
    node_ids: &[String],
    connection_counts: &[usize],
    edges: &[(usize, usize)],
    config: &LayoutConfig,
) -> Result<Vec<LayoutNode>> {
    config.validate()?;
    if node_ids.is_empty() {
        return Ok(Vec::new());
    }

    let counts = (0..node_ids.len())
        .map(|index| connection_counts.get(index).copied().unwrap_or(0))
        .collect::<Vec<_>>();
    let mut simulation = Simulation::new(&counts, edges, config);

    let decay = config.alpha_decay();
    let mut alpha = 1.0_f32;
    for _ in 0..config.iterations {
        alpha -= alpha * decay;
        simulation.tick(alpha, config);
    }

    debug!(
        nodes = node_ids.len(),
        springs = simulation.springs.len(),
        iterations = config.iterations,
        final_alpha = alpha,
        "force layout settled"
    );

    Ok(node_ids
        .iter()
        .zip(simulation.positions.iter().zip(&simulation.radii))
        .map(|(id, (position, radius))| LayoutNode {
            id: id.clone(),
            x: clamp_axis(position.x, *radius, config.edge_margin, config.width),
            y: clamp_axis(position.y, *radius, config.edge_margin, config.height),
            radius: *radius,
        })
        .collect())
}

/// Lays out an assembled graph.
pub fn compute_layout(graph: &ContentGraph, config: &LayoutConfig) -> Result<Vec<LayoutNode>> {
    let node_ids = graph
        .nodes
        .iter()
        .map(|node| node.id.clone())
        .collect::<Vec<_>>();
    let counts = graph
        .nodes
        .iter()
        .map(|node| node.connection_count)
        .collect::<Vec<_>>();
    force_layout(&node_ids, &counts, &graph.edge_indices(), config)
}
