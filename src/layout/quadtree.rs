use emath::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

/// Axis-aligned square region of the canvas.
#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max.x - min.x).max(max.y - min.y).max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half_extent: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    pub(super) fn side(self) -> f32 {
        self.half_extent * 2.0
    }

    /// Squared gap between two squares, zero when they overlap.
    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        dx * dx + dy * dy
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let sign_x = if quadrant & 1 == 0 { -1.0 } else { 1.0 };
        let sign_y = if quadrant & 2 == 0 { -1.0 } else { 1.0 };
        Self {
            center: self.center + vec2(sign_x * quarter, sign_y * quarter),
            half_extent: quarter,
        }
    }
}

/// Region quadtree over node positions. Internal cells keep the count and
/// centroid of everything beneath them for the Barnes-Hut approximation.
pub(super) struct QuadCell {
    pub(super) square: Square,
    pub(super) centroid: Vec2,
    pub(super) count: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<QuadCell>>; 4],
}

impl QuadCell {
    pub(super) fn build(points: &[Vec2]) -> Option<Self> {
        let square = Square::enclosing(points)?;
        Some(Self::subdivide(square, (0..points.len()).collect(), points, 0))
    }

    fn subdivide(square: Square, members: Vec<usize>, points: &[Vec2], depth: usize) -> Self {
        let count = members.len() as f32;
        let mut centroid = Vec2::ZERO;
        for &index in &members {
            centroid += points[index];
        }
        if count > 0.0 {
            centroid /= count;
        }

        let mut cell = Self {
            square,
            centroid,
            count,
            members,
            children: [None, None, None, None],
        };

        if depth >= MAX_DEPTH || cell.members.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &cell.members {
            buckets[square.quadrant_of(points[index])].push(index);
        }

        // Coincident points would recurse forever; keep them together.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                cell.children[quadrant] = Some(Box::new(Self::subdivide(
                    square.quadrant(quadrant),
                    bucket,
                    points,
                    depth + 1,
                )));
            }
        }
        cell.members.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadCell> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}
