// Collision polygons extracted from sprite-sheet alpha
//
// A cell's opaque pixels are grouped into 4-connected blobs. Each blob's
// outer boundary is traced along pixel edges, split into convex pieces and
// moved into body-local simulation units (y up, centred on the cell shape's
// centroid).

use crate::core::math;
use crate::engine::assets::{AssetError, SpriteSheet};
use glam::Vec2;
use image::RgbaImage;
use parry2d::math::{Point, Real};
use parry2d::transformation::vhacd::{VHACDParameters, VHACD};

/// A pixel counts as solid when its alpha is above this value
pub const ALPHA_THRESHOLD: u8 = 0;

/// Outlines whose area is within this fraction of their convex hull are used as the hull
const CONVEXITY_TOLERANCE: f32 = 0.05;

/// Downsampling applied to VHACD's hull vertices
const HULL_DOWNSAMPLING: u32 = 4;

/// A convex polygon in body-local simulation units, counter-clockwise
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn area(&self) -> f32 {
        math::signed_area(&self.points).abs()
    }

    pub fn is_convex(&self) -> bool {
        math::is_convex(&self.points)
    }

    /// The polygon reflected across the local y axis (for facing left)
    pub fn mirrored(&self) -> Polygon {
        // Reflection flips winding; reverse to stay counter-clockwise
        let points = self
            .points
            .iter()
            .rev()
            .map(|p| Vec2::new(-p.x, p.y))
            .collect();
        Polygon { points }
    }
}

/// Collision polygons for every frame of one animation
///
/// Always holds exactly one (possibly empty) polygon set per frame.
#[derive(Debug, Clone, Default)]
pub struct HitboxGeometry {
    frames: Vec<Vec<Polygon>>,
}

impl HitboxGeometry {
    pub fn from_frames(frames: Vec<Vec<Polygon>>) -> Self {
        Self { frames }
    }

    /// Extract geometry for every cell of a sheet
    ///
    /// Cells without opaque pixels produce an empty frame and a warning;
    /// attacks on those frames simply never connect.
    pub fn from_sheet(sheet: &SpriteSheet, scale: f32, label: &str) -> Self {
        let frames = sheet
            .cells()
            .enumerate()
            .map(|(frame, cell)| {
                let polygons = extract_polygons(&cell, scale);
                if polygons.is_empty() {
                    let err = AssetError::EmptyGeometry {
                        sheet: label.to_string(),
                        frame,
                    };
                    log::warn!("{}", err);
                }
                polygons
            })
            .collect();

        Self { frames }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Polygons of one frame; empty for out-of-range frames
    pub fn frame(&self, index: usize) -> &[Polygon] {
        self.frames.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn frames(&self) -> &[Vec<Polygon>] {
        &self.frames
    }
}

/// Binary opacity mask of one cell
struct OpacityMask {
    width: i32,
    height: i32,
    /// Component label per pixel, `None` for transparent pixels
    labels: Vec<Option<usize>>,
}

impl OpacityMask {
    fn from_cell(cell: &RgbaImage) -> Self {
        let width = cell.width() as i32;
        let height = cell.height() as i32;
        let solid: Vec<bool> = cell.pixels().map(|p| p[3] > ALPHA_THRESHOLD).collect();

        let mut mask = Self {
            width,
            height,
            labels: vec![None; solid.len()],
        };
        mask.label_components(&solid);
        mask
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some((y * self.width + x) as usize)
        }
    }

    /// Flood-fill 4-connected components, numbered in row-major discovery order
    fn label_components(&mut self, solid: &[bool]) {
        let mut next_label = 0;
        let mut stack = Vec::new();

        for start in 0..solid.len() {
            if !solid[start] || self.labels[start].is_some() {
                continue;
            }

            self.labels[start] = Some(next_label);
            stack.push(start);
            while let Some(index) = stack.pop() {
                let x = (index as i32) % self.width;
                let y = (index as i32) / self.width;
                for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                    if let Some(n) = self.offset(nx, ny) {
                        if solid[n] && self.labels[n].is_none() {
                            self.labels[n] = Some(next_label);
                            stack.push(n);
                        }
                    }
                }
            }
            next_label += 1;
        }
    }

    fn component_count(&self) -> usize {
        self.labels
            .iter()
            .flatten()
            .max()
            .map_or(0, |&highest| highest + 1)
    }

    fn belongs(&self, x: i32, y: i32, component: usize) -> bool {
        self.offset(x, y)
            .and_then(|i| self.labels[i])
            .map_or(false, |label| label == component)
    }

    /// Whether the pixel-edge from vertex (x, y) in `dir` lies on the
    /// component boundary with the component on its right (y-down frame)
    fn has_edge(&self, x: i32, y: i32, dir: (i32, i32), component: usize) -> bool {
        let inside = |px, py| self.belongs(px, py, component);
        match dir {
            (1, 0) => inside(x, y) && !inside(x, y - 1),
            (0, 1) => inside(x - 1, y) && !inside(x, y),
            (-1, 0) => inside(x - 1, y - 1) && !inside(x - 1, y),
            (0, -1) => inside(x, y - 1) && !inside(x - 1, y - 1),
            _ => false,
        }
    }

    /// Trace the outer boundary of a component, in pixel-corner coordinates
    ///
    /// Starts on the top edge of the component's first pixel in row-major
    /// order, which is always on the outer boundary. At pinch points the walk
    /// prefers turning left so the outline stays a single loop around the
    /// whole component. Only corner vertices are emitted.
    fn trace_outline(&self, component: usize) -> Vec<Vec2> {
        let Some(first) = self.labels.iter().position(|&l| l == Some(component)) else {
            return Vec::new();
        };
        let start = ((first as i32) % self.width, (first as i32) / self.width);

        let mut outline = vec![Vec2::new(start.0 as f32, start.1 as f32)];
        let mut vertex = start;
        let mut dir = (1, 0);
        let max_steps = 4 * (self.width as usize + 1) * (self.height as usize + 1);

        for _ in 0..max_steps {
            vertex = (vertex.0 + dir.0, vertex.1 + dir.1);
            if vertex == start {
                return outline;
            }

            let left = (dir.1, -dir.0);
            let right = (-dir.1, dir.0);
            let Some(next) = [left, dir, right]
                .into_iter()
                .find(|&d| self.has_edge(vertex.0, vertex.1, d, component))
            else {
                break;
            };

            if next != dir {
                outline.push(Vec2::new(vertex.0 as f32, vertex.1 as f32));
                dir = next;
            }
        }

        log::warn!("Outline trace of component {} did not close", component);
        Vec::new()
    }
}

/// Convert one sprite cell into convex collision polygons
///
/// `scale` converts pixels into simulation units. A cell with no opaque
/// pixels yields an empty list.
pub fn extract_polygons(cell: &RgbaImage, scale: f32) -> Vec<Polygon> {
    let mask = OpacityMask::from_cell(cell);

    let outlines: Vec<Vec<Vec2>> = (0..mask.component_count())
        .map(|component| mask.trace_outline(component))
        .filter(|outline| outline.len() >= 3)
        .collect();
    if outlines.is_empty() {
        return Vec::new();
    }

    let origin = shape_centroid(&outlines);

    outlines
        .iter()
        .flat_map(|outline| decompose(outline))
        .filter_map(|piece| {
            // Pixel rows grow downward; flip to y-up and restore winding
            let points: Vec<Vec2> = piece
                .iter()
                .rev()
                .map(|p| Vec2::new(p.x - origin.x, origin.y - p.y) * scale)
                .collect();
            (points.len() >= 3).then(|| Polygon::new(points))
        })
        .collect()
}

/// Area-weighted centroid over every outline of the cell
fn shape_centroid(outlines: &[Vec<Vec2>]) -> Vec2 {
    let mut weighted = Vec2::ZERO;
    let mut total = 0.0;
    for outline in outlines {
        let area = math::signed_area(outline).abs();
        weighted += math::centroid(outline) * area;
        total += area;
    }

    if total > 0.0 {
        weighted / total
    } else {
        Vec2::ZERO
    }
}

/// Split one outline into convex pieces (pixel coordinates)
fn decompose(outline: &[Vec2]) -> Vec<Vec<Vec2>> {
    let points: Vec<Point<Real>> = outline.iter().map(|p| Point::new(p.x, p.y)).collect();
    let hull = to_vec2(&parry2d::transformation::convex_hull(&points));

    let outline_area = math::signed_area(outline).abs();
    let hull_area = math::signed_area(&hull).abs();
    if hull_area <= 0.0 {
        return Vec::new();
    }
    if outline_area >= (1.0 - CONVEXITY_TOLERANCE) * hull_area {
        return vec![hull];
    }

    let n = points.len() as u32;
    let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
    let decomposition = VHACD::decompose(&VHACDParameters::default(), &points, &indices, false);

    let pieces: Vec<Vec<Vec2>> = decomposition
        .compute_convex_hulls(HULL_DOWNSAMPLING)
        .iter()
        .map(|piece| to_vec2(piece))
        .filter(|piece| piece.len() >= 3 && math::signed_area(piece).abs() > 0.0)
        .collect();

    if pieces.is_empty() {
        log::debug!("Convex decomposition produced nothing, using the hull");
        vec![hull]
    } else {
        pieces
    }
}

fn to_vec2(points: &[Point<Real>]) -> Vec<Vec2> {
    points.iter().map(|p| Vec2::new(p.x, p.y)).collect()
}
