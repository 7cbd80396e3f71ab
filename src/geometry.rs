use std::collections::HashSet;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

use crate::math::AABB;

/// Segment counts used whenever a cylinder is (re)built from the size controls
pub const CYLINDER_RADIAL_SEGMENTS: u32 = 16;
pub const CYLINDER_HEIGHT_SEGMENTS: u32 = 1;

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one geometry instance; the renderer keys GPU buffers on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl GeometryId {
    fn next() -> Self {
        Self(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Interleaved vertex layout shared with the mesh shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderShape {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Parameters a geometry was generated from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cylinder(CylinderShape),
    Box(BoxShape),
}

/// Triangle mesh data for one primitive. Each value has its own id, which
/// keys its GPU buffers.
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    shape: Shape,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    edges: Vec<u32>,
    bounds: AABB,
}

impl Geometry {
    fn from_parts(shape: Shape, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let bounds = AABB::from_points(vertices.iter().map(|v| Vec3::from_array(v.position)));
        let edges = edge_indices(&indices);
        Self {
            id: GeometryId::next(),
            shape,
            vertices,
            indices,
            edges,
            bounds,
        }
    }

    /// Cylinder centered on the origin with its axis along Y
    pub fn cylinder(shape: CylinderShape) -> Self {
        let radial = shape.radial_segments.max(3);
        let rows = shape.height_segments.max(1);
        let half_height = shape.height * 0.5;
        let slope = if shape.height > 0.0 {
            (shape.radius_bottom - shape.radius_top) / shape.height
        } else {
            0.0
        };

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Torso: a (radial + 1) x (rows + 1) grid so the seam gets its own uvs
        for y in 0..=rows {
            let v = y as f32 / rows as f32;
            let radius = v * (shape.radius_bottom - shape.radius_top) + shape.radius_top;

            for x in 0..=radial {
                let u = x as f32 / radial as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize();
                vertices.push(Vertex::new(
                    [radius * sin, -v * shape.height + half_height, radius * cos],
                    normal.to_array(),
                    [u, 1.0 - v],
                ));
            }
        }

        let row_len = radial + 1;
        for x in 0..radial {
            for y in 0..rows {
                let a = y * row_len + x;
                let b = (y + 1) * row_len + x;
                let c = (y + 1) * row_len + x + 1;
                let d = y * row_len + x + 1;

                if shape.radius_top > 0.0 || y != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if shape.radius_bottom > 0.0 || y != rows - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        if !shape.open_ended {
            if shape.radius_top > 0.0 {
                push_cap(&mut vertices, &mut indices, radial, shape.radius_top, half_height, 1.0);
            }
            if shape.radius_bottom > 0.0 {
                push_cap(&mut vertices, &mut indices, radial, shape.radius_bottom, half_height, -1.0);
            }
        }

        Self::from_parts(Shape::Cylinder(shape), vertices, indices)
    }

    /// Axis-aligned box centered on the origin, one segment per face
    pub fn cuboid(shape: BoxShape) -> Self {
        let (w, h, d) = (shape.width, shape.height, shape.depth);
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // (u axis, v axis, w axis, u dir, v dir, plane width, plane height, plane depth)
        let faces = [
            (2, 1, 0, -1.0, -1.0, d, h, w),
            (2, 1, 0, 1.0, -1.0, d, h, -w),
            (0, 2, 1, 1.0, 1.0, w, d, h),
            (0, 2, 1, 1.0, -1.0, w, d, -h),
            (0, 1, 2, 1.0, -1.0, w, h, d),
            (0, 1, 2, -1.0, -1.0, w, h, -d),
        ];

        for (u, v, axis_w, udir, vdir, width, height, depth) in faces {
            let base = vertices.len() as u32;
            for iy in 0..=1u32 {
                let y = iy as f32 * height - height * 0.5;
                for ix in 0..=1u32 {
                    let x = ix as f32 * width - width * 0.5;

                    let mut position = [0.0; 3];
                    position[u] = x * udir;
                    position[v] = y * vdir;
                    position[axis_w] = depth * 0.5;

                    let mut normal = [0.0; 3];
                    normal[axis_w] = if depth > 0.0 { 1.0 } else { -1.0 };

                    vertices.push(Vertex::new(position, normal, [ix as f32, 1.0 - iy as f32]));
                }
            }

            let (a, b, c, dd) = (base, base + 2, base + 3, base + 1);
            indices.extend_from_slice(&[a, b, dd, b, c, dd]);
        }

        Self::from_parts(Shape::Box(shape), vertices, indices)
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle list indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Line list indices with each triangle edge listed once
    pub fn edges(&self) -> &[u32] {
        &self.edges
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn push_cap(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    radial: u32,
    radius: f32,
    half_height: f32,
    sign: f32,
) {
    let center_start = vertices.len() as u32;
    for x in 0..radial {
        vertices.push(Vertex::new(
            [0.0, half_height * sign, 0.0],
            [0.0, sign, 0.0],
            [0.5, 0.5],
        ));
    }

    let rim_start = vertices.len() as u32;
    for x in 0..=radial {
        let (sin, cos) = (x as f32 / radial as f32 * TAU).sin_cos();
        vertices.push(Vertex::new(
            [radius * sin, half_height * sign, radius * cos],
            [0.0, sign, 0.0],
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        ));
    }

    for x in 0..radial {
        let c = center_start + x;
        let i = rim_start + x;
        if sign > 0.0 {
            indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

fn edge_indices(triangles: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for tri in triangles.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if seen.insert((a.min(b), a.max(b))) {
                edges.extend_from_slice(&[a, b]);
            }
        }
    }

    edges
}
