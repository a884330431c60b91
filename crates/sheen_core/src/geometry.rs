//! Procedural mesh generation for the demo scenes.
//!
//! Both demo programs draw the same small set of shapes: a parametric sphere
//! and torus built here, plus fixed vertex data for the crate cube, the floor
//! quad and the skybox cube. Vertices are interleaved (position, normal, uv -
//! 8 floats) so the viewport can upload them without repacking.

use std::f32::consts::PI;

const TAU32: f32 = 2.0 * PI;
const TAU64: f64 = 2.0 * std::f64::consts::PI;

/// Interleaved vertex: position, normal, texture coordinates.
///
/// Matches the vertex attribute layout registered by the viewport
/// (locations 0/1/2 at byte offsets 0/12/24).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Row traversal mode for triangle-strip index generation.
///
/// `Alternating` reverses direction every other row so consecutive strip
/// bands connect with consistent orientation and no restart marker.
/// `Uniform` always walks left-to-right; the resulting strip is still valid
/// but relies on the degenerate triangles at the row seams. The PBR demo
/// historically shipped with `Uniform`, the polygonal demo with
/// `Alternating`, so both stay available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripWinding {
    Alternating,
    Uniform,
}

/// Sphere tessellation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereParams {
    pub segments_x: u32,
    pub segments_y: u32,
    pub winding: StripWinding,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            segments_x: 64,
            segments_y: 64,
            winding: StripWinding::Alternating,
        }
    }
}

/// Torus tessellation parameters.
///
/// `inner_radius` is the tube radius, `center_radius` the distance from the
/// torus center to the tube center. Radii are f64 because the parametric
/// evaluation runs in double precision before narrowing to f32 vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusParams {
    pub inner_radius: f64,
    pub center_radius: f64,
    pub segments_ring: u32,
    pub segments_tube: u32,
}

/// Geometry ready for one-time GPU upload.
///
/// An empty index list means the mesh is drawn as a direct (non-indexed)
/// call over all vertices; the torus builder emits its strip order directly
/// into the vertex stream and needs no indices.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of elements a draw call consumes: indices when indexed,
    /// vertices otherwise.
    pub fn draw_count(&self) -> u32 {
        if self.is_indexed() {
            self.indices.len() as u32
        } else {
            self.vertices.len() as u32
        }
    }
}

/// Generate a unit sphere as a single triangle strip.
///
/// The grid has `(segments_x + 1) * (segments_y + 1)` vertices; positions
/// come from the standard spherical parametrization, so normals equal
/// positions and are unit length by construction.
///
/// # Panics
///
/// Panics if either segment count is zero - the parametrization divides by
/// the counts and zero would silently produce NaN geometry.
pub fn generate_sphere(params: &SphereParams) -> MeshData {
    let (seg_x, seg_y) = (params.segments_x, params.segments_y);
    assert!(
        seg_x >= 1 && seg_y >= 1,
        "sphere segment counts must be >= 1, got {}x{}",
        seg_x,
        seg_y
    );

    let mut vertices = Vec::with_capacity(((seg_x + 1) * (seg_y + 1)) as usize);
    for y in 0..=seg_y {
        for x in 0..=seg_x {
            let x_seg = x as f32 / seg_x as f32;
            let y_seg = y as f32 / seg_y as f32;
            let position = [
                (x_seg * TAU32).cos() * (y_seg * PI).sin(),
                (y_seg * PI).cos(),
                (x_seg * TAU32).sin() * (y_seg * PI).sin(),
            ];
            vertices.push(Vertex {
                position,
                normal: position,
                uv: [x_seg, y_seg],
            });
        }
    }

    MeshData {
        vertices,
        indices: strip_indices(seg_x, seg_y, params.winding),
    }
}

/// Generate a torus with the strip order baked into the vertex stream.
///
/// Each grid cell is emitted twice (`k` in 0..2) so the buffer can be drawn
/// as one non-indexed triangle strip. Positions are uniformly scaled by 2,
/// and normals are the scaled positions without renormalization - both are
/// long-standing behaviors of the original demos that the shaders were tuned
/// against, so they are preserved as-is.
///
/// # Panics
///
/// Panics if either segment count is zero.
pub fn generate_torus(params: &TorusParams) -> MeshData {
    let (ring, tube) = (params.segments_ring, params.segments_tube);
    assert!(
        ring >= 1 && tube >= 1,
        "torus segment counts must be >= 1, got {}x{}",
        ring,
        tube
    );
    let (r, c) = (params.inner_radius, params.center_radius);

    let mut vertices = Vec::with_capacity((2 * (ring + 1) * (tube + 1)) as usize);
    for i in 0..=ring {
        for j in 0..=tube {
            for k in 0..2u32 {
                let s = ((i + k) % ring) as f64 + 0.5;
                let t = (j % (tube + 1)) as f64;

                let ring_angle = s * TAU64 / ring as f64;
                let tube_angle = t * TAU64 / tube as f64;
                let x = (c + r * ring_angle.cos()) * tube_angle.cos();
                let y = (c + r * ring_angle.cos()) * tube_angle.sin();
                let z = r * ring_angle.sin();

                let position = [(2.0 * x) as f32, (2.0 * y) as f32, (2.0 * z) as f32];
                vertices.push(Vertex {
                    position,
                    normal: position,
                    uv: [
                        ((i + k) as f64 / ring as f64) as f32,
                        (t / tube as f64) as f32,
                    ],
                });
            }
        }
    }

    MeshData {
        vertices,
        indices: Vec::new(),
    }
}

/// Build the triangle-strip index order for a `(segments_x + 1)`-wide,
/// `(segments_y + 1)`-tall vertex grid.
///
/// Every latitude band contributes `2 * (segments_x + 1)` indices; in
/// `Alternating` mode odd bands walk right-to-left so the strip stays
/// consistently wound across band boundaries.
fn strip_indices(segments_x: u32, segments_y: u32, winding: StripWinding) -> Vec<u32> {
    let stride = segments_x + 1;
    let mut indices = Vec::with_capacity((2 * stride * segments_y) as usize);
    for y in 0..segments_y {
        let reversed = winding == StripWinding::Alternating && y % 2 == 1;
        if reversed {
            for x in (0..=segments_x).rev() {
                indices.push((y + 1) * stride + x);
                indices.push(y * stride + x);
            }
        } else {
            for x in 0..=segments_x {
                indices.push(y * stride + x);
                indices.push((y + 1) * stride + x);
            }
        }
    }
    indices
}

/// Unit cube centered at the origin, 36 vertices, triangle list.
pub fn cube() -> MeshData {
    MeshData {
        vertices: CUBE_VERTICES.iter().map(unpack_vertex).collect(),
        indices: Vec::new(),
    }
}

/// 50x50 floor quad at y = -0.5 with the texture tiled 25 times, 6 vertices.
pub fn floor_plane() -> MeshData {
    MeshData {
        vertices: FLOOR_VERTICES.iter().map(unpack_vertex).collect(),
        indices: Vec::new(),
    }
}

/// Position-only skybox cube (36 vertices). The skybox pipeline samples the
/// cubemap by direction, so no normals or UVs are carried.
pub fn skybox_positions() -> Vec<[f32; 3]> {
    SKYBOX_VERTICES.to_vec()
}

fn unpack_vertex(v: &[f32; 8]) -> Vertex {
    Vertex {
        position: [v[0], v[1], v[2]],
        normal: [v[3], v[4], v[5]],
        uv: [v[6], v[7]],
    }
}

#[rustfmt::skip]
const CUBE_VERTICES: [[f32; 8]; 36] = [
    // back face
    [-0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0],
    [ 0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 0.0],
    [ 0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0],
    [ 0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  1.0, 1.0],
    [-0.5,  0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 1.0],
    [-0.5, -0.5, -0.5,  0.0,  0.0, -1.0,  0.0, 0.0],
    // front face
    [-0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0],
    [ 0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 0.0],
    [ 0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0],
    [ 0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  1.0, 1.0],
    [-0.5,  0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 1.0],
    [-0.5, -0.5,  0.5,  0.0,  0.0,  1.0,  0.0, 0.0],
    // left face
    [-0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0],
    [-0.5,  0.5, -0.5, -1.0,  0.0,  0.0,  1.0, 1.0],
    [-0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0],
    [-0.5, -0.5, -0.5, -1.0,  0.0,  0.0,  0.0, 1.0],
    [-0.5, -0.5,  0.5, -1.0,  0.0,  0.0,  0.0, 0.0],
    [-0.5,  0.5,  0.5, -1.0,  0.0,  0.0,  1.0, 0.0],
    // right face
    [ 0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0],
    [ 0.5,  0.5, -0.5,  1.0,  0.0,  0.0,  1.0, 1.0],
    [ 0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0],
    [ 0.5, -0.5, -0.5,  1.0,  0.0,  0.0,  0.0, 1.0],
    [ 0.5, -0.5,  0.5,  1.0,  0.0,  0.0,  0.0, 0.0],
    [ 0.5,  0.5,  0.5,  1.0,  0.0,  0.0,  1.0, 0.0],
    // bottom face
    [-0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0],
    [ 0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  1.0, 1.0],
    [ 0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0],
    [ 0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  1.0, 0.0],
    [-0.5, -0.5,  0.5,  0.0, -1.0,  0.0,  0.0, 0.0],
    [-0.5, -0.5, -0.5,  0.0, -1.0,  0.0,  0.0, 1.0],
    // top face
    [-0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0],
    [ 0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  1.0, 1.0],
    [ 0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0],
    [ 0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  1.0, 0.0],
    [-0.5,  0.5,  0.5,  0.0,  1.0,  0.0,  0.0, 0.0],
    [-0.5,  0.5, -0.5,  0.0,  1.0,  0.0,  0.0, 1.0],
];

#[rustfmt::skip]
const FLOOR_VERTICES: [[f32; 8]; 6] = [
    [ 25.0, -0.5,  25.0,  0.0, 1.0, 0.0,  25.0,  0.0],
    [-25.0, -0.5,  25.0,  0.0, 1.0, 0.0,   0.0,  0.0],
    [-25.0, -0.5, -25.0,  0.0, 1.0, 0.0,   0.0, 25.0],
    [ 25.0, -0.5,  25.0,  0.0, 1.0, 0.0,  25.0,  0.0],
    [-25.0, -0.5, -25.0,  0.0, 1.0, 0.0,   0.0, 25.0],
    [ 25.0, -0.5, -25.0,  0.0, 1.0, 0.0,  25.0, 25.0],
];

#[rustfmt::skip]
const SKYBOX_VERTICES: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_params(x: u32, y: u32, winding: StripWinding) -> SphereParams {
        SphereParams {
            segments_x: x,
            segments_y: y,
            winding,
        }
    }

    #[test]
    fn test_sphere_vertex_count() {
        for (x, y) in [(1, 1), (4, 4), (8, 3), (64, 32)] {
            let mesh = generate_sphere(&sphere_params(x, y, StripWinding::Alternating));
            assert_eq!(mesh.vertex_count() as u32, (x + 1) * (y + 1));
            assert_eq!(mesh.indices.len() as u32, 2 * (x + 1) * y);
        }
    }

    #[test]
    fn test_sphere_normals_unit_length() {
        let mesh = generate_sphere(&sphere_params(16, 16, StripWinding::Alternating));
        for v in &mesh.vertices {
            let [nx, ny, nz] = v.normal;
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            assert!((len - 1.0).abs() < 1e-6, "normal length {}", len);
            assert_eq!(v.normal, v.position);
        }
    }

    #[test]
    fn test_sphere_uvs_in_unit_square() {
        let mesh = generate_sphere(&sphere_params(7, 5, StripWinding::Uniform));
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_sphere_pole_vertex() {
        let mesh = generate_sphere(&sphere_params(4, 4, StripWinding::Alternating));
        assert_eq!(mesh.vertex_count(), 25);

        // First grid point is the north pole: y_seg = 0 puts sin terms at 0
        let pole = &mesh.vertices[0];
        assert_eq!(pole.position, [0.0, 1.0, 0.0]);
        assert_eq!(pole.normal, [0.0, 1.0, 0.0]);
        assert_eq!(pole.uv, [0.0, 0.0]);
    }

    #[test]
    fn test_sphere_winding_alternates_per_band() {
        let mesh = generate_sphere(&sphere_params(4, 4, StripWinding::Alternating));

        // Band 0 (10 index pairs per band): ascending from vertex 0
        assert_eq!(&mesh.indices[0..4], &[0, 5, 1, 6]);
        // Band 1 starts at the right edge and walks back
        let band1 = &mesh.indices[10..20];
        assert_eq!(&band1[0..4], &[14, 9, 13, 8]);
        // Index at the band boundary decreases rather than increases
        assert!(band1[2] < band1[0]);
        // Band 2 ascends again
        assert_eq!(&mesh.indices[20..24], &[10, 15, 11, 16]);
    }

    #[test]
    fn test_sphere_winding_uniform_never_reverses() {
        let mesh = generate_sphere(&sphere_params(4, 4, StripWinding::Uniform));

        for band in mesh.indices.chunks(10) {
            // Every band walks left-to-right: the upper-row indices ascend
            for pair in band.chunks(2) {
                assert_eq!(pair[1], pair[0] + 5);
            }
            assert!(band[2] > band[0]);
        }
        // Same index count as the alternating strip
        assert_eq!(mesh.indices.len(), 2 * 5 * 4);
    }

    #[test]
    fn test_sphere_idempotent() {
        let params = sphere_params(9, 6, StripWinding::Alternating);
        let a = generate_sphere(&params);
        let b = generate_sphere(&params);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "segment counts must be >= 1")]
    fn test_sphere_rejects_zero_segments() {
        generate_sphere(&sphere_params(0, 4, StripWinding::Alternating));
    }

    #[test]
    fn test_torus_vertex_count() {
        let params = TorusParams {
            inner_radius: 0.1,
            center_radius: 0.25,
            segments_ring: 4,
            segments_tube: 4,
        };
        let mesh = generate_torus(&params);
        assert_eq!(mesh.vertex_count(), 50);
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.draw_count(), 50);
    }

    #[test]
    fn test_torus_first_vertex() {
        let params = TorusParams {
            inner_radius: 0.1,
            center_radius: 0.25,
            segments_ring: 4,
            segments_tube: 4,
        };
        let mesh = generate_torus(&params);

        // i = 0, j = 0, k = 0 gives s = 0.5, t = 0; the ring angle is
        // tau/8 and the tube angle 0, all scaled by 2
        let angle = std::f64::consts::PI / 4.0;
        let expected_x = (2.0 * (0.25 + 0.1 * angle.cos())) as f32;
        let expected_z = (2.0 * 0.1 * angle.sin()) as f32;

        let v0 = &mesh.vertices[0];
        assert!((v0.position[0] - expected_x).abs() < 1e-6);
        assert!(v0.position[1].abs() < 1e-6);
        assert!((v0.position[2] - expected_z).abs() < 1e-6);
        assert_eq!(v0.uv, [0.0, 0.0]);
    }

    #[test]
    fn test_torus_normals_not_renormalized() {
        let params = TorusParams {
            inner_radius: 0.2,
            center_radius: 0.45,
            segments_ring: 8,
            segments_tube: 6,
        };
        let mesh = generate_torus(&params);

        let mut saw_non_unit = false;
        for v in &mesh.vertices {
            assert_eq!(v.normal, v.position);
            let [nx, ny, nz] = v.normal;
            if ((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() > 0.01 {
                saw_non_unit = true;
            }
        }
        assert!(saw_non_unit, "torus normals are expected to be unnormalized");
    }

    #[test]
    fn test_torus_idempotent() {
        let params = TorusParams {
            inner_radius: 0.2,
            center_radius: 0.45,
            segments_ring: 16,
            segments_tube: 12,
        };
        assert_eq!(generate_torus(&params), generate_torus(&params));
    }

    #[test]
    #[should_panic(expected = "segment counts must be >= 1")]
    fn test_torus_rejects_zero_segments() {
        generate_torus(&TorusParams {
            inner_radius: 0.1,
            center_radius: 0.25,
            segments_ring: 4,
            segments_tube: 0,
        });
    }

    #[test]
    fn test_fixed_shapes() {
        let cube = cube();
        assert_eq!(cube.vertex_count(), 36);
        assert!(!cube.is_indexed());

        let floor = floor_plane();
        assert_eq!(floor.vertex_count(), 6);
        // Floor lies flat at y = -0.5 with upward normals
        for v in &floor.vertices {
            assert_eq!(v.position[1], -0.5);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }

        assert_eq!(skybox_positions().len(), 36);
    }
}
