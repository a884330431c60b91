//! GPU mesh upload and the build-once shape library.

use sheen_core::{geometry, MeshCache, MeshData, SphereParams, TorusParams};
use wgpu::util::DeviceExt;
use wgpu::Device;

const VERTEX_ATTRIBS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

/// Vertex buffer layout for `sheen_core::Vertex`: position/normal/uv at
/// locations 0/1/2, byte offsets 0/12/24, 32-byte stride.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<sheen_core::Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBS,
    }
}

/// Mesh data uploaded to the GPU once; buffers live as long as the scene.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
}

impl GpuMesh {
    /// One-time upload of mesh data. Indexed meshes get an index buffer;
    /// non-indexed meshes are drawn directly over their vertex stream.
    pub fn upload(device: &Device, mesh: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = mesh.is_indexed().then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::debug!(
            "uploaded {label}: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            draw_count: mesh.draw_count(),
        }
    }

    /// Issue the draw call for this mesh on the given pass
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        match &self.index_buffer {
            Some(indices) => {
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.draw_count, 0, 0..1);
            }
            None => pass.draw(0..self.draw_count, 0..1),
        }
    }
}

/// Renderer-owned shape store: a `MeshCache` plus the matching GPU buffers.
///
/// Shapes are built and uploaded on first request and reused for every
/// frame after that; the library's lifetime is tied to the scene that owns
/// it, not to the process.
#[derive(Default)]
pub struct ShapeLibrary {
    cache: MeshCache,
    sphere: Option<GpuMesh>,
    torus: Option<GpuMesh>,
    cube: Option<GpuMesh>,
    floor: Option<GpuMesh>,
}

impl ShapeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sphere mesh; parameters are honored on the first call only
    /// (build-once, like the rest of the cache).
    pub fn sphere(&mut self, device: &Device, params: &SphereParams) -> &GpuMesh {
        if self.sphere.is_none() {
            let mesh = self.cache.sphere(params);
            self.sphere = Some(GpuMesh::upload(device, mesh, "Sphere"));
        }
        self.sphere.as_ref().unwrap()
    }

    /// Torus mesh; parameters are honored on the first call only.
    pub fn torus(&mut self, device: &Device, params: &TorusParams) -> &GpuMesh {
        if self.torus.is_none() {
            let mesh = self.cache.torus(params);
            self.torus = Some(GpuMesh::upload(device, mesh, "Torus"));
        }
        self.torus.as_ref().unwrap()
    }

    pub fn cube(&mut self, device: &Device) -> &GpuMesh {
        if self.cube.is_none() {
            self.cube = Some(GpuMesh::upload(device, &geometry::cube(), "Cube"));
        }
        self.cube.as_ref().unwrap()
    }

    pub fn floor(&mut self, device: &Device) -> &GpuMesh {
        if self.floor.is_none() {
            self.floor = Some(GpuMesh::upload(device, &geometry::floor_plane(), "Floor"));
        }
        self.floor.as_ref().unwrap()
    }

    // Immutable accessors for draw time, once the lazy getters above have
    // run for the frame. Render passes hold borrows of several meshes at
    // once, which rules out going through `&mut self` while encoding.

    pub fn sphere_built(&self) -> &GpuMesh {
        self.sphere.as_ref().expect("sphere not built")
    }

    pub fn torus_built(&self) -> &GpuMesh {
        self.torus.as_ref().expect("torus not built")
    }

    pub fn cube_built(&self) -> &GpuMesh {
        self.cube.as_ref().expect("cube not built")
    }

    pub fn floor_built(&self) -> &GpuMesh {
        self.floor.as_ref().expect("floor not built")
    }
}
