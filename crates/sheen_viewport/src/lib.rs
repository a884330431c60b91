//! wgpu rendering layer for the sheen demos.
//!
//! `GpuContext` owns the surface/device/queue plumbing shared by both demo
//! programs; `PbrScene` and `PolygonalScene` each own their pipelines and
//! per-frame state and implement the `Scene` trait the viewer drives.

use anyhow::Result;

use sheen_math::FlyCamera;
use wgpu::{Device, Instance, Queue, Surface, SurfaceConfiguration};

mod mesh;
pub mod pbr;
pub mod polygonal;
mod texture;

pub use mesh::{vertex_layout, GpuMesh, ShapeLibrary};
pub use pbr::PbrScene;
pub use polygonal::PolygonalScene;
pub use texture::{GpuCubemap, GpuTexture, ShadowMap};

/// Uniform buffers bound with dynamic offsets must be spaced to the
/// device's offset alignment; 256 satisfies every backend wgpu targets.
pub const OBJECT_UNIFORM_STRIDE: u64 = 256;

/// Core wgpu state shared by every scene
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub size: (u32, u32),
    /// Whether the adapter supports line polygon fill (wireframe toggle)
    pub supports_wireframe: bool,
}

impl GpuContext {
    /// Create the wgpu context for the given window
    pub async fn new(window: std::sync::Arc<winit::window::Window>) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        // The wireframe toggle needs line polygon mode; take it only when
        // the adapter offers it so the demos still run on minimal backends
        let optional_features = wgpu::Features::POLYGON_MODE_LINE;
        let required_features = adapter.features() & optional_features;
        let supports_wireframe = required_features.contains(wgpu::Features::POLYGON_MODE_LINE);

        // Request device and queue
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Sheen Device"),
                    required_features,
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo, // VSync
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        log::info!(
            "GPU context ready: {}x{}, format {:?}, wireframe {}",
            size.width,
            size.height,
            surface_format,
            supports_wireframe
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size: (size.width, size.height),
            supports_wireframe,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 > 0 && new_size.1 > 0 {
            self.size = new_size;
            self.config.width = new_size.0;
            self.config.height = new_size.1;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Current surface aspect ratio
    pub fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1.max(1) as f32
    }
}

/// A renderable demo scene driven by the viewer's frame loop.
pub trait Scene: Sized {
    /// Build pipelines, upload geometry and textures
    fn create(ctx: &GpuContext) -> Result<Self>;

    /// Recreate size-dependent resources after a surface resize
    fn resize(&mut self, ctx: &GpuContext);

    /// Render one frame. `time` is seconds since startup, used by the
    /// animated transforms.
    fn render(&mut self, ctx: &GpuContext, camera: &FlyCamera, time: f32) -> Result<()>;

    /// Toggle wireframe fill where the scene (and adapter) supports it
    fn toggle_wireframe(&mut self) {}
}

/// Create the scene depth buffer for the given surface size
pub(crate) fn create_depth_texture(
    device: &Device,
    size: (u32, u32),
) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth24Plus,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

    (depth_texture, depth_view)
}
