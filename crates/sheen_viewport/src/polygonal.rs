//! Phong-lit demo scene: a wood floor, four spinning crates, torus lamp
//! markers and a cubemap skybox, with a directional shadow pre-pass and an
//! optional wireframe toggle.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use sheen_core::{texture::load_cubemap, Image, TorusParams};
use sheen_math::{FlyCamera, Mat4, Vec3};

use crate::mesh::{vertex_layout, ShapeLibrary};
use crate::texture::{GpuCubemap, GpuTexture, ShadowMap};
use crate::{create_depth_texture, GpuContext, Scene, OBJECT_UNIFORM_STRIDE};

const POINT_LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

const CUBE_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
];

/// Light position driving the directional shadow pass.
const SHADOW_LIGHT_POS: Vec3 = Vec3::new(-2.0, 4.0, -1.0);

/// Slot layout in the object uniform buffer: floor, four cubes, four lamps.
const FLOOR_SLOT: u64 = 0;
const CUBE_SLOT: u64 = 1;
const LAMP_SLOT: u64 = 5;
const OBJECT_COUNT: u64 = 9;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    light_space: [[f32; 4]; 4],
    cam_pos: [f32; 4],
    time: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct PointLightUniform {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct LightsUniform {
    lights: [PointLightUniform; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    flags: [u32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SkyUniform {
    proj: [[f32; 4]; 4],
    view_rot: [[f32; 4]; 4],
}

/// Diffuse/specular/emission map set bound as one group.
struct PhongMaterial {
    bind_group: wgpu::BindGroup,
}

impl PhongMaterial {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        diffuse: &Image,
        specular: &Image,
        emission: &Image,
        label: &str,
    ) -> Self {
        let diffuse = GpuTexture::upload(device, queue, diffuse, true, &format!("{label} diffuse"));
        let specular =
            GpuTexture::upload(device, queue, specular, true, &format!("{label} specular"));
        let emission =
            GpuTexture::upload(device, queue, emission, true, &format!("{label} emission"));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Material Bind Group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&specular.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&emission.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                },
            ],
        });

        Self { bind_group }
    }
}

/// The Phong/shadow-map demo scene.
pub struct PolygonalScene {
    shadow_pipeline: wgpu::RenderPipeline,
    phong_pipeline: wgpu::RenderPipeline,
    phong_wire_pipeline: Option<wgpu::RenderPipeline>,
    lamp_pipeline: wgpu::RenderPipeline,
    lamp_wire_pipeline: Option<wgpu::RenderPipeline>,
    skybox_pipeline: wgpu::RenderPipeline,
    wireframe: bool,

    shapes: ShapeLibrary,
    skybox_vertex_buffer: wgpu::Buffer,
    skybox_vertex_count: u32,

    scene_buffer: wgpu::Buffer,
    object_buffer: wgpu::Buffer,
    sky_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    object_bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    sky_bind_group: wgpu::BindGroup,

    wood: PhongMaterial,
    container: PhongMaterial,

    shadow_map: ShadowMap,
    depth_view: wgpu::TextureView,
}

impl PolygonalScene {
    /// View-projection from the shadow light, looking at the origin.
    fn light_space_matrix() -> Mat4 {
        let proj = Mat4::orthographic_rh(-10.0, 10.0, -10.0, 10.0, 1.0, 7.5);
        let view = Mat4::look_at_rh(SHADOW_LIGHT_POS, Vec3::ZERO, Vec3::Y);
        proj * view
    }

    /// Model matrices and emission flags for every slot at the given time.
    fn object_uniforms(time: f32) -> [ObjectUniform; OBJECT_COUNT as usize] {
        let mut objects = [ObjectUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            flags: [0; 4],
        }; OBJECT_COUNT as usize];

        for (i, pos) in CUBE_POSITIONS.iter().enumerate() {
            // Odd cubes spin with time, even cubes hold a fixed pose
            let angle = i as f32 * if i & 1 == 1 { time } else { 15.0 };
            let model = Mat4::from_translation(*pos)
                * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), angle);
            objects[CUBE_SLOT as usize + i] = ObjectUniform {
                model: model.to_cols_array_2d(),
                flags: [(i & 2 != 0) as u32, 0, 0, 0],
            };
        }

        for (i, pos) in POINT_LIGHT_POSITIONS.iter().enumerate() {
            let model = Mat4::from_translation(*pos)
                * Mat4::from_rotation_x(time)
                * Mat4::from_scale(Vec3::splat(0.2));
            objects[LAMP_SLOT as usize + i] = ObjectUniform {
                model: model.to_cols_array_2d(),
                flags: [0; 4],
            };
        }

        objects
    }

    fn uniform_entry(
        binding: u32,
        visibility: wgpu::ShaderStages,
        dynamic: bool,
        min_size: Option<u64>,
    ) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: min_size.and_then(wgpu::BufferSize::new),
            },
            count: None,
        }
    }

    /// Lit pipeline builder, shared by the phong and lamp passes and their
    /// wireframe variants.
    #[allow(clippy::too_many_arguments)]
    fn lit_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        polygon_mode: wgpu::PolygonMode,
        label: &str,
    ) -> wgpu::RenderPipeline {
        let strip_index_format = match topology {
            wgpu::PrimitiveTopology::TriangleStrip => Some(wgpu::IndexFormat::Uint32),
            _ => None,
        };
        let buffers = [vertex_layout()];
        let targets = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &targets,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

impl Scene for PolygonalScene {
    fn create(ctx: &GpuContext) -> Result<Self> {
        let device = &ctx.device;
        let queue = &ctx.queue;

        let phong_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Phong Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/phong.wgsl").into()),
        });
        let lamp_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lamp Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lamp.wgsl").into()),
        });
        let skybox_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Depth Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shadow_depth.wgsl").into()),
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Phong Scene Bind Group Layout"),
            entries: &[
                Self::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, false, None),
                Self::uniform_entry(1, wgpu::ShaderStages::FRAGMENT, false, None),
            ],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Phong Object Bind Group Layout"),
            entries: &[Self::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                true,
                Some(std::mem::size_of::<ObjectUniform>() as u64),
            )],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Phong Material Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let sky_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Bind Group Layout"),
            entries: &[
                Self::uniform_entry(0, wgpu::ShaderStages::VERTEX, false, None),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pipelines

        let phong_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &object_layout, &material_layout, &shadow_layout],
            push_constant_ranges: &[],
        });
        let lamp_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lamp Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let sky_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[&sky_layout],
            push_constant_ranges: &[],
        });
        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Shadow Pipeline Layout"),
                bind_group_layouts: &[&scene_layout, &object_layout],
                push_constant_ranges: &[],
            });

        let phong_pipeline = Self::lit_pipeline(
            device,
            &phong_layout,
            &phong_shader,
            ctx.config.format,
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::PolygonMode::Fill,
            "Phong Pipeline",
        );
        let phong_wire_pipeline = ctx.supports_wireframe.then(|| {
            Self::lit_pipeline(
                device,
                &phong_layout,
                &phong_shader,
                ctx.config.format,
                wgpu::PrimitiveTopology::TriangleList,
                wgpu::PolygonMode::Line,
                "Phong Wireframe Pipeline",
            )
        });

        // Lamps are drawn as a non-indexed triangle strip over the torus
        // vertex stream
        let lamp_pipeline = Self::lit_pipeline(
            device,
            &lamp_layout,
            &lamp_shader,
            ctx.config.format,
            wgpu::PrimitiveTopology::TriangleStrip,
            wgpu::PolygonMode::Fill,
            "Lamp Pipeline",
        );
        let lamp_wire_pipeline = ctx.supports_wireframe.then(|| {
            Self::lit_pipeline(
                device,
                &lamp_layout,
                &lamp_shader,
                ctx.config.format,
                wgpu::PrimitiveTopology::TriangleStrip,
                wgpu::PolygonMode::Line,
                "Lamp Wireframe Pipeline",
            )
        });

        // Skybox vertices are bare positions, not the full mesh layout
        let sky_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
        };
        let skybox_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&sky_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &skybox_shader,
                entry_point: "vs_main",
                buffers: &[sky_vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &skybox_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            // z is forced to w in the vertex shader, so the skybox only
            // fills pixels the scene left at the far plane
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth24Plus,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let mesh_buffers = [vertex_layout()];
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: "vs_main",
                buffers: &mesh_buffers,
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Uniform buffers

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Phong Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let lights = LightsUniform {
            lights: POINT_LIGHT_POSITIONS.map(|p| PointLightUniform {
                position: p.extend(1.0).to_array(),
                ambient: [0.07, 0.07, 0.07, 1.0],
                diffuse: [0.8, 0.8, 0.8, 1.0],
                specular: [1.0, 1.0, 1.0, 1.0],
                attenuation: [1.0, 0.09, 0.032, 0.0],
            }),
        };
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Phong Lights Uniform Buffer"),
            contents: bytemuck::bytes_of(&lights),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Phong Object Uniform Buffer"),
            size: OBJECT_COUNT * OBJECT_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sky_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Skybox Uniform Buffer"),
            size: std::mem::size_of::<SkyUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Materials and skybox faces

        let wood = PhongMaterial::new(
            device,
            queue,
            &material_layout,
            &Image::load_or_placeholder("assets/textures/wood.png", [128, 128, 128, 255]),
            &Image::load_or_placeholder("assets/textures/wood_specular.png", [64, 64, 64, 255]),
            // The floor has no emission map; a black placeholder keeps the
            // bind group layout uniform across materials
            &Image::solid_color([0, 0, 0, 255]),
            "wood",
        );
        let container = PhongMaterial::new(
            device,
            queue,
            &material_layout,
            &Image::load_or_placeholder("assets/textures/container2.png", [128, 128, 128, 255]),
            &Image::load_or_placeholder(
                "assets/textures/container2_specular.png",
                [64, 64, 64, 255],
            ),
            &Image::load_or_placeholder("assets/textures/container2_neon.jpg", [0, 0, 0, 255]),
            "container",
        );

        let sky_faces = [
            "assets/textures/skybox/right.tga",
            "assets/textures/skybox/left.tga",
            "assets/textures/skybox/top.tga",
            "assets/textures/skybox/bottom.tga",
            "assets/textures/skybox/front.tga",
            "assets/textures/skybox/back.tga",
        ];
        let cubemap = match load_cubemap(&sky_faces) {
            Ok(faces) => GpuCubemap::upload(device, queue, &faces, "Skybox"),
            Err(err) => {
                log::error!("{err}; using placeholder skybox");
                GpuCubemap::placeholder(device, queue, [51, 153, 204, 255])
            }
        };

        let shadow_map = ShadowMap::new(device);

        // Bind groups

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Phong Scene Bind Group"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Phong Object Bind Group"),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &object_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Bind Group"),
            layout: &shadow_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let sky_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
            layout: &sky_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: sky_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        });

        // Geometry

        let mut shapes = ShapeLibrary::new();
        shapes.cube(device);
        shapes.floor(device);
        shapes.torus(
            device,
            &TorusParams {
                inner_radius: 0.2,
                center_radius: 0.45,
                segments_ring: 64,
                segments_tube: 32,
            },
        );

        let sky_positions = sheen_core::geometry::skybox_positions();
        let skybox_vertex_count = sky_positions.len() as u32;
        let skybox_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Vertex Buffer"),
            contents: bytemuck::cast_slice(&sky_positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let (_, depth_view) = create_depth_texture(device, ctx.size);

        Ok(Self {
            shadow_pipeline,
            phong_pipeline,
            phong_wire_pipeline,
            lamp_pipeline,
            lamp_wire_pipeline,
            skybox_pipeline,
            wireframe: false,
            shapes,
            skybox_vertex_buffer,
            skybox_vertex_count,
            scene_buffer,
            object_buffer,
            sky_buffer,
            scene_bind_group,
            object_bind_group,
            shadow_bind_group,
            sky_bind_group,
            wood,
            container,
            shadow_map,
            depth_view,
        })
    }

    fn resize(&mut self, ctx: &GpuContext) {
        let (_, depth_view) = create_depth_texture(&ctx.device, ctx.size);
        self.depth_view = depth_view;
    }

    fn render(&mut self, ctx: &GpuContext, camera: &FlyCamera, time: f32) -> Result<()> {
        let frame = ctx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let projection = camera.projection_matrix(ctx.aspect());
        let view_matrix = camera.view_matrix();
        let scene = SceneUniform {
            view_proj: (projection * view_matrix).to_cols_array_2d(),
            light_space: Self::light_space_matrix().to_cols_array_2d(),
            cam_pos: camera.position.extend(1.0).to_array(),
            time: [time, 0.0, 0.0, 0.0],
        };
        ctx.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        // Strip translation so the skybox follows the camera
        let view_rot = Mat4::from_mat3(sheen_math::Mat3::from_mat4(view_matrix));
        let sky = SkyUniform {
            proj: projection.to_cols_array_2d(),
            view_rot: view_rot.to_cols_array_2d(),
        };
        ctx.queue
            .write_buffer(&self.sky_buffer, 0, bytemuck::bytes_of(&sky));

        let mut object_data = vec![0u8; (OBJECT_COUNT * OBJECT_UNIFORM_STRIDE) as usize];
        for (i, object) in Self::object_uniforms(time).iter().enumerate() {
            let offset = i * OBJECT_UNIFORM_STRIDE as usize;
            object_data[offset..offset + std::mem::size_of::<ObjectUniform>()]
                .copy_from_slice(bytemuck::bytes_of(object));
        }
        ctx.queue.write_buffer(&self.object_buffer, 0, &object_data);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Polygonal Encoder"),
            });

        let offset = |slot: u64| (slot * OBJECT_UNIFORM_STRIDE) as u32;
        let floor = self.shapes.floor_built();
        let cube = self.shapes.cube_built();
        let torus = self.shapes.torus_built();

        // Shadow pass: floor and cubes rendered from the shadow light
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);

            pass.set_bind_group(1, &self.object_bind_group, &[offset(FLOOR_SLOT)]);
            floor.draw(&mut pass);
            for i in 0..4 {
                pass.set_bind_group(1, &self.object_bind_group, &[offset(CUBE_SLOT + i)]);
                cube.draw(&mut pass);
            }
        }

        // Main pass
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Polygonal Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.2,
                            g: 0.6,
                            b: 0.8,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let phong = match (&self.phong_wire_pipeline, self.wireframe) {
                (Some(wire), true) => wire,
                _ => &self.phong_pipeline,
            };
            let lamp = match (&self.lamp_wire_pipeline, self.wireframe) {
                (Some(wire), true) => wire,
                _ => &self.lamp_pipeline,
            };

            pass.set_pipeline(phong);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            pass.set_bind_group(2, &self.wood.bind_group, &[]);
            pass.set_bind_group(1, &self.object_bind_group, &[offset(FLOOR_SLOT)]);
            floor.draw(&mut pass);

            pass.set_bind_group(2, &self.container.bind_group, &[]);
            for i in 0..4 {
                pass.set_bind_group(1, &self.object_bind_group, &[offset(CUBE_SLOT + i)]);
                cube.draw(&mut pass);
            }

            pass.set_pipeline(lamp);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for i in 0..4 {
                pass.set_bind_group(1, &self.object_bind_group, &[offset(LAMP_SLOT + i)]);
                torus.draw(&mut pass);
            }

            // Skybox last, behind everything already drawn
            pass.set_pipeline(&self.skybox_pipeline);
            pass.set_bind_group(0, &self.sky_bind_group, &[]);
            pass.set_vertex_buffer(0, self.skybox_vertex_buffer.slice(..));
            pass.draw(0..self.skybox_vertex_count, 0..1);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }

    fn toggle_wireframe(&mut self) {
        if self.phong_wire_pipeline.is_some() {
            self.wireframe = !self.wireframe;
            log::info!("wireframe: {}", self.wireframe);
        } else {
            log::warn!("wireframe toggle unavailable: adapter lacks line polygon mode");
        }
    }
}
