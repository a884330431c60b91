//! Cook-Torrance PBR demo scene: textured spheres and tori lit by four
//! point lights.

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use sheen_core::{Image, SphereParams, StripWinding, TorusParams};
use sheen_math::{FlyCamera, Mat4, Vec3};

use crate::mesh::{vertex_layout, ShapeLibrary};
use crate::texture::GpuTexture;
use crate::{create_depth_texture, GpuContext, Scene, OBJECT_UNIFORM_STRIDE};

const LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(-10.0, 10.0, 10.0),
    Vec3::new(10.0, 10.0, 10.0),
    Vec3::new(-10.0, -10.0, 10.0),
    Vec3::new(10.0, -10.0, 10.0),
];

const LIGHT_COLOR: Vec3 = Vec3::new(300.0, 300.0, 300.0);

/// Three spheres, three tori, four light markers.
const OBJECT_COUNT: u64 = 10;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    cam_pos: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct LightsUniform {
    positions: [[f32; 4]; 4],
    colors: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
}

/// The five material maps of one PBR material, bound as a single group.
struct PbrMaterial {
    bind_group: wgpu::BindGroup,
}

impl PbrMaterial {
    /// Load the conventional map set from `assets/textures/pbr/<dir>/`.
    /// Missing maps degrade to neutral placeholders.
    fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        dir: &str,
        metallic_ext: &str,
    ) -> Self {
        let base = format!("assets/textures/pbr/{dir}");
        let albedo = Image::load_or_placeholder(format!("{base}/albedo.jpg"), [128, 128, 128, 255]);
        let normal = Image::load_or_placeholder(format!("{base}/normal.jpg"), [128, 128, 255, 255]);
        let metallic =
            Image::load_or_placeholder(format!("{base}/metallic.{metallic_ext}"), [0, 0, 0, 255]);
        let roughness =
            Image::load_or_placeholder(format!("{base}/roughness.jpg"), [128, 128, 128, 255]);
        let ao = Image::load_or_placeholder(format!("{base}/ao.jpg"), [255, 255, 255, 255]);

        // Albedo is a color map; the rest hold data and stay linear
        let albedo = GpuTexture::upload(device, queue, &albedo, true, &format!("{dir} albedo"));
        let normal = GpuTexture::upload(device, queue, &normal, false, &format!("{dir} normal"));
        let metallic =
            GpuTexture::upload(device, queue, &metallic, false, &format!("{dir} metallic"));
        let roughness =
            GpuTexture::upload(device, queue, &roughness, false, &format!("{dir} roughness"));
        let ao = GpuTexture::upload(device, queue, &ao, false, &format!("{dir} ao"));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{dir} Material Bind Group")),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&albedo.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&metallic.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&roughness.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&ao.view),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: wgpu::BindingResource::Sampler(&albedo.sampler),
                },
            ],
        });

        Self { bind_group }
    }
}

/// The PBR demo scene.
pub struct PbrScene {
    pipeline: wgpu::RenderPipeline,
    shapes: ShapeLibrary,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    object_bind_group: wgpu::BindGroup,
    ground: PbrMaterial,
    chainmail: PbrMaterial,
    depth_view: wgpu::TextureView,
}

impl PbrScene {
    fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }
    }

    /// Model matrices for every object slot, in draw order.
    fn object_transforms() -> [Mat4; OBJECT_COUNT as usize] {
        let mut models = [Mat4::IDENTITY; OBJECT_COUNT as usize];

        // Row of spheres
        for col in 0..3 {
            let x = (col as f32 - 1.0) * 2.5;
            models[col] = Mat4::from_translation(Vec3::new(x, -2.5, -7.5));
        }

        // Row of tori, offset toward the camera
        for col in 0..3 {
            let x = (col as f32 - 1.0) * 2.5 + 2.5;
            models[3 + col] = Mat4::from_translation(Vec3::new(x, 0.0, -2.5));
        }

        // Half-size tori marking the light positions
        for (i, pos) in LIGHT_POSITIONS.iter().enumerate() {
            models[6 + i] = Mat4::from_translation(*pos) * Mat4::from_scale(Vec3::splat(0.5));
        }

        models
    }
}

impl Scene for PbrScene {
    fn create(ctx: &GpuContext) -> Result<Self> {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("PBR Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/pbr.wgsl").into()),
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("PBR Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        // One buffer for every object, addressed with dynamic offsets
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("PBR Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("PBR Material Bind Group Layout"),
            entries: &[
                Self::texture_entry(0),
                Self::texture_entry(1),
                Self::texture_entry(2),
                Self::texture_entry(3),
                Self::texture_entry(4),
                wgpu::BindGroupLayoutEntry {
                    binding: 5,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("PBR Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &object_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("PBR Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint32),
                front_face: wgpu::FrontFace::Ccw,
                // Strip rows flip facing every band, so culling stays off
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
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
        });

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("PBR Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let lights = LightsUniform {
            positions: LIGHT_POSITIONS.map(|p| p.extend(1.0).to_array()),
            colors: [LIGHT_COLOR.extend(1.0).to_array(); 4],
        };
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("PBR Lights Uniform Buffer"),
            contents: bytemuck::bytes_of(&lights),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        // The objects never move, so the model matrices are written once
        let mut object_data = vec![0u8; (OBJECT_COUNT * OBJECT_UNIFORM_STRIDE) as usize];
        for (i, model) in Self::object_transforms().iter().enumerate() {
            let uniform = ObjectUniform {
                model: model.to_cols_array_2d(),
            };
            let offset = i * OBJECT_UNIFORM_STRIDE as usize;
            object_data[offset..offset + std::mem::size_of::<ObjectUniform>()]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("PBR Object Uniform Buffer"),
            contents: &object_data,
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("PBR Scene Bind Group"),
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
            label: Some("PBR Object Bind Group"),
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

        // The ground set ships its metallic map as a PNG, the rest as JPEGs
        let ground = PbrMaterial::load(device, &ctx.queue, &material_layout, "ground", "png");
        let chainmail = PbrMaterial::load(device, &ctx.queue, &material_layout, "chainmail", "jpg");

        let mut shapes = ShapeLibrary::new();
        shapes.sphere(
            device,
            &SphereParams {
                segments_x: 64,
                segments_y: 64,
                winding: StripWinding::Uniform,
            },
        );
        shapes.torus(
            device,
            &TorusParams {
                inner_radius: 0.1,
                center_radius: 0.25,
                segments_ring: 64,
                segments_tube: 32,
            },
        );

        let (_, depth_view) = create_depth_texture(device, ctx.size);

        Ok(Self {
            pipeline,
            shapes,
            scene_buffer,
            scene_bind_group,
            object_bind_group,
            ground,
            chainmail,
            depth_view,
        })
    }

    fn resize(&mut self, ctx: &GpuContext) {
        let (_, depth_view) = create_depth_texture(&ctx.device, ctx.size);
        self.depth_view = depth_view;
    }

    fn render(&mut self, ctx: &GpuContext, camera: &FlyCamera, _time: f32) -> Result<()> {
        let frame = ctx.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj = camera.projection_matrix(ctx.aspect()) * camera.view_matrix();
        let scene = SceneUniform {
            view_proj: view_proj.to_cols_array_2d(),
            cam_pos: camera.position.extend(1.0).to_array(),
        };
        ctx.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("PBR Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("PBR Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.15,
                            g: 0.15,
                            b: 0.15,
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

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.scene_bind_group, &[]);

            let sphere = self.shapes.sphere_built();
            let torus = self.shapes.torus_built();
            let offset = |slot: u64| (slot * OBJECT_UNIFORM_STRIDE) as u32;

            pass.set_bind_group(2, &self.ground.bind_group, &[]);
            for slot in 0..3 {
                pass.set_bind_group(1, &self.object_bind_group, &[offset(slot)]);
                sphere.draw(&mut pass);
            }

            pass.set_bind_group(2, &self.chainmail.bind_group, &[]);
            for slot in 3..6 {
                pass.set_bind_group(1, &self.object_bind_group, &[offset(slot)]);
                torus.draw(&mut pass);
            }

            // Light markers keep the chainmail material bound
            for slot in 6..OBJECT_COUNT {
                pass.set_bind_group(1, &self.object_bind_group, &[offset(slot)]);
                torus.draw(&mut pass);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
