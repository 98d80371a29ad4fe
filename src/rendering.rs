use eframe::{egui, wgpu};
use encase::{ShaderSize, ShaderType};

#[derive(ShaderType)]
pub struct GpuCamera {
    pub position: cgmath::Vector2<f32>,
    pub vertical_height: f32,
    pub aspect: f32,
}

#[derive(ShaderType)]
pub struct GpuQuad {
    pub position: cgmath::Vector2<f32>,
    pub rotation: f32,
    pub size: cgmath::Vector2<f32>,
    pub color: cgmath::Vector3<f32>,
}

#[derive(ShaderType)]
pub struct GpuCircle {
    pub position: cgmath::Vector2<f32>,
    pub radius: f32,
    pub color: cgmath::Vector4<f32>,
}

/// A storage buffer of instances that grows when a frame needs more room.
struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str, min_binding_size: wgpu::BufferSize) -> Self {
        let buffer = Self::create_buffer(device, label, min_binding_size.get());
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: Some(min_binding_size),
                },
                count: None,
            }],
        });
        let bind_group = Self::create_bind_group(device, label, &bind_group_layout, &buffer);
        Self {
            label,
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    fn create_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    fn write<T>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &Vec<T>)
    where
        Vec<T>: ShaderType + encase::internal::WriteInto,
    {
        let size = instances.size();
        if size.get() > self.buffer.size() {
            self.buffer = Self::create_buffer(device, self.label, size.get());
            self.bind_group =
                Self::create_bind_group(device, self.label, &self.bind_group_layout, &self.buffer);
        }

        let Some(mut view) = queue.write_buffer_with(&self.buffer, 0, size) else {
            tracing::error!(label = self.label, "could not map instance buffer");
            return;
        };
        if let Err(err) = encase::StorageBuffer::new(&mut *view).write(instances) {
            tracing::error!(label = self.label, %err, "could not encode instances");
        }
    }
}

pub struct RenderState {
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    quads: InstanceBuffer,
    quad_render_pipeline: wgpu::RenderPipeline,

    circles: InstanceBuffer,
    circle_render_pipeline: wgpu::RenderPipeline,
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    target_format: wgpu::TextureFormat,
    shader: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vertex"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        // Instances are painted in submission order so trails stay under the
        // bodies and blend with each other.
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fragment"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

impl RenderState {
    pub fn new(
        target_format: wgpu::TextureFormat,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
    ) -> anyhow::Result<Self> {
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: GpuCamera::SHADER_SIZE.get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(GpuCamera::SHADER_SIZE),
                    },
                    count: None,
                }],
            });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let quads = InstanceBuffer::new(device, "Quads", GpuQuad::SHADER_SIZE);
        let quad_shader = device.create_shader_module(wgpu::include_wgsl!("./quad_shader.wgsl"));
        let quad_render_pipeline = create_pipeline(
            device,
            "Quad Render Pipeline",
            target_format,
            &quad_shader,
            &[&camera_bind_group_layout, &quads.bind_group_layout],
        );

        let circles = InstanceBuffer::new(device, "Circles", GpuCircle::SHADER_SIZE);
        let circle_shader =
            device.create_shader_module(wgpu::include_wgsl!("./circle_shader.wgsl"));
        let circle_render_pipeline = create_pipeline(
            device,
            "Circle Render Pipeline",
            target_format,
            &circle_shader,
            &[&camera_bind_group_layout, &circles.bind_group_layout],
        );

        tracing::info!(?target_format, "render state created");

        Ok(Self {
            camera_buffer,
            camera_bind_group,
            quads,
            quad_render_pipeline,
            circles,
            circle_render_pipeline,
        })
    }
}

pub struct RenderData {
    pub camera: GpuCamera,
    pub quads: Vec<GpuQuad>,
    pub circles: Vec<GpuCircle>,
}

impl eframe::egui_wgpu::CallbackTrait for RenderData {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &eframe::egui_wgpu::ScreenDescriptor,
        _egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut eframe::egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(state) = callback_resources.get_mut::<RenderState>() else {
            tracing::error!("render state missing from callback resources");
            return vec![];
        };

        if let Some(mut camera_buffer) =
            queue.write_buffer_with(&state.camera_buffer, 0, GpuCamera::SHADER_SIZE)
        {
            if let Err(err) = encase::UniformBuffer::new(&mut *camera_buffer).write(&self.camera) {
                tracing::error!(%err, "could not encode camera");
            }
        }

        state.quads.write(device, queue, &self.quads);
        state.circles.write(device, queue, &self.circles);

        vec![]
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &eframe::egui_wgpu::CallbackResources,
    ) {
        let Some(state) = callback_resources.get::<RenderState>() else {
            return;
        };

        if !self.quads.is_empty() {
            render_pass.set_pipeline(&state.quad_render_pipeline);
            render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
            render_pass.set_bind_group(1, &state.quads.bind_group, &[]);
            render_pass.draw(0..4, 0..self.quads.len() as _);
        }

        if !self.circles.is_empty() {
            render_pass.set_pipeline(&state.circle_render_pipeline);
            render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
            render_pass.set_bind_group(1, &state.circles.bind_group, &[]);
            render_pass.draw(0..4, 0..self.circles.len() as _);
        }
    }
}
