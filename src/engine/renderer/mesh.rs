// Lit box rendering for the stage: the ground slab and the character stand-in

use super::{Camera, CameraUniform, Vertex};
use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::stage::animation::Target;

/// Ground slab plus character
pub const MAX_OBJECTS: usize = 2;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-object uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// A unit cube drawn with a transform and a flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub transform: Mat4,
    pub color: Vec4,
}

impl MeshInstance {
    /// Ground box centered on the origin
    pub fn ground(size: [f32; 3], color: u32) -> Self {
        Self {
            transform: Mat4::from_scale(Vec3::from_array(size)),
            color: rgb_hex(color),
        }
    }

    /// Box standing on the target's position, sized by its scaled bounds
    pub fn character(target: &Target) -> Self {
        let half = target.half_extents();
        let center = target.position() + Vec3::new(0.0, half.y, 0.0);
        Self {
            transform: Mat4::from_translation(center) * Mat4::from_scale(half * 2.0),
            color: Vec4::new(0.85, 0.32, 0.28, 1.0),
        }
    }

    fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: self.transform.to_cols_array_2d(),
            color: self.color.to_array(),
        }
    }
}

/// Convert a 0xRRGGBB color into linear-ish RGBA
pub fn rgb_hex(color: u32) -> Vec4 {
    let channel = |shift: u32| ((color >> shift) & 0xff) as f32 / 255.0;
    Vec4::new(channel(16), channel(8), channel(0), 1.0)
}

fn cube_geometry() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, tangent u, tangent v) per face, wound counter-clockwise seen from outside
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        let center = normal * 0.5;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            vertices.push(Vertex::new(center + u * su + v * sv, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws up to `MAX_OBJECTS` lit cubes per frame
pub struct MeshRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    slots: Vec<ObjectSlot>,
}

impl MeshRenderer {
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Result<Self> {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let uniform_layout = |label: &'static str, visibility: wgpu::ShaderStages| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        };

        let camera_bind_group_layout =
            uniform_layout("Camera Bind Group Layout", wgpu::ShaderStages::VERTEX);
        let object_bind_group_layout = uniform_layout(
            "Object Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &object_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let (vertices, indices) = cube_geometry();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 4],
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let slots = (0..MAX_OBJECTS)
            .map(|_| {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Object Buffer"),
                    size: std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Object Bind Group"),
                    layout: &object_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                ObjectSlot { buffer, bind_group }
            })
            .collect();

        Ok(Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            camera_buffer,
            camera_bind_group,
            slots,
        })
    }

    /// Upload camera and object uniforms; returns how many objects will be drawn
    pub fn prepare(&self, queue: &wgpu::Queue, camera: &Camera, instances: &[MeshInstance]) -> usize {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::new(camera)]),
        );

        let count = instances.len().min(self.slots.len());
        for (slot, instance) in self.slots.iter().zip(instances) {
            queue.write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[instance.uniform()]));
        }
        count
    }

    /// Draw the first `count` prepared objects
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, count: usize) {
        if count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for slot in self.slots.iter().take(count) {
            render_pass.set_bind_group(1, &slot.bind_group, &[]);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_geometry_counts() {
        let (vertices, indices) = cube_geometry();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let (vertices, indices) = cube_geometry();
        for tri in indices.chunks(3) {
            let a = Vec3::from_array(vertices[tri[0] as usize].position);
            let b = Vec3::from_array(vertices[tri[1] as usize].position);
            let c = Vec3::from_array(vertices[tri[2] as usize].position);
            let normal = Vec3::from_array(vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn test_rgb_hex() {
        let color = rgb_hex(0x1f2022);
        assert_relative_eq!(color.x, 31.0 / 255.0);
        assert_relative_eq!(color.y, 32.0 / 255.0);
        assert_relative_eq!(color.z, 34.0 / 255.0);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn test_ground_instance_scales_unit_cube() {
        let ground = MeshInstance::ground([2000.0, 0.1, 2000.0], 0x1f2022);
        let corner = ground.transform.transform_point3(Vec3::splat(0.5));
        assert_relative_eq!(corner.x, 1000.0);
        assert_relative_eq!(corner.y, 0.05);
    }

    #[test]
    fn test_character_instance_stands_on_target() {
        let target = Target::new(Vec3::new(0.0, 0.02, 0.0), 1.5, Vec3::new(0.5, 1.0, 0.5));
        let box_instance = MeshInstance::character(&target);

        let bottom = box_instance
            .transform
            .transform_point3(Vec3::new(0.0, -0.5, 0.0));
        let top = box_instance.transform.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert_relative_eq!(bottom.y, 0.02, epsilon = 1e-5);
        assert_relative_eq!(top.y, 0.02 + 3.0, epsilon = 1e-5);
    }
}
