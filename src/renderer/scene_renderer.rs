//! Draws the scene graph.

use super::gpu_mesh::{GpuMeshCache, MeshVertex};
use super::uniform_batch::UniformBatch;
use crate::camera::Camera3d;
use crate::color::{self, Color};
use crate::context::Context;
use crate::light::{LightCollection, MAX_LIGHTS};
use crate::resource::{fallback_matcap, Material, Shading, Texture, FALLBACK_MATCAP_SIZE};
use crate::scene::{DrawItem, SceneNode3d};
use bytemuck::{Pod, Zeroable};
use glamx::{Mat4, Vec3};
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;

/// A directional light, as laid out in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
struct GpuLight {
    direction: [f32; 3],
    _pad0: f32,
    radiance: [f32; 3],
    _pad1: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct FrameUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    eye: [f32; 4],
    sky: [f32; 4],
    ground: [f32; 4],
    sky_direction: [f32; 4],
    lights: [GpuLight; MAX_LIGHTS],
    num_lights: u32,
    encode_srgb: u32,
    _pad: [u32; 2],
}

/// Per-object uniforms, selected with a dynamic offset.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
    flags: [u32; 4],
}

impl ObjectUniforms {
    fn new(material: &Material, model: Mat4) -> Self {
        let (shading, params) = match material.shading() {
            Shading::Standard {
                roughness,
                metalness,
            } => (0, [roughness, metalness, 0.0, 0.0]),
            Shading::Phong {
                shininess,
                specular,
            } => (1, [1.0, 0.0, shininess, specular.r]),
            Shading::Matcap => (2, [0.0; 4]),
        };

        ObjectUniforms {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix(model).to_cols_array_2d(),
            color: color::to_array(material.color()),
            params,
            flags: [
                shading,
                material.flat_shading() as u32,
                material.vertex_colors() as u32,
                material.double_sided() as u32,
            ],
        }
    }
}

/// The matrix transforming object-space normals to world space.
///
/// Falls back to the model matrix itself if it is singular.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    let det = model.determinant();

    if det.abs() <= f32::EPSILON || !det.is_finite() {
        model
    } else {
        model.inverse().transpose()
    }
}

/// Which faces a draw discards.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Culling {
    /// Both faces are drawn.
    None,
    /// Counter-clockwise triangles are front faces; back faces are discarded.
    Back,
    /// Front faces are discarded, for meshes mirrored by a negative scale.
    Front,
}

impl Culling {
    /// The culling of a single-sided or double-sided material drawn with `model`.
    ///
    /// A mirroring model matrix reverses the on-screen winding of every triangle, so
    /// the culled face is swapped.
    pub fn select(material: &Material, model: &Mat4) -> Culling {
        if material.double_sided() {
            Culling::None
        } else if model.determinant() < 0.0 {
            Culling::Front
        } else {
            Culling::Back
        }
    }

    fn face(self) -> Option<wgpu::Face> {
        match self {
            Culling::None => None,
            Culling::Back => Some(wgpu::Face::Back),
            Culling::Front => Some(wgpu::Face::Front),
        }
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
struct PipelineKey {
    matcap: bool,
    culling: Culling,
}

/// Renders the meshes of a scene graph with its lights.
pub struct SceneRenderer {
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_bind_group: wgpu::BindGroup,
    objects: UniformBatch<ObjectUniforms>,
    matcap_layout: wgpu::BindGroupLayout,
    matcap_bind_group: wgpu::BindGroup,
    matcap: Arc<Texture>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    meshes: GpuMeshCache,
    draws: Vec<DrawItem>,
    offsets: Vec<u32>,
    lights: LightCollection,
}

impl SceneRenderer {
    /// Creates the renderer, with the procedural gold as matcap.
    pub fn new() -> SceneRenderer {
        let ctxt = Context::get();

        let uniform_entry = |dynamic: bool| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: None,
            },
            count: None,
        };

        let frame_layout = ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_frame_bind_group_layout"),
            entries: &[uniform_entry(false)],
        });
        let object_layout = ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_object_bind_group_layout"),
            entries: &[uniform_entry(true)],
        });
        let matcap_layout = ctxt.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_matcap_bind_group_layout"),
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
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_buffer = ctxt.create_buffer(
            Some("scene_frame_uniforms"),
            std::mem::size_of::<FrameUniforms>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let frame_bind_group = ctxt.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let objects = UniformBatch::new("scene_object_uniforms", 128);
        let object_bind_group = Self::object_bind_group(&object_layout, &objects);

        let matcap = Texture::from_image(&fallback_matcap(FALLBACK_MATCAP_SIZE));
        let matcap_bind_group = Self::matcap_bind_group(&matcap_layout, &matcap);

        let pipeline_layout = ctxt.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &matcap_layout],
            push_constant_ranges: &[],
        });

        let shader = ctxt.create_shader_module(Some("scene_shader"), include_str!("scene.wgsl"));

        let create_pipeline = |key: PipelineKey| {
            let fragment_entry = if key.matcap {
                "fs_matcap"
            } else {
                "fs_standard"
            };

            ctxt.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(fragment_entry),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctxt.surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: key.culling.face(),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: Context::depth_format(),
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
                cache: None,
            })
        };

        let mut pipelines = HashMap::new();
        for matcap in [false, true] {
            for culling in [Culling::None, Culling::Back, Culling::Front] {
                let key = PipelineKey { matcap, culling };
                let _ = pipelines.insert(key, create_pipeline(key));
            }
        }

        SceneRenderer {
            frame_buffer,
            frame_bind_group,
            object_layout,
            object_bind_group,
            objects,
            matcap_layout,
            matcap_bind_group,
            matcap,
            pipelines,
            meshes: GpuMeshCache::new(),
            draws: Vec::new(),
            offsets: Vec::new(),
            lights: LightCollection::new(),
        }
    }

    fn object_bind_group(
        layout: &wgpu::BindGroupLayout,
        objects: &UniformBatch<ObjectUniforms>,
    ) -> wgpu::BindGroup {
        Context::get().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_object_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: objects.buffer(),
                    offset: 0,
                    size: wgpu::BufferSize::new(objects.binding_size()),
                }),
            }],
        })
    }

    fn matcap_bind_group(layout: &wgpu::BindGroupLayout, texture: &Texture) -> wgpu::BindGroup {
        Context::get().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_matcap_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Replaces the matcap image used by every matcap material.
    pub fn set_matcap(&mut self, image: &RgbaImage) {
        log::info!("Using a {}x{} matcap.", image.width(), image.height());
        self.matcap = Texture::from_image(image);
        self.matcap_bind_group = Self::matcap_bind_group(&self.matcap_layout, &self.matcap);
    }

    /// The current matcap texture.
    pub fn matcap(&self) -> &Arc<Texture> {
        &self.matcap
    }

    /// Updates the world transforms of `scene`, then uploads the frame and per-object
    /// uniforms. Must be called before [`SceneRenderer::render`].
    pub fn prepare(&mut self, scene: &mut SceneNode3d, camera: &dyn Camera3d) {
        let ctxt = Context::get();

        self.draws.clear();
        self.lights.clear();
        scene.prepare(&mut self.draws, &mut self.lights);

        let frame = frame_uniforms(camera, &self.lights, ctxt.encodes_srgb_in_shader());
        ctxt.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        self.objects.clear();
        self.offsets.clear();
        for draw in self.draws.iter() {
            let uniforms = ObjectUniforms::new(&draw.material, draw.model);
            self.offsets.push(self.objects.push(&uniforms));
        }

        if self.objects.upload() {
            self.object_bind_group = Self::object_bind_group(&self.object_layout, &self.objects);
        }

        for draw in self.draws.iter() {
            let _ = self.meshes.get_or_upload(&draw.geometry);
        }
    }

    /// Draws the prepared scene into `pass`.
    pub fn render(&mut self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(2, &self.matcap_bind_group, &[]);

        let mut current = None;

        for (draw, offset) in self.draws.iter().zip(self.offsets.iter()) {
            let key = PipelineKey {
                matcap: draw.material.is_matcap(),
                culling: Culling::select(&draw.material, &draw.model),
            };

            if current != Some(key) {
                if let Some(pipeline) = self.pipelines.get(&key) {
                    pass.set_pipeline(pipeline);
                }
                current = Some(key);
            }

            pass.set_bind_group(1, &self.object_bind_group, &[*offset]);
            self.meshes.get_or_upload(&draw.geometry).draw(pass);
        }
    }
}

fn frame_uniforms(camera: &dyn Camera3d, lights: &LightCollection, encode_srgb: bool) -> FrameUniforms {
    let mut gpu_lights = [GpuLight::default(); MAX_LIGHTS];
    for (gpu, light) in gpu_lights.iter_mut().zip(lights.lights.iter()) {
        gpu.direction = light.world_direction.to_array();
        gpu.radiance = light.radiance.to_array();
    }

    let (sky, ground, up) = lights
        .hemisphere
        .unwrap_or((Vec3::ZERO, Vec3::ZERO, Vec3::Y));

    FrameUniforms {
        view: camera.view_transform().to_mat4().to_cols_array_2d(),
        proj: camera.projection().to_cols_array_2d(),
        eye: camera.eye().extend(1.0).to_array(),
        sky: sky.extend(1.0).to_array(),
        ground: ground.extend(1.0).to_array(),
        sky_direction: up.extend(0.0).to_array(),
        lights: gpu_lights,
        num_lights: lights.lights.len().min(MAX_LIGHTS) as u32,
        encode_srgb: encode_srgb as u32,
        _pad: [0; 2],
    }
}

/// The clear color of a frame, encoded for the surface format.
pub fn clear_color(background: Color, surface_format: wgpu::TextureFormat) -> wgpu::Color {
    let encode = |c: f32| {
        if surface_format.is_srgb() {
            c as f64
        } else {
            color::linear_to_srgb(c) as f64
        }
    };

    wgpu::Color {
        r: encode(background.r),
        g: encode(background.g),
        b: encode(background.b),
        a: background.a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::StageCamera3d;
    use crate::light;
    use crate::resource::{Finish, MaterialManager};

    #[test]
    fn uniform_layouts_match_the_shader() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 32);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 336);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 176);
    }

    #[test]
    fn mirrored_single_sided_meshes_cull_front_faces() {
        let materials = MaterialManager::new();
        let pink = materials.get(Finish::Pink);
        let white = materials.get(Finish::White);
        let mirror = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));

        assert_eq!(Culling::select(&pink, &Mat4::IDENTITY), Culling::Back);
        assert_eq!(Culling::select(&pink, &mirror), Culling::Front);
        assert_eq!(Culling::select(&white, &mirror), Culling::None);
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular() {
        let model = Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0));
        let tangent = model.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let normal = normal_matrix(model).transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(tangent.dot(normal).abs() < 1.0e-6);
    }

    #[test]
    fn frame_uniforms_carry_the_stage_lights() {
        let mut lights = LightCollection::new();
        for (position, light) in light::stage_lights() {
            assert!(lights.add(&light, position));
        }

        let camera = StageCamera3d::new(1280, 720);
        let frame = frame_uniforms(&camera, &lights, true);
        assert_eq!(frame.num_lights, 2);
        assert_eq!(frame.encode_srgb, 1);
        assert!(frame.sky[1] > frame.ground[1]);
        assert_eq!(frame.eye[2], 21.0);
    }

    #[test]
    fn clear_color_is_encoded_for_linear_surfaces() {
        let bg = color::from_hex(0x808080);
        let linear = clear_color(bg, wgpu::TextureFormat::Bgra8Unorm);
        let srgb = clear_color(bg, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert!((linear.r - 128.0 / 255.0).abs() < 1.0e-3);
        assert!((srgb.r - bg.r as f64).abs() < 1.0e-6);
    }
}
