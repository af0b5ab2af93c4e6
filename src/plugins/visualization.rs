//! Visualization plugin - Self-contained plugin pattern
//!
//! Draws the controller through the batch renderer into a [`MemoryDevice`],
//! then mirrors the recorded draw calls as 2D meshes. Each draw call becomes one
//! pooled `Mesh2d` entity whose vertices are already in clip space scaled back
//! to window pixels, so the stock `Camera2d` shows them unchanged.

use crate::plugins::simulation::SimulationSet;
use crate::prelude::*;
use crate::render::camera::to_clip;
use crate::render::{BatchLimits, BatchRenderer, DrawCall, MemoryDevice, PrimitiveTopology};
use crate::utils::color::Rgb;
use bevy::render::mesh::{Indices, PrimitiveTopology as MeshTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::window::PrimaryWindow;

/// Used when no primary window exists.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1280.0, 800.0);

/// Depth step between consecutive draw calls, later draws on top.
const DRAW_DEPTH_STEP: f32 = 0.001;

/// Device, renderer and the draw calls recorded in the latest frame.
#[derive(Resource)]
pub struct RenderBackend {
    pub device: MemoryDevice,
    pub renderer: BatchRenderer,
    pub draws: Vec<DrawCall>,
    pub viewport: Vec2,
}

impl RenderBackend {
    pub fn new(limits: BatchLimits) -> Result<Self, crate::render::DeviceError> {
        let mut device = MemoryDevice::new();
        let renderer = BatchRenderer::new(&mut device, limits)?;
        Ok(Self {
            device,
            renderer,
            draws: Vec::new(),
            viewport: DEFAULT_VIEWPORT,
        })
    }
}

/// Mesh entities reused across frames, one per draw call slot.
#[derive(Resource, Default)]
struct DrawMeshPool {
    material: Handle<ColorMaterial>,
    slots: Vec<(Entity, Handle<Mesh>)>,
}

pub struct VisualizationPlugin;

impl Plugin for VisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                setup_render_backend,
                setup_scene.run_if(resource_exists::<Assets<ColorMaterial>>),
            ),
        );

        app.add_systems(
            Update,
            (
                render_frame,
                sync_draw_meshes.run_if(resource_exists::<DrawMeshPool>),
            )
                .chain()
                .in_set(SimulationSet::Render),
        );
    }
}

fn setup_render_backend(mut commands: Commands, controller: Res<SimulationController>) {
    let limits = BatchLimits::from(controller.rendering_config());
    match RenderBackend::new(limits) {
        Ok(backend) => {
            debug!("Batch renderer ready with {:?}", limits);
            commands.insert_resource(backend);
        }
        Err(e) => {
            error!("Failed to create batch renderer: {}", e);
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    controller: Res<SimulationController>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.insert_resource(ClearColor(
        controller.rendering_config().background_color.to_color(),
    ));
    commands.spawn(Camera2d);
    commands.insert_resource(DrawMeshPool {
        material: materials.add(ColorMaterial::from_color(Color::WHITE)),
        slots: Vec::new(),
    });
}

fn render_frame(
    controller: Res<SimulationController>,
    backend: Option<ResMut<RenderBackend>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(mut backend) = backend else {
        return;
    };
    let viewport = windows
        .iter()
        .next()
        .map(|window| window.size())
        .filter(|size| size.x > 0.0 && size.y > 0.0)
        .unwrap_or(DEFAULT_VIEWPORT);

    let RenderBackend {
        device,
        renderer,
        draws,
        viewport: last_viewport,
    } = &mut *backend;
    *last_viewport = viewport;

    if let Err(e) = controller.render(renderer, device, viewport) {
        warn!("Frame render failed: {}", e);
    }
    *draws = device.take_draws();
}

fn sync_draw_meshes(
    mut commands: Commands,
    backend: Option<Res<RenderBackend>>,
    mut pool: ResMut<DrawMeshPool>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(backend) = backend else {
        return;
    };

    for (i, draw) in backend.draws.iter().enumerate() {
        let mesh = draw_call_mesh(draw, backend.viewport);
        let depth = i as f32 * DRAW_DEPTH_STEP;

        if let Some((entity, handle)) = pool.slots.get(i) {
            if let Some(slot_mesh) = meshes.get_mut(handle) {
                *slot_mesh = mesh;
            }
            commands
                .entity(*entity)
                .insert((Visibility::Inherited, Transform::from_xyz(0.0, 0.0, depth)));
        } else {
            let handle = meshes.add(mesh);
            let entity = commands
                .spawn((
                    Mesh2d(handle.clone()),
                    MeshMaterial2d(pool.material.clone()),
                    Transform::from_xyz(0.0, 0.0, depth),
                    Visibility::Inherited,
                ))
                .id();
            pool.slots.push((entity, handle));
        }
    }

    for (entity, _) in pool.slots.iter().skip(backend.draws.len()) {
        commands.entity(*entity).insert(Visibility::Hidden);
    }
}

/// Builds a mesh in window pixel coordinates for one recorded draw call.
pub fn draw_call_mesh(draw: &DrawCall, viewport: Vec2) -> Mesh {
    let topology = match draw.topology {
        PrimitiveTopology::TriangleList => MeshTopology::TriangleList,
        PrimitiveTopology::LineList => MeshTopology::LineList,
        PrimitiveTopology::LineStrip => MeshTopology::LineStrip,
    };

    let half = viewport * 0.5;
    let positions: Vec<[f32; 3]> = draw
        .vertices
        .iter()
        .map(|vertex| {
            let point = to_clip(&draw.camera, Vec2::from(vertex.position)) * half;
            [point.x, point.y, 0.0]
        })
        .collect();
    let colors: Vec<[f32; 4]> = draw
        .vertices
        .iter()
        .map(|vertex| Rgb::from(vertex.color).to_linear_rgba())
        .collect();

    let mut mesh = Mesh::new(topology, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    if let Some(indices) = &draw.indices {
        mesh.insert_indices(Indices::U32(indices.clone()));
    }
    mesh
}
