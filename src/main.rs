mod camera;
mod constants;
mod frame;
mod render;
mod tracking;

use std::time::Instant;

use constants::{CLUSTER_SEED, GUIDE_RADII, GUIDE_SEGMENTS, GUIDE_WIDTH};
use frame::FrameContext;
use glam::Vec2;
use halo_core::{
    build_batch, fallback_anchor_vec3, generate_ring, spawn_cluster_seeded, BatchFaces,
    ClusterConfig, DrawList, DrawOrder, Fingertip, GestureConfig, GesturePipeline, GlowProfile,
    Hand, MeshBuffers, ParameterTable, RingDescriptor, RingMaterial, RingSide, TrackingMode,
    HUE_COOL,
};
use render::{GpuState, SceneMeshes};
use tracking::PointerHand;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

/// Thin concentric rings drawn behind the cluster as a size reference.
fn build_guides() -> Option<MeshBuffers> {
    let descriptors: Vec<RingDescriptor> = GUIDE_RADII
        .iter()
        .map(|&r| RingDescriptor::new(r, GUIDE_WIDTH, GUIDE_SEGMENTS))
        .collect();
    match build_batch(&descriptors, BatchFaces::DoubleSided) {
        Ok(batch) => {
            for rejected in &batch.rejected {
                log::warn!("[guides] ring {} skipped: {}", rejected.index, rejected.error);
            }
            Some(batch.mesh)
        }
        Err(e) => {
            log::warn!("[guides] disabled: {e}");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let tracking_enabled = !std::env::args().any(|a| a == "--no-tracking");

    let cluster = ClusterConfig::default();
    let rings = spawn_cluster_seeded(&cluster, CLUSTER_SEED);
    let orders: Vec<DrawOrder> = rings.iter().map(|r| r.order).collect();
    let draw_list = DrawList::build(&orders, false);

    let unit_ring = RingDescriptor::default();
    let meshes = SceneMeshes {
        inside: generate_ring(&unit_ring, RingSide::Inside)?,
        outside: generate_ring(&unit_ring, RingSide::Outside)?,
        guides: build_guides(),
    };

    let mut table = ParameterTable::new();
    let mut pipeline = GesturePipeline::new(
        rings,
        &cluster,
        GestureConfig::default(),
        fallback_anchor_vec3(),
        |material| table.push_instance(material),
    );
    let mut tracker = PointerHand::new(tracking_enabled);
    if pipeline.start(&mut tracker, Hand::Right, Fingertip::Index) == TrackingMode::Live {
        log::info!("[halo] pointer distance from centre spreads the hand, 't' drops tracking");
    }
    log::info!(
        "[halo] {} rings around {:?}",
        table.len(),
        pipeline.anchor_position()
    );

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("halo")
        .build(&event_loop)?;

    let gpu = pollster::block_on(GpuState::new(&window, &meshes, draw_list.entries.len()))?;
    drop(meshes);

    let rows = Vec::with_capacity(draw_list.entries.len());
    let mut ctx = FrameContext {
        gpu,
        pipeline,
        table,
        tracker,
        draw_list,
        guide_material: RingMaterial {
            profile: GlowProfile::Sine,
            hue_primary: glam::Vec3::from(HUE_COOL),
            ..RingMaterial::default()
        },
        rows,
        last_instant: Instant::now(),
        last_logged_tenth: -1,
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => ctx.gpu.resize(size),
            WindowEvent::CloseRequested => {
                ctx.shutdown();
                elwt.exit();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = ctx.gpu.window.inner_size();
                let uv = Vec2::new(
                    position.x as f32 / size.width.max(1) as f32,
                    position.y as f32 / size.height.max(1) as f32,
                );
                ctx.tracker.set_pointer_uv(uv);
            }
            WindowEvent::CursorLeft { .. } => ctx.tracker.pointer_left(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Escape) => {
                    ctx.shutdown();
                    elwt.exit();
                }
                Key::Character(c) if c.as_str() == "t" => {
                    let lost = ctx.tracker.toggle_lost();
                    log::info!("[halo] tracking {}", if lost { "lost" } else { "restored" });
                }
                _ => {}
            },
            _ => {}
        },
        Event::AboutToWait => match ctx.frame() {
            Ok(_) => ctx.gpu.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => ctx.gpu.resize(ctx.gpu.window.inner_size()),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                ctx.shutdown();
                elwt.exit();
            }
            Err(_) => {}
        },
        _ => {}
    })?;
    Ok(())
}
