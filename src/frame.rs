use crate::camera::Camera;
use crate::constants::GUIDE_BRIGHTNESS;
use crate::render::{FrameDraw, GpuState};
use crate::tracking::PointerHand;
use bytemuck::Zeroable;
use halo_core::{
    DrawItem, DrawList, GesturePipeline, InstanceParams, ParameterTable, RingMaterial,
};
use std::time::Instant;

/// Per-session state driven once per rendered frame.
pub struct FrameContext<'w> {
    pub gpu: GpuState<'w>,
    pub pipeline: GesturePipeline,
    pub table: ParameterTable,
    pub tracker: PointerHand,
    pub draw_list: DrawList,
    pub guide_material: RingMaterial,
    pub rows: Vec<InstanceParams>,
    pub last_instant: Instant,
    pub last_logged_tenth: i32,
}

impl<'w> FrameContext<'w> {
    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        let factor = self
            .pipeline
            .frame(dt, &mut self.tracker, &mut self.table);
        let tenth = (factor * 10.0).floor() as i32;
        if tenth != self.last_logged_tenth {
            log::debug!("[frame] gesture factor {factor:.2}");
            self.last_logged_tenth = tenth;
        }

        self.pack_rows();
        let anchor = self.pipeline.anchor_position();
        let camera = Camera::looking_at_anchor(anchor, self.gpu.aspect());
        let mut guide = InstanceParams::from_material(&self.guide_material);
        guide.translation = anchor.to_array();
        guide.brightness = GUIDE_BRIGHTNESS * (1.0 - factor);

        self.gpu.render(&FrameDraw {
            rows: &self.rows,
            runs: &self.draw_list.runs,
            guide: Some(guide),
            view_proj: camera.view_proj(),
        })
    }

    /// Lays out one instance row per draw-list entry, in composite order.
    fn pack_rows(&mut self) {
        let ids = self.pipeline.instance_ids();
        self.rows.clear();
        for entry in &self.draw_list.entries {
            let row = match entry.item {
                DrawItem::Ring { instance, .. } => ids
                    .get(instance)
                    .and_then(|&id| self.table.get(id))
                    .copied(),
                DrawItem::Occluder => None,
            };
            self.rows.push(row.unwrap_or_else(InstanceParams::zeroed));
        }
    }

    pub fn shutdown(&mut self) {
        self.pipeline.shutdown(&mut self.tracker);
    }
}
