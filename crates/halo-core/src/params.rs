//! Named per-instance render parameters.
//!
//! The renderer is reached only through [`ParameterSink`]. Every instance is
//! created from its own [`RingMaterial`] record, so no instance ever depends
//! on the order in which parameters were set on a shared material.

use crate::constants::{HUE_COOL, HUE_WARM};
use crate::error::ParameterError;
use bytemuck::Zeroable;
use fnv::FnvHashMap;
use glam::Vec3;

pub const PARAM_TIME_OFFSET: &str = "TimeOffset";
pub const PARAM_BRIGHTNESS: &str = "Brightness";
pub const PARAM_SPEED: &str = "Speed";
pub const PARAM_MODE: &str = "Mode";
pub const PARAM_HUE_PRIMARY: &str = "HuePrimary";
pub const PARAM_HUE_SECONDARY: &str = "HueSecondary";
pub const PARAM_PROFILE: &str = "Profile";

/// Index of an instance in the sink's registry.
pub type InstanceId = usize;

/// Receives parameter writes for ring instances.
pub trait ParameterSink {
    fn set_float(&mut self, instance: InstanceId, name: &str, value: f32)
        -> Result<(), ParameterError>;

    fn set_color(&mut self, instance: InstanceId, name: &str, rgb: Vec3)
        -> Result<(), ParameterError>;

    /// Writes scale and translation onto the instance's render transform.
    fn set_transform(&mut self, instance: InstanceId, scale: Vec3, translation: Vec3);
}

/// Shape of the light travelling around a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GlowProfile {
    /// Gaussian band whose width blends with `mode`.
    #[default]
    Band,
    /// Full-circle sine mask in the primary hue; `mode` is unused.
    Sine,
}

impl GlowProfile {
    /// Value the shader branches on.
    pub fn as_f32(self) -> f32 {
        match self {
            GlowProfile::Band => 0.0,
            GlowProfile::Sine => 1.0,
        }
    }
}

/// Designed parameter set of one ring instance.
///
/// `mode` blends between the narrow band (0) and the wide one (1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingMaterial {
    pub time_offset: f32,
    pub brightness: f32,
    pub speed: f32,
    pub mode: f32,
    pub hue_primary: Vec3,
    pub hue_secondary: Vec3,
    pub profile: GlowProfile,
}

impl Default for RingMaterial {
    fn default() -> Self {
        Self {
            time_offset: 0.0,
            brightness: 1.0,
            speed: 1.0,
            mode: 0.0,
            hue_primary: Vec3::from(HUE_WARM),
            hue_secondary: Vec3::from(HUE_COOL),
            profile: GlowProfile::Band,
        }
    }
}

impl RingMaterial {
    /// Pushes every field. Individual refusals are ignored.
    pub fn apply<S: ParameterSink + ?Sized>(&self, instance: InstanceId, sink: &mut S) {
        let floats = [
            (PARAM_TIME_OFFSET, self.time_offset),
            (PARAM_BRIGHTNESS, self.brightness),
            (PARAM_SPEED, self.speed),
            (PARAM_MODE, self.mode),
            (PARAM_PROFILE, self.profile.as_f32()),
        ];
        for (name, value) in floats {
            push_float(sink, instance, name, value);
        }
        for (name, rgb) in [
            (PARAM_HUE_PRIMARY, self.hue_primary),
            (PARAM_HUE_SECONDARY, self.hue_secondary),
        ] {
            if let Err(e) = sink.set_color(instance, name, rgb) {
                log::trace!("[params] ignored color push: {e}");
            }
        }
    }
}

/// Pushes one float, dropping the write if the sink refuses it.
#[inline]
pub fn push_float<S: ParameterSink + ?Sized>(
    sink: &mut S,
    instance: InstanceId,
    name: &str,
    value: f32,
) {
    if let Err(e) = sink.set_float(instance, name, value) {
        log::trace!("[params] ignored float push: {e}");
    }
}

/// GPU-ready per-instance record, five `vec4`s.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceParams {
    pub scale: [f32; 3],
    pub time_offset: f32,
    pub translation: [f32; 3],
    pub brightness: f32,
    pub hue_primary: [f32; 3],
    pub speed: f32,
    pub hue_secondary: [f32; 3],
    pub mode: f32,
    pub profile: f32,
    pub _pad: [f32; 3],
}

impl InstanceParams {
    pub fn from_material(m: &RingMaterial) -> Self {
        Self {
            scale: [1.0; 3],
            time_offset: m.time_offset,
            translation: [0.0; 3],
            brightness: m.brightness,
            hue_primary: m.hue_primary.to_array(),
            speed: m.speed,
            hue_secondary: m.hue_secondary.to_array(),
            mode: m.mode,
            profile: m.profile.as_f32(),
            _pad: [0.0; 3],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    TimeOffset,
    Brightness,
    Speed,
    Mode,
    HuePrimary,
    HueSecondary,
    Profile,
}

/// A sink backed by one [`InstanceParams`] row per instance.
///
/// Only the names in the ring material's schema are accepted; anything else
/// is refused with [`ParameterError::Unknown`].
pub struct ParameterTable {
    schema: FnvHashMap<&'static str, Slot>,
    rows: Vec<InstanceParams>,
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTable {
    pub fn new() -> Self {
        let schema = [
            (PARAM_TIME_OFFSET, Slot::TimeOffset),
            (PARAM_BRIGHTNESS, Slot::Brightness),
            (PARAM_SPEED, Slot::Speed),
            (PARAM_MODE, Slot::Mode),
            (PARAM_HUE_PRIMARY, Slot::HuePrimary),
            (PARAM_HUE_SECONDARY, Slot::HueSecondary),
            (PARAM_PROFILE, Slot::Profile),
        ]
        .into_iter()
        .collect();
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Registers a new instance and writes its own material record into it
    /// through the named parameters.
    pub fn push_instance(&mut self, material: &RingMaterial) -> InstanceId {
        let id = self.rows.len();
        self.rows.push(InstanceParams::zeroed());
        self.set_transform(id, Vec3::ONE, Vec3::ZERO);
        material.apply(id, self);
        id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, instance: InstanceId) -> Option<&InstanceParams> {
        self.rows.get(instance)
    }

    pub fn rows(&self) -> &[InstanceParams] {
        &self.rows
    }

    fn row_mut(&mut self, instance: InstanceId) -> Result<&mut InstanceParams, ParameterError> {
        self.rows
            .get_mut(instance)
            .ok_or(ParameterError::NoSuchInstance(instance))
    }

    fn slot(&self, name: &str) -> Result<Slot, ParameterError> {
        self.schema
            .get(name)
            .copied()
            .ok_or_else(|| ParameterError::Unknown(name.to_string()))
    }
}

impl ParameterSink for ParameterTable {
    fn set_float(
        &mut self,
        instance: InstanceId,
        name: &str,
        value: f32,
    ) -> Result<(), ParameterError> {
        let slot = self.slot(name)?;
        let row = self.row_mut(instance)?;
        match slot {
            Slot::TimeOffset => row.time_offset = value,
            Slot::Brightness => row.brightness = value,
            Slot::Speed => row.speed = value,
            Slot::Mode => row.mode = value,
            Slot::Profile => row.profile = value,
            Slot::HuePrimary | Slot::HueSecondary => {
                return Err(ParameterError::Unknown(name.to_string()))
            }
        }
        Ok(())
    }

    fn set_color(
        &mut self,
        instance: InstanceId,
        name: &str,
        rgb: Vec3,
    ) -> Result<(), ParameterError> {
        let slot = self.slot(name)?;
        let row = self.row_mut(instance)?;
        match slot {
            Slot::HuePrimary => row.hue_primary = rgb.to_array(),
            Slot::HueSecondary => row.hue_secondary = rgb.to_array(),
            _ => return Err(ParameterError::Unknown(name.to_string())),
        }
        Ok(())
    }

    fn set_transform(&mut self, instance: InstanceId, scale: Vec3, translation: Vec3) {
        if let Some(row) = self.rows.get_mut(instance) {
            row.scale = scale.to_array();
            row.translation = translation.to_array();
        }
    }
}
