//! Global settings and take descriptors.

use tracing::debug;

use super::properties;
use crate::format::Element;
use crate::util::{fbx_time_to_seconds, Error, Result};

/// Scene time mode, as stored in `GlobalSettings/TimeMode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeMode {
    #[default]
    Default,
    Frames120,
    Frames100,
    Frames60,
    Frames50,
    Frames48,
    Frames30,
    Frames30Drop,
    NtscDropFrame,
    NtscFullFrame,
    Pal,
    Cinema,
    Frames1000,
    CinemaNd,
    Custom,
    Frames96,
    Frames72,
    Frames59_94,
    Unknown(i32),
}

impl TimeMode {
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::Default,
            1 => Self::Frames120,
            2 => Self::Frames100,
            3 => Self::Frames60,
            4 => Self::Frames50,
            5 => Self::Frames48,
            6 => Self::Frames30,
            7 => Self::Frames30Drop,
            8 => Self::NtscDropFrame,
            9 => Self::NtscFullFrame,
            10 => Self::Pal,
            11 => Self::Cinema,
            12 => Self::Frames1000,
            13 => Self::CinemaNd,
            14 => Self::Custom,
            15 => Self::Frames96,
            16 => Self::Frames72,
            17 => Self::Frames59_94,
            other => Self::Unknown(other),
        }
    }
}

/// Axis conventions, units and timing from `GlobalSettings`.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub up_axis: i32,
    pub up_axis_sign: i32,
    pub front_axis: i32,
    pub front_axis_sign: i32,
    pub coord_axis: i32,
    pub coord_axis_sign: i32,
    pub original_up_axis: i32,
    pub original_up_axis_sign: i32,
    pub unit_scale_factor: f64,
    pub original_unit_scale_factor: f64,
    /// Seconds.
    pub time_span_start: f64,
    /// Seconds.
    pub time_span_stop: f64,
    pub time_mode: TimeMode,
    pub custom_frame_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            up_axis: 1,
            up_axis_sign: 1,
            front_axis: 2,
            front_axis_sign: 1,
            coord_axis: 0,
            coord_axis_sign: 1,
            original_up_axis: 1,
            original_up_axis_sign: 1,
            unit_scale_factor: 1.0,
            original_unit_scale_factor: 1.0,
            time_span_start: 0.0,
            time_span_stop: 0.0,
            time_mode: TimeMode::Default,
            custom_frame_rate: -1.0,
        }
    }
}

impl Settings {
    /// Read `GlobalSettings` from the document root; absent values keep their defaults.
    pub fn parse(root: &Element) -> Self {
        let mut s = Self::default();
        let Some(gs) = root.child("GlobalSettings") else {
            debug!("no GlobalSettings section");
            return s;
        };

        s.up_axis = properties::resolve_enum(gs, "UpAxis", s.up_axis);
        s.up_axis_sign = properties::resolve_enum(gs, "UpAxisSign", s.up_axis_sign);
        s.front_axis = properties::resolve_enum(gs, "FrontAxis", s.front_axis);
        s.front_axis_sign = properties::resolve_enum(gs, "FrontAxisSign", s.front_axis_sign);
        s.coord_axis = properties::resolve_enum(gs, "CoordAxis", s.coord_axis);
        s.coord_axis_sign = properties::resolve_enum(gs, "CoordAxisSign", s.coord_axis_sign);
        s.original_up_axis = properties::resolve_enum(gs, "OriginalUpAxis", s.original_up_axis);
        s.original_up_axis_sign =
            properties::resolve_enum(gs, "OriginalUpAxisSign", s.original_up_axis_sign);
        s.unit_scale_factor = properties::resolve_f64(gs, "UnitScaleFactor", s.unit_scale_factor);
        s.original_unit_scale_factor =
            properties::resolve_f64(gs, "OriginalUnitScaleFactor", s.original_unit_scale_factor);
        s.time_span_start = fbx_time_to_seconds(properties::resolve_i64(gs, "TimeSpanStart", 0));
        s.time_span_stop = fbx_time_to_seconds(properties::resolve_i64(gs, "TimeSpanStop", 0));
        s.time_mode = TimeMode::from_i32(properties::resolve_enum(gs, "TimeMode", 0));
        s.custom_frame_rate =
            properties::resolve_f64(gs, "CustomFrameRate", f64::from(s.custom_frame_rate)) as f32;
        s
    }

    /// Frames per second implied by the time mode.
    pub fn frame_rate(&self) -> Option<f32> {
        Some(match self.time_mode {
            TimeMode::Frames120 => 120.0,
            TimeMode::Frames100 => 100.0,
            TimeMode::Frames60 => 60.0,
            TimeMode::Frames50 => 50.0,
            TimeMode::Frames48 => 48.0,
            TimeMode::Frames30 | TimeMode::Frames30Drop => 30.0,
            TimeMode::NtscDropFrame | TimeMode::NtscFullFrame => 29.970_026,
            TimeMode::Pal => 25.0,
            TimeMode::Cinema => 24.0,
            TimeMode::Frames1000 => 1000.0,
            TimeMode::CinemaNd => 23.976,
            TimeMode::Custom if self.custom_frame_rate > 0.0 => self.custom_frame_rate,
            TimeMode::Frames96 => 96.0,
            TimeMode::Frames72 => 72.0,
            TimeMode::Frames59_94 => 59.94,
            TimeMode::Default | TimeMode::Custom | TimeMode::Unknown(_) => return None,
        })
    }
}

/// A named animation clip from the `Takes` section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TakeInfo {
    pub name: String,
    pub filename: String,
    /// Seconds.
    pub local_time_from: f64,
    pub local_time_to: f64,
    pub reference_time_from: f64,
    pub reference_time_to: f64,
}

/// Parse the `Takes` section. A missing section yields no takes.
pub fn parse_takes(root: &Element) -> Result<Vec<TakeInfo>> {
    let Some(section) = root.child("Takes") else {
        return Ok(Vec::new());
    };

    let mut takes = Vec::new();
    for take in section.children_named("Take") {
        let name = take
            .property(0)
            .filter(|p| p.is_string())
            .ok_or_else(|| Error::invalid("Take without a name"))?;

        let mut info = TakeInfo { name: name.to_str().into_owned(), ..TakeInfo::default() };
        if let Some(file) = take.child_property("FileName") {
            info.filename = file.to_str().into_owned();
        }
        if let Some((from, to)) = time_range(take, "LocalTime") {
            info.local_time_from = from;
            info.local_time_to = to;
        }
        if let Some((from, to)) = time_range(take, "ReferenceTime") {
            info.reference_time_from = from;
            info.reference_time_to = to;
        }
        takes.push(info);
    }
    debug!(count = takes.len(), "parsed takes");
    Ok(takes)
}

fn time_range(take: &Element, name: &str) -> Option<(f64, f64)> {
    let el = take.child(name)?;
    let from = el.property(0)?.to_i64();
    let to = el.property(1)?.to_i64();
    Some((fbx_time_to_seconds(from), fbx_time_to_seconds(to)))
}
