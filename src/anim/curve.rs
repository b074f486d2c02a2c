//! Keyframe curves.

use crate::format::Element;
use crate::util::{fbx_time_to_seconds, Error, Result};

/// `AnimationCurve`: parallel key times and values.
///
/// Keys are kept in file order and assumed non-decreasing in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationCurve {
    /// Key times in FBX ticks.
    pub times: Vec<i64>,
    pub values: Vec<f32>,
}

impl AnimationCurve {
    pub fn parse(element: &Element, id: u64) -> Result<Self> {
        let times = match element.child_property("KeyTime") {
            Some(p) => p.to_i64_vec()?,
            None => Vec::new(),
        };
        let values = match element.child_property("KeyValueFloat") {
            Some(p) => p.to_f32_vec()?,
            None => Vec::new(),
        };
        if times.len() != values.len() {
            return Err(Error::InvalidAnimationCurve {
                id,
                times: times.len(),
                values: values.len(),
            });
        }
        Ok(Self { times, values })
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.times.len()
    }

    /// Linearly interpolated value at `time` seconds, clamped to the end keys.
    /// A NaN time reads the first key.
    pub fn sample(&self, time: f64) -> f32 {
        match self.values.as_slice() {
            [] => return 0.0,
            [only] => return *only,
            _ => {}
        }
        let seconds = |i: usize| fbx_time_to_seconds(self.times[i]);
        let last = self.times.len() - 1;

        if time.is_nan() || time <= seconds(0) {
            return self.values[0];
        }
        if time >= seconds(last) {
            return self.values[last];
        }

        // first key strictly after `time`; 1..=last given the clamps above
        let next = self.times.partition_point(|&t| fbx_time_to_seconds(t) <= time);
        let prev = next - 1;
        let (t0, t1) = (seconds(prev), seconds(next));
        let span = t1 - t0;
        if span <= 0.0 {
            return self.values[next];
        }
        let f = (time - t0) / span;
        let (v0, v1) = (f64::from(self.values[prev]), f64::from(self.values[next]));
        (v0 + (v1 - v0) * f) as f32
    }
}
