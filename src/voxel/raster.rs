//! Line rasterization
//!
//! A segment is walked one unit at a time along its dominant axis. The two
//! minor axes are recomputed from the segment start at every step, not
//! accumulated, so each voxel depends only on its step index.

use glam::I64Vec3;

use crate::core::types::{DVec3, IVec3};

/// Voxels along a segment, in order from start to end.
///
/// Both endpoints are floored to integer coordinates first, saturating at
/// the `i32` range. A segment whose floored endpoints coincide yields
/// nothing. Minor-axis ties round towards positive infinity.
pub fn rasterize(p1: DVec3, p2: DVec3) -> LineVoxels {
    let start = p1.floor().as_ivec3();
    let end = p2.floor().as_ivec3();
    LineVoxels::new(start, end)
}

/// Iterator over the voxels of one rasterized segment
#[derive(Debug, Clone)]
pub struct LineVoxels {
    start: I64Vec3,
    // Widened so that spans across the whole i32 range cannot overflow
    delta: I64Vec3,
    /// Index of the dominant axis (0 = x, 1 = y, 2 = z)
    axis: usize,
    /// +1 or -1 along the dominant axis
    step: i64,
    next: i64,
    count: i64,
}

impl LineVoxels {
    fn new(start: IVec3, end: IVec3) -> Self {
        let start = start.as_i64vec3();
        let delta = end.as_i64vec3() - start;
        let axis = dominant_axis(delta);
        let span = delta[axis];
        let count = if delta == I64Vec3::ZERO { 0 } else { span.abs() + 1 };

        Self {
            start,
            delta,
            axis,
            step: span.signum(),
            next: 0,
            count,
        }
    }

    /// Dominant axis of this segment (0 = x, 1 = y, 2 = z)
    pub fn dominant_axis(&self) -> usize {
        self.axis
    }

    fn voxel_at(&self, index: i64) -> IVec3 {
        let offset = index * self.step;
        let span = self.delta[self.axis] as f64;

        let mut voxel = I64Vec3::ZERO;
        for k in 0..3 {
            voxel[k] = if k == self.axis {
                self.start[k] + offset
            } else {
                let t = offset as f64 * self.delta[k] as f64 / span;
                (self.start[k] as f64 + t + 0.5).floor() as i64
            };
        }
        // Every component lies between the two i32 endpoints
        voxel.as_ivec3()
    }
}

impl Iterator for LineVoxels {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.next >= self.count {
            return None;
        }
        let voxel = self.voxel_at(self.next);
        self.next += 1;
        Some(voxel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from((self.count - self.next).max(0)).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineVoxels {}

/// Axis with the largest absolute delta; ties go to x, then y.
fn dominant_axis(delta: I64Vec3) -> usize {
    let a = delta.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}
