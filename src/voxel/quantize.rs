//! Coordinate quantization
//!
//! Every coordinate is quantized before it is stored or compared, so two
//! commands that name "the same" voxel always agree on its key.

use serde::{Deserialize, Serialize};

use crate::core::types::DVec3;

/// Rounding policy for stored coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantizeMode {
    /// Round to one decimal, then truncate toward zero
    #[default]
    Integer,
    /// Round to two decimals
    Float,
}

impl QuantizeMode {
    /// Quantize a single value.
    ///
    /// Rounding is half away from zero (`f64::round`): `0.125` becomes `0.13`
    /// and `-0.125` becomes `-0.13` in float mode. Integer mode rounds to
    /// tenths first, so `2.96` becomes `3` while `2.94` becomes `2`.
    ///
    /// NaN and infinities are outside the contract; callers reject them first.
    pub fn quantize(self, value: f64) -> f64 {
        let q = match self {
            Self::Float => (value * 100.0).round() / 100.0,
            Self::Integer => ((value * 10.0).round() / 10.0).trunc(),
        };
        // collapse -0.0 so keys compare and serialize as 0
        q + 0.0
    }

    /// Quantize every value of a slice
    pub fn quantize_all(self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.quantize(v)).collect()
    }

    /// Quantize a fixed-size group of values
    pub fn quantize_array<const N: usize>(self, values: [f64; N]) -> [f64; N] {
        values.map(|v| self.quantize(v))
    }

    pub fn quantize_vec3(self, v: DVec3) -> DVec3 {
        DVec3::from_array(self.quantize_array(v.to_array()))
    }

    pub fn is_float(self) -> bool {
        self == Self::Float
    }
}
