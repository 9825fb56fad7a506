//! Block argument validation

use voxelamming_link::{AnimationParams, NumArg};

use crate::core::error::Error;
use crate::core::types::{Color, DVec3, Result};
use crate::voxel::MAX_COORDINATE;

/// Coerce a block argument, rejecting NaN and infinities
pub fn number(arg: &NumArg, name: &'static str) -> Result<f64> {
    let value = arg.coerce();
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidArgument {
            name,
            value: match arg {
                NumArg::Number(v) => v.to_string(),
                NumArg::Text(s) => s.clone(),
            },
        })
    }
}

/// Like [`number`], also rejecting values beyond [`MAX_COORDINATE`]
pub fn coordinate(arg: &NumArg, name: &'static str) -> Result<f64> {
    let value = number(arg, name)?;
    if value.abs() <= MAX_COORDINATE {
        Ok(value)
    } else {
        Err(Error::InvalidArgument {
            name,
            value: value.to_string(),
        })
    }
}

pub fn vec3(x: &NumArg, y: &NumArg, z: &NumArg) -> Result<DVec3> {
    Ok(DVec3::new(
        coordinate(x, "x")?,
        coordinate(y, "y")?,
        coordinate(z, "z")?,
    ))
}

/// Check a computed position, such as a turtle move target, against
/// [`MAX_COORDINATE`]. `name` is the argument that produced it.
pub fn within_bounds(position: DVec3, name: &'static str) -> Result<DVec3> {
    if position.abs().max_element() <= MAX_COORDINATE {
        Ok(position)
    } else {
        Err(Error::InvalidArgument {
            name,
            value: position.to_string(),
        })
    }
}

pub fn color(r: &NumArg, g: &NumArg, b: &NumArg, alpha: &NumArg) -> Result<Color> {
    Ok(Color::new(
        number(r, "r")?,
        number(g, "g")?,
        number(b, "b")?,
        number(alpha, "alpha")?,
    ))
}

/// `[x, y, z, pitch, yaw, roll, scale, interval]`
pub fn animation(params: &AnimationParams) -> Result<[f64; 8]> {
    Ok([
        number(&params.x, "x")?,
        number(&params.y, "y")?,
        number(&params.z, "z")?,
        number(&params.pitch, "pitch")?,
        number(&params.yaw, "yaw")?,
        number(&params.roll, "roll")?,
        number(&params.scale, "scale")?,
        number(&params.interval, "interval")?,
    ])
}
