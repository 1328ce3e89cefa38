//! Per-field blending rules.

use serde::{Deserialize, Serialize};

/// Linear blend between two values at normalised time `tn`.
///
/// Integral encodings round to the nearest representable value.
pub trait Interpolate: Copy {
    fn interpolate(p1: Self, p2: Self, tn: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(p1: Self, p2: Self, tn: f64) -> Self {
        p1 + (p2 - p1) * tn
    }
}

impl Interpolate for f32 {
    fn interpolate(p1: Self, p2: Self, tn: f64) -> Self {
        f64::interpolate(f64::from(p1), f64::from(p2), tn) as f32
    }
}

macro_rules! impl_integral_interpolate {
    ($($ty:ty),*) => {
        $(
            impl Interpolate for $ty {
                fn interpolate(p1: Self, p2: Self, tn: f64) -> Self {
                    let delta = (f64::from(p2) - f64::from(p1)) * tn;
                    let value = f64::from(p1) + delta.round();
                    value.clamp(f64::from(<$ty>::MIN), f64::from(<$ty>::MAX)) as $ty
                }
            }
        )*
    };
}

impl_integral_interpolate!(i8, i16, i32, u8, u16);

impl<T: Interpolate, const N: usize> Interpolate for [T; N] {
    fn interpolate(p1: Self, p2: Self, tn: f64) -> Self {
        std::array::from_fn(|i| T::interpolate(p1[i], p2[i], tn))
    }
}

/// Value range of a circular quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleRange {
    /// [-180, 180), e.g. longitude.
    Signed180,
    /// [0, 360), e.g. heading.
    Unsigned360,
}

/// Blend two angles along the shortest arc.
pub fn interpolate_wrapped(p1: f64, p2: f64, tn: f64, range: AngleRange) -> f64 {
    let mut delta = p2 - p1;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    let value = p1 + delta * tn;
    match range {
        AngleRange::Signed180 => crate::math::normalise_longitude(value),
        AngleRange::Unsigned360 => crate::math::normalise_heading(value),
    }
}
