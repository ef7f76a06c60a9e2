//! Cell value types

use num_traits::NumCast;
use std::fmt::Debug;

/// Types that can be stored in a raster cell.
///
/// Floating point rasters treat `NaN` as no-data unconditionally; an explicit
/// no-data value, when present, is matched exactly.
pub trait RasterElement:
    Copy + Debug + PartialOrd + NumCast + num_traits::Zero + Send + Sync + 'static
{
    /// Value written when a cell has no data and none was declared
    fn default_nodata() -> Self;

    /// Whether this value is no-data given the raster's declared value
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Lossy conversion to f64; `None` if the cast is not representable
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// Lossy conversion from f64, falling back to [`default_nodata`](Self::default_nodata)
    fn from_f64(value: f64) -> Self {
        NumCast::from(value).unwrap_or_else(Self::default_nodata)
    }
}

macro_rules! impl_int_element {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MIN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata == Some(*self)
            }
        }
    )*};
}

macro_rules! impl_float_element {
    ($($t:ty),*) => {$(
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                self.is_nan() || nodata.is_some_and(|nd| *self == nd)
            }
        }
    )*};
}

impl_int_element!(u8, u16, i16, i32);
impl_float_element!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!((-9999.0f64).is_nodata(Some(-9999.0)));
        assert!(!(-9998.0f64).is_nodata(Some(-9999.0)));
    }

    #[test]
    fn test_int_nodata() {
        assert!(!0u8.is_nodata(None));
        assert!(255u8.is_nodata(Some(255)));
        assert_eq!(u8::from_f64(f64::NAN), u8::MIN);
    }
}
