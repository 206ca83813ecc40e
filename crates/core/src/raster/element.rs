//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Trait for types that can be stored in a raster cell.
///
/// Besides the numeric bounds, an element must parse from and print to the
/// tokens of an ASCII grid row.
pub trait RasterElement:
    Copy + Clone + Debug + Display + FromStr + PartialOrd + PartialEq + NumCast + Zero + 'static
{
    /// Check if this value represents no-data.
    ///
    /// Comparison against the sentinel is exact, never within a tolerance.
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// Format the value as an ASCII grid token.
    ///
    /// `precision` fixes the number of decimals for floating point types
    /// and is ignored for integers.
    fn to_token(&self, precision: Option<usize>) -> String {
        match precision {
            Some(p) if Self::is_float() => format!("{:.*}", p, self),
            _ => self.to_string(),
        }
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty) => {
        impl RasterElement for $t {
            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                match nodata {
                    Some(nd) => *self == nd,
                    None => false,
                }
            }

            fn is_float() -> bool {
                false
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty) => {
        impl RasterElement for $t {
            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                if self.is_nan() {
                    return true;
                }
                match nodata {
                    Some(nd) => *self == nd,
                    None => false,
                }
            }

            fn is_float() -> bool {
                true
            }
        }
    };
}

impl_raster_element_int!(i32);
impl_raster_element_int!(i64);
impl_raster_element_float!(f32);
impl_raster_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_nodata_match() {
        assert!((-9999.0_f64).is_nodata(Some(-9999.0)));
        assert!(!(-9999.000001_f64).is_nodata(Some(-9999.0)));
        assert!((-9999_i64).is_nodata(Some(-9999)));
        assert!(!5_i64.is_nodata(None));
    }

    #[test]
    fn test_nan_is_always_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(f32::NAN.is_nodata(Some(0.0)));
    }

    #[test]
    fn test_token_formatting() {
        assert_eq!(0.1_f64.to_token(None), "0.1");
        assert_eq!(1.5_f64.to_token(Some(3)), "1.500");
        assert_eq!(42_i64.to_token(Some(3)), "42");
    }
}
