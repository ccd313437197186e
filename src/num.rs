use fastnum::{
    D128, bint,
    decimal::{Context, Sign},
};

/// Fixed-point to decimal converter.
///
/// Asset quantities travel on the wire as integer units scaled by the
/// symbol's decimal count. The converter maps between those units and
/// decimal amounts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub(crate) fn new(decimals: u32) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals as u32
    }

    pub fn from_units(&self, value: i128) -> D128 {
        let unscaled = bint::UInt::<2>::from_le_slice(&value.unsigned_abs().to_le_bytes())
            .expect("Converter: |i128| -> UInt::<2>");
        D128::from_parts(
            unscaled,
            -self.decimals,
            if value < 0 { Sign::Minus } else { Sign::Plus },
            Context::default(),
        )
    }

    /// Rescales to the converter's decimal count, rounding per the value's
    /// decimal context, and returns the unscaled integer units.
    pub fn to_units(&self, value: D128) -> i128 {
        let rescaled = value.rescale(self.decimals as i16);
        let mut le = [0u8; 16];
        for (dst, src) in le.iter_mut().zip(rescaled.digits().to_radix_le(256)) {
            *dst = src;
        }
        let units = i128::from_le_bytes(le);
        if value.is_negative() {
            units.saturating_neg()
        } else {
            units
        }
    }
}

#[cfg(test)]
mod tests {
    use fastnum::dec128;

    use super::*;

    #[test]
    fn test_converter_from_units() {
        assert_eq!(Converter::new(0).from_units(12345), dec128!(12345));
        assert_eq!(Converter::new(4).from_units(12345), dec128!(1.2345));
        assert_eq!(Converter::new(9).from_units(12345), dec128!(0.000012345));
        assert_eq!(Converter::new(4).from_units(-12345), dec128!(-1.2345));
    }

    #[test]
    fn test_converter_to_units() {
        assert_eq!(Converter::new(0).to_units(dec128!(12345)), 12345);
        assert_eq!(Converter::new(4).to_units(dec128!(1.2345)), 12345);
        assert_eq!(Converter::new(9).to_units(dec128!(0.000012345)), 12345);
        assert_eq!(Converter::new(4).to_units(dec128!(-1.2345)), -12345);
    }

    #[test]
    fn test_converter_to_units_extends_scale() {
        assert_eq!(Converter::new(4).to_units(dec128!(1)), 10000);
        assert_eq!(Converter::new(8).to_units(dec128!(2.5)), 250000000);
    }
}
