use crate::error::{Error, Result};

/// Smoothing-kernel family used for density estimation.
///
/// Both forms are radially symmetric falloffs with compact support: zero
/// beyond the smoothing radius, monotonically decreasing inside it. The two
/// families share no normalization and are not numerically equivalent; one is
/// selected per configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kernel {
    /// Linear falloff `1 - d/r`, value 1 at the sample point itself.
    #[default]
    Linear,
    /// Polynomial falloff `(r² − d²)³ / (π·r⁸/4)` with sharper central
    /// weight and zero value and slope at the support boundary.
    Poly6,
}

impl Kernel {
    /// Parse a kernel name from the external boundary.
    ///
    /// Errors: `Error::InvalidParam` for anything other than `"linear"` or
    /// `"poly6"`.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "linear" => Ok(Kernel::Linear),
            "poly6" => Ok(Kernel::Poly6),
            other => Err(Error::InvalidParam(format!(
                "unknown kernel {other:?}; expected \"linear\" or \"poly6\""
            ))),
        }
    }

    /// Evaluate the kernel at `distance` for the given smoothing `radius`.
    ///
    /// Returns 0 for any distance beyond the radius. The caller guarantees
    /// `radius > 0`.
    #[inline]
    pub fn value(&self, radius: f64, distance: f64) -> f64 {
        if distance > radius {
            return 0.0;
        }
        match self {
            Kernel::Linear => 1.0 - distance / radius,
            Kernel::Poly6 => {
                let diff = radius * radius - distance * distance;
                let volume = std::f64::consts::PI * radius.powi(8) / 4.0;
                diff * diff * diff / volume
            }
        }
    }
}

/// Magnitude-only falloff slope used by the density gradient.
///
/// Returns 0 when `distance >= radius` or `distance == 0`, else the constant
/// `-1/radius`. This is an approximation of the linear kernel's slope, not
/// the true derivative of its absolute value: the direction is supplied by
/// the caller, and no sign correctness beyond "points away from the sample"
/// is guaranteed. The polynomial family is never differentiated.
#[inline]
pub fn slope(radius: f64, distance: f64) -> f64 {
    if distance >= radius || distance == 0.0 {
        return 0.0;
    }
    -1.0 / radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() -> Result<()> {
        assert_eq!(Kernel::parse("linear")?, Kernel::Linear);
        assert_eq!(Kernel::parse("poly6")?, Kernel::Poly6);
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = Kernel::parse("gaussian").unwrap_err();
        assert!(err.to_string().contains("gaussian"));
    }

    #[test]
    fn linear_value_endpoints() {
        assert_eq!(Kernel::Linear.value(50.0, 0.0), 1.0);
        assert_eq!(Kernel::Linear.value(50.0, 50.0), 0.0);
        assert_eq!(Kernel::Linear.value(50.0, 51.0), 0.0);
        assert!((Kernel::Linear.value(50.0, 25.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn poly6_value_endpoints() {
        let r = 10.0;
        // At d = 0 the value is r^6 / (pi r^8 / 4) = 4 / (pi r^2).
        let center = Kernel::Poly6.value(r, 0.0);
        let expected = 4.0 / (std::f64::consts::PI * r * r);
        assert!((center - expected).abs() < 1e-12);
        assert_eq!(Kernel::Poly6.value(r, r), 0.0);
        assert_eq!(Kernel::Poly6.value(r, r + 1.0), 0.0);
    }

    #[test]
    fn values_decrease_monotonically() {
        for kernel in [Kernel::Linear, Kernel::Poly6] {
            let r = 50.0;
            let mut prev = kernel.value(r, 0.0);
            for i in 1..=50 {
                let d = r * (i as f64) / 50.0;
                let v = kernel.value(r, d);
                assert!(
                    v <= prev && v >= 0.0,
                    "{kernel:?} not decreasing at d={d}: {v} > {prev}"
                );
                prev = v;
            }
        }
    }

    #[test]
    fn slope_zero_outside_support_and_at_center() {
        assert_eq!(slope(50.0, 0.0), 0.0);
        assert_eq!(slope(50.0, 50.0), 0.0);
        assert_eq!(slope(50.0, 60.0), 0.0);
        assert!((slope(50.0, 25.0) + 1.0 / 50.0).abs() < 1e-15);
    }
}
