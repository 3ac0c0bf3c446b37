//! Minimal complex value type used by the FFT.

use std::ops::{Add, Mul};

/// A complex number with single-precision parts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// Purely real value (imaginary part zero)
    pub const fn from_real(re: f32) -> Self {
        Self { re, im: 0.0 }
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f32 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    pub fn conj(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_multiply() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);

        // (1 + 2i)(3 - i) = 3 - i + 6i - 2i² = 5 + 5i
        assert_eq!(a * b, Complex::new(5.0, 5.0));

        // i * i = -1
        let i = Complex::new(0.0, 1.0);
        assert_eq!(i * i, Complex::new(-1.0, 0.0));
    }

    #[test]
    fn test_complex_add() {
        let sum = Complex::new(1.5, -2.0) + Complex::new(-0.5, 4.0);
        assert_eq!(sum, Complex::new(1.0, 2.0));
    }

    #[test]
    fn test_complex_magnitude() {
        assert_eq!(Complex::new(3.0, 4.0).magnitude(), 5.0);
        assert_eq!(Complex::ZERO.magnitude(), 0.0);
        assert_eq!(Complex::from_real(-2.0).magnitude(), 2.0);
    }

    #[test]
    fn test_conjugate_product_is_squared_magnitude() {
        let z = Complex::new(0.6, -0.8);
        let product = z * z.conj();
        assert!((product.re - 1.0).abs() < 1e-6);
        assert!(product.im.abs() < 1e-6);
    }
}
