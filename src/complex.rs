use num::complex::Complex;

pub type C<T> = Complex<T>;

/// A single sample of the complex plane.
pub type ComplexPoint = C<f64>;

pub fn c(re: f64, im: f64) -> ComplexPoint {
    Complex::new(re, im)
}

pub fn cr(re: f64) -> ComplexPoint {
    c(re, 0.0)
}

pub fn ci(im: f64) -> ComplexPoint {
    c(0.0, im)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parts_compose() {
        assert_eq!(cr(-2.0) + ci(1.5), c(-2.0, 1.5));
    }

    #[test]
    fn test_square() {
        // (a+bi)^2 = (a^2 - b^2) + 2abi
        let z = c(3.0, 2.0);
        assert_eq!(z * z, c(5.0, 12.0));
    }
}
