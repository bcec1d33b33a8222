use num::{Float, Num};

use crate::complex::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min < self.max
    }
}

impl<T> Axis<T>
where
    T: Float,
{
    // left-inclusive, max is never reached
    pub fn sample(&self, i: usize, n: usize) -> T {
        let i = T::from(i).unwrap_or_else(T::zero);
        let n = T::from(n).unwrap_or_else(T::one);
        self.min + (i / n) * self.length()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x: Axis<f64>,
    pub y: Axis<f64>,
}

impl Viewport {
    pub fn new(x: Axis<f64>, y: Axis<f64>) -> Self {
        Self { x, y }
    }

    pub fn from_bounds(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self::new(Axis::new(x_min, x_max), Axis::new(y_min, y_max))
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    pub fn point_at(&self, x: usize, y: usize, width: usize, height: usize) -> ComplexPoint {
        let cx = cr(self.x.sample(x, width));
        let cy = ci(self.y.sample(y, height));
        cx + cy
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_bounds(-2.0, 1.0, -1.5, 1.5)
    }
}
