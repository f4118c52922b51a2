//! Dense `(n, m, l)` arrays of basis-function moments.

use crate::weno_error::WenoError;

/// Dense 3D array indexed by monomial exponents `(n, m, l)`.
///
/// Typically holds integrals of the basis functions over a face or cell in
/// reference space. Extents are one past the largest exponent along each axis.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentArray {
    extents: [usize; 3],
    data: Vec<f64>,
}

impl MomentArray {
    /// Zero-filled array able to hold exponents up to `caps` on each axis.
    pub fn zeros(caps: [usize; 3]) -> Self {
        let extents = [caps[0] + 1, caps[1] + 1, caps[2] + 1];
        Self {
            extents,
            data: vec![0.0; extents[0] * extents[1] * extents[2]],
        }
    }

    /// Build from a closure evaluated at every `(n, m, l)`.
    pub fn from_fn(caps: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut out = Self::zeros(caps);
        for n in 0..out.extents[0] {
            for m in 0..out.extents[1] {
                for l in 0..out.extents[2] {
                    out.set(n, m, l, f(n, m, l));
                }
            }
        }
        out
    }

    #[inline]
    pub fn extents(&self) -> [usize; 3] {
        self.extents
    }

    /// Whether exponents up to `caps` fit in this array.
    #[inline]
    pub fn covers(&self, caps: [usize; 3]) -> bool {
        (0..3).all(|a| caps[a] < self.extents[a])
    }

    #[inline]
    fn offset(&self, n: usize, m: usize, l: usize) -> usize {
        (n * self.extents[1] + m) * self.extents[2] + l
    }

    /// # Panics
    /// Panics if the exponents exceed the extents.
    #[inline]
    pub fn get(&self, n: usize, m: usize, l: usize) -> f64 {
        self.data[self.offset(n, m, l)]
    }

    /// # Panics
    /// Panics if the exponents exceed the extents.
    #[inline]
    pub fn set(&mut self, n: usize, m: usize, l: usize, v: f64) {
        let o = self.offset(n, m, l);
        self.data[o] = v;
    }

    /// Checked read.
    pub fn try_get(&self, n: usize, m: usize, l: usize) -> Result<f64, WenoError> {
        if self.covers([n, m, l]) {
            Ok(self.get(n, m, l))
        } else {
            Err(WenoError::MomentShape {
                extents: self.extents,
                dims: [n, m, l],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_layout() {
        let a = MomentArray::from_fn([1, 2, 0], |n, m, l| (100 * n + 10 * m + l) as f64);
        assert_eq!(a.extents(), [2, 3, 1]);
        assert_eq!(a.get(1, 2, 0), 120.0);
        assert_eq!(a.get(0, 1, 0), 10.0);
        assert!(a.try_get(0, 0, 1).is_err());
    }
}
