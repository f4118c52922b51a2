//! Nonlinear WENO weights and the weighted blend of candidate fits.
//!
//! With indicator `s_i` of stencil `i`:
//!
//! ```text
//! gamma_0 = dm / (eps + s_0)^p        (central stencil)
//! gamma_i =  1 / (eps + s_i)^p        (sectorial stencils)
//! w_i     = gamma_i / sum_j gamma_j
//! ```
//!
//! The weights are evaluated relative to the smallest `eps + s`, so every
//! term lies in `[0, bias]` and large indicators cannot underflow all gammas
//! to zero at once. The ratios, and therefore the weights, are the same.

use crate::field::FieldValue;
use crate::reconstruct::smoothness::component_slice;
use crate::stencil::CENTRAL_STENCIL;
use crate::weno_error::WenoError;

/// One scalar candidate: stencil index, indicator and coefficients.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    pub stencil: usize,
    pub indicator: f64,
    pub coefficients: &'a [f64],
}

/// Weights and blended coefficients of one scalar component.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarBlend {
    /// Weight per candidate, in candidate order.
    pub weights: Vec<f64>,
    pub coefficients: Vec<f64>,
}

/// Coefficients and per-component indicators of one solved stencil.
#[derive(Clone, Debug, PartialEq)]
pub struct StencilFit<V> {
    pub stencil: usize,
    pub coefficients: Vec<V>,
    pub indicators: Vec<f64>,
}

/// Blend of a cell's fits.
#[derive(Clone, Debug, PartialEq)]
pub struct Blend<V> {
    pub coefficients: Vec<V>,
    /// `weights[c][i]`: weight of fit `i` in component `c`.
    pub weights: Vec<Vec<f64>>,
}

/// Nonlinear weighting with fixed expert factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightCombiner {
    p: f64,
    dm: f64,
    eps: f64,
}

impl WeightCombiner {
    pub fn new(p: f64, dm: f64, eps: f64) -> Self {
        Self { p, dm, eps }
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn dm(&self) -> f64 {
        self.dm
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Bias of a stencil: `dm` for the central one, 1 otherwise.
    #[inline]
    pub fn linear_weight(&self, stencil: usize) -> f64 {
        if stencil == CENTRAL_STENCIL { self.dm } else { 1.0 }
    }

    /// Unnormalized weight in its explicit form.
    pub fn gamma(&self, stencil: usize, indicator: f64) -> f64 {
        self.linear_weight(stencil) / (self.eps + indicator).powf(self.p)
    }

    /// Normalized weights for `(stencil, indicator)` pairs.
    pub fn weights(&self, candidates: &[(usize, f64)]) -> Result<Vec<f64>, WenoError> {
        if candidates.is_empty() {
            return Err(WenoError::EmptyBlend);
        }
        let base = candidates
            .iter()
            .map(|&(_, s)| self.eps + s)
            .fold(f64::INFINITY, f64::min);
        let rel: Vec<f64> = candidates
            .iter()
            .map(|&(st, s)| self.linear_weight(st) * (base / (self.eps + s)).powf(self.p))
            .collect();
        let total: f64 = rel.iter().sum();
        Ok(rel.into_iter().map(|r| r / total).collect())
    }

    /// Weights and weighted sum of scalar candidates.
    pub fn combine_scalar(&self, candidates: &[Candidate<'_>]) -> Result<ScalarBlend, WenoError> {
        let first = candidates.first().ok_or(WenoError::EmptyBlend)?;
        let k = first.coefficients.len();
        if let Some(bad) = candidates.iter().find(|c| c.coefficients.len() != k) {
            return Err(WenoError::CoefficientLength {
                expected: k,
                got: bad.coefficients.len(),
            });
        }
        let pairs: Vec<(usize, f64)> =
            candidates.iter().map(|c| (c.stencil, c.indicator)).collect();
        let weights = self.weights(&pairs)?;
        let mut coefficients = vec![0.0; k];
        for (cand, &w) in candidates.iter().zip(&weights) {
            for (out, &c) in coefficients.iter_mut().zip(cand.coefficients) {
                *out += w * c;
            }
        }
        Ok(ScalarBlend {
            weights,
            coefficients,
        })
    }

    /// Blend per component, each with that component's indicators.
    pub fn combine<V: FieldValue>(&self, fits: &[StencilFit<V>]) -> Result<Blend<V>, WenoError> {
        let first = fits.first().ok_or(WenoError::EmptyBlend)?;
        if let Some(bad) = fits.iter().find(|f| f.indicators.len() != V::N_COMPONENTS) {
            return Err(WenoError::CoefficientLength {
                expected: V::N_COMPONENTS,
                got: bad.indicators.len(),
            });
        }
        let k = first.coefficients.len();
        let mut coefficients = vec![V::default(); k];
        let mut weights = Vec::with_capacity(V::N_COMPONENTS);
        for c in 0..V::N_COMPONENTS {
            let slices: Vec<Vec<f64>> = fits
                .iter()
                .map(|f| component_slice(&f.coefficients, c))
                .collect();
            let candidates: Vec<Candidate<'_>> = fits
                .iter()
                .zip(&slices)
                .map(|(f, s)| Candidate {
                    stencil: f.stencil,
                    indicator: f.indicators[c],
                    coefficients: s,
                })
                .collect();
            let blend = self.combine_scalar(&candidates)?;
            for (out, v) in coefficients.iter_mut().zip(blend.coefficients) {
                *out.component_mut(c) = v;
            }
            weights.push(blend.weights);
        }
        Ok(Blend {
            coefficients,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Vector3;

    fn combiner() -> WeightCombiner {
        WeightCombiner::new(4.0, 1000.0, 1e-5)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn equal_indicators_give_linear_weights() {
        let w = combiner().weights(&[(0, 0.3), (1, 0.3), (2, 0.3)]).unwrap();
        assert!(close(w[0], 1000.0 / 1002.0));
        assert!(close(w[1], 1.0 / 1002.0));
        assert!(close(w.iter().sum::<f64>(), 1.0));
    }

    #[test]
    fn stabilized_form_matches_explicit_gammas() {
        let cmb = combiner();
        let cands = [(0, 0.02), (1, 0.5), (2, 1e-4)];
        let w = cmb.weights(&cands).unwrap();
        let gammas: Vec<f64> = cands.iter().map(|&(i, s)| cmb.gamma(i, s)).collect();
        let total: f64 = gammas.iter().sum();
        for (wi, gi) in w.iter().zip(&gammas) {
            assert!(close(*wi, gi / total));
        }
    }

    #[test]
    fn huge_indicators_do_not_underflow() {
        let w = combiner().weights(&[(0, 1e200), (1, 1e210)]).unwrap();
        assert!(w.iter().all(|x| x.is_finite()));
        assert!(close(w.iter().sum::<f64>(), 1.0));
        assert!(w[0] > 0.99);
    }

    #[test]
    fn zero_indicators_stay_finite() {
        let w = combiner().weights(&[(0, 0.0), (1, 0.0)]).unwrap();
        assert!(close(w[0], 1000.0 / 1001.0));
    }

    #[test]
    fn rough_central_stencil_is_suppressed() {
        let w = combiner().weights(&[(0, 10.0), (1, 1e-6), (2, 1e-6)]).unwrap();
        assert!(w[0] < 1e-9);
        assert!(close(w[1], w[2]));
    }

    #[test]
    fn combine_scalar_blends_coefficients() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        let blend = combiner()
            .combine_scalar(&[
                Candidate {
                    stencil: 1,
                    indicator: 0.1,
                    coefficients: &a,
                },
                Candidate {
                    stencil: 2,
                    indicator: 0.1,
                    coefficients: &b,
                },
            ])
            .unwrap();
        assert_eq!(blend.weights, vec![0.5, 0.5]);
        assert_eq!(blend.coefficients, vec![2.0, 3.0]);
    }

    #[test]
    fn empty_and_ragged_inputs_rejected() {
        assert_eq!(combiner().weights(&[]).unwrap_err(), WenoError::EmptyBlend);
        let err = combiner()
            .combine_scalar(&[
                Candidate {
                    stencil: 0,
                    indicator: 0.0,
                    coefficients: &[1.0],
                },
                Candidate {
                    stencil: 1,
                    indicator: 0.0,
                    coefficients: &[],
                },
            ])
            .unwrap_err();
        assert_eq!(err, WenoError::CoefficientLength { expected: 1, got: 0 });
    }

    #[test]
    fn vector_components_weighted_independently() {
        let fits = vec![
            StencilFit {
                stencil: 0,
                coefficients: vec![Vector3([1.0, 1.0, 1.0])],
                indicators: vec![0.0, 5.0, 0.0],
            },
            StencilFit {
                stencil: 1,
                coefficients: vec![Vector3([2.0, 2.0, 2.0])],
                indicators: vec![0.0, 0.0, 0.0],
            },
        ];
        let blend = combiner().combine(&fits).unwrap();
        assert_eq!(blend.weights.len(), 3);
        assert!(close(blend.weights[0][0], 1000.0 / 1001.0));
        assert_eq!(blend.weights[0], blend.weights[2]);
        assert!(blend.weights[1][0] < 1e-6);
        assert!(blend.coefficients[0].0[1] > 1.999);
    }
}
