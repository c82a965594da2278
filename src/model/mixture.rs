// src/model/mixture.rs
//! Two-component length mixtures used to size error events.
//!
//! Mismatch runs draw from a Poisson body, insertion and deletion runs from a
//! Weibull body; both fall back to a geometric tail. All draws are at least 1.

use crate::error::{Result, SimError};
use crate::model::markov::ErrorClass;
use rand::Rng;
use rand::distributions::Distribution;
use statrs::distribution::{Geometric, Poisson, Weibull};

/// Raw four-parameter vectors per error class, as found in the model profile.
///
/// Mismatch: `[lambda, unused, geometric_p, body_weight]`.
/// Insertion / deletion: `[weibull_scale, weibull_shape, geometric_p, body_weight]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureParams {
    pub mismatch: [f64; 4],
    pub insertion: [f64; 4],
    pub deletion: [f64; 4],
}

impl MixtureParams {
    pub fn get(&self, class: ErrorClass) -> &[f64; 4] {
        match class {
            ErrorClass::Mismatch => &self.mismatch,
            ErrorClass::Insertion => &self.insertion,
            ErrorClass::Deletion => &self.deletion,
        }
    }
}

/// Poisson+geometric draw: with probability `weight` take `Poisson(lambda) + 1`,
/// otherwise `Geometric(prob)`.
pub fn sample_poisson_geometric<R: Rng + ?Sized>(
    rng: &mut R,
    lambda: f64,
    prob: f64,
    weight: f64,
) -> Result<usize> {
    let body: f64 = rng.gen();
    if body < weight {
        let poisson = Poisson::new(lambda)?;
        Ok(poisson.sample(rng) as usize + 1)
    } else {
        let geometric = Geometric::new(prob)?;
        Ok((geometric.sample(rng) as usize).max(1))
    }
}

/// Weibull+geometric draw: with probability `weight` take
/// `round(Weibull(shape, scale))` (at least 1), otherwise `Geometric(prob)`.
pub fn sample_weibull_geometric<R: Rng + ?Sized>(
    rng: &mut R,
    scale: f64,
    shape: f64,
    prob: f64,
    weight: f64,
) -> Result<usize> {
    let body: f64 = rng.gen();
    if body < weight {
        let weibull = Weibull::new(shape, scale)?;
        Ok((weibull.sample(rng).round() as usize).max(1))
    } else {
        let geometric = Geometric::new(prob)?;
        Ok((geometric.sample(rng) as usize).max(1))
    }
}

/// Per-class length samplers built from validated profile parameters.
#[derive(Debug, Clone)]
pub struct LengthMixtures {
    params: MixtureParams,
}

impl LengthMixtures {
    /// Validate every parameter the samplers will need so that sampling
    /// cannot fail mid-run.
    pub fn new(params: MixtureParams) -> Result<Self> {
        let [lambda, _, p, w] = params.mismatch;
        check_mixture("mismatch", w, p)?;
        if w > 0.0 {
            Poisson::new(lambda)?;
        }
        for (name, vals) in [("insertion", params.insertion), ("deletion", params.deletion)] {
            let [scale, shape, p, w] = vals;
            check_mixture(name, w, p)?;
            if w > 0.0 {
                Weibull::new(shape, scale)?;
            }
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &MixtureParams {
        &self.params
    }

    /// Unweighted length draw for one error class.
    pub fn sample<R: Rng + ?Sized>(&self, class: ErrorClass, rng: &mut R) -> Result<usize> {
        let par = self.params.get(class);
        match class {
            ErrorClass::Mismatch => sample_poisson_geometric(rng, par[0], par[2], par[3]),
            ErrorClass::Insertion | ErrorClass::Deletion => {
                sample_weibull_geometric(rng, par[0], par[1], par[2], par[3])
            }
        }
    }

    /// Length draw scaled by an operator weight; zero weight yields zero length.
    pub fn sample_weighted<R: Rng + ?Sized>(
        &self,
        class: ErrorClass,
        class_weight: f64,
        rng: &mut R,
    ) -> Result<usize> {
        if class_weight <= 0.0 {
            return Ok(0);
        }
        let step = self.sample(class, rng)?;
        Ok((step as f64 * class_weight).round() as usize)
    }
}

fn check_mixture(name: &str, weight: f64, prob: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(SimError::config(format!(
            "{} mixture weight {} outside [0, 1]",
            name, weight
        )));
    }
    if weight < 1.0 {
        Geometric::new(prob)?;
    }
    Ok(())
}
