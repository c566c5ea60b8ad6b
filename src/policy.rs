//! Contract for the external scoring model.
//!
//! A policy maps the 79-float feature vector to one score per hand slot. It is
//! opaque to the engine and allowed to fail; every failure is recoverable.

use crate::features::Features;
use crate::game::HAND_SIZE;
use std::fmt;

/// Policy failures. None of these ever reach the player.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("no policy loaded")]
    Unavailable,
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Scores candidate slots for a feature vector.
pub trait ScoringPolicy {
    fn name(&self) -> &str {
        "policy"
    }

    fn score(&mut self, features: &Features) -> Result<Vec<f32>, PolicyError>;
}

impl fmt::Debug for dyn ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScoringPolicy({})", self.name())
    }
}

/// Index of the highest score; the first one wins ties and NaN never wins.
///
/// ```
/// use durak_rs::policy::argmax;
///
/// assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), Some(1));
/// assert_eq!(argmax(&[]), None);
/// assert_eq!(argmax(&[f32::NAN]), None);
/// ```
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Wraps a closure as a policy.
pub struct FnPolicy<F> {
    name: String,
    f: F,
}

impl<F> FnPolicy<F>
where
    F: FnMut(&Features) -> Result<Vec<f32>, PolicyError>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> ScoringPolicy for FnPolicy<F>
where
    F: FnMut(&Features) -> Result<Vec<f32>, PolicyError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&mut self, features: &Features) -> Result<Vec<f32>, PolicyError> {
        (self.f)(features)
    }
}

/// Scores every slot equally, so the first legal candidate is chosen.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPolicy;

impl ScoringPolicy for UniformPolicy {
    fn name(&self) -> &str {
        "uniform"
    }

    fn score(&mut self, _features: &Features) -> Result<Vec<f32>, PolicyError> {
        Ok(vec![1.0; HAND_SIZE])
    }
}
