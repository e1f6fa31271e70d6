use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GardenConfig, MAX_ATTEMPTS_LIMIT};
use crate::error::{GardenError, Result};
use crate::rng::Rng;

/// A point on the ground plane. `z` is the second horizontal axis; height
/// is never part of placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn dist_sq(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Lift onto the ground as `[x, y, z]`.
    pub fn at_height(&self, y: f64) -> [f64; 3] {
        [self.x, y, self.z]
    }

    /// Inverse of `at_height`, dropping the height.
    pub fn from_ground(p: [f64; 3]) -> Self {
        Self { x: p[0], z: p[2] }
    }
}

/// Where candidates are drawn from. Both shapes are centered on the origin
/// and sampled with uniform areal density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    Disk { radius: f64 },
    Annulus { inner: f64, outer: f64 },
}

impl Region {
    /// One uniform-by-area candidate.
    pub fn sample(&self, rng: &mut Rng) -> Point2 {
        let angle = rng.angle();
        let u = rng.next_f64();
        let distance = match *self {
            // sqrt keeps density uniform per unit area instead of per unit radius
            Region::Disk { radius } => u.sqrt() * radius,
            Region::Annulus { inner, outer } => {
                let (i2, o2) = (inner * inner, outer * outer);
                (i2 + u * (o2 - i2)).sqrt()
            }
        };
        Point2::new(angle.cos() * distance, angle.sin() * distance)
    }

    /// Radius at which fallback points land: just inside the outer edge,
    /// never inside the hole of an annulus.
    fn fallback_radius(&self, inset: f64) -> f64 {
        match *self {
            Region::Disk { radius } => (radius - inset).max(0.0),
            Region::Annulus { inner, outer } => (outer - inset).max(inner),
        }
    }

    pub fn outer_radius(&self) -> f64 {
        match *self {
            Region::Disk { radius } => radius,
            Region::Annulus { outer, .. } => outer,
        }
    }
}

/// Result of one placement. `fallback` is set when every candidate
/// collided and the boundary point was used instead; such a point may sit
/// closer than the minimum separation to an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub position: Point2,
    pub fallback: bool,
}

/// First-fit rejection sampler with a bounded retry budget.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampler {
    pub region: Region,
    /// `None` disables the collision check entirely (coins, decorations).
    pub min_separation: Option<f64>,
    pub max_attempts: usize,
    pub fallback_inset: f64,
}

impl Sampler {
    pub fn disk(radius: f64, min_separation: f64) -> Self {
        Self {
            region: Region::Disk { radius },
            min_separation: Some(min_separation),
            max_attempts: 50,
            fallback_inset: 0.5,
        }
    }

    pub fn annulus(inner: f64, outer: f64) -> Self {
        Self {
            region: Region::Annulus { inner, outer },
            min_separation: None,
            max_attempts: 50,
            fallback_inset: 0.5,
        }
    }

    /// The flower bed sampler described by `config`.
    pub fn flower_bed(config: &GardenConfig) -> Self {
        Self {
            region: Region::Disk {
                radius: config.garden_radius,
            },
            min_separation: Some(config.min_separation),
            max_attempts: config.max_attempts,
            fallback_inset: config.fallback_inset,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_fallback_inset(mut self, inset: f64) -> Self {
        self.fallback_inset = inset;
        self
    }

    /// Check the parameters before sampling. `place` assumes they hold:
    /// positive finite radii, `inner < outer`, positive separation, an inset
    /// within `[0, outer]` and an attempt count no larger than
    /// `MAX_ATTEMPTS_LIMIT`.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let outer = self.region.outer_radius();
        if !positive(outer) {
            return invalid("gardenRadius", "must be a positive number");
        }
        if let Region::Annulus { inner, .. } = self.region {
            if !(inner.is_finite() && inner >= 0.0 && inner < outer) {
                return invalid("innerRadius", "must be at least 0 and below the outer radius");
            }
        }
        if let Some(sep) = self.min_separation {
            if !positive(sep) {
                return invalid("minSeparation", "must be a positive number");
            }
        }
        if !(self.fallback_inset.is_finite() && (0.0..=outer).contains(&self.fallback_inset)) {
            return invalid("fallbackInset", "must be between 0 and the radius");
        }
        if self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return invalid("maxAttempts", "exceeds the attempt limit");
        }
        Ok(())
    }

    /// Propose a position against a snapshot of `existing`. Never fails and
    /// never touches `existing`.
    pub fn place(&self, existing: &[Point2], rng: &mut Rng) -> Placement {
        let Some(min_sep) = self.min_separation else {
            return Placement {
                position: self.region.sample(rng),
                fallback: false,
            };
        };
        let min_sq = min_sep * min_sep;

        for _ in 0..self.max_attempts {
            let candidate = self.region.sample(rng);
            if existing.iter().all(|p| p.dist_sq(&candidate) >= min_sq) {
                return Placement {
                    position: candidate,
                    fallback: false,
                };
            }
        }

        let angle = rng.angle();
        let r = self.region.fallback_radius(self.fallback_inset);
        debug!(
            attempts = self.max_attempts,
            existing = existing.len(),
            "placement budget exhausted, using boundary fallback"
        );
        Placement {
            position: Point2::new(angle.cos() * r, angle.sin() * r),
            fallback: true,
        }
    }
}

fn invalid(name: &'static str, reason: &'static str) -> Result<()> {
    Err(GardenError::InvalidParameter { name, reason })
}

/// Bare-point form of the flower bed placer with the default 0.5 inset.
pub fn place(
    existing: &[Point2],
    garden_radius: f64,
    min_separation: f64,
    max_attempts: usize,
    rng: &mut Rng,
) -> Point2 {
    Sampler::disk(garden_radius, min_separation)
        .with_max_attempts(max_attempts)
        .place(existing, rng)
        .position
}
