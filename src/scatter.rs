//! Coins and scenery scattered in rings around the flower bed. These may
//! overlap each other, so they use the annulus sampler without separation.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::config::GardenConfig;
use crate::placement::Sampler;
use crate::rng::Rng;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Coin {
    pub id: String,
    pub position: [f64; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    Tree,
    Rock,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: [f64; 3],
    /// Rotation about the vertical axis, radians.
    pub rotation: f64,
    pub scale: f64,
    pub height: f64,
}

pub fn coins(config: &GardenConfig, rng: &mut Rng) -> Vec<Coin> {
    let sampler = Sampler::annulus(config.coin_inner_radius, config.coin_outer_radius);
    (0..config.coin_count)
        .map(|i| Coin {
            id: format!("coin-{i}"),
            position: sampler.place(&[], rng).position.at_height(config.coin_height),
        })
        .collect()
}

pub fn decorations(config: &GardenConfig, rng: &mut Rng) -> Vec<Decoration> {
    let sampler = Sampler::annulus(
        config.decoration_inner_radius,
        config.decoration_outer_radius,
    );
    (0..config.decoration_count)
        .map(|_| {
            let position = sampler.place(&[], rng).position.at_height(0.0);
            let kind = if rng.chance(config.tree_probability) {
                DecorationKind::Tree
            } else {
                DecorationKind::Rock
            };
            Decoration {
                kind,
                position,
                rotation: rng.next_f64() * TAU,
                scale: rng.range_f64(0.5, 2.0),
                height: rng.range_f64(1.0, 3.0),
            }
        })
        .collect()
}
