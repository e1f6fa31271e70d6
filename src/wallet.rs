//! Coin economy: coins picked up around the garden buy environment themes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::UNLOCK_COST;
use crate::error::{GardenError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skybox {
    Default,
    Night,
    Sunset,
    Cosmic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    Default,
    Winter,
    Autumn,
    Fantasy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    Default,
    Warm,
    Cool,
    Dramatic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ground {
    Grass,
    Sand,
    Snow,
    Alien,
}

/// One purchasable theme, e.g. `{"category": "ground", "variant": "snow"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "variant", rename_all = "lowercase")]
pub enum Feature {
    Skybox(Skybox),
    Decoration(Decoration),
    Lighting(Lighting),
    Ground(Ground),
}

/// Themes currently applied to the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub skybox: Skybox,
    pub decoration: Decoration,
    pub lighting: Lighting,
    pub ground: Ground,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            skybox: Skybox::Cosmic,
            decoration: Decoration::Default,
            lighting: Lighting::Default,
            ground: Ground::Grass,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub coins: u32,
    /// Coin ids already picked up, so a coin pays out once.
    pub collected: BTreeSet<String>,
    pub unlocked: BTreeSet<Feature>,
    pub environment: Environment,
}

impl Default for Wallet {
    fn default() -> Self {
        let unlocked = [
            Feature::Skybox(Skybox::Default),
            Feature::Skybox(Skybox::Cosmic),
            Feature::Decoration(Decoration::Default),
            Feature::Lighting(Lighting::Default),
            Feature::Ground(Ground::Grass),
        ]
        .into_iter()
        .collect();
        Self {
            coins: 0,
            collected: BTreeSet::new(),
            unlocked,
            environment: Environment::default(),
        }
    }
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up a coin. Returns false if this coin was already collected.
    pub fn collect(&mut self, coin_id: &str) -> bool {
        if !self.collected.insert(coin_id.to_string()) {
            return false;
        }
        self.coins += 1;
        true
    }

    pub fn is_unlocked(&self, feature: Feature) -> bool {
        self.unlocked.contains(&feature)
    }

    /// Buy `feature`. Already-owned features cost nothing.
    pub fn unlock(&mut self, feature: Feature) -> Result<()> {
        if self.is_unlocked(feature) {
            return Ok(());
        }
        if self.coins < UNLOCK_COST {
            return Err(GardenError::InsufficientCoins {
                have: self.coins,
                need: UNLOCK_COST,
            });
        }
        self.coins -= UNLOCK_COST;
        self.unlocked.insert(feature);
        Ok(())
    }

    /// Apply `feature` to the scene if it is unlocked. Returns whether the
    /// environment changed.
    pub fn select(&mut self, feature: Feature) -> bool {
        if !self.is_unlocked(feature) {
            return false;
        }
        let env = &mut self.environment;
        match feature {
            Feature::Skybox(v) => env.skybox = v,
            Feature::Decoration(v) => env.decoration = v,
            Feature::Lighting(v) => env.lighting = v,
            Feature::Ground(v) => env.ground = v,
        }
        true
    }

    /// Drop all coins and forget collected coins. Unlocks are kept.
    pub fn reset(&mut self) {
        self.coins = 0;
        self.collected.clear();
    }
}
