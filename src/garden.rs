use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::info;

use crate::config::{GardenConfig, MAX_DEMO_FLOWERS};
use crate::error::{GardenError, Result};
use crate::model::{self, Answer, Flower, FlowerDraft, JournalEntry, NewJournalEntry};
use crate::placement::{Placement, Point2, Sampler};
use crate::questionnaire::QUESTIONS;
use crate::rng::Rng;
use crate::store::Repository;

/// A freshly planted flower and whether its spot came from the fallback.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Planted {
    pub flower: Flower,
    pub fallback: bool,
}

/// Application state around one repository: validation, flower placement
/// and the RNG that drives it.
pub struct Garden<R> {
    repo: R,
    config: GardenConfig,
    // Held across read-positions / place / save so plants never race.
    rng: Mutex<Rng>,
}

impl<R: Repository> Garden<R> {
    pub fn new(repo: R, config: GardenConfig, rng: Rng) -> Self {
        Self {
            repo,
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    /// Run `f` with exclusive use of the garden RNG.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut Rng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *rng)
    }

    pub fn add_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        entry.validate()?;
        self.repo.save_journal_entry(entry)
    }

    pub fn write_entry(&self, new: NewJournalEntry) -> Result<JournalEntry> {
        self.add_entry(new.into_entry()?)
    }

    pub fn entry(&self, id: &str) -> Result<JournalEntry> {
        self.repo
            .journal_entry(id)?
            .ok_or_else(|| GardenError::journal_not_found(id))
    }

    /// Store a flower whose position the client already chose.
    pub fn add_flower(&self, flower: Flower) -> Result<Flower> {
        flower.validate()?;
        self.repo.save_flower(flower)
    }

    pub fn flower(&self, id: &str) -> Result<Flower> {
        self.repo
            .flower(id)?
            .ok_or_else(|| GardenError::flower_not_found(id))
    }

    /// Grow a flower for an existing journal entry at a fresh spot in the bed.
    pub fn plant(&self, draft: FlowerDraft) -> Result<Planted> {
        if draft.answers.is_empty() {
            return Err(GardenError::InvalidFlower { field: "answers" });
        }
        let entry = self
            .repo
            .journal_entry(&draft.journal_id)?
            .ok_or_else(|| GardenError::JournalMissing(draft.journal_id.clone()))?;

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let existing = self.repo.flower_positions()?;
        let placement = Sampler::flower_bed(&self.config).place(&existing, &mut rng);
        let stem_height = rng.range_f64(self.config.stem_height_min, self.config.stem_height_max);

        let flower = Flower {
            id: draft.id.unwrap_or_else(model::new_id),
            journal_id: entry.id,
            answers: draft.answers,
            position: placement.position.at_height(0.0),
            journal_date: entry.date,
            journal_title: entry.title,
            created: model::now_rfc3339(),
            stem_height,
        };
        let flower = self.add_flower(flower)?;
        drop(rng);

        info!(
            id = %flower.id,
            x = placement.position.x,
            z = placement.position.z,
            fallback = placement.fallback,
            "planted flower"
        );
        Ok(Planted {
            flower,
            fallback: placement.fallback,
        })
    }

    /// Run the flower bed sampler against the current flowers without
    /// planting anything.
    pub fn propose(&self, sampler: &Sampler) -> Result<Placement> {
        let existing = self.repo.flower_positions()?;
        Ok(self.with_rng(|rng| sampler.place(&existing, rng)))
    }

    /// Fill the bed with `count` placeholder flowers that have random
    /// answers and no journal entry behind them. `count` is capped at
    /// `MAX_DEMO_FLOWERS`.
    pub fn seed_demo(&self, count: usize) -> Result<Vec<Planted>> {
        if count > MAX_DEMO_FLOWERS {
            return Err(GardenError::InvalidParameter {
                name: "count",
                reason: "too many demo flowers in one request",
            });
        }
        let sampler = Sampler::flower_bed(&self.config);
        let stamp = model::now_rfc3339();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut existing: Vec<Point2> = self.repo.flower_positions()?;
        let mut planted = Vec::with_capacity(count);

        for i in 0..count {
            let placement = sampler.place(&existing, &mut rng);
            let answers = (0..QUESTIONS.len())
                .map(|_| Answer::ALL[rng.range_usize(Answer::ALL.len())])
                .collect();
            let flower = Flower {
                id: format!("demo-flower-{}-{i}", model::new_id()),
                journal_id: format!("demo-journal-{i}"),
                answers,
                position: placement.position.at_height(0.0),
                journal_date: stamp.clone(),
                journal_title: "Demo Flower".to_string(),
                created: stamp.clone(),
                stem_height: rng
                    .range_f64(self.config.stem_height_min, self.config.stem_height_max),
            };
            existing.push(placement.position);
            planted.push(Planted {
                flower: self.repo.save_flower(flower)?,
                fallback: placement.fallback,
            });
        }

        let fallbacks = planted.iter().filter(|p| p.fallback).count();
        info!(count, fallbacks, "seeded demo flowers");
        Ok(planted)
    }
}
