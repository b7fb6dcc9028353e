//! Sample store seam.
//!
//! Persistence is an external collaborator: the app ships an
//! object-relational layer that owns the workout tables. This crate only
//! depends on the narrow surface the show-workout screen actually uses,
//! expressed as the [`SampleStore`] trait. [`MemorySampleStore`] backs the
//! viewer tests and previews.

use std::collections::HashMap;

use crate::error::{Result, TrackViewError};
use crate::{Workout, WorkoutSample};

/// The persistence operations the visualization pipeline consumes.
pub trait SampleStore {
    /// All samples of a workout, ordered by relative time offset.
    fn samples_of_workout(&self, workout_id: &str) -> Result<Vec<WorkoutSample>>;

    /// Persist user-editable workout fields (the comment).
    fn update_workout(&mut self, workout: &Workout) -> Result<()>;

    /// Delete a workout and its samples.
    fn delete_workout(&mut self, workout_id: &str) -> Result<()>;
}

/// In-memory store keyed by workout id.
#[derive(Debug, Default)]
pub struct MemorySampleStore {
    workouts: HashMap<String, (Workout, Vec<WorkoutSample>)>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a workout with its sample sequence.
    pub fn insert(&mut self, workout: Workout, samples: Vec<WorkoutSample>) {
        self.workouts.insert(workout.id.clone(), (workout, samples));
    }

    pub fn workout(&self, workout_id: &str) -> Option<&Workout> {
        self.workouts.get(workout_id).map(|(w, _)| w)
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }
}

impl SampleStore for MemorySampleStore {
    fn samples_of_workout(&self, workout_id: &str) -> Result<Vec<WorkoutSample>> {
        self.workouts
            .get(workout_id)
            .map(|(_, samples)| samples.clone())
            .ok_or_else(|| TrackViewError::Store {
                message: format!("unknown workout '{}'", workout_id),
            })
    }

    fn update_workout(&mut self, workout: &Workout) -> Result<()> {
        match self.workouts.get_mut(&workout.id) {
            Some((stored, _)) => {
                *stored = workout.clone();
                Ok(())
            }
            None => Err(TrackViewError::Store {
                message: format!("unknown workout '{}'", workout.id),
            }),
        }
    }

    fn delete_workout(&mut self, workout_id: &str) -> Result<()> {
        match self.workouts.remove(workout_id) {
            Some(_) => Ok(()),
            None => Err(TrackViewError::Store {
                message: format!("unknown workout '{}'", workout_id),
            }),
        }
    }
}
