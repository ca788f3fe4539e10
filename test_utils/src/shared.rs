//! A scene app shared between `rspec` steps.
//!
//! `rspec` environments must be `Clone + Send + Sync`. [`SharedScene`] keeps
//! one primed app behind a mutex so every step of a suite drives the same
//! world, and lets `before_each` hooks swap in a fresh scene.

use std::sync::{Arc, Mutex, PoisonError};

use bevy::prelude::*;

use crate::tick;

#[derive(Debug)]
struct SceneCell(App);

// SAFETY: suites run serially and the app is only reached through the mutex
// in `SharedScene`, so it never moves between threads while borrowed.
unsafe impl Send for SceneCell {}
unsafe impl Sync for SceneCell {}

/// Cloneable handle to a scene app.
#[derive(Debug, Clone)]
pub struct SharedScene {
    cell: Arc<Mutex<SceneCell>>,
}

impl SharedScene {
    /// Wraps a primed `app`.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            cell: Arc::new(Mutex::new(SceneCell(app))),
        }
    }

    /// Runs `f` against the app, recovering from a poisoned lock left by a
    /// failed step.
    pub fn with<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cell.0)
    }

    /// Replaces the app with `app`.
    pub fn replace(&self, app: App) {
        self.with(|current| *current = app);
    }

    /// Advances the app by `frames` updates.
    pub fn tick(&self, frames: usize) {
        self.with(|app| tick(app, frames));
    }
}
