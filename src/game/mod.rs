//! Shedding game engine - core rules, entities, and turn logic.
//!
//! This module provides the foundational game implementation including:
//! - Card, deck, and player entities with id-based identity
//! - The pile stacking validator (the add-cards command)
//! - The turn/state engine and its lifecycle
//! - Serializable snapshots for persistence collaborators

// Submodules
pub mod constants;
pub mod entities;
pub mod pile;
pub mod snapshot;

mod state_machine;

pub use state_machine::*;
