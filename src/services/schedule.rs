//! Time-based queries over a list of scheduled classes.
//!
//! All functions are pure: they take a snapshot and a reference instant and
//! never modify their input.

use chrono::{DateTime, Utc};

use crate::model::{EntityId, FitnessClass};

/// Classes starting strictly after `now`, earliest first.
///
/// Classes with equal start times keep their input order.
pub fn upcoming_sorted(classes: &[FitnessClass], now: DateTime<Utc>) -> Vec<FitnessClass> {
    let mut upcoming: Vec<FitnessClass> = classes
        .iter()
        .filter(|c| c.starts_after(now))
        .cloned()
        .collect();
    upcoming.sort_by_key(|c| c.start_time);
    upcoming
}

/// Classes like `target`: same name, same trainer, starting after `now`,
/// and not `target` itself.
///
/// A target without a trainer has no similar classes. Equipment and
/// location are not compared.
pub fn similar_to(
    classes: &[FitnessClass],
    target: &FitnessClass,
    now: DateTime<Utc>,
) -> Vec<FitnessClass> {
    let trainer_id = match target.trainer_id() {
        Some(id) => id,
        None => return Vec::new(),
    };

    classes
        .iter()
        .filter(|c| c.id != target.id)
        .filter(|c| c.name == target.name)
        .filter(|c| c.trainer_id() == Some(trainer_id))
        .filter(|c| c.starts_after(now))
        .cloned()
        .collect()
}

/// Classes led by the trainer starting after `now`, in input order.
pub fn trainer_upcoming(
    classes: &[FitnessClass],
    trainer_id: EntityId,
    now: DateTime<Utc>,
) -> Vec<FitnessClass> {
    classes
        .iter()
        .filter(|c| c.trainer_id() == Some(trainer_id))
        .filter(|c| c.starts_after(now))
        .cloned()
        .collect()
}
