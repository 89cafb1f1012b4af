//! Fixtures shared by the backend tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use gymdesk::model::{EntityId, FitnessClass, Member, Trainer};

/// Fixed reference instant for schedule queries.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap()
}

pub fn trainer(id: EntityId) -> Trainer {
    Trainer::new(
        id,
        format!("Coach {}", id),
        format!("coach{}@gym.test", id),
        "555-0100",
        "strength",
    )
}

pub fn member(id: EntityId) -> Member {
    Member::new(
        id,
        format!("Member {}", id),
        format!("member{}@gym.test", id),
        "555-0199",
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
    )
}

pub fn class_at(
    id: EntityId,
    name: &str,
    trainer: &Trainer,
    start: DateTime<Utc>,
) -> FitnessClass {
    FitnessClass::new(id, name, start, start + Duration::hours(1), 20).with_trainer(trainer.clone())
}
