//! In-memory backend.

use chrono::Duration;
use gymdesk::services::{GymService, Repositories};

use crate::common::{class_at, member, now, trainer};
use crate::scenarios;

fn gym() -> GymService<'static> {
    GymService::new(Repositories::in_memory())
}

#[test]
fn test_upcoming_classes_sorted() {
    scenarios::upcoming_classes_sorted(&gym());
}

#[test]
fn test_similar_classes() {
    scenarios::similar_classes(&gym());
}

#[test]
fn test_duplicate_and_missing() {
    scenarios::duplicate_and_missing_leave_store_unchanged(&gym());
}

#[test]
fn test_registration_lifecycle() {
    scenarios::registration_lifecycle(&gym());
}

#[test]
fn test_equipment_and_feedback() {
    scenarios::equipment_and_feedback(&gym());
}

#[test]
fn test_derived_collections() {
    scenarios::derived_collections(&gym());
}

#[test]
fn test_carried_members_obey_registration_rules() {
    scenarios::carried_members_obey_registration_rules(&gym());
}

#[test]
fn test_embedded_member_is_a_snapshot() {
    let gym = gym();
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_member(&member(1)).unwrap();
    gym.add_class(&class_at(10, "spin", &coach, now() + Duration::days(1)))
        .unwrap();
    gym.register_to_class(1, 10).unwrap();

    let mut renamed = member(1);
    renamed.name = "Renamed".to_string();
    gym.update_member(&renamed).unwrap();

    // The class keeps the copy taken at registration time.
    let class = gym.get_class(10).unwrap();
    assert_eq!(class.members[0].name, "Member 1");
    assert_eq!(gym.get_member(1).unwrap().name, "Renamed");
}

#[test]
fn test_returned_entities_are_copies() {
    let gym = gym();
    gym.add_member(&member(1)).unwrap();

    let mut copy = gym.get_member(1).unwrap();
    copy.name = "Changed locally".to_string();

    assert_eq!(gym.get_member(1).unwrap().name, "Member 1");
}
