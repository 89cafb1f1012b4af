//! SQLite backend.

use chrono::Duration;
use gymdesk::model::{Feedback, Location, Room};
use gymdesk::services::{GymService, Repositories};
use gymdesk::storage::Database;
use tempfile::TempDir;

use crate::common::{class_at, member, now, trainer};
use crate::scenarios;

fn database() -> Database {
    Database::open_in_memory().unwrap()
}

#[test]
fn test_upcoming_classes_sorted() {
    let db = database();
    scenarios::upcoming_classes_sorted(&GymService::new(Repositories::sqlite(&db)));
}

#[test]
fn test_similar_classes() {
    let db = database();
    scenarios::similar_classes(&GymService::new(Repositories::sqlite(&db)));
}

#[test]
fn test_duplicate_and_missing() {
    let db = database();
    scenarios::duplicate_and_missing_leave_store_unchanged(&GymService::new(
        Repositories::sqlite(&db),
    ));
}

#[test]
fn test_registration_lifecycle() {
    let db = database();
    scenarios::registration_lifecycle(&GymService::new(Repositories::sqlite(&db)));
}

#[test]
fn test_equipment_and_feedback() {
    let db = database();
    scenarios::equipment_and_feedback(&GymService::new(Repositories::sqlite(&db)));
}

#[test]
fn test_derived_collections() {
    let db = database();
    scenarios::derived_collections(&GymService::new(Repositories::sqlite(&db)));
}

#[test]
fn test_carried_members_obey_registration_rules() {
    let db = database();
    scenarios::carried_members_obey_registration_rules(&GymService::new(Repositories::sqlite(
        &db,
    )));
}

#[test]
fn test_embedded_member_is_refetched() {
    let db = database();
    let gym = GymService::new(Repositories::sqlite(&db));
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_member(&member(1)).unwrap();
    gym.add_class(&class_at(10, "spin", &coach, now() + Duration::days(1)))
        .unwrap();
    gym.register_to_class(1, 10).unwrap();

    let mut renamed = member(1);
    renamed.name = "Renamed".to_string();
    gym.update_member(&renamed).unwrap();

    let class = gym.get_class(10).unwrap();
    assert_eq!(class.members[0].name, "Renamed");
}

#[test]
fn test_delete_removes_join_rows() {
    let db = database();
    let gym = GymService::new(Repositories::sqlite(&db));
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_member(&member(1)).unwrap();
    gym.add_member(&member(2)).unwrap();
    gym.add_class(&class_at(10, "spin", &coach, now() + Duration::days(1)))
        .unwrap();
    gym.register_to_class(1, 10).unwrap();
    gym.register_to_class(2, 10).unwrap();
    assert_eq!(db.count_rows("class_members").unwrap(), 2);

    gym.delete_member(2).unwrap();
    assert_eq!(db.count_rows("class_members").unwrap(), 1);

    gym.delete_class(10).unwrap();
    assert_eq!(db.count_rows("class_members").unwrap(), 0);
    assert_eq!(db.count_rows("members").unwrap(), 1);
}

#[test]
fn test_class_graph_is_resolved() {
    let db = database();
    let gym = GymService::new(Repositories::sqlite(&db));
    let coach = trainer(1);
    let hall = Location::new(1, "Downtown", "1 Main St");
    let room = Room::new(2, "Studio B", 25).with_location(hall.clone());
    gym.trainers().add(&coach).unwrap();
    gym.locations().add(&hall).unwrap();
    gym.rooms().add(&room).unwrap();
    gym.add_member(&member(1)).unwrap();

    let class = class_at(10, "spin", &coach, now() + Duration::days(1))
        .with_room(room)
        .with_location(hall);
    gym.add_class(&class).unwrap();
    gym.add_feedback(
        &Feedback::new(1, 4, "good")
            .with_member(member(1))
            .with_class(class.clone()),
    )
    .unwrap();

    let loaded = gym.get_class(10).unwrap();
    assert_eq!(loaded.trainer.as_ref().map(|t| t.name.as_str()), Some("Coach 1"));
    let room = loaded.room.as_ref().unwrap();
    assert_eq!(room.location.as_ref().map(|l| l.id), Some(1));
    assert_eq!(loaded.feedback.len(), 1);
    // The back-reference from feedback to its own class is cut.
    assert!(loaded.feedback[0].fitness_class.is_none());

    let fb = gym.get_feedback(1).unwrap();
    assert_eq!(fb.fitness_class.as_ref().map(|c| c.id), Some(10));
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gym.db");

    {
        let db = Database::open(&path).unwrap();
        let gym = GymService::new(Repositories::sqlite(&db));
        gym.trainers().add(&trainer(1)).unwrap();
        gym.add_member(&member(1)).unwrap();
        gym.add_class(&class_at(10, "spin", &trainer(1), now() + Duration::days(1)))
            .unwrap();
        gym.register_to_class(1, 10).unwrap();
    }

    let db = Database::open(&path).unwrap();
    let gym = GymService::new(Repositories::sqlite(&db));
    let class = gym.get_class(10).unwrap();
    assert_eq!(class.start_time, now() + Duration::days(1));
    assert!(class.has_member(1));
    assert_eq!(gym.get_member(1).unwrap().class_ids, vec![10]);
}
