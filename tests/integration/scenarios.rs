//! Behaviour every backend must share, run against each one.

use chrono::{Duration, TimeZone, Utc};
use gymdesk::model::{Equipment, Feedback, Membership};
use gymdesk::services::{GymService, ServiceError};

use crate::common::{class_at, member, now, trainer};

pub fn upcoming_classes_sorted(gym: &GymService<'_>) {
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();

    let mar = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
    let jan = Utc.with_ymd_and_hms(2026, 1, 10, 18, 0, 0).unwrap();
    let feb = Utc.with_ymd_and_hms(2026, 2, 10, 18, 0, 0).unwrap();
    gym.add_class(&class_at(1, "spin", &coach, mar)).unwrap();
    gym.add_class(&class_at(2, "spin", &coach, jan)).unwrap();
    gym.add_class(&class_at(3, "spin", &coach, now() - Duration::days(2)))
        .unwrap();
    gym.add_class(&class_at(4, "spin", &coach, feb)).unwrap();

    let upcoming = gym.sort_upcoming_classes_asc_at(now()).unwrap();
    let ids: Vec<_> = upcoming.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 4, 1]);

    // The query does not touch stored classes.
    assert_eq!(gym.get_all_classes().unwrap().len(), 4);
}

pub fn similar_classes(gym: &GymService<'_>) {
    let t1 = trainer(1);
    let t2 = trainer(2);
    gym.trainers().add(&t1).unwrap();
    gym.trainers().add(&t2).unwrap();

    let soon = now() + Duration::days(1);
    let a = class_at(1, "yoga", &t1, soon);
    gym.add_class(&a).unwrap();
    gym.add_class(&class_at(2, "yoga", &t1, soon + Duration::days(7)))
        .unwrap();
    gym.add_class(&class_at(3, "yoga", &t1, now() - Duration::days(1)))
        .unwrap();
    gym.add_class(&class_at(4, "yoga", &t2, soon)).unwrap();
    gym.add_class(&class_at(5, "pilates", &t1, soon)).unwrap();

    let similar = gym.get_similar_classes_at(Some(&a), now()).unwrap();
    assert_eq!(similar.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);

    assert!(matches!(
        gym.get_similar_classes_at(None, now()),
        Err(ServiceError::InvalidArgument(_))
    ));

    let mine = gym.get_trainer_upcoming_classes_at(1, now()).unwrap();
    assert_eq!(mine.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 5]);
}

pub fn duplicate_and_missing_leave_store_unchanged(gym: &GymService<'_>) {
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_class(&class_at(1, "box", &coach, now() + Duration::days(1)))
        .unwrap();

    let mut clash = class_at(1, "other", &coach, now() + Duration::days(3));
    clash.participants_count = 2;
    assert!(matches!(
        gym.add_class(&clash),
        Err(ServiceError::AlreadyExists { id: 1, .. })
    ));

    let ghost = class_at(9, "ghost", &coach, now() + Duration::days(3));
    assert!(matches!(
        gym.update_class(&ghost),
        Err(ServiceError::NotFound { id: 9, .. })
    ));
    assert!(matches!(
        gym.delete_class(9),
        Err(ServiceError::NotFound { id: 9, .. })
    ));

    let all = gym.get_all_classes().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "box");
    assert_eq!(all[0].participants_count, 20);
}

pub fn registration_lifecycle(gym: &GymService<'_>) {
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_member(&member(1)).unwrap();
    gym.add_member(&member(2)).unwrap();
    gym.add_class(&class_at(10, "spin", &coach, now() + Duration::days(1)))
        .unwrap();
    gym.add_class(&class_at(11, "row", &coach, now() + Duration::days(2)))
        .unwrap();

    gym.register_to_class(1, 10).unwrap();
    gym.register_to_class(1, 11).unwrap();
    gym.register_to_class(2, 10).unwrap();
    assert!(matches!(
        gym.register_to_class(2, 10),
        Err(ServiceError::AlreadyRegistered { .. })
    ));

    let class = gym.get_class(10).unwrap();
    let mut registered: Vec<_> = class.members.iter().map(|m| m.id).collect();
    registered.sort();
    assert_eq!(registered, vec![1, 2]);

    let mut classes: Vec<_> = gym
        .get_member_classes(1)
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    classes.sort();
    assert_eq!(classes, vec![10, 11]);

    gym.drop_class(1, 11).unwrap();
    assert_eq!(gym.get_member(1).unwrap().class_ids, vec![10]);

    gym.delete_class(10).unwrap();
    assert!(gym.get_member(1).unwrap().class_ids.is_empty());
    assert!(gym.get_member(2).unwrap().class_ids.is_empty());
    assert!(gym.get_member_classes(2).unwrap().is_empty());
}

pub fn equipment_and_feedback(gym: &GymService<'_>) {
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_member(&member(1)).unwrap();
    let class = class_at(10, "kettlebell", &coach, now() + Duration::days(1));
    gym.add_class(&class).unwrap();
    gym.add_equipment(&Equipment::new(5, "kettlebell 16kg", 10))
        .unwrap();

    gym.assign_equipment(5, 10).unwrap();
    assert!(gym.get_class(10).unwrap().has_equipment(5));
    assert_eq!(gym.get_equipment(5).unwrap().class_ids, vec![10]);

    gym.delete_equipment(5).unwrap();
    assert!(!gym.get_class(10).unwrap().has_equipment(5));

    for (id, rating) in [(1, 4), (2, 5), (3, 3)] {
        let fb = Feedback::new(id, rating, "ok")
            .with_member(member(1))
            .with_class(class.clone());
        gym.add_feedback(&fb).unwrap();
    }
    let out_of_range = Feedback::new(4, 6, "wow")
        .with_member(member(1))
        .with_class(class.clone());
    assert!(matches!(
        gym.add_feedback(&out_of_range),
        Err(ServiceError::InvalidArgument(_))
    ));

    assert_eq!(gym.get_class_feedback(10).unwrap().len(), 3);
    assert_eq!(gym.average_rating(10).unwrap(), Some(4.0));
}

pub fn derived_collections(gym: &GymService<'_>) {
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    let plan = Membership::new(1, "monthly", 39.0);
    gym.add_membership(&plan).unwrap();
    gym.add_member(&member(1).with_membership(plan.clone())).unwrap();
    gym.add_member(&member(2).with_membership(plan)).unwrap();
    let class = class_at(10, "spin", &coach, now() + Duration::days(1));
    gym.add_class(&class).unwrap();

    for (id, rating) in [(2, 3), (1, 5)] {
        gym.add_feedback(
            &Feedback::new(id, rating, "ok")
                .with_member(member(1))
                .with_class(class.clone()),
        )
        .unwrap();
    }

    assert_eq!(gym.get_membership(1).unwrap().member_ids, vec![1, 2]);
    let stored = gym.get_class(10).unwrap();
    assert_eq!(stored.feedback.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(stored.feedback.iter().all(|f| f.fitness_class.is_none()));

    gym.delete_member(2).unwrap();
    gym.delete_feedback(2).unwrap();
    assert_eq!(gym.get_membership(1).unwrap().member_ids, vec![1]);
    assert_eq!(gym.get_class_feedback(10).unwrap().len(), 1);
    assert_eq!(gym.average_rating(10).unwrap(), Some(5.0));
}

pub fn carried_members_obey_registration_rules(gym: &GymService<'_>) {
    let coach = trainer(1);
    gym.trainers().add(&coach).unwrap();
    gym.add_member(&member(1)).unwrap();
    gym.add_member(&member(2)).unwrap();

    let mut small = class_at(10, "spin", &coach, now() + Duration::days(1));
    small.participants_count = 1;
    small.members = vec![member(1), member(2)];
    assert!(matches!(
        gym.add_class(&small),
        Err(ServiceError::ClassFull { class_id: 10, .. })
    ));

    let mut repeated = class_at(11, "row", &coach, now() + Duration::days(1));
    repeated.members = vec![member(1), member(1)];
    assert!(matches!(
        gym.add_class(&repeated),
        Err(ServiceError::InvalidArgument(_))
    ));
    assert!(gym.get_all_classes().unwrap().is_empty());

    let mut ok = class_at(12, "box", &coach, now() + Duration::days(1));
    ok.members = vec![member(2), member(1)];
    gym.add_class(&ok).unwrap();
    let stored = gym.get_class(12).unwrap();
    assert_eq!(stored.members.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(gym.get_member(2).unwrap().class_ids, vec![12]);
}
