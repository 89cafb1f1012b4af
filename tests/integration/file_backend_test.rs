//! Flat-file records for trainers and locations.

use chrono::Duration;
use gymdesk::model::{Location, Trainer};
use gymdesk::services::{GymService, Repositories, ServiceError};
use gymdesk::storage::RepositoryError;
use tempfile::TempDir;

use crate::common::{class_at, now, trainer};

fn gym(dir: &TempDir) -> GymService<'static> {
    let repos = Repositories::in_memory()
        .with_file_records(dir.path())
        .unwrap();
    GymService::new(repos)
}

#[test]
fn test_trainers_persist_across_services() {
    let dir = TempDir::new().unwrap();
    {
        let gym = gym(&dir);
        gym.trainers().add(&trainer(1)).unwrap();
        gym.trainers().add(&trainer(2)).unwrap();
        gym.locations()
            .add(&Location::new(1, "Downtown", "1 Main St"))
            .unwrap();
    }

    let gym = gym(&dir);
    let trainers = gym.trainers().list().unwrap();
    assert_eq!(trainers.len(), 2);
    assert_eq!(gym.trainers().get(2).unwrap(), trainer(2));
    assert_eq!(gym.locations().get(1).unwrap().address, "1 Main St");
    assert!(dir.path().join("trainers.csv").exists());
}

#[test]
fn test_delimiter_in_value_is_rejected() {
    let dir = TempDir::new().unwrap();
    let gym = gym(&dir);

    let bad = Trainer::new(1, "Smith, Jo", "jo@gym.test", "555", "yoga");
    let result = gym.trainers().add(&bad);
    assert!(matches!(
        result,
        Err(ServiceError::Repository(RepositoryError::InvalidArgument(_)))
    ));
    assert!(gym.trainers().list().unwrap().is_empty());
}

#[test]
fn test_update_and_remove() {
    let dir = TempDir::new().unwrap();
    let gym = gym(&dir);
    gym.trainers().add(&trainer(1)).unwrap();
    gym.trainers().add(&trainer(2)).unwrap();

    let mut changed = trainer(1);
    changed.specialization = "pilates".to_string();
    gym.trainers().update(&changed).unwrap();
    gym.trainers().remove(2).unwrap();

    let trainers = gym.trainers().list().unwrap();
    assert_eq!(trainers, vec![changed]);
    assert!(matches!(
        gym.trainers().remove(2),
        Err(ServiceError::NotFound { id: 2, .. })
    ));
}

#[test]
fn test_classes_stay_in_memory() {
    let dir = TempDir::new().unwrap();
    let coach = trainer(1);
    {
        let gym = gym(&dir);
        gym.trainers().add(&coach).unwrap();
        gym.add_class(&class_at(10, "spin", &coach, now() + Duration::days(1)))
            .unwrap();
        assert_eq!(gym.get_trainer_upcoming_classes_at(1, now()).unwrap().len(), 1);
    }

    let gym = gym(&dir);
    assert!(gym.get_all_classes().unwrap().is_empty());
    assert!(gym.trainers().contains(1).unwrap());
}
