use crate::storage::{random_id, Collection};
use crate::user::{User, UserRole};
use crate::Error;

#[test]
fn ids_stay_in_the_signed_range() {
    // TOML integers are signed; ids past i64::MAX would not round-trip
    for _ in 0..1000 {
        let id = random_id();
        assert!(id >= 1);
        assert!(id <= i64::MAX as u64);
    }
}

fn sample_user(email: &str) -> User {
    User::new(
        "Sample".to_string(),
        email.to_string(),
        "password123456",
        UserRole::User,
        None,
    )
    .unwrap()
}

#[test]
fn duplicate_insert_refused() {
    let users = Collection::<User>::in_memory();
    assert!(users.insert(sample_user("a@example.com")));
    assert!(!users.insert(sample_user("a@example.com")));
    assert_eq!(users.len(), 1);
}

#[test]
fn removal_rebuilds_the_index() {
    let users = Collection::<User>::in_memory();
    let first = sample_user("first@example.com");
    let second = sample_user("second@example.com");
    let (first_id, second_id) = (first.id, second.id);
    users.insert(first);
    users.insert(second);

    assert!(users.remove(first_id));
    assert!(!users.contains(first_id));
    // the surviving record is still reachable through its shifted slot
    assert_eq!(
        users.with(second_id, |user| user.email.clone()).unwrap(),
        "second@example.com"
    );
}

#[test]
fn reopening_sees_the_latest_update() {
    let dir = std::env::temp_dir().join(format!("clubhub-storage-{}", random_id()));

    let users = Collection::<User>::open(&dir).unwrap();
    let user = sample_user("persisted@example.com");
    let id = user.id;
    users.insert(user);

    for name in ["first", "second"] {
        users
            .update(id, |user| {
                user.name = name.to_string();
                Ok::<_, Error>(())
            })
            .unwrap()
            .unwrap();
    }

    let reopened = Collection::<User>::open(&dir).unwrap();
    assert_eq!(
        reopened.with(id, |user| user.name.clone()).unwrap(),
        "second"
    );

    std::fs::remove_dir_all(&dir).unwrap();
}
