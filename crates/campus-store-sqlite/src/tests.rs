//! Integration tests for `SqliteStore` against an in-memory database.

use campus_core::{
  Error as CoreError,
  house::House,
  response::{Answers, Response},
  school::School,
  store::{RecordStore, StoreError as _},
  survey::Survey,
  user::User,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str) -> User {
  s.add_user(email.to_string(), format!("hash-of-{email}"))
    .await
    .unwrap()
}

fn hogwarts() -> School {
  School {
    name:          "Hogwarts".into(),
    location:      "Scotland".into(),
    administrator: "Dumbledore".into(),
  }
}

fn gryffindor(school: Uuid) -> House {
  House {
    name:   "Gryffindor".into(),
    animal: "Lion".into(),
    slogan: "Courage".into(),
    school,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_user_and_resolve_by_token_hash() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let found = s
    .user_by_token_hash("hash-of-alice@example.com".into())
    .await
    .unwrap();
  assert_eq!(found, Some(alice));
}

#[tokio::test]
async fn unknown_token_hash_returns_none() {
  let s = store().await;
  user(&s, "alice@example.com").await;
  let found = s.user_by_token_hash("nope".into()).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  user(&s, "alice@example.com").await;

  let err = s
    .add_user("alice@example.com".into(), "other-hash".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateEmail(_))));
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_record() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;

  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();
  assert_eq!(school.owner, alice.user_id);
  assert_eq!(school.created_at, school.updated_at);

  let fetched = s.get::<School>(school.id).await.unwrap();
  assert_eq!(fetched, Some(school));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let result = s.get::<School>(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn get_is_scoped_to_collection() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();

  let as_house = s.get::<House>(school.id).await.unwrap();
  assert!(as_house.is_none());
}

#[tokio::test]
async fn list_returns_every_owner_oldest_first() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;

  let first = s.insert(alice.user_id, hogwarts()).await.unwrap();
  let second = s
    .insert(bob.user_id, School { name: "Beauxbatons".into(), ..hogwarts() })
    .await
    .unwrap();

  let all = s.list::<School>().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].id, first.id);
  assert_eq!(all[1].id, second.id);

  let houses = s.list::<House>().await.unwrap();
  assert!(houses.is_empty());
}

#[tokio::test]
async fn insert_with_missing_reference_fails() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let ghost = Uuid::new_v4();

  let err = s
    .insert(alice.user_id, gryffindor(ghost))
    .await
    .unwrap_err();
  match err.as_domain() {
    Some(CoreError::MissingReference { field, id, .. }) => {
      assert_eq!(*field, "school");
      assert_eq!(*id, ghost);
    }
    other => panic!("expected MissingReference, got {other:?}"),
  }
  assert!(s.list::<House>().await.unwrap().is_empty());
}

#[tokio::test]
async fn reference_must_be_in_the_right_collection() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();

  // A survey's `response` must point at a response, not a school.
  let survey = Survey {
    survey_title: "Sorting".into(),
    survey_topic: "Houses".into(),
    survey_admin: "McGonagall".into(),
    response:     school.id,
  };
  let err = s.insert(alice.user_id, survey).await.unwrap_err();
  assert!(matches!(
    err.as_domain(),
    Some(CoreError::MissingReference { .. })
  ));
}

#[tokio::test]
async fn update_rewrites_body_and_bumps_updated_at() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();
  let house = s
    .insert(alice.user_id, gryffindor(school.id))
    .await
    .unwrap();

  let mut changed = house.clone();
  changed.body.animal = "Badger".into();
  let updated = s.update(changed).await.unwrap();
  assert!(updated.updated_at >= house.updated_at);
  assert_eq!(updated.created_at, house.created_at);

  let fetched = s.get::<House>(house.id).await.unwrap().unwrap();
  assert_eq!(fetched.body.animal, "Badger");
  assert_eq!(fetched.body.name, "Gryffindor");
  assert_eq!(fetched.owner, alice.user_id);
}

#[tokio::test]
async fn update_does_not_rewrite_owner() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let bob = user(&s, "bob@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();

  let mut hijacked = school.clone();
  hijacked.owner = bob.user_id;
  s.update(hijacked).await.unwrap();

  let fetched = s.get::<School>(school.id).await.unwrap().unwrap();
  assert_eq!(fetched.owner, alice.user_id);
}

#[tokio::test]
async fn update_of_deleted_record_is_not_found() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();
  assert!(s.delete::<School>(school.id).await.unwrap());

  let err = s.update(school).await.unwrap_err();
  assert!(matches!(err.as_domain(), Some(CoreError::NotFound { .. })));
}

#[tokio::test]
async fn update_with_missing_reference_leaves_record_unchanged() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();
  let house = s
    .insert(alice.user_id, gryffindor(school.id))
    .await
    .unwrap();

  let mut moved = house.clone();
  moved.body.school = Uuid::new_v4();
  moved.body.slogan = "Cunning".into();
  assert!(s.update(moved).await.is_err());

  let fetched = s.get::<House>(house.id).await.unwrap().unwrap();
  assert_eq!(fetched.body, house.body);
}

#[tokio::test]
async fn update_skips_unchanged_dangling_reference() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();
  let house = s
    .insert(alice.user_id, gryffindor(school.id))
    .await
    .unwrap();
  assert!(s.delete::<School>(school.id).await.unwrap());

  let mut changed = house.clone();
  changed.body.animal = "Badger".into();
  s.update(changed).await.unwrap();

  let fetched = s.get::<House>(house.id).await.unwrap().unwrap();
  assert_eq!(fetched.body.animal, "Badger");
  assert_eq!(fetched.body.school, school.id);
}

#[tokio::test]
async fn update_checks_a_moved_reference() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();
  let other = s
    .insert(alice.user_id, School { name: "Durmstrang".into(), ..hogwarts() })
    .await
    .unwrap();
  let house = s
    .insert(alice.user_id, gryffindor(school.id))
    .await
    .unwrap();

  let mut moved = house.clone();
  moved.body.school = other.id;
  s.update(moved).await.unwrap();
  let fetched = s.get::<House>(house.id).await.unwrap().unwrap();
  assert_eq!(fetched.body.school, other.id);

  assert!(s.delete::<School>(school.id).await.unwrap());
  let mut back = fetched.clone();
  back.body.school = school.id;
  let err = s.update(back).await.unwrap_err();
  assert!(matches!(
    err.as_domain(),
    Some(CoreError::MissingReference { field: "school", .. })
  ));
}

#[tokio::test]
async fn delete_twice_reports_nothing_removed() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let school = s.insert(alice.user_id, hogwarts()).await.unwrap();

  assert!(s.delete::<School>(school.id).await.unwrap());
  assert!(!s.delete::<School>(school.id).await.unwrap());
  assert!(s.get::<School>(school.id).await.unwrap().is_none());
}

#[tokio::test]
async fn nested_response_body_round_trips() {
  let s = store().await;
  let alice = user(&s, "alice@example.com").await;
  let response = Response {
    response: Answers {
      question_one: "Yes".into(),
      question_two: "No".into(),
    },
  };

  let stored = s.insert(alice.user_id, response.clone()).await.unwrap();
  let fetched = s.get::<Response>(stored.id).await.unwrap().unwrap();
  assert_eq!(fetched.body, response);
}
