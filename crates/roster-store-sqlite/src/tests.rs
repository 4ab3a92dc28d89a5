//! Integration tests for `SqliteStore` and the core services against an
//! in-memory database.

use std::sync::Arc;

use roster_core::{
  Error as CoreError,
  course::{Course, CourseInput},
  person::{Person, PersonKind},
  resolve::{RolePolicy, resolve},
  service::{CourseService, PersonService},
  store::{CourseStore, PersonStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn save(s: &SqliteStore, person: Person) -> Person {
  s.save_person(person).await.unwrap()
}

fn services(
  s: &SqliteStore,
  policy: RolePolicy,
) -> (PersonService<SqliteStore>, CourseService<SqliteStore, SqliteStore>) {
  let shared = Arc::new(s.clone());
  (
    PersonService::new(shared.clone()),
    CourseService::new(shared.clone(), shared, policy),
  )
}

fn course_input(name: &str, teacher_id: Option<i64>, student_ids: Vec<i64>) -> CourseInput {
  CourseInput { name: name.into(), teacher_id, student_ids }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_person() {
  let s = store().await;

  let teacher = save(&s, Person::teacher("Mr", "Teach", "mr.teach@example.com")).await;
  let id = teacher.id.expect("id assigned");

  let fetched = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(fetched, teacher);
  assert_eq!(fetched.kind, PersonKind::Teacher);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(42).await.unwrap().is_none());
}

#[tokio::test]
async fn list_persons_in_id_order() {
  let s = store().await;
  save(&s, Person::teacher("Ada", "Lovelace", "ada@example.com")).await;
  save(&s, Person::student("Stu1", "One", "s1@example.com")).await;
  save(&s, Person::new(PersonKind::Person, "Pat", "Plain", "pat@example.com")).await;

  let all = s.list_persons().await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all.windows(2).all(|w| w[0].id < w[1].id));
  assert_eq!(
    all.iter().map(|p| p.kind).collect::<Vec<_>>(),
    [PersonKind::Teacher, PersonKind::Student, PersonKind::Person]
  );
}

#[tokio::test]
async fn last_name_lookup_is_case_insensitive_and_exact() {
  let s = store().await;
  save(&s, Person::student("David", "Smith", "david.smith@example.com")).await;
  save(&s, Person::student("Eve", "Johnson", "eve.johnson@example.com")).await;
  save(&s, Person::student("Sam", "Smithers", "sam@example.com")).await;

  let found = s.find_persons_by_last_name("smith").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].last_name, "Smith");

  let found = s.find_persons_by_last_name("SMITH").await.unwrap();
  assert_eq!(found.len(), 1);

  assert!(s.find_persons_by_last_name("smi").await.unwrap().is_empty());
}

#[tokio::test]
async fn last_name_lookup_folds_non_ascii() {
  let s = store().await;
  save(&s, Person::student("Émile", "Ölund", "emile@example.com")).await;

  let found = s.find_persons_by_last_name("ölund").await.unwrap();
  assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn save_person_with_unknown_id_fails() {
  let s = store().await;
  let mut ghost = Person::student("No", "Body", "nobody@example.com");
  ghost.id = Some(999);

  let err = s.save_person(ghost).await.unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(999)));
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
  let s = store().await;
  let first = save(&s, Person::student("A", "A", "a@example.com")).await;
  assert!(s.delete_person(first.id.unwrap()).await.unwrap());

  let second = save(&s, Person::student("B", "B", "b@example.com")).await;
  assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn delete_missing_person_reports_false() {
  let s = store().await;
  assert!(!s.delete_person(7).await.unwrap());
}

#[tokio::test]
async fn count_persons_tracks_inserts_and_deletes() {
  let s = store().await;
  assert_eq!(s.count_persons().await.unwrap(), 0);
  let p = save(&s, Person::student("A", "A", "a@example.com")).await;
  save(&s, Person::student("B", "B", "b@example.com")).await;
  assert_eq!(s.count_persons().await.unwrap(), 2);
  s.delete_person(p.id.unwrap()).await.unwrap();
  assert_eq!(s.count_persons().await.unwrap(), 1);
}

// ─── Courses ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_course_keeps_student_order() {
  let s = store().await;
  let t = save(&s, Person::teacher("Mr", "Teach", "mr.teach@example.com")).await;
  let s1 = save(&s, Person::student("Stu1", "One", "s1@example.com")).await;
  let s2 = save(&s, Person::student("Stu2", "Two", "s2@example.com")).await;

  let course = s
    .save_course(Course {
      id:       None,
      name:     "Math 101".into(),
      teacher:  Some(t.clone()),
      students: vec![s2.clone(), s1.clone()],
    })
    .await
    .unwrap();

  assert!(course.id.is_some());
  assert_eq!(course.teacher_id(), t.id);
  assert_eq!(course.student_ids(), vec![s2.id.unwrap(), s1.id.unwrap()]);

  let fetched = s.get_course(course.id.unwrap()).await.unwrap().unwrap();
  assert_eq!(fetched, course);
}

#[tokio::test]
async fn save_course_collapses_duplicate_students() {
  let s = store().await;
  let s1 = save(&s, Person::student("Stu1", "One", "s1@example.com")).await;

  let course = s
    .save_course(Course {
      id:       None,
      name:     "Dup".into(),
      teacher:  None,
      students: vec![s1.clone(), s1.clone()],
    })
    .await
    .unwrap();
  assert_eq!(course.student_ids(), vec![s1.id.unwrap()]);
}

#[tokio::test]
async fn save_course_with_unknown_id_fails() {
  let s = store().await;
  let err = s
    .save_course(Course {
      id:       Some(5),
      name:     "Ghost".into(),
      teacher:  None,
      students: vec![],
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CourseNotFound(5)));
}

#[tokio::test]
async fn save_courses_is_atomic() {
  let s = store().await;
  let good = Course { id: None, name: "Good".into(), teacher: None, students: vec![] };
  let bad = Course { id: Some(77), name: "Bad".into(), teacher: None, students: vec![] };

  assert!(s.save_courses(vec![good.clone(), bad]).await.is_err());
  assert!(s.list_courses().await.unwrap().is_empty());

  let saved = s.save_courses(vec![good.clone(), good]).await.unwrap();
  assert_eq!(saved.len(), 2);
  assert_eq!(s.list_courses().await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_a_person_detaches_them_from_courses() {
  let s = store().await;
  let t = save(&s, Person::teacher("Mr", "Teach", "mr.teach@example.com")).await;
  let s1 = save(&s, Person::student("Stu1", "One", "s1@example.com")).await;
  let s2 = save(&s, Person::student("Stu2", "Two", "s2@example.com")).await;

  let course = s
    .save_course(Course {
      id:       None,
      name:     "Math 101".into(),
      teacher:  Some(t.clone()),
      students: vec![s1.clone(), s2.clone()],
    })
    .await
    .unwrap();

  s.delete_person(t.id.unwrap()).await.unwrap();
  s.delete_person(s1.id.unwrap()).await.unwrap();

  let fetched = s.get_course(course.id.unwrap()).await.unwrap().unwrap();
  assert!(fetched.teacher.is_none());
  assert_eq!(fetched.student_ids(), vec![s2.id.unwrap()]);
}

#[tokio::test]
async fn delete_course_removes_it() {
  let s = store().await;
  let course = s
    .save_course(Course { id: None, name: "Tmp".into(), teacher: None, students: vec![] })
    .await
    .unwrap();
  let id = course.id.unwrap();

  assert!(s.delete_course(id).await.unwrap());
  assert!(s.get_course(id).await.unwrap().is_none());
  assert!(!s.delete_course(id).await.unwrap());
}

// ─── Resolver ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolver_drops_unknown_ids() {
  let s = store().await;
  let t = save(&s, Person::teacher("Mr", "Teach", "mr.teach@example.com")).await;
  let s1 = save(&s, Person::student("Stu1", "One", "s1@example.com")).await;

  let resolved = resolve(&s, RolePolicy::Strict, Some(404), &[s1.id.unwrap(), 405])
    .await
    .unwrap();
  assert!(resolved.teacher.is_none());
  assert_eq!(resolved.students, vec![s1.clone()]);

  let resolved = resolve(&s, RolePolicy::Strict, t.id, &[]).await.unwrap();
  assert_eq!(resolved.teacher, Some(t));
  assert!(resolved.students.is_empty());
}

#[tokio::test]
async fn resolver_role_policy() {
  let s = store().await;
  let t = save(&s, Person::teacher("Mr", "Teach", "mr.teach@example.com")).await;
  let s1 = save(&s, Person::student("Stu1", "One", "s1@example.com")).await;

  // Swapped slots.
  let strict = resolve(&s, RolePolicy::Strict, s1.id, &[t.id.unwrap()])
    .await
    .unwrap();
  assert!(strict.teacher.is_none());
  assert!(strict.students.is_empty());

  let permissive = resolve(&s, RolePolicy::Permissive, s1.id, &[t.id.unwrap()])
    .await
    .unwrap();
  assert_eq!(permissive.teacher, Some(s1));
  assert_eq!(permissive.students, vec![t]);
}

// ─── Person service ──────────────────────────────────────────────────────────

#[tokio::test]
async fn person_create_discards_client_id_and_defaults_kind() {
  let s = store().await;
  let (persons, _) = services(&s, RolePolicy::Strict);

  let mut input = Person::new(PersonKind::default(), "Alice", "Walker", "alice.walker@example.com");
  input.id = Some(12345);

  let created = persons.create(input).await.unwrap();
  assert_ne!(created.id, Some(12345));
  assert!(created.id.is_some());
  assert_eq!(created.kind, PersonKind::Person);
  assert_eq!(created.first_name, "Alice");
  assert_eq!(created.last_name, "Walker");
  assert_eq!(created.email, "alice.walker@example.com");
}

#[tokio::test]
async fn person_create_rejects_invalid_input_without_persisting() {
  let s = store().await;
  let (persons, _) = services(&s, RolePolicy::Strict);

  let err = persons
    .create(Person::student("", "Walker", "not-an-email"))
    .await
    .unwrap_err();
  let errors = match &err {
    CoreError::Validation(errors) => errors,
    other => panic!("expected validation error, got {other:?}"),
  };
  assert!(errors.has_field("firstName"));
  assert!(errors.has_field("email"));
  assert_eq!(s.count_persons().await.unwrap(), 0);
}

#[tokio::test]
async fn person_update_keeps_kind() {
  let s = store().await;
  let (persons, _) = services(&s, RolePolicy::Strict);

  let created = persons
    .create(Person::student("Carol", "King", "carol.king@example.com"))
    .await
    .unwrap();
  let id = created.id.unwrap();

  let updated = persons
    .update(id, Person::teacher("Caroline", "King", "caroline.king@example.com"))
    .await
    .unwrap();
  assert_eq!(updated.id, Some(id));
  assert_eq!(updated.kind, PersonKind::Student);
  assert_eq!(updated.first_name, "Caroline");
  assert_eq!(updated.email, "caroline.king@example.com");

  assert_eq!(persons.get(id).await.unwrap(), updated);
}

#[tokio::test]
async fn person_update_missing_is_not_found() {
  let s = store().await;
  let (persons, _) = services(&s, RolePolicy::Strict);

  let err = persons
    .update(9, Person::student("A", "B", "a@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::PersonNotFound(9)));
}

#[tokio::test]
async fn person_delete_then_get_is_not_found() {
  let s = store().await;
  let (persons, _) = services(&s, RolePolicy::Strict);

  let created = persons
    .create(Person::student("Grace", "Hopper", "grace.hopper@example.com"))
    .await
    .unwrap();
  let id = created.id.unwrap();

  persons.delete(id).await.unwrap();
  assert!(persons.get(id).await.unwrap_err().is_not_found());
  // Deleting again is not an error.
  persons.delete(id).await.unwrap();
}

#[tokio::test]
async fn person_search_matches_case_insensitively() {
  let s = store().await;
  let (persons, _) = services(&s, RolePolicy::Strict);
  persons
    .create(Person::student("David", "Smith", "david.smith@example.com"))
    .await
    .unwrap();

  let found = persons.search("smith").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].last_name, "Smith");
  assert!(persons.search("jones").await.unwrap().is_empty());
}

// ─── Course service ──────────────────────────────────────────────────────────

#[tokio::test]
async fn course_lifecycle() {
  let s = store().await;
  let (persons, courses) = services(&s, RolePolicy::Strict);

  let t = persons
    .create(Person::teacher("Mr", "Teach", "mr.teach@example.com"))
    .await
    .unwrap();
  let s1 = persons
    .create(Person::student("Stu1", "One", "s1@example.com"))
    .await
    .unwrap();
  let s2 = persons
    .create(Person::student("Stu2", "Two", "s2@example.com"))
    .await
    .unwrap();
  let (s1_id, s2_id) = (s1.id.unwrap(), s2.id.unwrap());

  let created = courses
    .create(course_input("Math 101", t.id, vec![s1_id, s2_id]))
    .await
    .unwrap();
  let id = created.id.unwrap();
  assert_eq!(created.teacher_id(), t.id);
  assert_eq!(created.student_ids(), vec![s1_id, s2_id]);
  assert_eq!(courses.get(id).await.unwrap(), created);

  let updated = courses
    .update(id, course_input("Advanced Math", t.id, vec![s1_id]))
    .await
    .unwrap();
  assert_eq!(updated.name, "Advanced Math");
  assert_eq!(updated.student_ids(), vec![s1_id]);

  let listed = courses.list().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "Advanced Math");

  courses.delete(id).await.unwrap();
  assert!(matches!(
    courses.get(id).await.unwrap_err(),
    CoreError::CourseNotFound(i) if i == id
  ));
  courses.delete(id).await.unwrap();
}

#[tokio::test]
async fn course_create_drops_unresolved_references() {
  let s = store().await;
  let (persons, courses) = services(&s, RolePolicy::Strict);
  let s1 = persons
    .create(Person::student("Stu1", "One", "s1@example.com"))
    .await
    .unwrap();

  let created = courses
    .create(course_input("Math", Some(1000), vec![s1.id.unwrap(), 1001]))
    .await
    .unwrap();
  assert!(created.teacher.is_none());
  assert_eq!(created.student_ids(), vec![s1.id.unwrap()]);
}

#[tokio::test]
async fn course_update_replaces_teacher_and_students() {
  let s = store().await;
  let (persons, courses) = services(&s, RolePolicy::Strict);
  let t = persons
    .create(Person::teacher("Mr", "Teach", "mr.teach@example.com"))
    .await
    .unwrap();
  let s1 = persons
    .create(Person::student("Stu1", "One", "s1@example.com"))
    .await
    .unwrap();
  let s2 = persons
    .create(Person::student("Stu2", "Two", "s2@example.com"))
    .await
    .unwrap();

  let created = courses
    .create(course_input("Math", t.id, vec![s1.id.unwrap()]))
    .await
    .unwrap();

  let updated = courses
    .update(created.id.unwrap(), course_input("Math", None, vec![s2.id.unwrap()]))
    .await
    .unwrap();
  assert!(updated.teacher.is_none());
  assert_eq!(updated.student_ids(), vec![s2.id.unwrap()]);
}

#[tokio::test]
async fn course_validation_runs_before_lookup() {
  let s = store().await;
  let (_, courses) = services(&s, RolePolicy::Strict);

  let err = courses.create(course_input("  ", None, vec![])).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(_)));
  assert!(s.list_courses().await.unwrap().is_empty());

  // Invalid input against a missing course reports validation, not 404.
  let err = courses.update(1, course_input("", None, vec![])).await.unwrap_err();
  assert!(matches!(err, CoreError::Validation(_)));

  let err = courses.update(1, course_input("Ok", None, vec![])).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn course_service_honours_permissive_policy() {
  let s = store().await;
  let (persons, courses) = services(&s, RolePolicy::Permissive);
  let plain = persons
    .create(Person::new(PersonKind::Person, "Pat", "Plain", "pat@example.com"))
    .await
    .unwrap();

  let created = courses
    .create(course_input("Open", plain.id, vec![plain.id.unwrap()]))
    .await
    .unwrap();
  assert_eq!(created.teacher_id(), plain.id);
  assert_eq!(created.student_ids(), vec![plain.id.unwrap()]);
}
