//! One-time sample data for an empty store.

use roster_core::{
  course::Course,
  person::Person,
  store::{CourseStore, PersonStore},
};

const TEACHERS: [(&str, &str); 4] = [
  ("Ada", "Lovelace"),
  ("Alan", "Turing"),
  ("Grace", "Hopper"),
  ("Katherine", "Johnson"),
];

const STUDENT_COUNT: usize = 20;

/// Students per course, taken consecutively from the seeded students.
const COURSE_SIZES: [usize; 5] = [5, 5, 4, 3, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
  pub teachers: usize,
  pub students: usize,
  pub courses:  usize,
}

/// Seed `store` unless it already holds persons. Returns `None` when
/// nothing was inserted.
pub async fn seed_if_empty<S>(store: &S) -> anyhow::Result<Option<SeedSummary>>
where
  S: PersonStore + CourseStore,
{
  if store.count_persons().await? > 0 {
    tracing::debug!("store already populated, skipping seed");
    return Ok(None);
  }

  let mut teachers = Vec::with_capacity(TEACHERS.len());
  for (first, last) in TEACHERS {
    let email = format!("{}.{}@example.com", first, last).to_lowercase();
    teachers.push(store.save_person(Person::teacher(first, last, email)).await?);
  }

  let mut students = Vec::with_capacity(STUDENT_COUNT);
  for i in 1..=STUDENT_COUNT {
    let student = Person::student(
      format!("Student{i}"),
      format!("Lastname{i}"),
      format!("student{i}@example.com"),
    );
    students.push(store.save_person(student).await?);
  }

  let mut remaining = students.iter();
  let courses = COURSE_SIZES
    .iter()
    .enumerate()
    .map(|(i, &size)| Course {
      id:       None,
      name:     format!("Course {}", i + 1),
      teacher:  Some(teachers[i % teachers.len()].clone()),
      students: remaining.by_ref().take(size).cloned().collect(),
    })
    .collect();
  let courses = store.save_courses(courses).await?;

  let summary = SeedSummary {
    teachers: teachers.len(),
    students: students.len(),
    courses:  courses.len(),
  };
  tracing::info!(
    teachers = summary.teachers,
    students = summary.students,
    courses = summary.courses,
    "seeded empty store"
  );
  Ok(Some(summary))
}
