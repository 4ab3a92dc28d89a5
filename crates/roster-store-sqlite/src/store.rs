//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`] and
//! [`CourseStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, Row};

use roster_core::{
  course::{Course, CourseId},
  person::{Person, PersonId, fold_last_name},
  store::{CourseStore, PersonStore},
};

use crate::{
  Error, Result,
  encode::{CourseRow, RawCourse, RawPerson, encode_person_kind},
  schema::SCHEMA,
};

const PERSON_COLUMNS: &str =
  "person_id, person_type, first_name, last_name, email";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(?path, "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row access ──────────────────────────────────────────────────────────────
//
// Synchronous helpers that run on the connection thread inside `call`.

fn read_person(row: &Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:   row.get(0)?,
    person_type: row.get(1)?,
    first_name:  row.get(2)?,
    last_name:   row.get(3)?,
    email:       row.get(4)?,
  })
}

fn select_person(
  conn: &Connection,
  id: PersonId,
) -> rusqlite::Result<Option<RawPerson>> {
  conn
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
      rusqlite::params![id],
      read_person,
    )
    .optional()
}

/// Attach the teacher and ordered students to a course row.
fn load_course(
  conn: &Connection,
  course_id: CourseId,
  name: String,
  teacher_id: Option<PersonId>,
) -> rusqlite::Result<RawCourse> {
  let teacher = match teacher_id {
    Some(id) => select_person(conn, id)?,
    None => None,
  };

  let mut stmt = conn.prepare_cached(
    "SELECT p.person_id, p.person_type, p.first_name, p.last_name, p.email
     FROM course_students cs
     JOIN persons p ON p.person_id = cs.student_id
     WHERE cs.course_id = ?1
     ORDER BY cs.position",
  )?;
  let students = stmt
    .query_map(rusqlite::params![course_id], read_person)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(RawCourse { course_id, name, teacher, students })
}

fn select_course(
  conn: &Connection,
  id: CourseId,
) -> rusqlite::Result<Option<RawCourse>> {
  let head: Option<(CourseId, String, Option<PersonId>)> = conn
    .query_row(
      "SELECT course_id, name, teacher_id FROM courses WHERE course_id = ?1",
      rusqlite::params![id],
      |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
    )
    .optional()?;

  head
    .map(|(course_id, name, teacher_id)| {
      load_course(conn, course_id, name, teacher_id)
    })
    .transpose()
}

/// Insert or overwrite a course row and rewrite its student links.
///
/// Returns `Ok(None)` when `row` targets a course id that does not exist.
fn write_course(
  conn: &Connection,
  row: &CourseRow,
) -> rusqlite::Result<Option<CourseId>> {
  let course_id = match row.course_id {
    Some(id) => {
      let updated = conn.execute(
        "UPDATE courses SET name = ?1, teacher_id = ?2 WHERE course_id = ?3",
        rusqlite::params![row.name, row.teacher_id, id],
      )?;
      if updated == 0 {
        return Ok(None);
      }
      conn.execute(
        "DELETE FROM course_students WHERE course_id = ?1",
        rusqlite::params![id],
      )?;
      id
    }
    None => {
      conn.execute(
        "INSERT INTO courses (name, teacher_id) VALUES (?1, ?2)",
        rusqlite::params![row.name, row.teacher_id],
      )?;
      conn.last_insert_rowid()
    }
  };

  let mut stmt = conn.prepare_cached(
    "INSERT INTO course_students (course_id, student_id, position)
     VALUES (?1, ?2, ?3)",
  )?;
  for (position, student_id) in row.student_ids.iter().enumerate() {
    stmt.execute(rusqlite::params![course_id, student_id, position as i64])?;
  }

  Ok(Some(course_id))
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons ORDER BY person_id"
        ))?;
        let rows = stmt
          .query_map([], read_person)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_person(conn, id)?))
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn find_persons_by_last_name<'a>(
    &'a self,
    last_name: &'a str,
  ) -> Result<Vec<Person>> {
    let folded = fold_last_name(last_name);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE last_name_folded = ?1
           ORDER BY person_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![folded], read_person)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn save_person(&self, person: Person) -> Result<Person> {
    let target   = person.id;
    let kind_str = encode_person_kind(person.kind);
    let first    = person.first_name.clone();
    let last     = person.last_name.clone();
    let folded   = fold_last_name(&person.last_name);
    let email    = person.email.clone();

    let saved_id: Option<PersonId> = self
      .conn
      .call(move |conn| {
        let Some(id) = target else {
          conn.execute(
            "INSERT INTO persons
               (person_type, first_name, last_name, last_name_folded, email)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![kind_str, first, last, folded, email],
          )?;
          return Ok(Some(conn.last_insert_rowid()));
        };

        let updated = conn.execute(
          "UPDATE persons
           SET person_type = ?1, first_name = ?2, last_name = ?3,
               last_name_folded = ?4, email = ?5
           WHERE person_id = ?6",
          rusqlite::params![kind_str, first, last, folded, email, id],
        )?;
        Ok((updated > 0).then_some(id))
      })
      .await?;

    let id = saved_id
      .ok_or_else(|| Error::PersonNotFound(target.unwrap_or_default()))?;
    Ok(Person { id: Some(id), ..person })
  }

  async fn delete_person(&self, id: PersonId) -> Result<bool> {
    // Foreign keys null out teacher slots and drop student links.
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn count_persons(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM persons", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }
}

// ─── CourseStore impl ────────────────────────────────────────────────────────

impl CourseStore for SqliteStore {
  type Error = Error;

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let raws: Vec<RawCourse> = self
      .conn
      .call(|conn| {
        let conn: &Connection = conn;
        let heads = {
          let mut stmt = conn.prepare(
            "SELECT course_id, name, teacher_id FROM courses ORDER BY course_id",
          )?;
          stmt
            .query_map([], |r| {
              Ok((
                r.get::<_, CourseId>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Option<PersonId>>(2)?,
              ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let rows = heads
          .into_iter()
          .map(|(id, name, teacher_id)| load_course(conn, id, name, teacher_id))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCourse::into_course).collect()
  }

  async fn get_course(&self, id: CourseId) -> Result<Option<Course>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_course(conn, id)?))
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }

  async fn save_course(&self, course: Course) -> Result<Course> {
    let row = CourseRow::from(&course);

    // `Err(id)` from the closure means the update target is missing; the
    // transaction is dropped and rolled back.
    let outcome: std::result::Result<RawCourse, CourseId> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(id) = write_course(&tx, &row)? else {
          return Ok(Err(row.course_id.unwrap_or_default()));
        };
        let raw = select_course(&tx, id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    outcome.map_err(Error::CourseNotFound)?.into_course()
  }

  async fn save_courses(&self, courses: Vec<Course>) -> Result<Vec<Course>> {
    let rows: Vec<CourseRow> = courses.iter().map(CourseRow::from).collect();

    let outcome: std::result::Result<Vec<RawCourse>, CourseId> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut saved = Vec::with_capacity(rows.len());
        for row in &rows {
          let Some(id) = write_course(&tx, row)? else {
            return Ok(Err(row.course_id.unwrap_or_default()));
          };
          saved.push(
            select_course(&tx, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?,
          );
        }
        tx.commit()?;
        Ok(Ok(saved))
      })
      .await?;

    outcome
      .map_err(Error::CourseNotFound)?
      .into_iter()
      .map(RawCourse::into_course)
      .collect()
  }

  async fn delete_course(&self, id: CourseId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM courses WHERE course_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }
}
