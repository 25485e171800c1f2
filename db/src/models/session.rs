use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict,
};
use serde::Serialize;
use util::geo::Coordinates;

use super::attendance_record::AttendanceError;

/// A single scheduled class meeting during which attendance may be marked.
///
/// The geo anchor is the position of the teacher's device at the moment the
/// session was started; it is the reference point for every proximity check.
/// Rows are immutable after creation except for `finished_at`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub room_number: String,
    pub anchor_lat: f64,
    pub anchor_lon: f64,
    pub anchor_accuracy_m: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Counts produced by the finish backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinishSummary {
    pub enrolled: u64,
    pub already_marked: u64,
    pub marked_absent: u64,
}

impl Model {
    /// Creates a session for an existing course and teacher.
    pub async fn create(
        db: &DatabaseConnection,
        course_id: i64,
        teacher_id: i64,
        room_number: &str,
        anchor: Coordinates,
        anchor_accuracy_m: Option<f64>,
    ) -> Result<Self, DbErr> {
        let am = ActiveModel {
            course_id: Set(course_id),
            teacher_id: Set(teacher_id),
            room_number: Set(room_number.to_owned()),
            anchor_lat: Set(anchor.lat),
            anchor_lon: Set(anchor.lon),
            anchor_accuracy_m: Set(anchor_accuracy_m),
            started_at: Set(Utc::now()),
            finished_at: Set(None),
            ..Default::default()
        };
        am.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_teacher(
        db: &DatabaseConnection,
        teacher_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_desc(Column::StartedAt)
            .all(db)
            .await
    }

    pub fn anchor(&self) -> Coordinates {
        Coordinates::new(self.anchor_lat, self.anchor_lon)
    }

    /// A session stays open until a teacher explicitly finishes it; there is
    /// no timeout.
    pub fn is_open(&self) -> bool {
        self.finished_at.is_none()
    }

    /// Finishes the session: every enrolled student without a record gets an
    /// absent row, then `finished_at` is stamped. After this, student-path
    /// marks are rejected; teacher overrides stay possible as corrections.
    ///
    /// The backfill inserts with ON CONFLICT DO NOTHING on the (session,
    /// student) key, so racing student marks cannot be overwritten and a
    /// retried finish never duplicates rows.
    pub async fn finish(db: &DatabaseConnection, session_id: i64) -> Result<FinishSummary, AttendanceError> {
        use super::attendance_record as record;

        let session = Self::find_by_id(db, session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(session_id))?;
        if !session.is_open() {
            return Err(AttendanceError::SessionFinished(session_id));
        }

        let course = super::course::Model::find_by_id(db, session.course_id)
            .await?
            .ok_or(AttendanceError::CourseNotFound(session.course_id))?;
        let enrolled = course.enrolled_student_ids(db).await?;

        let existing: std::collections::HashSet<i64> = record::Entity::find()
            .filter(record::Column::SessionId.eq(session_id))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.student_id)
            .collect();

        let now = Utc::now();
        let absentees: Vec<record::ActiveModel> = enrolled
            .iter()
            .filter(|sid| !existing.contains(sid))
            .map(|&student_id| record::ActiveModel {
                session_id: Set(session_id),
                student_id: Set(student_id),
                is_present: Set(false),
                fingerprint: Set(None),
                marked_at: Set(now),
            })
            .collect();

        let marked_absent = absentees.len() as u64;
        if !absentees.is_empty() {
            record::Entity::insert_many(absentees)
                .on_conflict(
                    OnConflict::columns([record::Column::SessionId, record::Column::StudentId])
                        .do_nothing()
                        .to_owned(),
                )
                .do_nothing()
                .exec(db)
                .await?;
        }

        let mut am: ActiveModel = session.into();
        am.finished_at = Set(Some(now));
        am.update(db).await?;

        Ok(FinishSummary {
            enrolled: enrolled.len() as u64,
            already_marked: existing.len() as u64,
            marked_absent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{course, course_student, student, user};
    use crate::test_utils::setup_test_db;

    async fn seed_student(db: &DatabaseConnection, username: &str) -> student::Model {
        let u = user::Model::create(db, username, "pw", user::Role::Student, "S", "T")
            .await
            .unwrap();
        student::Model::create(db, u.id).await.unwrap()
    }

    async fn seed_session(db: &DatabaseConnection) -> (course::Model, Model) {
        let tu = user::Model::create(db, "teach-1", "pw", user::Role::Teacher, "T", "R")
            .await
            .unwrap();
        let teacher = crate::models::teacher::Model::create(db, tu.id).await.unwrap();
        let c = course::Model::create(db, "CSE101", "Intro", "CS").await.unwrap();
        let s = Model::create(
            db,
            c.id,
            teacher.id,
            "Room A",
            Coordinates::new(-25.7545, 28.2314),
            Some(5.0),
        )
        .await
        .unwrap();
        (c, s)
    }

    #[tokio::test]
    async fn finish_backfills_every_unmarked_student() {
        let db = setup_test_db().await;
        let (course, session) = seed_session(&db).await;

        let a = seed_student(&db, "stu-a").await;
        let b = seed_student(&db, "stu-b").await;
        let c = seed_student(&db, "stu-c").await;
        for st in [&a, &b, &c] {
            course_student::Model::enroll(&db, course.id, st.id).await.unwrap();
        }

        // One student already present.
        crate::models::attendance_record::Model::set_present(&db, session.id, a.id, true)
            .await
            .unwrap();

        let summary = Model::finish(&db, session.id).await.unwrap();
        assert_eq!(
            summary,
            FinishSummary {
                enrolled: 3,
                already_marked: 1,
                marked_absent: 2
            }
        );

        // N enrolled -> exactly N records.
        let records = crate::models::attendance_record::Model::for_session(&db, session.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 3);
        let present: Vec<i64> = records
            .iter()
            .filter(|r| r.is_present)
            .map(|r| r.student_id)
            .collect();
        assert_eq!(present, vec![a.id]);
    }

    #[tokio::test]
    async fn finish_twice_is_rejected() {
        let db = setup_test_db().await;
        let (_c, session) = seed_session(&db).await;
        Model::finish(&db, session.id).await.unwrap();
        let again = Model::finish(&db, session.id).await;
        assert!(matches!(again, Err(AttendanceError::SessionFinished(_))));
    }

    #[tokio::test]
    async fn finish_unknown_session_is_not_found() {
        let db = setup_test_db().await;
        let res = Model::finish(&db, 424242).await;
        assert!(matches!(res, Err(AttendanceError::SessionNotFound(424242))));
    }
}
