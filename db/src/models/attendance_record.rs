use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict};
use serde::Serialize;
use thiserror::Error;
use util::geo::{Coordinates, ProximityCheck, ProximityPolicy};

/// One attendance fact per (session, student). Absence of a row means the
/// student is unmarked; finishing the session materializes absences.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    pub is_present: bool,
    /// Device fingerprint captured on self-service marks. NULL for teacher
    /// overrides and finish backfills, which the unique index ignores.
    pub fingerprint: Option<String>,
    pub marked_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Everything that can go wrong while recording attendance.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("session {0} not found")]
    SessionNotFound(i64),
    #[error("student {0} not found")]
    StudentNotFound(i64),
    #[error("course {0} not found")]
    CourseNotFound(i64),
    #[error("no attendance record for student {student_id} in session {session_id}")]
    RecordNotFound { session_id: i64, student_id: i64 },
    #[error("session {0} is already finished")]
    SessionFinished(i64),
    #[error("device location unavailable")]
    LocationUnavailable,
    #[error("device is {distance_m:.1}m from the session anchor (allowed {threshold_m:.1}m)")]
    ProximityRejected { distance_m: f64, threshold_m: f64 },
    #[error("this device already marked attendance for another student in this session")]
    DuplicateFingerprint,
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl AttendanceError {
    /// Short machine-readable code used in rejection payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "session_not_found",
            Self::StudentNotFound(_) => "student_not_found",
            Self::CourseNotFound(_) => "course_not_found",
            Self::RecordNotFound { .. } => "record_not_found",
            Self::SessionFinished(_) => "session_finished",
            Self::LocationUnavailable => "location_unavailable",
            Self::ProximityRejected { .. } => "proximity_rejected",
            Self::DuplicateFingerprint => "duplicate_fingerprint",
            Self::Db(_) => "storage_error",
        }
    }
}

/// A self-service mark request, as sent by a student's device after scanning
/// the session QR code.
#[derive(Debug, Clone)]
pub struct MarkRequest {
    pub session_id: i64,
    pub student_id: i64,
    pub is_present: bool,
    pub fingerprint: String,
    pub device: Coordinates,
    pub device_accuracy_m: Option<f64>,
}

fn is_fingerprint_conflict(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("UNIQUE") && msg.contains("fingerprint")
}

impl Model {
    /// Records a student's own mark: session must be open, the device must be
    /// within the proximity threshold of the session anchor, and the device
    /// fingerprint must not already belong to a different student in this
    /// session. Re-marking the same student replaces the previous row.
    pub async fn mark(db: &DatabaseConnection, req: &MarkRequest) -> Result<Self, AttendanceError> {
        let session = super::session::Model::find_by_id(db, req.session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(req.session_id))?;
        if !session.is_open() {
            return Err(AttendanceError::SessionFinished(req.session_id));
        }

        super::student::Model::find_by_id(db, req.student_id)
            .await?
            .ok_or(AttendanceError::StudentNotFound(req.student_id))?;

        let policy = ProximityPolicy::new(util::config::attendance_distance_m());
        match policy.check(
            req.device,
            req.device_accuracy_m,
            session.anchor(),
            session.anchor_accuracy_m,
        ) {
            ProximityCheck::Accepted { .. } => {}
            ProximityCheck::Rejected {
                distance_m,
                threshold_m,
            } => {
                return Err(AttendanceError::ProximityRejected {
                    distance_m,
                    threshold_m,
                });
            }
            ProximityCheck::LocationUnavailable => {
                return Err(AttendanceError::LocationUnavailable);
            }
        }

        // First writer wins: a fingerprint already attached to a different
        // student in this session blocks the mark. The unique index backs
        // this up under concurrency.
        let claimed = Entity::find()
            .filter(Column::SessionId.eq(req.session_id))
            .filter(Column::Fingerprint.eq(req.fingerprint.as_str()))
            .filter(Column::StudentId.ne(req.student_id))
            .one(db)
            .await?;
        if claimed.is_some() {
            return Err(AttendanceError::DuplicateFingerprint);
        }

        let now = Utc::now();
        let am = ActiveModel {
            session_id: Set(req.session_id),
            student_id: Set(req.student_id),
            is_present: Set(req.is_present),
            fingerprint: Set(Some(req.fingerprint.clone())),
            marked_at: Set(now),
        };
        let res = Entity::insert(am)
            .on_conflict(
                OnConflict::columns([Column::SessionId, Column::StudentId])
                    .update_columns([Column::IsPresent, Column::Fingerprint, Column::MarkedAt])
                    .to_owned(),
            )
            .exec(db)
            .await;
        match res {
            Ok(_) => {}
            Err(e) if is_fingerprint_conflict(&e) => {
                return Err(AttendanceError::DuplicateFingerprint);
            }
            Err(e) => return Err(e.into()),
        }

        Self::find_one(db, req.session_id, req.student_id)
            .await?
            .ok_or(AttendanceError::RecordNotFound {
                session_id: req.session_id,
                student_id: req.student_id,
            })
    }

    /// Teacher correction: sets presence directly, skipping the proximity and
    /// fingerprint checks. Works on finished sessions too.
    pub async fn set_present(
        db: &DatabaseConnection,
        session_id: i64,
        student_id: i64,
        is_present: bool,
    ) -> Result<Self, AttendanceError> {
        super::session::Model::find_by_id(db, session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(session_id))?;
        super::student::Model::find_by_id(db, student_id)
            .await?
            .ok_or(AttendanceError::StudentNotFound(student_id))?;

        let am = ActiveModel {
            session_id: Set(session_id),
            student_id: Set(student_id),
            is_present: Set(is_present),
            fingerprint: Set(None),
            marked_at: Set(Utc::now()),
        };
        Entity::insert(am)
            .on_conflict(
                OnConflict::columns([Column::SessionId, Column::StudentId])
                    .update_columns([Column::IsPresent, Column::MarkedAt])
                    .to_owned(),
            )
            .exec(db)
            .await?;

        Self::find_one(db, session_id, student_id)
            .await?
            .ok_or(AttendanceError::RecordNotFound {
                session_id,
                student_id,
            })
    }

    /// Flips an existing record between present and absent.
    pub async fn toggle(
        db: &DatabaseConnection,
        session_id: i64,
        student_id: i64,
    ) -> Result<Self, AttendanceError> {
        let record = Self::find_one(db, session_id, student_id)
            .await?
            .ok_or(AttendanceError::RecordNotFound {
                session_id,
                student_id,
            })?;
        let flipped = !record.is_present;
        let mut am: ActiveModel = record.into();
        am.is_present = Set(flipped);
        am.marked_at = Set(Utc::now());
        Ok(am.update(db).await?)
    }

    pub async fn find_one(
        db: &DatabaseConnection,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id((session_id, student_id)).one(db).await
    }

    pub async fn for_session(db: &DatabaseConnection, session_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::StudentId)
            .all(db)
            .await
    }

    /// A student's attendance history, newest first.
    pub async fn for_student(db: &DatabaseConnection, student_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::MarkedAt)
            .all(db)
            .await
    }

    pub async fn present_count(db: &DatabaseConnection, session_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::IsPresent.eq(true))
            .count(db)
            .await
    }
}
