use sea_orm::entity::prelude::*;
use sea_orm::{DbErr, Set, sea_query::OnConflict};
use serde::Serialize;

/// Enrollment join table: one row per (course, student).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "course_students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
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
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Enrolls a student; enrolling twice is a no-op.
    pub async fn enroll(
        db: &DatabaseConnection,
        course_id: i64,
        student_id: i64,
    ) -> Result<(), DbErr> {
        let am = ActiveModel {
            course_id: Set(course_id),
            student_id: Set(student_id),
        };
        Entity::insert(am)
            .on_conflict(
                OnConflict::columns([Column::CourseId, Column::StudentId])
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn is_enrolled(
        db: &DatabaseConnection,
        course_id: i64,
        student_id: i64,
    ) -> Result<bool, DbErr> {
        Ok(Entity::find_by_id((course_id, student_id))
            .one(db)
            .await?
            .is_some())
    }
}
