use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique course code (e.g. "CSE101").
    pub course_code: String,
    pub name: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::course_student::Entity")]
    Enrollments,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::course_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_student::Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::course_student::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        course_code: &str,
        name: &str,
        department: &str,
    ) -> Result<Self, DbErr> {
        let am = ActiveModel {
            course_code: Set(course_code.to_owned()),
            name: Set(name.to_owned()),
            department: Set(department.to_owned()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        am.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_code(
        db: &DatabaseConnection,
        course_code: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::CourseCode.eq(course_code))
            .one(db)
            .await
    }

    /// Ids of all students enrolled in this course.
    pub async fn enrolled_student_ids(&self, db: &DatabaseConnection) -> Result<Vec<i64>, DbErr> {
        let rows = super::course_student::Entity::find()
            .filter(super::course_student::Column::CourseId.eq(self.id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.student_id).collect())
    }
}
