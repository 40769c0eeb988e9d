//! SeaORM Entity for staff table
//!
//! Staff profiles are soft-deleted: `is_active` is flipped to false and the
//! row is kept so historical content can still reference the person.

use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, Select};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Owning login, if the profile is linked to one. A profile may exist
    /// without a login (e.g. seeded directory entries).
    pub user_id: Option<i32>,
    pub name: String,
    /// Title shown in the directory, e.g. "Program Director"
    pub role: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub image_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Entity {
    /// Every read of the public directory goes through this one filter so no
    /// endpoint can forget to exclude deactivated profiles.
    pub fn find_active() -> Select<Entity> {
        Self::find().filter(Column::IsActive.eq(true))
    }
}

impl ActiveModelBehavior for ActiveModel {}
