use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role, ordered by privilege. EDITOR and SALES are siblings: both
/// sit between ADMIN and USER but neither outranks the other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "SUPER_ADMIN")]
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,
    #[sea_orm(string_value = "ADMIN")]
    #[serde(rename = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "EDITOR")]
    #[serde(rename = "EDITOR")]
    Editor,
    #[sea_orm(string_value = "SALES")]
    #[serde(rename = "SALES")]
    Sales,
    #[sea_orm(string_value = "USER")]
    #[serde(rename = "USER")]
    User,
}

impl Role {
    /// Privilege rank; higher outranks lower. EDITOR and SALES share a rank
    /// on purpose, so rank comparison alone never puts one above the other.
    pub fn rank(self) -> u8 {
        match self {
            Role::SuperAdmin => 3,
            Role::Admin => 2,
            Role::Editor | Role::Sales => 1,
            Role::User => 0,
        }
    }

    pub fn is_admin_or_above(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    pub fn is_editor_or_above(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Editor)
    }

    pub fn is_sales_or_above(self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Sales)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::Sales => "SALES",
            Role::User => "USER",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::page::Entity")]
    Pages,
    #[sea_orm(has_many = "super::media::Entity")]
    Media,
    #[sea_orm(has_many = "super::address::Entity")]
    Addresses,
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pages.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
