use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name_cipher: String,

    #[sea_orm(unique)]
    pub name_fingerprint: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_departments::Entity")]
    AccountDepartments,
    #[sea_orm(has_many = "super::department_links::Entity")]
    DepartmentLinks,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        super::account_departments::Relation::Account.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::account_departments::Relation::Department.def().rev())
    }
}

impl Related<super::links::Entity> for Entity {
    fn to() -> RelationDef {
        super::department_links::Relation::Link.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::department_links::Relation::Department.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
