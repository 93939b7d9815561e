use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name_cipher: String,

    #[sea_orm(unique)]
    pub name_fingerprint: String,

    pub address_cipher: String,

    #[sea_orm(unique)]
    pub address_fingerprint: String,

    pub description: Option<String>,

    /// Filename of the link image under the images directory
    pub image: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::department_links::Entity")]
    DepartmentLinks,
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        super::department_links::Relation::Department.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::department_links::Relation::Link.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
