//! Delegation link database entity.

use sea_orm::entity::prelude::*;

use domain::DelegationLink;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub staff_name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DelegationLink {
    fn from(model: Model) -> Self {
        DelegationLink {
            id: model.id,
            owner_id: model.owner_id,
            user_id: model.user_id,
            staff_name: model.staff_name,
            created_at: model.created_at,
        }
    }
}
