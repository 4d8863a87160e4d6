//! Customer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Customer;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub current_balance_cents: i64,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub cedula: String,
    pub hashed_password: String,
    pub profile_picture: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Customer {
    fn from(model: Model) -> Self {
        Customer {
            id: model.id,
            name: model.name,
            current_balance_cents: model.current_balance_cents,
            email: model.email,
            cedula: model.cedula,
            hashed_password: model.hashed_password,
            profile_picture: model.profile_picture,
        }
    }
}
