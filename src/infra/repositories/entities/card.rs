//! Card database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Card;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "card")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Card {
    fn from(model: Model) -> Self {
        Card {
            id: model.id,
            long_num: model.long_num,
            expires: model.expires,
            ccv: model.ccv,
        }
    }
}
