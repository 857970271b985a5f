use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Error, Result, SimpleObject, ID};
use uuid::Uuid;

use crate::gql::loaders::ClubLoader;

#[derive(SimpleObject, Clone)]
pub struct Club {
    pub id: ID,
    pub name: String,
    pub city: Option<String>,
}

impl From<infra::models::ClubRow> for Club {
    fn from(row: infra::models::ClubRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            city: row.city,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Court {
    pub id: ID,
    pub club_id: ID,
    pub name: String,
    pub base_price_cents: i32,
    pub currency: String,
    pub is_active: bool,
}

impl From<infra::models::CourtRow> for Court {
    fn from(row: infra::models::CourtRow) -> Self {
        Self {
            id: row.id.into(),
            club_id: row.club_id.into(),
            name: row.name,
            base_price_cents: row.base_price_cents,
            currency: row.currency,
            is_active: row.is_active,
        }
    }
}

#[ComplexObject]
impl Court {
    async fn club(&self, ctx: &Context<'_>) -> Result<Club> {
        let loader = ctx.data::<DataLoader<ClubLoader>>()?;
        let club_uuid =
            Uuid::parse_str(self.club_id.as_str()).map_err(|e| Error::new(e.to_string()))?;

        match loader
            .load_one(club_uuid)
            .await
            .map_err(|e| Error::new(e.to_string()))?
        {
            Some(row) => Ok(row.into()),
            None => Err(Error::new("Club not found")),
        }
    }
}
