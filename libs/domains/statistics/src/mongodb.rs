//! MongoDB implementation of StatisticsRepository

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::StatisticsResult;
use crate::models::EntityCounts;
use crate::repository::StatisticsRepository;

/// Counts are taken over raw documents so this crate stays independent of
/// the domain models that own each collection.
#[derive(Clone)]
pub struct MongoStatisticsRepository {
    admins: Collection<Document>,
    users: Collection<Document>,
    sellers: Collection<Document>,
    products: Collection<Document>,
    orders: Collection<Document>,
}

impl MongoStatisticsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            admins: db.collection("admins"),
            users: db.collection("users"),
            sellers: db.collection("sellers"),
            products: db.collection("products"),
            orders: db.collection("orders"),
        }
    }
}

fn sales_pipeline(start: DateTime<Utc>, end: DateTime<Utc>) -> [Document; 2] {
    [
        doc! {
            "$match": {
                "createdAt": {
                    "$gte": bson::DateTime::from_chrono(start),
                    "$lt": bson::DateTime::from_chrono(end),
                }
            }
        },
        doc! { "$group": { "_id": Bson::Null, "total": { "$sum": "$totalPrice" } } },
    ]
}

/// `$sum` yields an int when every input was an int
fn numeric(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => f64::from(*v),
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

#[async_trait]
impl StatisticsRepository for MongoStatisticsRepository {
    #[instrument(skip(self))]
    async fn entity_counts(&self) -> StatisticsResult<EntityCounts> {
        let (admins, users, sellers, products, orders) = tokio::try_join!(
            self.admins
                .count_documents(doc! { "role": { "$ne": "SUPER_ADMIN" } })
                .into_future(),
            self.users.count_documents(doc! {}).into_future(),
            self.sellers.count_documents(doc! {}).into_future(),
            self.products.count_documents(doc! {}).into_future(),
            self.orders.count_documents(doc! {}).into_future(),
        )?;

        Ok(EntityCounts {
            admins,
            users,
            sellers,
            products,
            orders,
        })
    }

    #[instrument(skip(self))]
    async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StatisticsResult<f64> {
        let mut cursor = self.orders.aggregate(sales_pipeline(start, end)).await?;
        let total = cursor
            .try_next()
            .await?
            .map(|group| numeric(group.get("total")))
            .unwrap_or_default();
        Ok(total)
    }
}
