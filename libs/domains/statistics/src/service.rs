use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::instrument;

use crate::error::StatisticsResult;
use crate::models::{MonthlySales, SALES_MONTHS, Statistics, month_name, trailing_months};
use crate::repository::StatisticsRepository;

pub struct StatisticsService<R: StatisticsRepository> {
    repository: Arc<R>,
}

impl<R: StatisticsRepository> StatisticsService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Dashboard numbers as of now. Nothing is cached.
    pub async fn overview(&self) -> StatisticsResult<Statistics> {
        self.overview_at(Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn overview_at(&self, now: DateTime<Utc>) -> StatisticsResult<Statistics> {
        let windows = trailing_months(now, SALES_MONTHS);
        let counts = self.repository.entity_counts().await?;
        let totals = try_join_all(
            windows
                .iter()
                .map(|window| self.repository.sales_between(window.start, window.end)),
        )
        .await?;

        let monthly_sales = windows
            .iter()
            .zip(totals)
            .map(|(window, total_price)| MonthlySales {
                month: month_name(window.month),
                year: window.year,
                total_price,
            })
            .collect();

        Ok(Statistics {
            counts,
            monthly_sales,
        })
    }
}
