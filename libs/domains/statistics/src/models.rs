use axum_helpers::Message;
use chrono::{DateTime, Datelike, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Months covered by the sales rollup, current month included
pub const SALES_MONTHS: u32 = 6;

const MONTH_NAMES: [Message; 12] = [
    Message::new("يناير", "January"),
    Message::new("فبراير", "February"),
    Message::new("مارس", "March"),
    Message::new("أبريل", "April"),
    Message::new("مايو", "May"),
    Message::new("يونيو", "June"),
    Message::new("يوليو", "July"),
    Message::new("أغسطس", "August"),
    Message::new("سبتمبر", "September"),
    Message::new("أكتوبر", "October"),
    Message::new("نوفمبر", "November"),
    Message::new("ديسمبر", "December"),
];

/// Bilingual name of a 1-based month number
pub fn month_name(month: u32) -> Message {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize].clone()
}

/// Totals per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityCounts {
    /// Admins, not counting super-admins
    pub admins: u64,
    pub users: u64,
    pub sellers: u64,
    pub products: u64,
    pub orders: u64,
}

/// `[start, end)` of one calendar month in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The `count` calendar months ending with the month of `now`, oldest first.
pub fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<MonthWindow> {
    let Some(current) = now.date_naive().with_day(1) else {
        return Vec::new();
    };

    (0..count)
        .rev()
        .filter_map(|back| {
            let start = current.checked_sub_months(Months::new(back))?;
            let end = start.checked_add_months(Months::new(1))?;
            Some(MonthWindow {
                year: start.year(),
                month: start.month(),
                start: start.and_time(NaiveTime::MIN).and_utc(),
                end: end.and_time(NaiveTime::MIN).and_utc(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    pub month: Message,
    pub year: i32,
    /// Sum of order `totalPrice` placed during the month
    pub total_price: f64,
}

/// `GET /api/admins/statistics` payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(flatten)]
    pub counts: EntityCounts,
    pub monthly_sales: Vec<MonthlySales>,
}
