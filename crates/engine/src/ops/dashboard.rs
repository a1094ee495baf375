use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use sea_orm::{ConnectionTrait, QueryFilter, Statement, TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions};

use super::{Engine, with_tx};

const RECENT_LIMIT: u64 = 5;
const CHART_DAYS: u64 = 7;

/// Income and expense totals of a single day. Transfers are not counted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub weekday: String,
    pub income_minor: i64,
    pub expense_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Sum of every account balance, in raw minor units.
    pub total_balance_minor: i64,
    pub month_expenses_minor: i64,
    pub recent: Vec<Transaction>,
    /// Oldest day first, ending on `today`.
    pub last_7_days: Vec<DailyTotals>,
}

impl Engine {
    /// Aggregated figures for the home screen of `user_id`.
    ///
    /// `today` is passed in rather than read from the clock so the month and
    /// the 7-day window are decided by the caller's calendar.
    pub async fn dashboard(&self, user_id: &str, today: NaiveDate) -> ResultEngine<Dashboard> {
        let (month_start, next_month_start) = month_bounds(today)?;
        let window_start = today
            .checked_sub_days(Days::new(CHART_DAYS - 1))
            .ok_or_else(|| EngineError::InvalidAmount("date out of range".to_string()))?;

        let (total_balance_minor, month_expenses_minor, window) = with_tx!(self, |db_tx| {
            let backend = self.database.get_database_backend();

            let total_balance_minor: i64 = {
                let stmt = Statement::from_sql_and_values(
                    backend,
                    "SELECT COALESCE(SUM(balance), 0) AS sum FROM accounts WHERE user_id = ?;"
                        .to_string(),
                    vec![user_id.into()],
                );
                let row = db_tx.query_one(stmt).await?;
                row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
            };

            let month_expenses_minor: i64 = {
                let stmt = Statement::from_sql_and_values(
                    backend,
                    "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                     FROM transactions \
                     WHERE user_id = ? AND kind = ? AND date >= ? AND date < ?;"
                        .to_string(),
                    vec![
                        user_id.into(),
                        TransactionKind::Expense.as_str().into(),
                        month_start.into(),
                        next_month_start.into(),
                    ],
                );
                let row = db_tx.query_one(stmt).await?;
                row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
            };

            let window: Vec<transactions::Model> = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .filter(transactions::Column::Date.gte(window_start))
                .filter(transactions::Column::Date.lte(today))
                .filter(transactions::Column::Kind.ne(TransactionKind::Transfer.as_str()))
                .all(&db_tx)
                .await?;

            Ok::<_, EngineError>((total_balance_minor, month_expenses_minor, window))
        })?;

        let recent = self.list_transactions(user_id, Some(RECENT_LIMIT)).await?;

        Ok(Dashboard {
            total_balance_minor,
            month_expenses_minor,
            recent,
            last_7_days: daily_totals(window_start, CHART_DAYS, &window)?,
        })
    }
}

/// First day of `today`'s month and first day of the following month.
fn month_bounds(today: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1);
    let next = start.and_then(|start| start.checked_add_months(Months::new(1)));
    match (start, next) {
        (Some(start), Some(next)) => Ok((start, next)),
        _ => Err(EngineError::InvalidAmount("date out of range".to_string())),
    }
}

fn daily_totals(
    first_day: NaiveDate,
    days: u64,
    rows: &[transactions::Model],
) -> ResultEngine<Vec<DailyTotals>> {
    let mut per_day: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
    for row in rows {
        let slot = per_day.entry(row.date).or_default();
        match TransactionKind::try_from(row.kind.as_str())? {
            TransactionKind::Income => slot.0 += row.amount_minor,
            TransactionKind::Expense => slot.1 += row.amount_minor,
            TransactionKind::Transfer => {}
        }
    }

    (0..days)
        .map(|offset| {
            let date = first_day
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| EngineError::InvalidAmount("date out of range".to_string()))?;
            let (income_minor, expense_minor) = per_day.get(&date).copied().unwrap_or_default();
            Ok(DailyTotals {
                date,
                weekday: date.format("%a").to_string(),
                income_minor,
                expense_minor,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn row(kind: TransactionKind, amount_minor: i64, date: NaiveDate) -> transactions::Model {
        transactions::Model {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            kind: kind.as_str().to_string(),
            account_id: Uuid::new_v4(),
            destination_account_id: None,
            category_id: None,
            amount_minor,
            description: None,
            date,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn month_bounds_wrap_the_year() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let (start, next) = month_bounds(today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn daily_totals_fill_missing_days_with_zero() {
        let first = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        let rows = vec![
            row(TransactionKind::Expense, 15_000, first),
            row(TransactionKind::Expense, 5_000, first),
            row(TransactionKind::Income, 2_500_000, first.succ_opt().unwrap()),
        ];

        let totals = daily_totals(first, 7, &rows).unwrap();

        assert_eq!(totals.len(), 7);
        assert_eq!(totals[0].weekday, "Mon");
        assert_eq!(totals[0].expense_minor, 20_000);
        assert_eq!(totals[1].income_minor, 2_500_000);
        assert!(totals[2..].iter().all(|d| d.income_minor == 0 && d.expense_minor == 0));
        assert_eq!(totals[6].date, NaiveDate::from_ymd_opt(2026, 2, 15).unwrap());
    }
}
