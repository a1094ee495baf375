use api_types::dashboard::{DashboardQuery, DashboardView, DayTotals};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;

use crate::{AuthUser, ServerError, server::ServerState, transactions};

/// Handler to get the dashboard figures
pub async fn get(
    Extension(AuthUser(user)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ServerError> {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let dashboard = state.engine.dashboard(&user, today).await?;

    Ok(Json(DashboardView {
        total_balance_minor: dashboard.total_balance_minor,
        this_month_expenses_minor: dashboard.month_expenses_minor,
        recent_transactions: dashboard
            .recent
            .into_iter()
            .map(transactions::view)
            .collect(),
        chart_data: dashboard
            .last_7_days
            .into_iter()
            .map(|day| DayTotals {
                date: day.date,
                day: day.weekday,
                income_minor: day.income_minor,
                expense_minor: day.expense_minor,
            })
            .collect(),
    }))
}
