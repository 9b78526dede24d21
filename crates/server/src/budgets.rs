use api_types::{Envelope, budget::Budget};
use axum::{Json, extract::State};
use engine::{BudgetView, EngineError};

use crate::{ServerError, map, server::ServerState};

fn budget_view(view: BudgetView) -> Result<Budget, EngineError> {
    let fiscal_year = view.fiscal_year();
    let remaining = view.remaining()?;
    Ok(Budget {
        id: view.budget.id,
        name: view.budget.name,
        fiscal_year,
        start_date: view.budget.start_date,
        end_date: view.budget.end_date,
        account_id: view.budget.account_id,
        amount: map::major(view.budget.amount_minor),
        spent_amount: view.spent.to_major(),
        remaining_amount: remaining.to_major(),
        state: map::api_budget_state(view.budget.state),
    })
}

/// Handle requests for listing budgets with their consumption
pub async fn list(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<Budget>>>, ServerError> {
    let budgets = state.engine.budgets().await?;
    Ok(Json(Envelope::data(
        budgets
            .into_iter()
            .map(budget_view)
            .collect::<Result<_, _>>()?,
    )))
}
