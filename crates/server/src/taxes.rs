//! Tax configuration endpoints and the stateless tax calculator.

use api_types::{
    Envelope, ListQuery,
    tax::{Tax, TaxCompute, TaxComputed, TaxNew, TaxUpdate},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use engine::{NewTax, TaxPatch, TaxView};

use crate::{ServerError, map, server::ServerState};

fn tax_view(view: TaxView) -> Tax {
    let tax = view.tax;
    Tax {
        id: tax.id,
        name: tax.name,
        code: tax.code,
        sequence: tax.sequence,
        rate: tax.amount,
        type_tax_use: map::api_tax_use(tax.type_tax_use),
        active: tax.active,
        amount_type: map::api_amount_type(tax.amount_type),
        tax_category: map::api_tax_category(tax.tax_category),
        calculation_method: map::api_calculation_method(tax.calculation_method),
        is_exempt: tax.is_exempt,
        exempt_reason: tax.exempt_reason,
        account_id: tax.account_id,
        account_name: view.account_name,
        refund_account_id: tax.refund_account_id,
        refund_account_name: view.refund_account_name,
        tax_group_id: tax.tax_group_id,
        tax_group_name: view.tax_group_name,
        report_frequency: map::api_report_frequency(tax.report_frequency),
        effective_date: tax.effective_date,
        expiry_date: tax.expiry_date,
        description: tax.description,
        created_at: tax.created_at,
        updated_at: tax.updated_at,
    }
}

/// Handle requests for listing taxes ordered by sequence
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Tax>>>, ServerError> {
    let taxes = state.engine.taxes(query.include_inactive).await?;
    Ok(Json(Envelope::data(taxes.into_iter().map(tax_view).collect())))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Tax>>, ServerError> {
    let tax = state.engine.tax(id).await?;
    Ok(Json(Envelope::data(tax_view(tax))))
}

/// Handle requests for creating a tax. A missing code is generated as
/// `TAX{year}{seq:06}`.
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TaxNew>, JsonRejection>,
) -> Result<Json<Envelope<Tax>>, ServerError> {
    let Json(payload) = payload?;
    let tax = state
        .engine
        .new_tax(NewTax {
            name: payload.name,
            code: payload.code,
            sequence: payload.sequence,
            active: payload.active,
            amount: payload.rate,
            amount_type: payload.amount_type.map(map::amount_type),
            type_tax_use: payload.type_tax_use.map(map::tax_use),
            tax_category: payload.tax_category.map(map::tax_category),
            calculation_method: payload.calculation_method.map(map::calculation_method),
            is_exempt: payload.is_exempt,
            exempt_reason: payload.exempt_reason,
            account_id: payload.account_id,
            refund_account_id: payload.refund_account_id,
            tax_group_id: payload.tax_group_id,
            report_frequency: payload.report_frequency.map(map::report_frequency),
            effective_date: payload.effective_date,
            expiry_date: payload.expiry_date,
            description: payload.description,
        })
        .await?;

    Ok(Json(
        Envelope::data(tax_view(tax)).with_message("Tax created successfully"),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<TaxUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Tax>>, ServerError> {
    let Json(payload) = payload?;
    let tax = state
        .engine
        .update_tax(
            id,
            TaxPatch {
                name: payload.name,
                code: payload.code,
                sequence: payload.sequence,
                active: payload.active,
                amount: payload.rate,
                amount_type: payload.amount_type.map(map::amount_type),
                type_tax_use: payload.type_tax_use.map(map::tax_use),
                tax_category: payload.tax_category.map(map::tax_category),
                calculation_method: payload.calculation_method.map(map::calculation_method),
                is_exempt: payload.is_exempt,
                exempt_reason: payload.exempt_reason,
                account_id: payload.account_id,
                refund_account_id: payload.refund_account_id,
                tax_group_id: payload.tax_group_id,
                report_frequency: payload.report_frequency.map(map::report_frequency),
                effective_date: payload.effective_date,
                expiry_date: payload.expiry_date,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(
        Envelope::data(tax_view(tax)).with_message("Tax updated successfully"),
    ))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_tax(id).await?;
    Ok(Json(Envelope::message("Tax deleted successfully")))
}

/// Split a base amount with the rule of a stored tax
pub async fn compute(
    State(state): State<ServerState>,
    payload: Result<Json<TaxCompute>, JsonRejection>,
) -> Result<Json<Envelope<TaxComputed>>, ServerError> {
    let Json(payload) = payload?;
    let computation = state
        .engine
        .compute_tax(
            payload.tax_id,
            map::money("base_amount", payload.base_amount)?,
            payload.quantity,
        )
        .await?;

    let breakdown = computation.breakdown;
    Ok(Json(Envelope::data(TaxComputed {
        tax_id: computation.tax.id,
        base_amount: breakdown.base.to_major(),
        tax_amount: breakdown.tax.to_major(),
        total_amount: breakdown.total.to_major(),
        calculation_method: map::api_calculation_method(computation.tax.calculation_method),
        tax_rate: computation.tax.amount,
    })))
}
