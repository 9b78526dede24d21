//! Tax report endpoints
//!
//! `vat_payable` is never accepted from clients; it is derived from the sale,
//! purchase and withholding amounts on every write.

use api_types::{
    Envelope,
    tax_report::{TaxReport, TaxReportNew, TaxReportStatus, TaxReportUpdate},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use engine::{NewTaxReport, TaxReportPatch, TaxReportView, tax_reports};

use crate::{ServerError, map, server::ServerState};

fn report_view(view: TaxReportView) -> TaxReport {
    let report = view.report;
    TaxReport {
        id: report.id,
        name: report.name,
        date: report.date,
        period_start: report.period_start,
        period_end: report.period_end,
        tax_period_id: report.tax_period_id,
        tax_period_name: view.tax_period_name,
        report_type: map::api_report_frequency(report.report_type),
        additional_period: report.additional_period,
        tax_ids: view.tax_ids,
        selected_taxes: view.tax_names,
        state: map::api_tax_report_state(report.state),
        sale_vat_amount: map::major(report.sale_vat_minor),
        purchase_vat_amount: map::major(report.purchase_vat_minor),
        vat_payable: map::major(report.vat_payable_minor),
        exempt_amount: map::major(report.exempt_minor),
        zero_rated_amount: map::major(report.zero_rated_minor),
        withholding_amount: map::major(report.withholding_minor),
        notes: report.notes,
        created_at: report.created_at,
        submitted_at: report.submitted_at,
    }
}

fn status_view(report: tax_reports::Model) -> TaxReportStatus {
    TaxReportStatus {
        id: report.id,
        state: map::api_tax_report_state(report.state),
        submitted_at: report.submitted_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<TaxReport>>>, ServerError> {
    let reports = state.engine.tax_reports().await?;
    Ok(Json(Envelope::data(
        reports.into_iter().map(report_view).collect(),
    )))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<TaxReport>>, ServerError> {
    let report = state.engine.tax_report(id).await?;
    Ok(Json(Envelope::data(report_view(report))))
}

/// Handle requests for creating a draft tax report
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TaxReportNew>, JsonRejection>,
) -> Result<Json<Envelope<TaxReport>>, ServerError> {
    let Json(payload) = payload?;
    let report = state
        .engine
        .new_tax_report(NewTaxReport {
            name: payload.name,
            date: payload.date,
            period_start: payload.period_start,
            period_end: payload.period_end,
            report_type: payload.report_type.map(map::report_frequency),
            additional_period: payload.additional_period,
            sale_vat: map::opt_money("sale_vat_amount", payload.sale_vat_amount)?,
            purchase_vat: map::opt_money("purchase_vat_amount", payload.purchase_vat_amount)?,
            exempt: map::opt_money("exempt_amount", payload.exempt_amount)?,
            zero_rated: map::opt_money("zero_rated_amount", payload.zero_rated_amount)?,
            withholding: map::opt_money("withholding_amount", payload.withholding_amount)?,
            notes: payload.notes,
            tax_period_id: payload.tax_period_id,
            tax_ids: payload.tax_ids,
        })
        .await?;

    Ok(Json(
        Envelope::data(report_view(report)).with_message("Tax report created successfully"),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<TaxReportUpdate>, JsonRejection>,
) -> Result<Json<Envelope<TaxReport>>, ServerError> {
    let Json(payload) = payload?;
    let report = state
        .engine
        .update_tax_report(
            id,
            TaxReportPatch {
                name: payload.name,
                date: payload.date,
                period_start: payload.period_start,
                period_end: payload.period_end,
                report_type: payload.report_type.map(map::report_frequency),
                additional_period: payload.additional_period,
                sale_vat: map::opt_money("sale_vat_amount", payload.sale_vat_amount)?,
                purchase_vat: map::opt_money("purchase_vat_amount", payload.purchase_vat_amount)?,
                exempt: map::opt_money("exempt_amount", payload.exempt_amount)?,
                zero_rated: map::opt_money("zero_rated_amount", payload.zero_rated_amount)?,
                withholding: map::opt_money("withholding_amount", payload.withholding_amount)?,
                notes: payload.notes,
                tax_period_id: payload.tax_period_id,
                tax_ids: payload.tax_ids,
            },
        )
        .await?;

    Ok(Json(
        Envelope::data(report_view(report)).with_message("Tax report updated successfully"),
    ))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_tax_report(id).await?;
    Ok(Json(Envelope::message("Tax report deleted successfully")))
}

/// Draft to confirmed. Rejected once the report has been submitted.
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<TaxReportStatus>>, ServerError> {
    let report = state.engine.confirm_tax_report(id).await?;
    Ok(Json(
        Envelope::data(status_view(report)).with_message("Tax report confirmed successfully"),
    ))
}

/// Marks the report as submitted and stamps the submission time.
pub async fn submit(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<TaxReportStatus>>, ServerError> {
    let report = state.engine.submit_tax_report(id).await?;
    Ok(Json(
        Envelope::data(status_view(report)).with_message("Tax report submitted successfully"),
    ))
}

/// Recomputes the report amounts from the posted journal lines of its period.
pub async fn generate(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<TaxReport>>, ServerError> {
    let report = state.engine.generate_tax_report(id).await?;
    Ok(Json(
        Envelope::data(report_view(report)).with_message("Tax report generated successfully"),
    ))
}
