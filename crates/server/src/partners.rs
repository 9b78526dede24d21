//! Partner endpoints. Listing and lookup include inactive partners.

use api_types::{
    Envelope,
    partner::{Partner, PartnerNew, PartnerUpdate},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use engine::{NewPartner, PartnerPatch, partners};

use crate::{ServerError, map, server::ServerState};

fn partner_view(partner: partners::Model) -> Partner {
    Partner {
        id: partner.id,
        name: partner.name,
        code: partner.code,
        partner_type: map::api_partner_type(partner.partner_type),
        vat: partner.vat,
        email: partner.email,
        phone: partner.phone,
        active: partner.active,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<Partner>>>, ServerError> {
    let partners = state.engine.partners().await?;
    Ok(Json(Envelope::data(
        partners.into_iter().map(partner_view).collect(),
    )))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Partner>>, ServerError> {
    let partner = state.engine.partner(id).await?;
    Ok(Json(Envelope::data(partner_view(partner))))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<PartnerNew>, JsonRejection>,
) -> Result<Json<Envelope<Partner>>, ServerError> {
    let Json(payload) = payload?;
    let partner = state
        .engine
        .new_partner(NewPartner {
            name: payload.name,
            code: payload.code,
            partner_type: payload.partner_type.map(map::partner_type),
            vat: payload.vat,
            email: payload.email,
            phone: payload.phone,
            active: payload.active,
        })
        .await?;

    Ok(Json(
        Envelope::data(partner_view(partner)).with_message("Partner created successfully"),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<PartnerUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Partner>>, ServerError> {
    let Json(payload) = payload?;
    let partner = state
        .engine
        .update_partner(
            id,
            PartnerPatch {
                name: payload.name,
                code: payload.code,
                partner_type: payload.partner_type.map(map::partner_type),
                vat: payload.vat,
                email: payload.email,
                phone: payload.phone,
                active: payload.active,
            },
        )
        .await?;

    Ok(Json(
        Envelope::data(partner_view(partner)).with_message("Partner updated successfully"),
    ))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_partner(id).await?;
    Ok(Json(Envelope::message("Partner deleted successfully")))
}
