//! Balance, transfer and shop endpoints. All require a bearer token.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{recipient_name, validate_amount, validate_transfer_fields};
use super::{ApiError, AppState, EmptyResponse, ItemDto, MessageResponse, SendCoinRequest};
use crate::services::WalletInfo;

/// GET /info
pub async fn get_info(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WalletInfo>, ApiError> {
    let info = state.shared.wallet_service.info(&user.username).await?;
    Ok(Json(info))
}

/// POST /sendCoin
pub async fn send_coin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<SendCoinRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let (to_user, amount) = validate_transfer_fields(payload.to_user, payload.amount)?;
    let amount = validate_amount(&amount)?;
    let to_user = recipient_name(&to_user)?;

    state
        .shared
        .wallet_service
        .send_coins(&user.username, to_user, amount)
        .await?;

    Ok(Json(MessageResponse {
        message: format!("Successfully sent {amount} coins to {to_user}."),
    }))
}

/// GET /buy/{item}
pub async fn buy_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(item): Path<String>,
) -> Result<Json<EmptyResponse>, ApiError> {
    state
        .shared
        .wallet_service
        .buy(&user.username, &item)
        .await?;

    Ok(Json(EmptyResponse {}))
}

/// GET /items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let items = state.shared.wallet_service.catalog().await?;
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}
