use crate::application::booking::{
    ServiceDependencies, create_booking as execute_create_booking,
    decide_booking as execute_decide_booking, get_booking as execute_get_booking,
    item_booking_summary as execute_item_booking_summary,
    list_by_booker as execute_list_by_booker, list_by_owner as execute_list_by_owner,
};
use crate::domain::{BookingId, ItemId, commands::DecideBooking};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    extractors::SharerUserId,
    types::{
        BookingResponse, CreateBookingRequest, DecideQuery, ItemBookingSummaryResponse,
        ListBookingsQuery,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers (POST / PATCH)
// ============================================================================

/// POST /bookings - 予約を申請
///
/// 強制されるビジネスルール:
/// - アイテムが存在し、貸出可能であること
/// - 予約者が存在し、アイテムの所有者でないこと
/// - 予約期間が未来で、start < end であること
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(requester_id): SharerUserId,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let cmd = req.to_command(requester_id);
    let details = execute_create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(details))))
}

/// PATCH /bookings/:id?approved=bool - 予約を承認・却下
///
/// 強制されるビジネスルール:
/// - 判断者がアイテムの所有者であること
/// - 承認済みの予約は再判断できないこと
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(decider_id): SharerUserId,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<DecideQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = DecideBooking {
        booking_id: BookingId::from_uuid(booking_id),
        decider_id,
        approve: query.approved,
    };

    let details = execute_decide_booking(&state.service_deps, cmd).await?;
    Ok(Json(BookingResponse::from(details)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /bookings/:id - 予約詳細を取得
///
/// 予約者とアイテムの所有者のみ閲覧でき、それ以外は404を返す。
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(requester_id): SharerUserId,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let details = execute_get_booking(
        &state.service_deps,
        BookingId::from_uuid(booking_id),
        requester_id,
    )
    .await?;

    Ok(Json(BookingResponse::from(details)))
}

/// GET /bookings - 予約者としての予約一覧
///
/// クエリパラメータ:
/// - state: ALL, CURRENT, PAST, FUTURE, WAITING, REJECTED（デフォルト ALL）
/// - from: 件数単位のオフセット（デフォルト 0）
/// - size: ページサイズ（デフォルト 10）
pub async fn list_by_booker(
    State(state): State<Arc<AppState>>,
    SharerUserId(booker_id): SharerUserId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    query.validate().map_err(ApiError::BadRequest)?;

    let bookings = execute_list_by_booker(
        &state.service_deps,
        &query.state,
        booker_id,
        query.from,
        query.size,
    )
    .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner - 所有アイテムに対する予約一覧
///
/// クエリパラメータは GET /bookings と同じ。
pub async fn list_by_owner(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    query.validate().map_err(ApiError::BadRequest)?;

    let bookings = execute_list_by_owner(
        &state.service_deps,
        &query.state,
        owner_id,
        query.from,
        query.size,
    )
    .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/items/:item_id/summary - アイテムの直近・次回の予約
///
/// 所有者以外には空のサマリーを返す。
pub async fn item_booking_summary(
    State(state): State<Arc<AppState>>,
    SharerUserId(requester_id): SharerUserId,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemBookingSummaryResponse>, ApiError> {
    let summary = execute_item_booking_summary(
        &state.service_deps,
        ItemId::from_uuid(item_id),
        requester_id,
    )
    .await?;

    Ok(Json(ItemBookingSummaryResponse::from(summary)))
}
