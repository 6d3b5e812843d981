use crate::domain::{
    self, Booking, BookingId, BookingState, DecideBookingError, ItemId, PageRequest,
    RequestBookingError, UserId, commands::*,
};
use crate::ports::*;
use futures::future::try_join_all;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_store: Arc<dyn BookingStore>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub item_catalog: Arc<dyn ItemCatalog>,
    pub clock: Arc<dyn Clock>,
}

/// 予約と関係者のビュー
///
/// 単一予約のレスポンスと一覧の各要素の両方に使われる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub item: Item,
    pub booker: User,
}

/// 一覧取得の対象
#[derive(Debug, Clone, Copy)]
enum Party {
    Booker(UserId),
    Owner(UserId),
}

impl Party {
    fn user_id(&self) -> UserId {
        match self {
            Party::Booker(id) | Party::Owner(id) => *id,
        }
    }
}

pub(super) async fn find_item(deps: &ServiceDependencies, item_id: ItemId) -> Result<Item> {
    deps.item_catalog
        .get(item_id)
        .await
        .map_err(BookingApplicationError::ItemCatalogError)?
        .ok_or(BookingApplicationError::ItemNotFound(item_id))
}

pub(super) async fn find_user(deps: &ServiceDependencies, user_id: UserId) -> Result<User> {
    deps.user_directory
        .get(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?
        .ok_or(BookingApplicationError::UserNotFound(user_id))
}

pub(super) async fn ensure_user_exists(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let exists = deps
        .user_directory
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !exists {
        return Err(BookingApplicationError::UserNotFound(user_id));
    }
    Ok(())
}

async fn find_booking(deps: &ServiceDependencies, booking_id: BookingId) -> Result<Booking> {
    deps.booking_store
        .find_by_id(booking_id)
        .await?
        .ok_or(BookingApplicationError::BookingNotFound(booking_id))
}

/// 予約にアイテムと予約者のスナップショットを付与する
async fn with_participants(deps: &ServiceDependencies, booking: Booking) -> Result<BookingDetails> {
    let item = find_item(deps, booking.item_id).await?;
    let booker = find_user(deps, booking.booker_id).await?;
    Ok(BookingDetails {
        booking,
        item,
        booker,
    })
}

/// アイテムの予約を申請する（純粋な関数）
///
/// ビジネスルール（この順で検証し、最初の違反で失敗する）：
/// 1. アイテムが存在すること
/// 2. アイテムが貸出可能であること
/// 3. 予約者が存在すること
/// 4. 予約者がアイテムの所有者でないこと
/// 5. 予約期間が正しいこと（start < end、start >= now）
///
/// 成功時はWaiting状態で保存された予約を返す。
pub async fn create_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<BookingDetails> {
    let now = deps.clock.now();

    // 1. アイテムの存在確認
    let item = find_item(deps, cmd.item_id).await?;

    // 2. 貸出可否の確認
    if !item.available {
        tracing::debug!(item_id = %item.id, "booking refused: item not available");
        return Err(BookingApplicationError::ItemNotAvailable(item.id));
    }

    // 3. 予約者の取得
    let booker = find_user(deps, cmd.requester_id).await?;

    // 4-5. ドメイン層の純粋関数を呼び出し
    let new_booking = domain::booking::request_booking(
        item.id,
        item.owner_id,
        booker.id,
        cmd.start,
        cmd.end,
        now,
    )
    .map_err(|e| match e {
        RequestBookingError::OwnerCannotBookOwnItem => {
            BookingApplicationError::OwnerCannotBookOwnItem {
                item_id: item.id,
                user_id: booker.id,
            }
        }
        RequestBookingError::InvalidPeriod { start, end } => {
            BookingApplicationError::InvalidBookingPeriod { start, end }
        }
    })?;

    // 6. 予約ストアに保存
    let booking = deps.booking_store.insert(new_booking).await?;

    tracing::info!(
        booking_id = %booking.id,
        item_id = %item.id,
        booker_id = %booker.id,
        "booking requested"
    );

    Ok(BookingDetails {
        booking,
        item,
        booker,
    })
}

/// 予約を承認または却下する（純粋な関数）
///
/// ビジネスルール：
/// 1. 予約が存在すること
/// 2. 判断者がユーザーとして存在すること
/// 3. 予約対象のアイテムが存在すること
/// 4. 判断者がアイテムの所有者であること
/// 5. 既に承認済みでないこと（却下済みは再判断できる）
///
/// # 一貫性保証
///
/// 保存時にバージョンを比較するため、同じ予約への同時判断は
/// 一方が`ConcurrentModification`で失敗する。
pub async fn decide_booking(deps: &ServiceDependencies, cmd: DecideBooking) -> Result<BookingDetails> {
    let now = deps.clock.now();

    let booking = find_booking(deps, cmd.booking_id).await?;
    ensure_user_exists(deps, cmd.decider_id).await?;
    let item = find_item(deps, booking.item_id).await?;

    if item.owner_id != cmd.decider_id {
        return Err(BookingApplicationError::NotItemOwner {
            booking_id: booking.id,
            user_id: cmd.decider_id,
        });
    }

    let decided = domain::booking::decide(&booking, cmd.approve, now).map_err(|e| match e {
        DecideBookingError::AlreadyApproved => BookingApplicationError::AlreadyApproved(booking.id),
    })?;

    let saved = deps.booking_store.save(decided).await?;

    tracing::info!(
        booking_id = %saved.id,
        status = saved.status.as_str(),
        "booking decided"
    );

    let booker = find_user(deps, saved.booker_id).await?;
    Ok(BookingDetails {
        booking: saved,
        item,
        booker,
    })
}

/// 予約を取得する
///
/// 閲覧できるのは予約者とアイテムの所有者のみ。
pub async fn get_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
    requester_id: UserId,
) -> Result<BookingDetails> {
    let booking = find_booking(deps, booking_id).await?;
    ensure_user_exists(deps, requester_id).await?;
    let item = find_item(deps, booking.item_id).await?;

    if booking.booker_id != requester_id && item.owner_id != requester_id {
        return Err(BookingApplicationError::NotAuthorized {
            booking_id,
            user_id: requester_id,
        });
    }

    let booker = find_user(deps, booking.booker_id).await?;
    Ok(BookingDetails {
        booking,
        item,
        booker,
    })
}

/// 予約者の予約一覧を取得する
///
/// `from`は件数単位のオフセット、`size`はページサイズ。
pub async fn list_by_booker(
    deps: &ServiceDependencies,
    state: &str,
    booker_id: UserId,
    from: i64,
    size: i64,
) -> Result<Vec<BookingDetails>> {
    list_bookings(deps, Party::Booker(booker_id), state, from, size).await
}

/// 所有者のアイテムに対する予約一覧を取得する
pub async fn list_by_owner(
    deps: &ServiceDependencies,
    state: &str,
    owner_id: UserId,
    from: i64,
    size: i64,
) -> Result<Vec<BookingDetails>> {
    list_bookings(deps, Party::Owner(owner_id), state, from, size).await
}

async fn list_bookings(
    deps: &ServiceDependencies,
    party: Party,
    state: &str,
    from: i64,
    size: i64,
) -> Result<Vec<BookingDetails>> {
    let now = deps.clock.now();

    ensure_user_exists(deps, party.user_id()).await?;

    let page = PageRequest::from_offset(from, size).map_err(|e| {
        BookingApplicationError::InvalidPagination {
            from: e.from,
            size: e.size,
        }
    })?;

    let state: BookingState = state
        .parse()
        .map_err(|e: domain::UnknownState| BookingApplicationError::UnknownState(e.0))?;
    let filter = state.at(now);

    let bookings = match party {
        Party::Booker(id) => deps.booking_store.find_by_booker(id, filter, page).await?,
        Party::Owner(id) => deps.booking_store.find_by_owner(id, filter, page).await?,
    };

    try_join_all(bookings.into_iter().map(|b| with_participants(deps, b))).await
}
