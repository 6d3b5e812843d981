use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, DecideBookingError, ItemId, RequestBookingError, UserId};

/// 予約ステータス（永続化される状態）
///
/// `Canceled`は値として存在するが、ライフサイクル上で割り当てられることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// 所有者の判断待ち
    Waiting,
    /// 承認済み（終端状態）
    Approved,
    /// 却下済み
    Rejected,
    /// 予約済みの値（未使用）
    Canceled,
}

impl BookingStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 未保存の予約
///
/// IDとバージョンはBookingStoreが採番する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking集約 - 1つのアイテムに対する1回の予約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    // 識別子
    pub id: BookingId,

    // 他の集約への参照（IDのみ）
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub booker_id: UserId,

    // 予約期間（不変）
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    // 唯一の可変フィールド
    pub status: BookingStatus,

    // 楽観的排他制御
    pub version: i32,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// `now`時点で終了済みか
    pub fn has_finished(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }
}

/// 純粋関数：予約期間の検証
///
/// start・endの両方が指定され、start < end かつ start >= now であること。
pub fn validate_period(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), RequestBookingError> {
    match (start, end) {
        (Some(s), Some(e)) if s < e && s >= now => Ok((s, e)),
        _ => Err(RequestBookingError::InvalidPeriod { start, end }),
    }
}

/// 純粋関数：予約を申請する
///
/// ビジネスルール：
/// - 所有者は自分のアイテムを予約できない
/// - 予約期間が正しいこと
/// - 状態はWaiting
///
/// 副作用なし。保存前のNewBookingを返す。
pub fn request_booking(
    item_id: ItemId,
    owner_id: UserId,
    booker_id: UserId,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<NewBooking, RequestBookingError> {
    if booker_id == owner_id {
        return Err(RequestBookingError::OwnerCannotBookOwnItem);
    }

    let (start, end) = validate_period(start, end, now)?;

    Ok(NewBooking {
        item_id,
        owner_id,
        booker_id,
        start,
        end,
        status: BookingStatus::Waiting,
        created_at: now,
    })
}

/// 純粋関数：予約を承認または却下する
///
/// ビジネスルール：
/// - 承認済みの予約は再判断できない
/// - 却下済みの予約は再判断できる
pub fn decide(
    booking: &Booking,
    approve: bool,
    decided_at: DateTime<Utc>,
) -> Result<Booking, DecideBookingError> {
    if booking.status == BookingStatus::Approved {
        return Err(DecideBookingError::AlreadyApproved);
    }

    let status = if approve {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking {
        status,
        updated_at: decided_at,
        ..booking.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn sample_booking(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::from_uuid(Uuid::new_v4()),
            item_id: ItemId::new(),
            owner_id: UserId::new(),
            booker_id: UserId::new(),
            start: now + Duration::hours(1),
            end: now + Duration::hours(2),
            status,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_request_booking_creates_waiting_booking() {
        let now = Utc::now();
        let item_id = ItemId::new();
        let owner_id = UserId::new();
        let booker_id = UserId::new();
        let start = now + Duration::hours(1);
        let end = now + Duration::hours(2);

        let booking =
            request_booking(item_id, owner_id, booker_id, Some(start), Some(end), now).unwrap();

        assert_eq!(booking.status, BookingStatus::Waiting);
        assert_eq!(booking.item_id, item_id);
        assert_eq!(booking.owner_id, owner_id);
        assert_eq!(booking.booker_id, booker_id);
        assert_eq!(booking.start, start);
        assert_eq!(booking.end, end);
        assert_eq!(booking.created_at, now);
    }

    #[test]
    fn test_request_booking_rejects_owner() {
        let now = Utc::now();
        let owner_id = UserId::new();

        let result = request_booking(
            ItemId::new(),
            owner_id,
            owner_id,
            Some(now + Duration::hours(1)),
            Some(now + Duration::hours(2)),
            now,
        );

        assert_eq!(result.unwrap_err(), RequestBookingError::OwnerCannotBookOwnItem);
    }

    #[test]
    fn test_owner_check_precedes_period_check() {
        let now = Utc::now();
        let owner_id = UserId::new();

        let result = request_booking(ItemId::new(), owner_id, owner_id, None, None, now);

        assert_eq!(result.unwrap_err(), RequestBookingError::OwnerCannotBookOwnItem);
    }

    #[test]
    fn test_validate_period_accepts_start_equal_to_now() {
        let now = Utc::now();
        let end = now + Duration::minutes(1);
        assert_eq!(validate_period(Some(now), Some(end), now), Ok((now, end)));
    }

    #[test]
    fn test_validate_period_rejects_missing_bounds() {
        let now = Utc::now();
        assert!(validate_period(None, Some(now + Duration::hours(1)), now).is_err());
        assert!(validate_period(Some(now + Duration::hours(1)), None, now).is_err());
        assert!(validate_period(None, None, now).is_err());
    }

    #[test]
    fn test_validate_period_rejects_empty_and_inverted_windows() {
        let now = Utc::now();
        let t = now + Duration::hours(1);
        assert!(validate_period(Some(t), Some(t), now).is_err());
        assert!(validate_period(Some(t + Duration::minutes(1)), Some(t), now).is_err());
    }

    #[test]
    fn test_validate_period_rejects_past_start() {
        let now = Utc::now();
        let result = validate_period(
            Some(now - Duration::seconds(1)),
            Some(now + Duration::hours(1)),
            now,
        );
        assert!(matches!(result, Err(RequestBookingError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_decide_approves_waiting_booking() {
        let booking = sample_booking(BookingStatus::Waiting);
        let decided_at = booking.created_at + Duration::minutes(5);

        let decided = decide(&booking, true, decided_at).unwrap();

        assert_eq!(decided.status, BookingStatus::Approved);
        assert_eq!(decided.updated_at, decided_at);
        assert_eq!(decided.id, booking.id);
        assert_eq!(decided.start, booking.start);
        assert_eq!(decided.end, booking.end);
        assert_eq!(decided.version, booking.version);
    }

    #[test]
    fn test_decide_rejects_waiting_booking() {
        let booking = sample_booking(BookingStatus::Waiting);
        let decided = decide(&booking, false, Utc::now()).unwrap();
        assert_eq!(decided.status, BookingStatus::Rejected);
    }

    #[test]
    fn test_decide_fails_when_already_approved() {
        let booking = sample_booking(BookingStatus::Approved);
        assert_eq!(
            decide(&booking, false, Utc::now()).unwrap_err(),
            DecideBookingError::AlreadyApproved
        );
    }

    #[test]
    fn test_decide_allows_rejected_booking_to_be_approved() {
        let booking = sample_booking(BookingStatus::Rejected);
        let decided = decide(&booking, true, Utc::now()).unwrap();
        assert_eq!(decided.status, BookingStatus::Approved);
    }

    #[test]
    fn test_has_finished_is_strict() {
        let booking = sample_booking(BookingStatus::Approved);
        assert!(!booking.has_finished(booking.end));
        assert!(booking.has_finished(booking.end + Duration::seconds(1)));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert!("waiting".parse::<BookingStatus>().is_err());
    }
}
