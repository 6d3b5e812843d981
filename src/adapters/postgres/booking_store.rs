use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, ItemId, NewBooking, PageRequest, UserId,
};
use crate::ports::booking_store::{BookingStore as BookingStoreTrait, BookingStoreError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::str::FromStr;

const BOOKING_COLUMNS: &str = r#"
    booking_id,
    item_id,
    owner_id,
    booker_id,
    start_at,
    end_at,
    status,
    version,
    created_at,
    updated_at
"#;

impl From<sqlx::Error> for BookingStoreError {
    fn from(err: sqlx::Error) -> Self {
        BookingStoreError::Backend(Box::new(err))
    }
}

/// PostgreSQLの行をBookingに変換
///
/// 保存されたステータスが既知の値でない場合はエラーを返す。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        BookingStoreError::Backend(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })?;

    Ok(Booking {
        id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        owner_id: UserId::from_uuid(row.get("owner_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        start: row.get("start_at"),
        end: row.get("end_at"),
        status,
        version: row.get("version"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// 確定済みの検索条件をWHERE句に追加する
fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: BookingFilter) {
    match filter {
        BookingFilter::All => {}
        BookingFilter::Current(now) => {
            query
                .push(" AND start_at <= ")
                .push_bind(now)
                .push(" AND end_at > ")
                .push_bind(now);
        }
        BookingFilter::Past(now) => {
            query.push(" AND end_at < ").push_bind(now);
        }
        BookingFilter::Future(now) => {
            query.push(" AND start_at > ").push_bind(now);
        }
        BookingFilter::Status(status) => {
            query.push(" AND status = ").push_bind(status.as_str());
        }
    }
}

/// BookingStoreのPostgreSQL実装
///
/// start_atが同じ予約は`seq`により挿入順で並ぶ。
/// 更新時は行ロックを取得し、書き込み前に`version`を比較する。
pub struct BookingStore {
    pool: PgPool,
}

impl BookingStore {
    /// PostgreSQL接続プールから新しいBookingStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_paged(
        &self,
        party_column: &'static str,
        user_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query
            .push(BOOKING_COLUMNS)
            .push(" FROM bookings WHERE ")
            .push(party_column)
            .push(" = ")
            .push_bind(user_id.value());
        push_filter(&mut query, filter);
        query
            .push(" ORDER BY start_at DESC, seq ASC LIMIT ")
            .push_bind(i64::from(page.size()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_booking).collect()
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking> {
        let sql = format!(
            r#"
            INSERT INTO bookings (
                item_id,
                owner_id,
                booker_id,
                start_at,
                end_at,
                status,
                version,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $7)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(booking.item_id.value())
            .bind(booking.owner_id.value())
            .bind(booking.booker_id.value())
            .bind(booking.start)
            .bind(booking.end)
            .bind(booking.status.as_str())
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await?;

        map_row_to_booking(&row)
    }

    async fn save(&self, booking: Booking) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;

        let stored_version: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT version
            FROM bookings
            WHERE booking_id = $1
            FOR UPDATE
            "#,
        )
        .bind(booking.id.value())
        .fetch_optional(&mut *tx)
        .await?;

        match stored_version {
            None => return Err(BookingStoreError::NotFound(booking.id)),
            Some(version) if version != booking.version => {
                return Err(BookingStoreError::VersionConflict {
                    id: booking.id,
                    expected: booking.version,
                });
            }
            Some(_) => {}
        }

        let sql = format!(
            r#"
            UPDATE bookings
            SET status = $2,
                updated_at = $3,
                version = version + 1
            WHERE booking_id = $1
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(booking.id.value())
            .bind(booking.status.as_str())
            .bind(booking.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        map_row_to_booking(&row)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE booking_id = $1",
            BOOKING_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(booking_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        self.find_paged("booker_id", booker_id, filter, page).await
    }

    async fn find_by_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        self.find_paged("owner_id", owner_id, filter, page).await
    }

    async fn find_by_item(
        &self,
        item_id: ItemId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query
            .push(BOOKING_COLUMNS)
            .push(" FROM bookings WHERE item_id = ")
            .push_bind(item_id.value());
        if let Some(status) = status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY start_at DESC, seq ASC");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_booking).collect()
    }

    async fn exists_finished(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        before: DateTime<Utc>,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE booker_id = $1 AND item_id = $2 AND end_at < $3
            )
            "#,
        )
        .bind(booker_id.value())
        .bind(item_id.value())
        .bind(before)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
