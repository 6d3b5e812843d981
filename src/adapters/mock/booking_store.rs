use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, ItemId, NewBooking, PageRequest, UserId,
};
use crate::ports::booking_store::{BookingStore as BookingStoreTrait, BookingStoreError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// In-memory implementation of BookingStore
///
/// Records are kept in insertion order, so a stable sort by start
/// preserves insertion order among equal starts.
pub struct BookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Booking>>> {
        self.bookings
            .lock()
            .map_err(|e| BookingStoreError::Backend(e.to_string().into()))
    }

    fn select(&self, predicate: impl Fn(&Booking) -> bool, page: PageRequest) -> Result<Vec<Booking>> {
        let bookings = self.lock()?;
        let mut matched: Vec<Booking> = bookings.iter().filter(|b| predicate(b)).cloned().collect();
        matched.sort_by(|a, b| b.start.cmp(&a.start));

        Ok(matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size() as usize)
            .collect())
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking> {
        let stored = Booking {
            id: BookingId::from_uuid(Uuid::new_v4()),
            item_id: booking.item_id,
            owner_id: booking.owner_id,
            booker_id: booking.booker_id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            version: 0,
            created_at: booking.created_at,
            updated_at: booking.created_at,
        };

        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn save(&self, booking: Booking) -> Result<Booking> {
        let mut bookings = self.lock()?;
        let current = bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or(BookingStoreError::NotFound(booking.id))?;

        if current.version != booking.version {
            return Err(BookingStoreError::VersionConflict {
                id: booking.id,
                expected: booking.version,
            });
        }

        current.status = booking.status;
        current.updated_at = booking.updated_at;
        current.version += 1;

        Ok(current.clone())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        Ok(self.lock()?.iter().find(|b| b.id == booking_id).cloned())
    }

    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        self.select(|b| b.booker_id == booker_id && filter.matches(b), page)
    }

    async fn find_by_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>> {
        self.select(|b| b.owner_id == owner_id && filter.matches(b), page)
    }

    async fn find_by_item(
        &self,
        item_id: ItemId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>> {
        let bookings = self.lock()?;
        let mut matched: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.item_id == item_id && status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(matched)
    }

    async fn exists_finished(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        before: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self
            .lock()?
            .iter()
            .any(|b| b.booker_id == booker_id && b.item_id == item_id && b.has_finished(before)))
    }
}
