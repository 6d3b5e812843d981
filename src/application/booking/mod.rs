mod booking_service;
mod errors;
mod item_bookings;

pub use booking_service::{
    BookingDetails, ServiceDependencies, create_booking, decide_booking, get_booking,
    list_by_booker, list_by_owner,
};
pub use errors::{BookingApplicationError, ErrorKind, Result};
pub use item_bookings::{
    ItemBookingSummary, has_completed_booking, item_booking_summary, summarize,
};
