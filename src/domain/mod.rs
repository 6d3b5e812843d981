pub mod booking;
pub mod commands;
pub mod errors;
pub mod page;
pub mod state;
pub mod value_objects;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use errors::*;
pub use page::{InvalidPagination, PageRequest};
pub use state::{BookingFilter, BookingState, UnknownState};
pub use value_objects::*;
