pub mod booking_store;
pub mod clock;
pub mod item_catalog;
pub mod user_directory;

pub use booking_store::{BookingStore, BookingStoreError};
pub use clock::Clock;
pub use item_catalog::{Item, ItemCatalog};
pub use user_directory::{User, UserDirectory};
