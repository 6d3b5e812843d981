pub mod booking_store;
pub mod clock;
pub mod item_catalog;
pub mod user_directory;

pub use booking_store::BookingStore;
pub use clock::FixedClock;
pub use item_catalog::ItemCatalog;
pub use user_directory::UserDirectory;
