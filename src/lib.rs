pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use domain::{Comment, Listing, ListingQuery, Region, Restaurant};
pub use error::BoardError;
pub use infra::AppConfig;
pub use storage::{DocumentStore, GuestbookStore, LoadOutcome, RestaurantStore};
