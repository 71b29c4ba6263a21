//! Pure board logic: records, normalization, submissions and listing filters.
//!
//! Nothing in here does I/O; the storage layer loads and saves around it.

pub mod normalize;
pub mod query;
pub mod region;
pub mod restaurant;
pub mod submission;

pub use query::{distinct_cities, filter_restaurants, Listing, ListingQuery};
pub use region::Region;
pub use restaurant::{Comment, Restaurant};
pub use submission::{submit, submit_at};
