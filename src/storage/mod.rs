//! Persistence: JSON documents on disk (or in memory for tests).

pub mod document;
pub mod guestbook;
pub mod restaurants;

pub use document::{DocumentBackend, DocumentStore, FileBackend, LoadOutcome, MemoryBackend};
pub use guestbook::{GuestbookEntry, GuestbookStore};
pub use restaurants::RestaurantStore;
