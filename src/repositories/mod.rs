// src/repositories/mod.rs
//! Table-level data access. Repositories borrow a connection, so the same
//! code runs against a pooled connection or inside a transaction.

pub mod applications;
pub mod favorites;
pub mod jobs;
pub mod notifications;
pub mod users;

pub use applications::{ApplicationRepository, ApplicationScope};
pub use favorites::FavoriteRepository;
pub use jobs::{JobRepository, NewJob};
pub use notifications::NotificationRepository;
pub use users::UserRepository;
