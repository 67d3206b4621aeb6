pub mod manager;
pub mod models;
pub mod repository;
pub mod seed;

pub use manager::{Database, DatabaseError};
pub use repository::Repository;
