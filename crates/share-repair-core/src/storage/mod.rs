pub mod models;
pub mod queries;
pub mod repository;
pub mod seed;
pub mod sqlite;

pub use repository::ShareRepository;
pub use sqlite::Database;
