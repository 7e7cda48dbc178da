//! SQLite Persistence - SQLite 数据库持久化实现

mod clone_repo;
mod database;

pub use clone_repo::*;
pub use database::*;
