//! Persistence Layer - 克隆记录持久化
//!
//! 共享卷上的 JSON 文件（默认）和 SQLite 两种实现

pub mod file;
pub mod sqlite;

pub use self::file::FileCloneStore;
pub use self::sqlite::SqliteCloneStore;
