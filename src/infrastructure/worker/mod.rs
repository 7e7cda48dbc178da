//! Worker Layer - 单次 job 执行
//!
//! 本地调试：从 JSON 文件读取 job 信封，执行一次后退出

mod test_input;

pub use test_input::{run_test_input, TestInputError};
