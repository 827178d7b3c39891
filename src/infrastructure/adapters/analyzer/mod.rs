//! Analyzer Adapter - AI 计算端实现

mod fake_analyzer;
mod http_analyzer_client;

pub use fake_analyzer::{FakeAnalyzer, FakeAnalyzerConfig};
pub use http_analyzer_client::*;
