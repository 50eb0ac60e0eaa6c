//! 포트 인터페이스.
//!
//! 어댑터 crate(`octoview-network`)가 구현하는 경계 trait.

pub mod printer_api;
