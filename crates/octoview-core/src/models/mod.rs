//! OCTOVIEW 도메인 모델.
//!
//! 서버 푸시 페이로드의 원시 형태와 정규화된 상태 뷰를 정의한다.
//! 모든 원시(wire) 모델은 `serde` Deserialize를 구현한다.

pub mod event;
pub mod files;
pub mod session;
pub mod status;
