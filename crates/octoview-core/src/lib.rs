//! # octoview-core
//!
//! OCTOVIEW 도메인 모델, 포트(trait) 정의, 상태 정규화, 에러 타입.
//! 3D 프린터 제어 서버의 푸시 스트림/파일 카탈로그를 단일 권위 뷰로
//! 정리하는 순수 로직을 담당한다. IO는 `octoview-network`에 있다.
//!
//! ## 구조
//!
//! - [`models`] — 원시(wire) 페이로드와 정규화된 상태 구조체 (serde)
//! - [`normalize`] — 원시 상태 이벤트 → `PrinterStatus` 정규화 (순수 함수)
//! - [`ports`] — 어댑터 경계 trait (async_trait)
//! - [`duration`] — 경과/잔여 시간 표시 포맷
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 외부에서 주입되는 설정 구조체

pub mod config;
pub mod duration;
pub mod error;
pub mod models;
pub mod normalize;
pub mod ports;
