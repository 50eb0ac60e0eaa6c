//! OCTOVIEW 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 실패를 `CoreError`로 매핑해 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 전송 실패, 인증 실패, 페이로드 계약 위반을 구분한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 실패 (로그인 거부, 세션 토큰 오류 등)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 네트워크 에러 (연결 실패, 타임아웃, 비정상 상태 코드)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 페이로드 계약 위반 — 필수 골격(state/job/progress/temps) 누락.
    /// 런타임 복구 대상이 아니라 API 형태 불일치를 뜻하므로 크게 보고한다.
    #[error("페이로드 계약 위반 — {context}: {message}")]
    Payload {
        /// 위반이 발견된 지점 (예: 프레임 태그)
        context: String,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 전송 계층 실패 여부 (Disconnected 복귀 대상)
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Network(_))
    }
}
