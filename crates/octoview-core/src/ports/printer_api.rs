//! 프린터 제어 서버 API 포트.
//!
//! 구현: `octoview-network` crate (reqwest, tokio-tungstenite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::files::RawFileList;
use crate::models::status::RawStatusEvent;

/// 패시브 로그인 응답 — 사전 공유 키를 세션 토큰으로 교환한다
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginResponse {
    /// 푸시 소켓 인증에 쓰는 단명 세션 토큰
    pub session: String,
    /// 서버가 보고한 사용자명 (없으면 "_api")
    #[serde(default)]
    pub name: Option<String>,
}

impl LoginResponse {
    /// 인증 프레임에 넣을 사용자명
    pub fn user(&self) -> &str {
        self.name.as_deref().unwrap_or("_api")
    }
}

/// 파일 엔드포인트 클라이언트
#[async_trait]
pub trait PrinterFiles: Send + Sync {
    /// 파일 목록 조회
    async fn list_files(&self) -> Result<RawFileList, CoreError>;

    /// 파일 선택 (선택적으로 즉시 출력 시작)
    async fn select_file(&self, location: &str, path: &str, print: bool)
        -> Result<(), CoreError>;

    /// 파일 업로드.
    ///
    /// 성공 시 호출자는 즉시 카탈로그 재폴링을 걸어야 한다.
    async fn upload_file(
        &self,
        location: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<(), CoreError>;
}

/// 분류된 푸시 프레임
#[derive(Debug, Clone)]
pub enum PushFrame {
    /// 서버의 connected 인사 — 인증 프레임 송신 신호
    Connected,
    /// 전체 상태 교체 (최신)
    Current(RawStatusEvent),
    /// 전체 상태 교체 (백필) — current가 오면 그대로 덮인다
    History(RawStatusEvent),
    /// 미해석 타입 — 무시 대상 (debug 모드에서 원문 로그)
    Other {
        /// 프레임 태그
        tag: String,
        /// 원문 페이로드
        raw: String,
    },
    /// 소켓 종료
    Close,
}

impl PushFrame {
    /// 상태 페이로드가 실린 프레임이면 꺼낸다
    pub fn into_status(self) -> Option<RawStatusEvent> {
        match self {
            PushFrame::Current(event) | PushFrame::History(event) => Some(event),
            _ => None,
        }
    }
}
