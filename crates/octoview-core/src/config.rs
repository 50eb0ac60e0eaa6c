//! 대시보드 모듈 설정 구조체.
//!
//! 서버 URL/API 키, 폴링 주기, 표시 옵션, 스트림 재연결 정책을 정의한다.
//! 설정 값은 외부(상위 프레임워크)에서 주입되며 파일 로딩 계층은 없다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 대시보드 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 프린터 제어 서버 연결 설정
    pub server: ServerConfig,
    /// 파일 카탈로그 폴링 설정
    #[serde(default)]
    pub poll: PollConfig,
    /// 표시 옵션
    #[serde(default)]
    pub display: DisplayConfig,
    /// 푸시 스트림 설정
    #[serde(default)]
    pub stream: StreamConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 서버 베이스 URL (예: "http://octopi.local")
    pub base_url: String,
    /// 사전 공유 API 키 — 로그인 교환에서 세션 토큰으로 바뀐다
    pub api_key: String,
    /// 로그인 HTTP 타임아웃 (밀리초)
    #[serde(default = "default_timeout_ms")]
    pub login_timeout_ms: u64,
    /// 소켓 연결 타임아웃 (밀리초)
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// 파일 REST 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    /// 로그인 타임아웃
    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.login_timeout_ms)
    }

    /// 소켓 연결 타임아웃
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// 파일 REST 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            login_timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// 파일 카탈로그 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// 정규 폴링 주기 (밀리초)
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// 첫 폴링까지의 지연 (밀리초)
    #[serde(default)]
    pub initial_load_delay_ms: u64,
    /// 파일 선택/업로드 등 상호작용 기능 활성화.
    /// false면 폴러를 아예 가동하지 않는다.
    #[serde(default = "default_true")]
    pub interactive: bool,
}

impl PollConfig {
    /// 정규 폴링 주기
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// 첫 폴링 지연
    pub fn initial_load_delay(&self) -> Duration {
        Duration::from_millis(self.initial_load_delay_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            initial_load_delay_ms: 0,
            interactive: true,
        }
    }
}

/// 표시 옵션 — 정규화기의 프레젠테이션 지시에 반영된다
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// 온도 필드 추출 여부
    #[serde(default = "default_true")]
    pub show_temps: bool,
    /// 오프라인(fault) 상태에서 상세 패널을 숨길지 여부
    #[serde(default)]
    pub hide_details_when_offline: bool,
    /// "Offline (Error: ...)" 상태 텍스트를 대체할 라벨
    #[serde(default = "default_offline_label")]
    pub offline_label: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_temps: true,
            hide_details_when_offline: false,
            offline_label: default_offline_label(),
        }
    }
}

/// 푸시 스트림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// 소켓 종료 시 자동 재연결 여부
    #[serde(default = "default_true")]
    pub reconnect: bool,
    /// 재연결 backoff 시작 지연 (밀리초)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// 재연결 backoff 상한 (초)
    #[serde(default = "default_max_retry_secs")]
    pub max_retry_secs: u64,
    /// 미해석 푸시 프레임을 원문 그대로 로그에 남길지 여부
    #[serde(default)]
    pub debug_mode: bool,
}

impl StreamConfig {
    /// backoff 시작 지연
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            reconnect: true,
            retry_delay_ms: default_retry_delay_ms(),
            max_retry_secs: default_max_retry_secs(),
            debug_mode: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_update_interval_ms() -> u64 {
    60_000
}

fn default_retry_delay_ms() -> u64 {
    2_500
}

fn default_max_retry_secs() -> u64 {
    30
}

fn default_offline_label() -> String {
    "OFFLINE".to_string()
}
