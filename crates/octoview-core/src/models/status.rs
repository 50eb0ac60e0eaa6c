//! 프린터 상태 모델.
//!
//! 원시 푸시 페이로드(`RawStatusEvent`)와 정규화 결과(`PrinterStatus`)를
//! 정의한다. 원시 모델의 필수 골격은 serde 역직렬화 시점에 강제된다 —
//! `state`/`job`/`progress`/`temps`가 빠진 페이로드는 계약 위반이다.

use serde::{Deserialize, Serialize};

/// 푸시 페이로드의 원시 형태 ("current"/"history" 공통)
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatusEvent {
    /// 상태 텍스트 + 플래그
    pub state: RawState,
    /// 현재 작업 (파일명)
    pub job: RawJob,
    /// 진행률 (경과/잔여/퍼센트)
    pub progress: RawProgress,
    /// 시간순 온도 샘플 (빈 배열 허용, 필드 자체는 필수)
    pub temps: Vec<TemperatureSample>,
}

/// 원시 상태 블록
#[derive(Debug, Clone, Deserialize)]
pub struct RawState {
    /// 서버가 보고한 상태 텍스트
    pub text: String,
    /// 상태 플래그 집합
    pub flags: StateFlags,
}

/// 상태 플래그 집합.
/// 서버가 여러 플래그를 동시에 보고할 수 있으므로 우선순위는
/// [`crate::normalize`]에서 고정 순서로 해소한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFlags {
    /// 출력 중
    #[serde(default)]
    pub printing: bool,
    /// 연결 종료 또는 에러
    #[serde(default, rename = "closedOrError")]
    pub closed_or_error: bool,
    /// 일시 정지
    #[serde(default)]
    pub paused: bool,
    /// 에러
    #[serde(default)]
    pub error: bool,
    /// 출력 준비 완료
    #[serde(default)]
    pub ready: bool,
    /// 프린터 연결됨
    #[serde(default)]
    pub operational: bool,
}

/// 원시 작업 블록
#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    /// 선택된 파일
    pub file: RawJobFile,
}

/// 작업 파일 정보 — 작업이 없으면 `name`은 null
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobFile {
    /// 파일명
    #[serde(default)]
    pub name: Option<String>,
}

/// 원시 진행률 블록.
/// 값이 없는 필드는 null로 오며, 0은 실제 0으로 취급한다
/// (원본의 truthiness 처리 대신 명시적 존재 여부를 쓴다).
#[derive(Debug, Clone, Deserialize)]
pub struct RawProgress {
    /// 경과 시간 (초)
    #[serde(default, rename = "printTime")]
    pub print_time: Option<u64>,
    /// 잔여 시간 (초)
    #[serde(default, rename = "printTimeLeft")]
    pub print_time_left: Option<u64>,
    /// 완료 퍼센트 (0.0–100.0)
    #[serde(default)]
    pub completion: Option<f64>,
}

/// 온도 샘플 한 건.
/// 서버는 시간만 있는 꼬리 항목을 보낼 수 있다 (`bed`/`tool0` 없음).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemperatureSample {
    /// 샘플 시각 (unix 초)
    #[serde(default)]
    pub time: Option<u64>,
    /// 노즐(tool0) 센서
    #[serde(default)]
    pub tool0: Option<SensorReading>,
    /// 베드 센서
    #[serde(default)]
    pub bed: Option<SensorReading>,
}

/// 센서 한 개의 실측/목표 쌍 — 필드는 개별적으로 해소된다
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SensorReading {
    /// 실측 온도 (°C)
    #[serde(default)]
    pub actual: Option<f64>,
    /// 목표 온도 (°C)
    #[serde(default)]
    pub target: Option<f64>,
}

/// 정규화된 프린터 상태 — 수락된 스트림 이벤트마다 통째로 교체된다
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrinterStatus {
    /// 표시용 상태 텍스트
    pub state_text: String,
    /// 원본 플래그 집합
    pub flags: StateFlags,
    /// 현재 파일명 (없으면 None = "unknown")
    pub current_file: Option<String>,
    /// 경과 시간 (초)
    pub elapsed_secs: Option<u64>,
    /// 잔여 시간 (초)
    pub remaining_secs: Option<u64>,
    /// 완료 퍼센트 (정수 반올림, 0–100)
    pub completion_percent: Option<u8>,
    /// 노즐 실측 온도 (°C)
    pub nozzle_actual_c: Option<f64>,
    /// 노즐 목표 온도 (°C)
    pub nozzle_target_c: Option<f64>,
    /// 베드 실측 온도 (°C)
    pub bed_actual_c: Option<f64>,
    /// 베드 목표 온도 (°C)
    pub bed_target_c: Option<f64>,
}

/// 상태 아이콘 종류 — 플래그 우선순위에서 첫 매칭이 결정한다
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateIcon {
    /// 출력 중 (printing)
    Printing,
    /// 장애 (closedOrError, error)
    Fault,
    /// 일시 정지 (paused)
    Paused,
    /// 준비됨 (ready, operational)
    Ready,
}

/// 상세 패널 표시 지시
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailVisibility {
    /// 표시
    Show,
    /// 숨김
    Hide,
    /// 변경 없음 (플래그 미매칭 또는 기능 비활성)
    Unchanged,
}

/// 정규화 결과 — 상태 레코드 + 프레젠테이션 지시
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedStatus {
    /// 정규화된 상태 레코드
    pub status: PrinterStatus,
    /// 아이콘 선택 (None = 이전 아이콘 유지)
    pub icon: Option<StateIcon>,
    /// 상세 패널 표시 지시
    pub details: DetailVisibility,
}
