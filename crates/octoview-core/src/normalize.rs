//! 상태 정규화기.
//!
//! 원시 상태 이벤트 한 건을 권위 있는 `PrinterStatus` 뷰와
//! 프레젠테이션 지시(아이콘, 상세 패널)로 변환한다. 순수 함수 —
//! IO 없음, 누락된 선택 필드에 절대 실패하지 않는다.

use crate::config::DisplayConfig;
use crate::models::status::{
    DetailVisibility, NormalizedStatus, PrinterStatus, RawStatusEvent, StateFlags, StateIcon,
    TemperatureSample,
};

/// 내부 에러 상세를 감추는 오프라인 텍스트 접두사
const OFFLINE_ERROR_PREFIX: &str = "Offline (Error: ";

/// 정규화 옵션 — 표시 설정에서 파생
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// 온도 필드 추출 여부
    pub show_temps: bool,
    /// fault 상태에서 상세 패널 숨김 지시 계산 여부
    pub hide_details_when_offline: bool,
    /// "Offline (Error: ...)" 대체 라벨
    pub offline_label: String,
}

impl From<&DisplayConfig> for NormalizeOptions {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            show_temps: display.show_temps,
            hide_details_when_offline: display.hide_details_when_offline,
            offline_label: display.offline_label.clone(),
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        (&DisplayConfig::default()).into()
    }
}

/// 원시 이벤트 → 정규화된 상태 뷰.
///
/// 결과는 통째 교체용이다 — 이전 상태와 병합하지 않는다.
pub fn normalize(raw: &RawStatusEvent, opts: &NormalizeOptions) -> NormalizedStatus {
    let state_text = if raw.state.text.starts_with(OFFLINE_ERROR_PREFIX) {
        opts.offline_label.clone()
    } else {
        raw.state.text.clone()
    };

    let icon = select_icon(&raw.state.flags);
    let details = if opts.hide_details_when_offline {
        detail_visibility(&raw.state.flags)
    } else {
        DetailVisibility::Unchanged
    };

    let sample = if opts.show_temps {
        pick_temp_sample(&raw.temps)
    } else {
        None
    };
    let (nozzle_actual_c, nozzle_target_c) = sensor_fields(sample.and_then(|s| s.tool0));
    let (bed_actual_c, bed_target_c) = sensor_fields(sample.and_then(|s| s.bed));

    NormalizedStatus {
        status: PrinterStatus {
            state_text,
            flags: raw.state.flags,
            current_file: raw
                .job
                .file
                .name
                .as_deref()
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            elapsed_secs: raw.progress.print_time,
            remaining_secs: raw.progress.print_time_left,
            completion_percent: raw
                .progress
                .completion
                .map(|c| c.round().clamp(0.0, 100.0) as u8),
            nozzle_actual_c,
            nozzle_target_c,
            bed_actual_c,
            bed_target_c,
        },
        icon,
        details,
    }
}

/// 플래그 우선순위에 따른 아이콘 선택.
/// printing > closedOrError > paused > error > ready > operational,
/// 첫 매칭이 이긴다. 매칭 없음 → None (이전 아이콘 유지).
fn select_icon(flags: &StateFlags) -> Option<StateIcon> {
    if flags.printing {
        Some(StateIcon::Printing)
    } else if flags.closed_or_error {
        Some(StateIcon::Fault)
    } else if flags.paused {
        Some(StateIcon::Paused)
    } else if flags.error {
        Some(StateIcon::Fault)
    } else if flags.ready || flags.operational {
        Some(StateIcon::Ready)
    } else {
        None
    }
}

/// 상세 패널 표시 지시 — 아이콘과 동일한 우선순위에서 결정된다
fn detail_visibility(flags: &StateFlags) -> DetailVisibility {
    if flags.printing {
        DetailVisibility::Show
    } else if flags.closed_or_error {
        DetailVisibility::Hide
    } else if flags.paused {
        DetailVisibility::Show
    } else if flags.error {
        DetailVisibility::Hide
    } else if flags.ready || flags.operational {
        DetailVisibility::Show
    } else {
        DetailVisibility::Unchanged
    }
}

/// 온도 샘플 선택 규칙.
/// 마지막 샘플에 `bed`가 있으면 그것, 없으면 바로 앞 샘플로 후퇴
/// (서버가 시간만 있는 꼬리 항목을 보낼 수 있다). 둘 다 없으면 None.
fn pick_temp_sample(temps: &[TemperatureSample]) -> Option<&TemperatureSample> {
    let last = temps.last()?;
    if last.bed.is_some() {
        return Some(last);
    }
    temps
        .len()
        .checked_sub(2)
        .map(|i| &temps[i])
        .filter(|s| s.bed.is_some())
}

/// 센서의 실측/목표를 개별적으로 해소 — 쌍으로 묶지 않는다
fn sensor_fields(
    reading: Option<crate::models::status::SensorReading>,
) -> (Option<f64>, Option<f64>) {
    match reading {
        Some(r) => (r.actual, r.target),
        None => (None, None),
    }
}
