//! 경과/잔여 시간 표시 포맷.
//!
//! 초 단위 값을 `H:MM:SS` / `M:SS` / `Ns` 형태로 변환한다.
//! 분 단위는 선두일 때 패딩 없이, 시간 뒤에서는 두 자리로 표기한다.

/// 초를 사람이 읽는 시간 문자열로 변환
///
/// - `0` → `"0s"`, `59` → `"59s"`
/// - `60` → `"1:00"`, `3600` → `"1:00:00"`, `3661` → `"1:01:01"`
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else if minutes > 0 {
        format!("{minutes}:{secs:02}")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn seconds_only() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(9), "9s");
        assert_eq!(format_duration(59), "59s");
    }

    #[test]
    fn minutes_leading_unpadded() {
        assert_eq!(format_duration(60), "1:00");
        assert_eq!(format_duration(61), "1:01");
        assert_eq!(format_duration(599), "9:59");
        assert_eq!(format_duration(754), "12:34");
    }

    #[test]
    fn hours_pad_minutes() {
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(36_000), "10:00:00");
        // 시간 뒤 분은 항상 두 자리
        assert_eq!(format_duration(3_600 * 2 + 5 * 60 + 3), "2:05:03");
    }
}
