//! 파일 카탈로그 모델.
//!
//! 폴링 성공 시마다 통째로 교체되는 파일명 목록. 이전 카탈로그와
//! diff하지 않으며, 서버가 보낸 순서를 그대로 보존한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 파일 목록 엔드포인트의 원시 응답
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileList {
    /// 파일 엔트리 (서버 순서)
    #[serde(default)]
    pub files: Vec<RawFileEntry>,
}

/// 파일 엔트리 — 이름 외 필드는 무시한다
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileEntry {
    /// 파일명
    pub name: String,
}

/// 정렬된 파일명 카탈로그
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCatalog {
    /// 파일명 (삽입 순서 = 서버 순서, 중복 제거 없음)
    pub names: Vec<String>,
    /// 마지막 성공 폴링 시각
    pub fetched_at: DateTime<Utc>,
}

impl FileCatalog {
    /// 원시 응답에서 카탈로그 구성 — 순서 보존, dedup 없음
    pub fn from_raw(raw: RawFileList) -> Self {
        Self {
            names: raw.files.into_iter().map(|f| f.name).collect(),
            fetched_at: Utc::now(),
        }
    }

    /// 아직 한 번도 폴링하지 못한 빈 카탈로그
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            fetched_at: Utc::now(),
        }
    }
}

impl Default for FileCatalog {
    fn default() -> Self {
        Self::empty()
    }
}
