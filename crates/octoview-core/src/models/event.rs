//! 대시보드 관측 이벤트.
//!
//! 프레젠테이션 계층이 구독하는 리렌더 신호. 상태 자체는 watch 채널로
//! 읽고, 이 이벤트는 "바뀌었다"는 알림만 전달한다.

/// 대시보드 코어가 방출하는 관측 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// 정규화된 상태가 통째로 교체됨
    StatusUpdated,
    /// 파일 카탈로그 폴링 성공, 카탈로그 교체됨
    CatalogRefreshed,
    /// 첫 카탈로그 적재 완료 (인스턴스당 정확히 한 번)
    CatalogLoaded,
    /// 페이로드 계약 위반 감지 (API 형태 불일치)
    ContractViolation(String),
}
