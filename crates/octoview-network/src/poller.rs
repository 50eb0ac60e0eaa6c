//! 파일 카탈로그 폴러.
//!
//! 자체 타이머로 파일 목록을 주기적으로 가져와 카탈로그를 통째로
//! 교체한다. 상태 스트림과 케이던스가 분리되어 있고, 인스턴스당
//! 미결 타이머는 항상 최대 한 개다 (cancel-then-arm).

use octoview_core::models::event::DashboardEvent;
use octoview_core::models::files::FileCatalog;
use octoview_core::ports::printer_api::PrinterFiles;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 파일 카탈로그 폴러.
///
/// 모듈 인스턴스가 소유하며, 해체 시 [`cancel`](Self::cancel)로
/// 미결 타이머를 정리해야 한다.
pub struct FileCatalogPoller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    api: Arc<dyn PrinterFiles>,
    update_interval: Duration,
    catalog_tx: watch::Sender<FileCatalog>,
    events_tx: broadcast::Sender<DashboardEvent>,
    loaded: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl FileCatalogPoller {
    /// 새 폴러 생성. 타이머는 아직 걸리지 않는다.
    pub fn new(
        api: Arc<dyn PrinterFiles>,
        update_interval: Duration,
        events_tx: broadcast::Sender<DashboardEvent>,
    ) -> (Self, watch::Receiver<FileCatalog>) {
        let (catalog_tx, catalog_rx) = watch::channel(FileCatalog::empty());
        let poller = Self {
            inner: Arc::new(PollerInner {
                api,
                update_interval,
                catalog_tx,
                events_tx,
                loaded: AtomicBool::new(false),
                timer: Mutex::new(None),
            }),
        };
        (poller, catalog_rx)
    }

    /// 타이머 장전. 미결 타이머가 있으면 먼저 취소한다.
    ///
    /// 발화하면 목록을 가져오고, 성공/실패와 무관하게 정규 주기로
    /// 스스로 재장전한다 (실패에 backoff 없음 — 다음 정규 틱까지
    /// 이전 카탈로그가 그대로 남는다).
    pub fn schedule(&self, delay: Duration) {
        let inner = self.inner.clone();
        let mut guard = self
            .inner
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pending) = guard.take() {
            pending.abort();
        }
        *guard = Some(tokio::spawn(async move {
            let mut next = delay;
            loop {
                tokio::time::sleep(next).await;
                inner.tick().await;
                next = inner.update_interval;
            }
        }));
    }

    /// 즉시 재폴링 (업로드 성공, 수동 새로고침)
    pub fn refresh_now(&self) {
        self.schedule(Duration::ZERO);
    }

    /// 미결 타이머 취소 — 모듈 해체 시 호출
    pub fn cancel(&self) {
        let mut guard = self
            .inner
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pending) = guard.take() {
            pending.abort();
        }
    }

    /// 첫 카탈로그 적재 완료 여부
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::SeqCst)
    }
}

impl Drop for FileCatalogPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl PollerInner {
    /// 타이머 발화 한 번: 목록 조회 → 카탈로그 교체 → 리렌더 신호
    async fn tick(&self) {
        match self.api.list_files().await {
            Ok(raw) => {
                let catalog = FileCatalog::from_raw(raw);
                debug!("카탈로그 교체: {}건", catalog.names.len());
                self.catalog_tx.send_replace(catalog);
                // loaded 래치는 인스턴스당 정확히 한 번
                if !self.loaded.swap(true, Ordering::SeqCst) {
                    let _ = self.events_tx.send(DashboardEvent::CatalogLoaded);
                }
                let _ = self.events_tx.send(DashboardEvent::CatalogRefreshed);
            }
            Err(e) => {
                warn!("파일 목록 폴링 실패: {e} — 이전 카탈로그 유지");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use octoview_core::error::CoreError;
    use octoview_core::models::files::{RawFileEntry, RawFileList};
    use std::sync::atomic::AtomicUsize;

    /// 호출 횟수를 세는 목 API. `fail_first`만큼 처음 호출을 실패시킨다.
    struct MockFiles {
        calls: AtomicUsize,
        fail_first: usize,
        names: Vec<&'static str>,
    }

    impl MockFiles {
        fn new(names: Vec<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: 0,
                names,
            }
        }

        fn failing_first(mut self, n: usize) -> Self {
            self.fail_first = n;
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PrinterFiles for MockFiles {
        async fn list_files(&self) -> Result<RawFileList, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                return Err(CoreError::Network("연결 거부".to_string()));
            }
            Ok(RawFileList {
                files: self
                    .names
                    .iter()
                    .map(|n| RawFileEntry {
                        name: n.to_string(),
                    })
                    .collect(),
            })
        }

        async fn select_file(&self, _: &str, _: &str, _: bool) -> Result<(), CoreError> {
            unimplemented!()
        }

        async fn upload_file(&self, _: &str, _: &str, _: Vec<u8>) -> Result<(), CoreError> {
            unimplemented!()
        }
    }

    fn poller(
        api: Arc<MockFiles>,
        interval: Duration,
    ) -> (
        FileCatalogPoller,
        watch::Receiver<FileCatalog>,
        broadcast::Receiver<DashboardEvent>,
    ) {
        let (events_tx, events_rx) = broadcast::channel(32);
        let (poller, catalog_rx) = FileCatalogPoller::new(api, interval, events_tx);
        (poller, catalog_rx, events_rx)
    }

    fn drain(rx: &mut broadcast::Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn tick_replaces_catalog_and_signals() {
        let api = Arc::new(MockFiles::new(vec!["b.gcode", "a.gcode"]));
        let (poller, catalog_rx, mut events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.schedule(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(api.call_count(), 1);
        assert_eq!(catalog_rx.borrow().names, vec!["b.gcode", "a.gcode"]);
        assert!(poller.is_loaded());
        let events = drain(&mut events_rx);
        assert!(events.contains(&DashboardEvent::CatalogLoaded));
        assert!(events.contains(&DashboardEvent::CatalogRefreshed));
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_twice_leaves_one_timer() {
        let api = Arc::new(MockFiles::new(vec!["x.gcode"]));
        let (poller, _catalog_rx, _events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.schedule(Duration::from_millis(100));
        poller.schedule(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(150)).await;

        // 타이머가 둘 살아 있었다면 2회 발화했을 것
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rearms_on_regular_interval() {
        let api = Arc::new(MockFiles::new(vec!["x.gcode"]));
        let (poller, _catalog_rx, _events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.schedule(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.call_count(), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_catalog_until_next_tick() {
        let api = Arc::new(MockFiles::new(vec!["x.gcode"]).failing_first(1));
        let (poller, catalog_rx, mut events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.schedule(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(10)).await;

        // 첫 틱 실패 — 카탈로그도 loaded도 그대로, 리렌더 신호 없음
        assert_eq!(api.call_count(), 1);
        assert!(catalog_rx.borrow().names.is_empty());
        assert!(!poller.is_loaded());
        assert!(drain(&mut events_rx).is_empty());

        // 다음 정규 틱에서 회복
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(api.call_count(), 2);
        assert_eq!(catalog_rx.borrow().names, vec!["x.gcode"]);
        assert!(poller.is_loaded());
    }

    #[tokio::test(start_paused = true)]
    async fn loaded_latch_fires_once() {
        let api = Arc::new(MockFiles::new(vec!["x.gcode"]));
        let (poller, _catalog_rx, mut events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.schedule(Duration::ZERO);
        tokio::time::sleep(Duration::from_secs(125)).await;
        assert!(api.call_count() >= 3);

        let loaded_count = drain(&mut events_rx)
            .into_iter()
            .filter(|e| *e == DashboardEvent::CatalogLoaded)
            .count();
        assert_eq!(loaded_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_pending_timer() {
        let api = Arc::new(MockFiles::new(vec!["x.gcode"]));
        let (poller, _catalog_rx, _events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.schedule(Duration::from_millis(100));
        poller.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_now_fires_immediately() {
        let api = Arc::new(MockFiles::new(vec!["x.gcode"]));
        let (poller, catalog_rx, _events_rx) = poller(api.clone(), Duration::from_secs(60));

        poller.refresh_now();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(api.call_count(), 1);
        assert_eq!(catalog_rx.borrow().names, vec!["x.gcode"]);
    }
}
