//! 대시보드 모듈 facade.
//!
//! 인스턴스 하나가 REST 클라이언트, 폴러, 스트림 매니저를 소유한다.
//! 프로세스 전역 싱글턴 없음 — start에서 만들고 stop에서 해체한다.

use octoview_core::config::DashboardConfig;
use octoview_core::error::CoreError;
use octoview_core::models::event::DashboardEvent;
use octoview_core::models::files::FileCatalog;
use octoview_core::models::session::SessionState;
use octoview_core::models::status::NormalizedStatus;
use octoview_core::normalize::NormalizeOptions;
use octoview_core::ports::printer_api::PrinterFiles;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::http_client::OctoPrintHttpClient;
use crate::poller::FileCatalogPoller;
use crate::stream::StreamManager;

/// 기본 업로드/선택 대상 위치
const DEFAULT_LOCATION: &str = "local";

/// 대시보드 모듈 인스턴스.
///
/// 읽기 뷰(상태, 카탈로그, 세션 상태)는 watch 채널로, 리렌더 신호는
/// broadcast 채널로 노출한다. 프레젠테이션은 읽기만 한다.
pub struct DashboardModule {
    api: Arc<OctoPrintHttpClient>,
    poller: FileCatalogPoller,
    stream_task: Option<JoinHandle<()>>,
    events_tx: broadcast::Sender<DashboardEvent>,
    state_rx: watch::Receiver<SessionState>,
    status_rx: watch::Receiver<Option<NormalizedStatus>>,
    catalog_rx: watch::Receiver<FileCatalog>,
}

impl DashboardModule {
    /// 모듈 기동: 클라이언트/폴러 구성, 스트림 태스크 가동,
    /// interactive면 초기 지연으로 첫 폴링 장전.
    pub fn start(config: DashboardConfig) -> Result<Self, CoreError> {
        if config.server.base_url.is_empty() {
            return Err(CoreError::Config("base_url 미설정".to_string()));
        }

        info!("대시보드 모듈 기동: {}", config.server.base_url);

        let api = Arc::new(OctoPrintHttpClient::new(
            &config.server.base_url,
            &config.server.api_key,
            config.server.request_timeout(),
        )?);

        let (events_tx, _) = broadcast::channel(64);

        let (poller, catalog_rx) = FileCatalogPoller::new(
            api.clone() as Arc<dyn PrinterFiles>,
            config.poll.update_interval(),
            events_tx.clone(),
        );
        if config.poll.interactive {
            poller.schedule(config.poll.initial_load_delay());
        }

        let (stream, state_rx, status_rx) = StreamManager::new(
            &config.server,
            config.stream.clone(),
            NormalizeOptions::from(&config.display),
            events_tx.clone(),
        );
        let stream_task = tokio::spawn(async move {
            if let Err(e) = stream.run().await {
                warn!("푸시 스트림 종료: {e}");
            }
        });

        Ok(Self {
            api,
            poller,
            stream_task: Some(stream_task),
            events_tx,
            state_rx,
            status_rx,
            catalog_rx,
        })
    }

    /// 현재 상태 뷰 구독
    pub fn status(&self) -> watch::Receiver<Option<NormalizedStatus>> {
        self.status_rx.clone()
    }

    /// 파일 카탈로그 구독
    pub fn catalog(&self) -> watch::Receiver<FileCatalog> {
        self.catalog_rx.clone()
    }

    /// 푸시 세션 상태 구독
    pub fn session_state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// 리렌더 신호 구독
    pub fn events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events_tx.subscribe()
    }

    /// 첫 카탈로그 적재 완료 여부
    pub fn is_loaded(&self) -> bool {
        self.poller.is_loaded()
    }

    /// 파일을 선택하고 즉시 출력 시작
    pub async fn send_print(&self, file_name: &str) -> Result<(), CoreError> {
        self.api
            .select_file(DEFAULT_LOCATION, file_name, true)
            .await
    }

    /// 파일 업로드. 성공하면 즉시 카탈로그를 재폴링한다.
    pub async fn upload(&self, file_name: &str, contents: Vec<u8>) -> Result<(), CoreError> {
        self.api
            .upload_file(DEFAULT_LOCATION, file_name, contents)
            .await?;
        self.poller.refresh_now();
        Ok(())
    }

    /// 수동 카탈로그 새로고침
    pub fn refresh_files(&self) {
        self.poller.refresh_now();
    }

    /// 모듈 해체: 폴러 타이머 취소, 스트림 태스크 중단
    pub fn stop(&mut self) {
        info!("대시보드 모듈 해체");
        self.poller.cancel();
        if let Some(task) = self.stream_task.take() {
            task.abort();
        }
    }
}

impl Drop for DashboardModule {
    fn drop(&mut self) {
        self.stop();
    }
}
