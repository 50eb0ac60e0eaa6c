//! 세션/스트림 매니저.
//!
//! 로그인 교환 → 소켓 연결 → 인증 프레임 → 상태 프레임 수신의
//! 상태 기계 드라이버. 전이표 자체는 `octoview_core::models::session`의
//! 순수 함수이고, 여기서는 이벤트를 공급하고 결과 뷰를 발행한다.

use octoview_core::config::{ServerConfig, StreamConfig};
use octoview_core::error::CoreError;
use octoview_core::models::event::DashboardEvent;
use octoview_core::models::session::{SessionEvent, SessionState};
use octoview_core::models::status::NormalizedStatus;
use octoview_core::normalize::{normalize, NormalizeOptions};
use octoview_core::ports::printer_api::PushFrame;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::auth::{auth_frame, PassiveLogin};
use crate::push_socket::PushSocket;

/// 연결 한 사이클의 종료 사유.
///
/// backoff 리셋은 인증까지 도달한 세션에만 해당한다 — 소켓을 받자마자
/// 끊는 서버가 고정 주기 재시도 루프를 만들지 못하게 한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 인증 완료 후 소켓 종료 (정상 세션이 한 번 성립했다)
    Established,
    /// 인증에 도달하기 전에 소켓 종료
    DroppedEarly,
}

/// 세션/스트림 매니저.
///
/// 세션 토큰은 연결 시도 동안만 살아 있고 밖으로 노출되지 않는다.
pub struct StreamManager {
    login: PassiveLogin,
    socket: PushSocket,
    config: StreamConfig,
    opts: NormalizeOptions,
    state_tx: watch::Sender<SessionState>,
    status_tx: watch::Sender<Option<NormalizedStatus>>,
    events_tx: broadcast::Sender<DashboardEvent>,
}

impl StreamManager {
    /// 새 스트림 매니저 생성
    pub fn new(
        server: &ServerConfig,
        config: StreamConfig,
        opts: NormalizeOptions,
        events_tx: broadcast::Sender<DashboardEvent>,
    ) -> (
        Self,
        watch::Receiver<SessionState>,
        watch::Receiver<Option<NormalizedStatus>>,
    ) {
        let (state_tx, state_rx) = watch::channel(SessionState::Disconnected);
        let (status_tx, status_rx) = watch::channel(None);
        let manager = Self {
            login: PassiveLogin::new(&server.base_url, &server.api_key, server.login_timeout()),
            socket: PushSocket::new(&server.base_url, server.connect_timeout()),
            config,
            opts,
            state_tx,
            status_tx,
            events_tx,
        };
        (manager, state_rx, status_rx)
    }

    /// 현재 상태에 이벤트를 적용하고 발행
    fn advance(&self, event: SessionEvent) -> SessionState {
        let next = self.state_tx.borrow().apply(event);
        self.state_tx.send_replace(next);
        next
    }

    /// 연결 한 사이클: 로그인 → 소켓 → 인증 → 수신, 소켓이 닫힐 때까지.
    ///
    /// 로그인 거부는 해당 시도에 치명적이다 — 소켓을 열지 않고 즉시
    /// 반환한다. 소켓 종료는 `Ok`이되, 인증 도달 여부를
    /// [`SessionOutcome`]으로 보고한다.
    pub async fn connect_once(&self) -> Result<SessionOutcome, CoreError> {
        self.advance(SessionEvent::ConnectRequested);

        let session = match self.login.login().await {
            Ok(resp) => resp,
            Err(e) => {
                self.advance(SessionEvent::LoginFailed);
                return Err(e);
            }
        };
        self.advance(SessionEvent::LoginSucceeded);

        let (sender, mut rx) = match self.socket.connect().await {
            Ok(pair) => pair,
            Err(e) => {
                self.advance(SessionEvent::SocketClosed);
                return Err(e);
            }
        };

        let mut authenticated = false;
        while let Some(frame) = rx.recv().await {
            match frame {
                Ok(PushFrame::Connected) => {
                    if *self.state_tx.borrow() == SessionState::Authenticating {
                        if let Err(e) = sender
                            .send_text(&auth_frame(session.user(), &session.session))
                            .await
                        {
                            self.advance(SessionEvent::SocketClosed);
                            return Err(e);
                        }
                        self.advance(SessionEvent::ServerHello);
                        authenticated = true;
                        info!("푸시 세션 인증 완료");
                    }
                }
                Ok(PushFrame::Current(event)) | Ok(PushFrame::History(event)) => {
                    if *self.state_tx.borrow() != SessionState::Connected {
                        debug!("인증 전 상태 프레임 무시");
                        continue;
                    }
                    // 통째 교체 — 병합 없음, 최신 프레임이 이긴다
                    let ns = normalize(&event, &self.opts);
                    self.status_tx.send_replace(Some(ns));
                    let _ = self.events_tx.send(DashboardEvent::StatusUpdated);
                }
                Ok(PushFrame::Other { tag, raw }) => {
                    if self.config.debug_mode {
                        debug!("미해석 푸시 프레임 [{tag}]: {raw}");
                    }
                }
                Ok(PushFrame::Close) => break,
                Err(e) => {
                    // 계약 위반 — API 형태 불일치이므로 크게 보고하되
                    // 연결 자체는 유지한다
                    error!("페이로드 계약 위반: {e}");
                    let _ = self
                        .events_tx
                        .send(DashboardEvent::ContractViolation(e.to_string()));
                }
            }
        }

        self.advance(SessionEvent::SocketClosed);
        Ok(if authenticated {
            SessionOutcome::Established
        } else {
            SessionOutcome::DroppedEarly
        })
    }

    /// 재연결 루프.
    ///
    /// 전송 실패와 소켓 종료는 exponential backoff로 재시도하고,
    /// 인증 실패는 재시도 없이 그대로 반환한다. 재연결이 꺼져 있으면
    /// 첫 종료에서 반환한다.
    pub async fn run(&self) -> Result<(), CoreError> {
        let base_delay = self.config.retry_delay().max(Duration::from_millis(1));
        let max_delay = Duration::from_secs(self.config.max_retry_secs);
        let mut delay = base_delay;

        loop {
            match self.connect_once().await {
                Ok(SessionOutcome::Established) => {
                    if !self.config.reconnect {
                        return Ok(());
                    }
                    // 세션이 한 번 성립했으므로 backoff 리셋
                    delay = base_delay;
                    info!("푸시 소켓 종료, {delay:?} 후 재연결");
                }
                Ok(SessionOutcome::DroppedEarly) => {
                    if !self.config.reconnect {
                        return Ok(());
                    }
                    // 인증 전에 끊긴 세션은 실패와 같게 취급 — 리셋 없음
                    warn!("인증 전 소켓 종료, {delay:?} 후 재시도");
                }
                Err(e @ CoreError::Auth(_)) => return Err(e),
                Err(e) => {
                    if !self.config.reconnect {
                        return Err(e);
                    }
                    warn!("연결 실패: {e}, {delay:?} 후 재시도");
                }
            }

            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(max_delay);
        }
    }
}
