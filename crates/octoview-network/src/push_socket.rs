//! 푸시 소켓 클라이언트.
//!
//! `tokio-tungstenite` 기반. 수신 프레임을 태그로 분류해 채널로 넘긴다.
//! 재연결 정책은 스트림 매니저([`crate::stream`]) 소관이다.

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use octoview_core::error::CoreError;
use octoview_core::models::status::RawStatusEvent;
use octoview_core::ports::printer_api::PushFrame;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// 서버 푸시 엔드포인트 경로
const PUSH_PATH: &str = "/sockjs/websocket";

/// 푸시 소켓 클라이언트
pub struct PushSocket {
    base_url: String,
    connect_timeout: Duration,
}

impl PushSocket {
    /// 새 푸시 소켓 클라이언트 생성
    pub fn new(base_url: &str, connect_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            connect_timeout,
        }
    }

    /// 소켓 연결 수립.
    ///
    /// 수신 프레임은 `rx`로, 송신(인증 프레임)은 반환된 `PushSender`로.
    pub async fn connect(
        &self,
    ) -> Result<(PushSender, mpsc::Receiver<Result<PushFrame, CoreError>>), CoreError> {
        let ws_base = self
            .base_url
            .replace("http://", "ws://")
            .replace("https://", "wss://");
        let url = format!("{ws_base}{PUSH_PATH}");

        debug!("푸시 소켓 연결: {url}");

        let connect = tokio_tungstenite::connect_async(&url);
        let (ws_stream, _) = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| {
                CoreError::Network(format!("소켓 연결 타임아웃 ({:?})", self.connect_timeout))
            })?
            .map_err(|e| CoreError::Network(format!("소켓 연결 실패: {e}")))?;

        let (write, read) = ws_stream.split();
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(Self::read_loop(read, tx));

        Ok((
            PushSender {
                write: Arc::new(tokio::sync::Mutex::new(write)),
            },
            rx,
        ))
    }

    /// 수신 루프 — 프레임 분류 후 채널로 전달
    async fn read_loop(
        mut read: SplitStream<WsStream>,
        tx: mpsc::Sender<Result<PushFrame, CoreError>>,
    ) {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if tx.send(classify_frame(&text)).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    let _ = tx.send(Ok(PushFrame::Close)).await;
                    break;
                }
                // Ping/Pong은 자동 처리, 바이너리는 프로토콜에 없음
                Ok(_) => {}
                Err(e) => {
                    warn!("푸시 소켓 수신 에러: {e}");
                    let _ = tx.send(Ok(PushFrame::Close)).await;
                    break;
                }
            }
        }
        debug!("푸시 소켓 수신 루프 종료");
    }
}

/// 수신 텍스트 프레임을 태그로 분류.
///
/// `current`/`history`의 골격 누락은 계약 위반(`CoreError::Payload`)으로
/// 크게 보고한다. 모르는 태그는 `Other`로 넘기고 해석하지 않는다.
pub fn classify_frame(text: &str) -> Result<PushFrame, CoreError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| CoreError::Payload {
        context: "frame".to_string(),
        message: format!("JSON 아님: {e}"),
    })?;
    let obj = value.as_object().ok_or_else(|| CoreError::Payload {
        context: "frame".to_string(),
        message: "객체 아님".to_string(),
    })?;

    if obj.contains_key("connected") {
        return Ok(PushFrame::Connected);
    }
    for (tag, build) in [
        ("current", PushFrame::Current as fn(RawStatusEvent) -> PushFrame),
        ("history", PushFrame::History as fn(RawStatusEvent) -> PushFrame),
    ] {
        if let Some(payload) = obj.get(tag) {
            let event: RawStatusEvent =
                serde_json::from_value(payload.clone()).map_err(|e| CoreError::Payload {
                    context: tag.to_string(),
                    message: e.to_string(),
                })?;
            return Ok(build(event));
        }
    }

    let tag = obj.keys().next().cloned().unwrap_or_default();
    Ok(PushFrame::Other {
        tag,
        raw: text.to_string(),
    })
}

/// 푸시 소켓 송신기
pub struct PushSender {
    write: Arc<tokio::sync::Mutex<SplitSink<WsStream, Message>>>,
}

impl PushSender {
    /// 텍스트 프레임 전송
    pub async fn send_text(&self, text: &str) -> Result<(), CoreError> {
        let mut write = self.write.lock().await;
        write
            .send(Message::text(text))
            .await
            .map_err(|e| CoreError::Network(format!("소켓 전송 실패: {e}")))
    }

    /// 연결 종료
    pub async fn close(&self) -> Result<(), CoreError> {
        let mut write = self.write.lock().await;
        write
            .send(Message::Close(None))
            .await
            .map_err(|e| CoreError::Network(format!("소켓 종료 실패: {e}")))
    }
}
