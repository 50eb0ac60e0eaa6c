//! 패시브 로그인 교환.
//!
//! 사전 공유 API 키를 푸시 소켓 인증용 단명 세션 토큰으로 바꾼다.
//! `passive: true`는 비대화식 세션 요청을 뜻한다.

use octoview_core::error::CoreError;
use octoview_core::ports::printer_api::LoginResponse;
use std::time::Duration;
use tracing::debug;

/// 패시브 로그인 클라이언트
pub struct PassiveLogin {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl PassiveLogin {
    /// 새 로그인 클라이언트 생성
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// `POST /api/login` — 세션 토큰 획득.
    ///
    /// 비정상 상태 코드는 해당 연결 시도에 치명적이다: 소켓을 열지 않고
    /// 위로 보고하며, 내부에서 재시도하지 않는다.
    pub async fn login(&self) -> Result<LoginResponse, CoreError> {
        let url = format!("{}/api/login", self.base_url);
        let body = serde_json::json!({ "passive": true });

        let request = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&body)
            .send();

        let resp = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| CoreError::Network(format!("로그인 타임아웃 ({:?})", self.timeout)))?
            .map_err(|e| CoreError::Network(format!("로그인 요청 실패: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Auth(format!("로그인 거부 ({status}): {text}")));
        }

        let login: LoginResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Auth(format!("로그인 응답 파싱 실패: {e}")))?;

        debug!("패시브 로그인 성공, user={}", login.user());
        Ok(login)
    }
}

/// 소켓으로 한 번 보내는 인증 프레임 본문
pub fn auth_frame(user: &str, session: &str) -> String {
    serde_json::json!({ "auth": format!("{user}:{session}") }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_stripped() {
        let login = PassiveLogin::new("http://octopi.local/", "KEY", Duration::from_secs(5));
        assert_eq!(login.base_url, "http://octopi.local");
    }

    #[test]
    fn auth_frame_shape() {
        let frame = auth_frame("_api", "s3ss10n");
        let val: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(val["auth"], "_api:s3ss10n");
    }

    #[tokio::test]
    async fn login_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/login")
            .match_header("x-api-key", "SECRET")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session": "tok_123", "name": "mirror"}"#)
            .create_async()
            .await;

        let login = PassiveLogin::new(&server.url(), "SECRET", Duration::from_secs(5));
        let resp = login.login().await.unwrap();
        assert_eq!(resp.session, "tok_123");
        assert_eq!(resp.user(), "mirror");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn login_default_user() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"session": "tok_456"}"#)
            .create_async()
            .await;

        let login = PassiveLogin::new(&server.url(), "SECRET", Duration::from_secs(5));
        let resp = login.login().await.unwrap();
        assert_eq!(resp.user(), "_api");
    }

    #[tokio::test]
    async fn login_rejected_401() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/login")
            .with_status(401)
            .with_body("Invalid API key")
            .create_async()
            .await;

        let login = PassiveLogin::new(&server.url(), "WRONG", Duration::from_secs(5));
        let err = login.login().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn login_network_failure() {
        // 도달 불가 URL → 네트워크 에러
        let login = PassiveLogin::new("http://127.0.0.1:1", "KEY", Duration::from_secs(5));
        let err = login.login().await.unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}
