//! 푸시 세션 상태 기계.
//!
//! 상태 전이를 순수 함수(전이표)로 정의한다. 네트워크 드라이버는
//! `octoview-network`의 스트림 매니저가 담당한다.

use serde::Serialize;

/// 푸시 세션 연결 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// 연결 없음
    Disconnected,
    /// 로그인 교환 중
    Connecting,
    /// 소켓 열림, 인증 프레임 대기
    Authenticating,
    /// 인증 완료, 상태 프레임 수신 중
    Connected,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "Disconnected"),
            SessionState::Connecting => write!(f, "Connecting"),
            SessionState::Authenticating => write!(f, "Authenticating"),
            SessionState::Connected => write!(f, "Connected"),
        }
    }
}

/// 세션 상태 기계를 움직이는 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 외부에서 연결 요청 (모듈 기동)
    ConnectRequested,
    /// 로그인 HTTP 교환 성공
    LoginSucceeded,
    /// 로그인 거부 또는 전송 실패
    LoginFailed,
    /// 서버의 connected 프레임 수신, 인증 프레임 송신 완료
    ServerHello,
    /// 소켓 종료 또는 에러
    SocketClosed,
}

impl SessionState {
    /// 전이표. 실패는 어느 상태에서든 Disconnected로 돌아가며
    /// 별도의 Error 상태는 없다 (래치 없음).
    pub fn apply(self, event: SessionEvent) -> SessionState {
        use SessionEvent::*;
        use SessionState::*;
        match (self, event) {
            (Disconnected, ConnectRequested) => Connecting,
            (Connecting, LoginSucceeded) => Authenticating,
            (Connecting, LoginFailed) => Disconnected,
            (Authenticating, ServerHello) => Connected,
            (_, SocketClosed) => Disconnected,
            // 정의되지 않은 조합은 현 상태 유지
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionEvent::*;
    use super::SessionState::*;

    #[test]
    fn happy_path() {
        let s = Disconnected
            .apply(ConnectRequested)
            .apply(LoginSucceeded)
            .apply(ServerHello);
        assert_eq!(s, Connected);
    }

    #[test]
    fn login_failure_returns_to_disconnected() {
        let s = Disconnected.apply(ConnectRequested).apply(LoginFailed);
        assert_eq!(s, Disconnected);
    }

    #[test]
    fn socket_close_from_any_state() {
        assert_eq!(Connecting.apply(SocketClosed), Disconnected);
        assert_eq!(Authenticating.apply(SocketClosed), Disconnected);
        assert_eq!(Connected.apply(SocketClosed), Disconnected);
    }

    #[test]
    fn undefined_transitions_keep_state() {
        // Connected 상태에서 또 로그인 성공 이벤트 → 무시
        assert_eq!(Connected.apply(LoginSucceeded), Connected);
        assert_eq!(Disconnected.apply(ServerHello), Disconnected);
    }
}
