//! # octoview-network
//!
//! 프린터 제어 서버 어댑터: 패시브 로그인(reqwest), 푸시 소켓
//! (tokio-tungstenite), 파일 카탈로그 폴링, 세션/스트림 상태 기계.
//! 도메인 로직은 `octoview-core`에 있고 이 crate는 IO만 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use octoview_core::config::DashboardConfig;
//! use octoview_network::module::DashboardModule;
//!
//! let module = DashboardModule::start(config)?;
//! let status = module.status();   // watch::Receiver<Option<NormalizedStatus>>
//! let catalog = module.catalog(); // watch::Receiver<FileCatalog>
//! ```

pub mod auth;
pub mod http_client;
pub mod module;
pub mod poller;
pub mod push_socket;
pub mod stream;
