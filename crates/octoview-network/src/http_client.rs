//! OctoPrint REST API 클라이언트.
//!
//! `PrinterFiles` 포트 구현. 모든 요청에 `X-Api-Key` 헤더를 붙인다.

use async_trait::async_trait;
use octoview_core::error::CoreError;
use octoview_core::models::files::RawFileList;
use octoview_core::ports::printer_api::PrinterFiles;
use std::time::Duration;
use tracing::debug;

/// REST 클라이언트 — `PrinterFiles` 포트 구현
pub struct OctoPrintHttpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OctoPrintHttpClient {
    /// 새 REST 클라이언트 생성
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// API 키 헤더가 포함된 요청 빌더 반환
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .header("X-Api-Key", &self.api_key)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(CoreError::Auth(format!("API 키 거부 ({status}): {text}"))),
            _ => Err(CoreError::Network(format!("API 에러 ({status}): {text}"))),
        }
    }
}

#[async_trait]
impl PrinterFiles for OctoPrintHttpClient {
    async fn list_files(&self) -> Result<RawFileList, CoreError> {
        let resp = self
            .request(reqwest::Method::GET, "/api/files")
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("파일 목록 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let list: RawFileList = resp
            .json()
            .await
            .map_err(|e| CoreError::Network(format!("파일 목록 파싱 실패: {e}")))?;

        debug!("파일 목록 수신: {}건", list.files.len());
        Ok(list)
    }

    async fn select_file(
        &self,
        location: &str,
        path: &str,
        print: bool,
    ) -> Result<(), CoreError> {
        debug!("파일 선택: {location}/{path}, print={print}");

        let api_path = format!("/api/files/{location}/{path}");
        let body = serde_json::json!({ "command": "select", "print": print });

        let resp = self
            .request(reqwest::Method::POST, &api_path)
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("파일 선택 요청 실패: {e}")))?;

        self.check_response(resp).await?;
        Ok(())
    }

    async fn upload_file(
        &self,
        location: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<(), CoreError> {
        debug!("파일 업로드: {location}/{file_name}, {}바이트", contents.len());

        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| CoreError::Internal(format!("멀티파트 구성 실패: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let api_path = format!("/api/files/{location}");
        let resp = self
            .request(reqwest::Method::POST, &api_path)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("파일 업로드 요청 실패: {e}")))?;

        self.check_response(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> OctoPrintHttpClient {
        OctoPrintHttpClient::new(url, "KEY", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trailing_slash_stripped() {
        let c = client("http://octopi.local/");
        assert_eq!(c.base_url, "http://octopi.local");
    }

    #[tokio::test]
    async fn list_files_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/files")
            .match_header("x-api-key", "KEY")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"files": [{"name": "benchy.gcode"}, {"name": "cube.gcode"}]}"#)
            .create_async()
            .await;

        let list = client(&server.url()).list_files().await.unwrap();
        assert_eq!(list.files.len(), 2);
        assert_eq!(list.files[0].name, "benchy.gcode");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn list_files_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/files")
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let err = client(&server.url()).list_files().await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
    }

    #[tokio::test]
    async fn select_file_posts_command() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/files/local/benchy.gcode")
            .match_body(mockito::Matcher::JsonString(
                r#"{"command": "select", "print": true}"#.to_string(),
            ))
            .with_status(204)
            .create_async()
            .await;

        client(&server.url())
            .select_file("local", "benchy.gcode", true)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_file_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/files/local")
            .with_status(201)
            .create_async()
            .await;

        client(&server.url())
            .upload_file("local", "new.gcode", b"G28\nG1 X10\n".to_vec())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/files/local")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = client(&server.url())
            .upload_file("local", "new.gcode", vec![1, 2, 3])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Network(_)));
    }
}
