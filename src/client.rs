//! HTTP client for the Remote Tree Service.

use futures::StreamExt;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, Result};
use crate::model::{Folder, Node};
use crate::progress::ProgressFn;

/// Operations the navigator needs from the service holding the tree.
///
/// [`ExplorerClient`] is the HTTP implementation; tests substitute an
/// in-memory tree.
pub trait RemoteTree {
    fn get_root(&self) -> impl Future<Output = Result<Folder>> + Send;

    fn get_folder(&self, id: &str) -> impl Future<Output = Result<Folder>> + Send;

    fn create_folder(&self, name: &str, parent_id: &str)
        -> impl Future<Output = Result<Node>> + Send;

    fn rename(&self, id: &str, name: &str) -> impl Future<Output = Result<Node>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Sends one file as a single multipart part, reporting bytes sent.
    fn upload_file(
        &self,
        path: &Path,
        parent_id: &str,
        progress: ProgressFn,
    ) -> impl Future<Output = Result<Node>> + Send;

    /// Streams file `id` into `dest_dir` and returns the written path.
    ///
    /// `file_name` overrides the name announced by the service.
    fn download(
        &self,
        id: &str,
        dest_dir: &Path,
        file_name: Option<&str>,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderBody<'a> {
    name: &'a str,
    parent_id: &'a str,
}

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

#[derive(Clone)]
pub struct ExplorerClient {
    client: Client,
    base: String,
}

impl ExplorerClient {
    pub fn new(config: &ExplorerConfig) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Some(std::time::Duration::from_secs(90)))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base: config.files_base(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base, route)
    }

    fn item_url(&self, route: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base, route, urlencoding::encode(id))
    }

    /// Direct link to a file's bytes, suitable for handing to a browser.
    pub fn download_url(&self, id: &str) -> String {
        self.item_url("download", id)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ExplorerError::from_response(status.as_u16(), &body);
        warn!("request failed: {err}");
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("response body length: {} bytes", text.len());

        serde_json::from_str(&text).map_err(|e| {
            warn!("unparseable response: {e}");
            ExplorerError::ApiError {
                status,
                message: format!("JSON parse error: {e}"),
            }
        })
    }

    async fn fetch_folder(&self, url: String) -> Result<Folder> {
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        let folder: Folder = Self::read_json(response).await?;
        debug!("folder '{}' has {} children", folder.name, folder.children.len());
        Ok(folder)
    }
}

impl RemoteTree for ExplorerClient {
    async fn get_root(&self) -> Result<Folder> {
        self.fetch_folder(self.url("root")).await
    }

    async fn get_folder(&self, id: &str) -> Result<Folder> {
        self.fetch_folder(self.item_url("folder", id)).await
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<Node> {
        let url = self.url("folder");
        debug!("POST {url} name={name} parent={parent_id}");
        let response = self
            .client
            .post(&url)
            .json(&CreateFolderBody { name, parent_id })
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn rename(&self, id: &str, name: &str) -> Result<Node> {
        let url = self.item_url("rename", id);
        debug!("PATCH {url} name={name}");
        let response = self
            .client
            .patch(&url)
            .json(&RenameBody { name })
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.item_url("delete", id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upload_file(
        &self,
        path: &Path,
        parent_id: &str,
        progress: ProgressFn,
    ) -> Result<Node> {
        if !path.is_file() {
            return Err(ExplorerError::FileNotFound(path.display().to_string()));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ExplorerError::FileNotFound(path.display().to_string()))?
            .to_string();

        let file = tokio::fs::File::open(path).await?;
        let total = file.metadata().await?.len();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        debug!("uploading {file_name} ({total} bytes, {mime}) into {parent_id}");

        progress(0, total);
        let mut sent = 0u64;
        let stream = tokio_util::io::ReaderStream::new(file).inspect(move |chunk| {
            if let Ok(bytes) = chunk {
                sent += bytes.len() as u64;
                progress(sent, total);
            }
        });
        let body = reqwest::Body::wrap_stream(stream);

        let part = multipart::Part::stream_with_length(body, total)
            .file_name(file_name)
            .mime_str(mime.as_ref())?;
        let form = multipart::Form::new()
            .text("parentId", parent_id.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn download(
        &self,
        id: &str,
        dest_dir: &Path,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let url = self.download_url(id);
        debug!("GET {url}");
        let response = Self::check(self.client.get(&url).send().await?).await?;

        let announced = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let name = file_name
            .map(str::to_string)
            .or(announced)
            .unwrap_or_else(|| id.to_string());
        let local_path = dest_dir.join(safe_file_name(&name, id));

        tokio::fs::create_dir_all(dest_dir).await?;
        let mut file = tokio::fs::File::create(&local_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let data = chunk?;
            file.write_all(&data).await?;
        }
        file.flush().await?;

        Ok(local_path)
    }
}

/// Extracts the file name from a `Content-Disposition` header value.
///
/// Prefers the RFC 5987 `filename*` form over plain `filename`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.trim().rsplit("''").next().unwrap_or("");
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    if !decoded.is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" => {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    plain = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}

/// Keeps only the final path component so a name cannot escape the target
/// directory.
fn safe_file_name(name: &str, fallback: &str) -> String {
    let normalized = name.replace('\\', "/");
    match Path::new(&normalized).file_name().and_then(|n| n.to_str()) {
        Some(n) if n != ".." && !n.is_empty() => n.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ExplorerClient {
        ExplorerClient::new(&ExplorerConfig::new("http://files.local:5000/").unwrap())
    }

    #[test]
    fn test_urls() {
        let c = client();
        assert_eq!(c.base_url(), "http://files.local:5000/api/files");
        assert_eq!(c.url("root"), "http://files.local:5000/api/files/root");
        assert_eq!(
            c.item_url("folder", "65f0c2"),
            "http://files.local:5000/api/files/folder/65f0c2"
        );
        assert_eq!(
            c.download_url("a/b c"),
            "http://files.local:5000/api/files/download/a%2Fb%20c"
        );
    }

    #[test]
    fn test_create_folder_body_uses_camel_case() {
        let body = serde_json::to_value(CreateFolderBody {
            name: "Docs",
            parent_id: "r1",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"name": "Docs", "parentId": "r1"}));
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="report.pdf""#).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            filename_from_disposition(
                r#"attachment; filename="fallback.txt"; filename*=UTF-8''na%C3%AFve.txt"#
            )
            .as_deref(),
            Some("naïve.txt")
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("../../etc/passwd", "id"), "passwd");
        assert_eq!(safe_file_name("dir\\evil.exe", "id"), "evil.exe");
        assert_eq!(safe_file_name("..", "id"), "id");
        assert_eq!(safe_file_name("notes.txt", "id"), "notes.txt");
    }

    #[tokio::test]
    async fn test_upload_missing_file_fails_before_request() {
        let c = client();
        let noop: ProgressFn = std::sync::Arc::new(|_, _| {});
        let result = c
            .upload_file(Path::new("/nonexistent/file.txt"), "r1", noop)
            .await;
        assert!(matches!(result, Err(ExplorerError::FileNotFound(_))));
    }
}
