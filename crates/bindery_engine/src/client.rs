use std::time::Duration;

use bindery_logging::{bindery_debug, bindery_warn};
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    BookDir, ConvertResult, DeletePaths, DerivedFile, FailureKind, MergeResult, RawFile,
    ServiceConfig, ServiceError, UploadFile,
};

const API_PREFIX: &str = "api/epub2md/";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_preview_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_preview_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Remote storage and conversion service.
#[async_trait::async_trait]
pub trait ConversionService: Send + Sync {
    async fn config(&self) -> Result<ServiceConfig, ServiceError>;
    async fn list_raw(&self) -> Result<Vec<RawFile>, ServiceError>;
    async fn list_books(&self) -> Result<Vec<BookDir>, ServiceError>;
    async fn list_derived(&self, book: &str) -> Result<Vec<DerivedFile>, ServiceError>;
    async fn read_derived(&self, book: &str, path: &str) -> Result<String, ServiceError>;
    async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<RawFile>, ServiceError>;
    /// Results may be partial and in any order; callers match them by name.
    async fn convert(&self, names: &[String]) -> Result<Vec<ConvertResult>, ServiceError>;
    async fn merge(&self, book: &str, paths: &[String]) -> Result<MergeResult, ServiceError>;
    async fn delete_book(&self, book: &str) -> Result<(), ServiceError>;
    async fn delete_derived(&self, book: &str, target: &DeletePaths) -> Result<(), ServiceError>;
    async fn rename(&self, book: &str, path: &str, new_name: &str) -> Result<(), ServiceError>;
}

#[derive(Deserialize)]
struct FilesEnvelope<T> {
    #[serde(default = "Vec::new")]
    files: Vec<T>,
}

#[derive(Deserialize)]
struct BooksEnvelope {
    #[serde(default)]
    books: Vec<BookDir>,
}

#[derive(Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Vec<ConvertResult>,
}

#[derive(Serialize)]
struct ConvertRequest<'a> {
    files: &'a [String],
}

#[derive(Serialize)]
struct BookRequest<'a> {
    book: &'a str,
}

#[derive(Serialize)]
struct PathsRequest<'a> {
    book: &'a str,
    paths: &'a [String],
}

#[derive(Serialize)]
struct PathRequest<'a> {
    book: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    book: &'a str,
    path: &'a str,
    new_name: &'a str,
}

/// `ConversionService` over HTTP+JSON.
#[derive(Debug, Clone)]
pub struct HttpService {
    settings: ServiceSettings,
    base: Url,
    client: reqwest::Client,
}

impl HttpService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, name: &str, query: &[(&str, &str)]) -> Result<Url, ServiceError> {
        let mut url = self
            .base
            .join(&format!("{API_PREFIX}{name}"))
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        bindery_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(&checked_body(response).await?)
    }

    async fn post_json<B: Serialize>(&self, name: &str, body: &B) -> Result<Bytes, ServiceError> {
        let url = self.endpoint(name, &[])?;
        let payload = serde_json::to_vec(body)
            .map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))?;
        bindery_debug!("POST {} ({} bytes)", url, payload.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        checked_body(response).await
    }
}

#[async_trait::async_trait]
impl ConversionService for HttpService {
    async fn config(&self) -> Result<ServiceConfig, ServiceError> {
        self.get_json(self.endpoint("config", &[])?).await
    }

    async fn list_raw(&self) -> Result<Vec<RawFile>, ServiceError> {
        let envelope: FilesEnvelope<RawFile> = self.get_json(self.endpoint("raw", &[])?).await?;
        Ok(envelope.files)
    }

    async fn list_books(&self) -> Result<Vec<BookDir>, ServiceError> {
        let envelope: BooksEnvelope = self.get_json(self.endpoint("books", &[])?).await?;
        Ok(envelope.books)
    }

    async fn list_derived(&self, book: &str) -> Result<Vec<DerivedFile>, ServiceError> {
        let url = self.endpoint("md", &[("book", book)])?;
        let envelope: FilesEnvelope<DerivedFile> = self.get_json(url).await?;
        Ok(envelope.files)
    }

    async fn read_derived(&self, book: &str, path: &str) -> Result<String, ServiceError> {
        let url = self.endpoint("read", &[("book", book), ("path", path)])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Err(status_error(status, &body));
        }

        let max_bytes = self.settings.max_preview_bytes;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(ServiceError::new(
                FailureKind::TooLarge { max_bytes },
                "preview too large",
            ));
        }
        let mut text = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if text.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge { max_bytes },
                    "preview too large",
                ));
            }
            text.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&text).into_owned())
    }

    async fn upload(&self, files: Vec<UploadFile>) -> Result<Vec<RawFile>, ServiceError> {
        let url = self.endpoint("upload", &[])?;
        let form = files.into_iter().fold(Form::new(), |form, file| {
            form.part("files", Part::bytes(file.bytes).file_name(file.name))
        });
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let envelope: FilesEnvelope<RawFile> = decode(&checked_body(response).await?)?;
        Ok(envelope.files)
    }

    async fn convert(&self, names: &[String]) -> Result<Vec<ConvertResult>, ServiceError> {
        let body = self
            .post_json("convert", &ConvertRequest { files: names })
            .await?;
        let envelope: ResultsEnvelope = decode(&body)?;
        Ok(envelope.results)
    }

    async fn merge(&self, book: &str, paths: &[String]) -> Result<MergeResult, ServiceError> {
        let body = self
            .post_json("merge", &PathsRequest { book, paths })
            .await?;
        decode(&body)
    }

    async fn delete_book(&self, book: &str) -> Result<(), ServiceError> {
        self.post_json("delete-book", &BookRequest { book }).await?;
        Ok(())
    }

    async fn delete_derived(&self, book: &str, target: &DeletePaths) -> Result<(), ServiceError> {
        match target {
            DeletePaths::Single(path) => {
                self.post_json("delete-md", &PathRequest { book, path })
                    .await?
            }
            DeletePaths::Many(paths) => {
                self.post_json("delete-md", &PathsRequest { book, paths })
                    .await?
            }
        };
        Ok(())
    }

    async fn rename(&self, book: &str, path: &str, new_name: &str) -> Result<(), ServiceError> {
        self.post_json(
            "rename-md",
            &RenameRequest {
                book,
                path,
                new_name,
            },
        )
        .await?;
        Ok(())
    }
}

/// Reads the body, turning non-success statuses into `HttpStatus` errors.
async fn checked_body(response: reqwest::Response) -> Result<Bytes, ServiceError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status, &body))
    }
}

/// `"<code> <body>"`, or the canonical status line when the body is empty.
fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ServiceError {
    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = if text.is_empty() {
        status.to_string()
    } else {
        format!("{} {text}", status.as_u16())
    };
    bindery_warn!("request failed: {}", message);
    ServiceError::new(FailureKind::HttpStatus(status.as_u16()), message)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|err| ServiceError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
