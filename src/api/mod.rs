pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{Course, CourseId, CoursePayload, InstanceId, InstancePayload, InstanceView};

/// Remote catalog operations. The server is authoritative; nothing is cached.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, AppError>;
    async fn create_course(&self, payload: &CoursePayload) -> Result<Course, AppError>;
    async fn update_course(&self, id: CourseId, payload: &CoursePayload) -> Result<Course, AppError>;
    async fn delete_course(&self, id: CourseId) -> Result<(), AppError>;

    async fn list_instances(&self) -> Result<Vec<InstanceView>, AppError>;
    async fn list_instances_by_period(
        &self,
        year: i32,
        semester: i32,
    ) -> Result<Vec<InstanceView>, AppError>;
    async fn get_instance(
        &self,
        year: i32,
        semester: i32,
        id: InstanceId,
    ) -> Result<Option<InstanceView>, AppError>;
    async fn create_instance(&self, payload: &InstancePayload) -> Result<InstanceView, AppError>;
    async fn update_instance(
        &self,
        year: i32,
        semester: i32,
        id: InstanceId,
        payload: &InstancePayload,
    ) -> Result<InstanceView, AppError>;
    async fn delete_instance(&self, year: i32, semester: i32, id: InstanceId) -> Result<(), AppError>;
}

pub struct CatalogHttpClient {
    client: Client,
    config: ApiConfig,
}

impl CatalogHttpClient {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Option<Vec<u8>>, AppError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("catalog API responded {} for {}", status, response.url());

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = serde_json::from_slice::<dto::ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty());
            warn!("catalog API error {}: {:?}", status, message);

            return Err(match message {
                Some(message) => AppError::Api {
                    status: status.as_u16(),
                    message,
                },
                None => AppError::status(status.as_u16()),
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            Ok(None)
        } else {
            Ok(Some(body.to_vec()))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let body = self.send(self.client.get(self.config.url(path))).await?;
        decode(body)
    }

    async fn get_instances(&self, path: &str) -> Result<Vec<InstanceView>, AppError> {
        let raw: Vec<dto::InstanceResponse> = self.get(path).await?;
        Ok(raw.into_iter().map(InstanceView::from).collect())
    }
}

/// A missing body decodes as JSON `null`, which only `Option` targets accept.
fn decode<T: DeserializeOwned>(body: Option<Vec<u8>>) -> Result<T, AppError> {
    let bytes = body.as_deref().unwrap_or(b"null");
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::error!("Failed to parse catalog response: {}", e);
        AppError::Decode(e)
    })
}

#[async_trait]
impl CatalogApi for CatalogHttpClient {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.get("courses").await
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        self.get(&format!("courses/{}", id)).await
    }

    async fn create_course(&self, payload: &CoursePayload) -> Result<Course, AppError> {
        let request = self.client.post(self.config.url("courses")).json(payload);
        decode(self.send(request).await?)
    }

    async fn update_course(&self, id: CourseId, payload: &CoursePayload) -> Result<Course, AppError> {
        let request = self
            .client
            .put(self.config.url(&format!("courses/{}/update", id)))
            .json(payload);
        decode(self.send(request).await?)
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), AppError> {
        let request = self.client.delete(self.config.url(&format!("courses/{}", id)));
        self.send(request).await?;
        Ok(())
    }

    async fn list_instances(&self) -> Result<Vec<InstanceView>, AppError> {
        self.get_instances("instances").await
    }

    async fn list_instances_by_period(
        &self,
        year: i32,
        semester: i32,
    ) -> Result<Vec<InstanceView>, AppError> {
        self.get_instances(&format!("instances/{}/{}", year, semester)).await
    }

    async fn get_instance(
        &self,
        year: i32,
        semester: i32,
        id: InstanceId,
    ) -> Result<Option<InstanceView>, AppError> {
        let raw: Option<dto::InstanceResponse> = self
            .get(&format!("instances/{}/{}/{}", year, semester, id))
            .await?;
        Ok(raw.map(InstanceView::from))
    }

    async fn create_instance(&self, payload: &InstancePayload) -> Result<InstanceView, AppError> {
        let request = self.client.post(self.config.url("instances")).json(payload);
        let raw: dto::InstanceResponse = decode(self.send(request).await?)?;
        Ok(raw.into())
    }

    async fn update_instance(
        &self,
        year: i32,
        semester: i32,
        id: InstanceId,
        payload: &InstancePayload,
    ) -> Result<InstanceView, AppError> {
        // The update route is keyed by id alone.
        debug!("updating instance {} (listed under {}/{})", id, year, semester);
        let request = self
            .client
            .put(self.config.url(&format!("instances/{}/update", id)))
            .json(payload);
        let raw: dto::InstanceResponse = decode(self.send(request).await?)?;
        Ok(raw.into())
    }

    async fn delete_instance(&self, year: i32, semester: i32, id: InstanceId) -> Result<(), AppError> {
        let request = self
            .client
            .delete(self.config.url(&format!("instances/{}/{}/{}", year, semester, id)));
        self.send(request).await?;
        Ok(())
    }
}
