//! Posts repository backed by a hosted PostgREST-style table.
//!
//! Requests go to `<base>/rest/v1/<table>` with the project key sent both as
//! `apikey` and as a bearer token. Rows are filtered with `id=eq.<id>` and the
//! full list is ordered by `created_at.desc`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::repos::{PostsRepo, RepoError};
use crate::config::BackendSettings;
use crate::domain::entities::Post;

use super::error::InfraError;

#[derive(Clone, Debug)]
pub struct RestPostsRepo {
    client: Client,
    table_url: Url,
    api_key: String,
}

impl RestPostsRepo {
    pub fn new(base_url: &Url, api_key: impl Into<String>, table: &str) -> Result<Self, InfraError> {
        let table_url = base_url
            .join("/rest/v1/")
            .and_then(|rest| rest.join(table))
            .map_err(|err| InfraError::configuration(format!("invalid posts table url: {err}")))?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::http(err.to_string()))?;

        Ok(Self {
            client,
            table_url,
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Option<Self>, InfraError> {
        match (&settings.url, &settings.api_key) {
            (Some(url), Some(key)) => Self::new(url, key.clone(), &settings.posts_table).map(Some),
            _ => Ok(None),
        }
    }

    pub fn user_agent() -> &'static str {
        concat!("carewell/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, query: &[(&str, &str)]) -> Url {
        let mut url = self.table_url.clone();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, RepoError> {
        let response = builder.send().await.map_err(RepoError::from_persistence)?;
        let bytes = Self::checked(response)
            .await?
            .bytes()
            .await
            .map_err(RepoError::from_persistence)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| RepoError::Persistence(format!("failed to parse body: {err}")))
    }

    async fn checked(response: Response) -> Result<Response, RepoError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RepoError::Remote {
            status: status.as_u16(),
            body,
        })
    }

    fn single(rows: Vec<Post>) -> Result<Post, RepoError> {
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostsRepo for RestPostsRepo {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        let url = self.url(&[("select", "*"), ("order", "created_at.desc")]);
        let posts: Vec<Post> = self.send(self.request(Method::GET, url)).await?;
        debug!(
            target = "infra::remote::list_posts",
            count = posts.len(),
            "fetched posts table"
        );
        Ok(posts)
    }

    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        let builder = self
            .request(Method::POST, self.url(&[]))
            .header("Prefer", "return=representation")
            .json(&post);
        Self::single(self.send(builder).await?)
    }

    async fn update_post(&self, post: Post) -> Result<Post, RepoError> {
        let filter = format!("eq.{}", post.id);
        let builder = self
            .request(Method::PATCH, self.url(&[("id", filter.as_str())]))
            .header("Prefer", "return=representation")
            .json(&post);
        Self::single(self.send(builder).await?)
    }

    async fn delete_post(&self, id: &str) -> Result<(), RepoError> {
        let filter = format!("eq.{id}");
        let builder = self
            .request(Method::DELETE, self.url(&[("id", filter.as_str())]))
            .header("Prefer", "return=representation");
        let removed: Vec<Post> = self.send(builder).await?;
        if removed.is_empty() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
