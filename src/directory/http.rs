//! REST client for the remote user directory, over `reqwest::blocking`.
//!
//! Every call runs on an effects worker thread, never on the UI thread.
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use super::{User, UserDirectory, UserForm, UserId, UserRecord};
use crate::error::{DirectoryError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// [`UserDirectory`] backed by a JSON collection resource at `endpoint`.
#[derive(Clone, Debug)]
pub struct HttpDirectory {
    client: Client,
    endpoint: String,
}

impl HttpDirectory {
    /// Build a client for `endpoint`. No request timeout is applied.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(DirectoryError::Client)?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn item_url(&self, id: &UserId) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    /// Send one request; any non-2xx status is a failure.
    fn execute(&self, method: Method, url: &str, body: Option<&UserForm>) -> Result<Response> {
        tracing::debug!(%method, url, "sending request");
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        if let Some(form) = body {
            request = request.json(form);
        }
        let response = request.send().map_err(|source| DirectoryError::Transport {
            method: method.clone(),
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        tracing::debug!(%method, url, status = status.as_u16(), "response received");
        if !status.is_success() {
            return Err(DirectoryError::status(method, url, status.as_u16()));
        }
        Ok(response)
    }

    fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&UserForm>,
    ) -> Result<T> {
        let response = self.execute(method.clone(), url, body)?;
        response.json::<T>().map_err(|source| DirectoryError::Decode {
            method,
            url: url.to_string(),
            source,
        })
    }
}

impl UserDirectory for HttpDirectory {
    fn list(&self) -> Result<Vec<User>> {
        self.execute_json(Method::GET, &self.endpoint, None)
    }

    fn create(&self, form: &UserForm) -> Result<UserRecord> {
        self.execute_json(Method::POST, &self.endpoint, Some(form))
    }

    fn update(&self, id: &UserId, form: &UserForm) -> Result<UserRecord> {
        self.execute_json(Method::PUT, &self.item_url(id), Some(form))
    }

    fn delete(&self, id: &UserId) -> Result<()> {
        self.execute(Method::DELETE, &self.item_url(id), None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_urls_ignore_trailing_slash() {
        let dir = HttpDirectory::with_client(Client::new(), "http://localhost:9/users/");
        assert_eq!(dir.endpoint(), "http://localhost:9/users");
        assert_eq!(dir.item_url(&UserId::Number(4)), "http://localhost:9/users/4");
    }
}
