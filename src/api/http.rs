use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::AppResult;

use super::Gateway;

/// [`Gateway`] over HTTP. Any 2xx status counts as success; an empty body
/// reads as `null`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/{resource}/{id}", self.base_url),
            None => format!("{}/{resource}", self.base_url),
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list(&self, resource: &str) -> AppResult<Value> {
        let res = self.http.get(self.url(resource, None)).send().await?;
        read_body(res).await
    }

    async fn get(&self, resource: &str, id: i64) -> AppResult<Value> {
        let res = self.http.get(self.url(resource, Some(id))).send().await?;
        read_body(res).await
    }

    async fn post(&self, resource: &str, body: Value) -> AppResult<Value> {
        let res = self
            .http
            .post(self.url(resource, None))
            .json(&body)
            .send()
            .await?;
        read_body(res).await
    }

    async fn delete(&self, resource: &str, id: i64) -> AppResult<()> {
        self.http
            .delete(self.url(resource, Some(id)))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

async fn read_body(res: Response) -> AppResult<Value> {
    let status = res.status();
    let bytes = res.error_for_status()?.bytes().await?;
    tracing::debug!(%status, len = bytes.len(), "response received");
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_resource_and_id() {
        let gateway = HttpGateway::new("http://localhost:3333/");
        assert_eq!(gateway.base_url(), "http://localhost:3333");
        assert_eq!(gateway.url("Cliente", None), "http://localhost:3333/Cliente");
        assert_eq!(
            gateway.url("Pedido", Some(7)),
            "http://localhost:3333/Pedido/7"
        );
    }
}
