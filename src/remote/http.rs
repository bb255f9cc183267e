use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::RemoteConfig,
    op::RemoteOp,
    remote::{RemoteError, RemoteResult, TaskRemote},
    task::{DraftRecord, TaskRecord},
};

/// [`TaskRemote`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpTaskRemote {
    client: Client,
    base_url: String,
}

impl HttpTaskRemote {
    pub fn new(config: &RemoteConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, op: &RemoteOp) -> String {
        format!("{}{}", self.base_url, op.path())
    }

    async fn send<B>(&self, op: &RemoteOp, body: Option<&B>) -> RemoteResult<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut req = self.client.request(op.method(), self.url(op));
        if let Some(body) = body {
            // `json` also sets `Content-Type: application/json`.
            req = req.json(body);
        }

        debug!(%op, "dispatching remote call");
        let resp = req.send().await.map_err(|source| RemoteError::Transport {
            op: op.clone(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                op: op.clone(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(op: &RemoteOp, resp: Response) -> RemoteResult<T> {
        let bytes = resp.bytes().await.map_err(|source| RemoteError::Transport {
            op: op.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| RemoteError::Decode {
            op: op.clone(),
            source,
        })
    }
}

#[async_trait]
impl TaskRemote for HttpTaskRemote {
    async fn list_all(&self) -> RemoteResult<Vec<TaskRecord>> {
        let op = RemoteOp::List;
        let resp = self.send::<()>(&op, None).await?;
        Self::decode(&op, resp).await
    }

    async fn create(&self, draft: &DraftRecord) -> RemoteResult<TaskRecord> {
        let op = RemoteOp::Create;
        let resp = self.send(&op, Some(&draft.to_new_task())).await?;
        Self::decode(&op, resp).await
    }

    async fn update(&self, id: &str, record: &TaskRecord) -> RemoteResult<()> {
        let op = RemoteOp::Update { id: id.to_string() };
        self.send(&op, Some(record)).await?;
        Ok(())
    }

    async fn patch(&self, id: &str, record: &TaskRecord) -> RemoteResult<()> {
        let op = RemoteOp::Toggle { id: id.to_string() };
        self.send(&op, Some(record)).await?;
        Ok(())
    }

    async fn remove(&self, id: &str) -> RemoteResult<()> {
        let op = RemoteOp::Delete { id: id.to_string() };
        self.send::<()>(&op, None).await?;
        Ok(())
    }
}
