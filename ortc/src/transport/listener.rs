use async_trait::async_trait;
use serde_json::Value;
use shared::error::Result;

/// Signaling collaborator of a transport.
///
/// `on_connect` receives `{id, dtlsParameters}` and must forward them to the
/// remote transport, resolving once the remote side has acknowledged. It is
/// invoked at most once per transport. Returning an error fails the
/// operation that triggered the connect.
#[async_trait]
pub trait TransportListener: Send + Sync {
    async fn on_connect(&self, parameters: Value) -> Result<()>;
}

/// Signaling collaborator of a send transport.
///
/// `on_produce` receives `{kind, rtpParameters, appData}` for each new
/// producer and resolves with the remote answer, which must carry the
/// producer `id`.
#[async_trait]
pub trait SendTransportListener: TransportListener {
    async fn on_produce(&self, parameters: Value) -> Result<Value>;
}
