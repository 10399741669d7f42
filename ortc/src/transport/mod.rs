//! Send and receive transports.
//!
//! A transport owns one native session, runs the connect handshake with the
//! signaling layer at most once, and keeps the registry of the producers or
//! consumers created on it.

pub mod listener;
pub mod options;
pub mod parameters;
pub mod recv_transport;
pub mod send_transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use serde_json::Value;
use shared::error::{Error, Result};
use tokio::sync::OnceCell;

pub use listener::{SendTransportListener, TransportListener};
pub use options::{AppData, RTCIceServer, RTCIceTransportPolicy, TransportOptions, TransportOptionsBuilder};
pub use parameters::{
    RTCDtlsFingerprint, RTCDtlsParameters, RTCDtlsRole, RTCIceCandidate, RTCIceParameters,
    TransportRemoteParameters,
};
pub use recv_transport::RecvTransport;
pub use send_transport::SendTransport;

use crate::handler::{Handler, RTCConnectionState, RTCStatsReport};
use crate::negotiator::RTCExtendedRtpCapabilities;

/// State shared by both transport directions.
pub(crate) struct TransportCore {
    id: String,
    closed: AtomicBool,
    app_data: AppData,
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) extended: Arc<RTCExtendedRtpCapabilities>,
    connected: OnceCell<()>,
}

impl TransportCore {
    pub(crate) fn new(
        id: String,
        app_data: AppData,
        handler: Arc<dyn Handler>,
        extended: Arc<RTCExtendedRtpCapabilities>,
    ) -> Self {
        TransportCore {
            id,
            closed: AtomicBool::new(false),
            app_data,
            handler,
            extended,
            connected: OnceCell::new(),
        }
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn app_data(&self) -> &AppData {
        &self.app_data
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Marks the transport closed. Returns false if it already was.
    pub(crate) fn set_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::ErrInvalidState)
        } else {
            Ok(())
        }
    }

    /// Runs the connect handshake unless it already succeeded. Concurrent
    /// callers wait for the handshake in flight instead of starting another.
    pub(crate) async fn ensure_connected<F, Fut>(&self, on_connect: F) -> Result<()>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.connected
            .get_or_try_init(|| async move {
                let dtls_parameters = self.handler.local_dtls_parameters().await?;

                let mut parameters = serde_json::Map::new();
                parameters.insert("id".to_owned(), Value::String(self.id.clone()));
                parameters.insert(
                    "dtlsParameters".to_owned(),
                    serde_json::to_value(dtls_parameters)?,
                );

                debug!("transport {} connecting", self.id);
                on_connect(Value::Object(parameters))
                    .await
                    .map_err(Error::into_signaling_rejected)?;
                debug!("transport {} connected", self.id);

                Ok::<(), Error>(())
            })
            .await?;

        Ok(())
    }

    pub(crate) fn connection_state(&self) -> RTCConnectionState {
        if self.is_closed() {
            RTCConnectionState::Closed
        } else {
            self.handler.connection_state()
        }
    }

    pub(crate) async fn get_stats(&self) -> Result<RTCStatsReport> {
        self.check_open()?;
        self.handler.get_transport_stats().await
    }

    pub(crate) async fn restart_ice(&self, ice_parameters: RTCIceParameters) -> Result<()> {
        self.check_open()?;
        debug!("transport {} restarting ice", self.id);
        self.handler.restart_ice(ice_parameters).await
    }

    pub(crate) async fn update_ice_servers(&self, ice_servers: Vec<RTCIceServer>) -> Result<()> {
        self.check_open()?;
        self.handler.update_ice_servers(ice_servers).await
    }
}
