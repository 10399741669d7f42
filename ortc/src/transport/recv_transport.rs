use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde_json::Value;
use shared::error::{Error, Result};

use crate::consumer::Consumer;
use crate::handler::{Handler, RTCConnectionState, RTCStatsReport};
use crate::negotiator::{RTCExtendedRtpCapabilities, can_receive_kind, get_receiving_rtp_parameters};
use crate::rtp_parameters::{RTCRtpParameters, RtpCodecKind};
use crate::transport::{AppData, RTCIceParameters, RTCIceServer, TransportCore, TransportListener};
use crate::util::lock;

/// Transport that receives remote producers, one [`Consumer`] per producer.
#[derive(Clone)]
pub struct RecvTransport {
    inner: Arc<RecvTransportInner>,
}

pub(crate) struct RecvTransportInner {
    pub(crate) core: TransportCore,
    listener: Arc<dyn TransportListener>,
    consumers: Mutex<HashMap<String, Consumer>>,
    /// Ids of consumes still in flight. Always locked after `consumers`.
    pending: Mutex<HashSet<String>>,
}

impl RecvTransportInner {
    pub(crate) fn remove_consumer(&self, id: &str) {
        lock(&self.consumers).remove(id);
    }

    fn reserve(&self, id: &str) -> Result<PendingConsumer<'_>> {
        let consumers = lock(&self.consumers);
        let mut pending = lock(&self.pending);
        if consumers.contains_key(id) || !pending.insert(id.to_owned()) {
            return Err(Error::ErrDuplicateId(id.to_owned()));
        }

        Ok(PendingConsumer {
            inner: self,
            id: id.to_owned(),
        })
    }
}

/// Holds a consumer id for the duration of one `consume` call, so no other
/// call can create or tear down native state under the same id.
struct PendingConsumer<'a> {
    inner: &'a RecvTransportInner,
    id: String,
}

impl Drop for PendingConsumer<'_> {
    fn drop(&mut self) {
        lock(&self.inner.pending).remove(&self.id);
    }
}

/// Fields of a consume request, parsed from the signaling document.
struct ConsumerRemoteParameters {
    id: String,
    producer_id: String,
    kind: RtpCodecKind,
    rtp_parameters: RTCRtpParameters,
}

fn required_str<'a>(parameters: &'a Value, key: &str) -> Result<&'a str> {
    parameters
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::ErrInvalidParameters(format!("missing {key}")))
}

impl ConsumerRemoteParameters {
    fn parse(parameters: &Value) -> Result<Self> {
        if !parameters.is_object() {
            return Err(Error::ErrInvalidParameters(
                "consumer parameters must be an object".to_owned(),
            ));
        }

        let id = required_str(parameters, "id")?.to_owned();
        let producer_id = required_str(parameters, "producerId")?.to_owned();

        let kind = RtpCodecKind::from(required_str(parameters, "kind")?);
        if kind == RtpCodecKind::Unspecified {
            return Err(Error::ErrInvalidParameters("invalid kind".to_owned()));
        }

        let rtp_parameters: RTCRtpParameters = serde_json::from_value(
            parameters
                .get("rtpParameters")
                .cloned()
                .ok_or_else(|| Error::ErrInvalidParameters("missing rtpParameters".to_owned()))?,
        )?;
        rtp_parameters.validate()?;

        Ok(ConsumerRemoteParameters {
            id,
            producer_id,
            kind,
            rtp_parameters,
        })
    }
}

impl RecvTransport {
    pub(crate) fn new(
        id: String,
        listener: Arc<dyn TransportListener>,
        handler: Arc<dyn Handler>,
        extended: Arc<RTCExtendedRtpCapabilities>,
        app_data: AppData,
    ) -> Self {
        RecvTransport {
            inner: Arc::new(RecvTransportInner {
                core: TransportCore::new(id, app_data, handler, extended),
                listener,
                consumers: Mutex::new(HashMap::new()),
                pending: Mutex::new(HashSet::new()),
            }),
        }
    }

    pub fn id(&self) -> &str {
        self.inner.core.id()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.core.is_closed()
    }

    pub fn app_data(&self) -> &AppData {
        self.inner.core.app_data()
    }

    pub fn connection_state(&self) -> RTCConnectionState {
        self.inner.core.connection_state()
    }

    pub async fn get_stats(&self) -> Result<RTCStatsReport> {
        self.inner.core.get_stats().await
    }

    pub async fn restart_ice(&self, ice_parameters: RTCIceParameters) -> Result<()> {
        self.inner.core.restart_ice(ice_parameters).await
    }

    pub async fn update_ice_servers(&self, ice_servers: Vec<RTCIceServer>) -> Result<()> {
        self.inner.core.update_ice_servers(ice_servers).await
    }

    pub fn consumer(&self, id: &str) -> Option<Consumer> {
        lock(&self.inner.consumers).get(id).cloned()
    }

    pub fn consumers(&self) -> Vec<Consumer> {
        lock(&self.inner.consumers).values().cloned().collect()
    }

    /// Closes the transport and every consumer on it. Consumers are
    /// notified with `ConsumerEvent::TransportClose`. Later calls do nothing.
    pub async fn close(&self) {
        if !self.inner.core.set_closed() {
            return;
        }

        debug!("recv transport {} closing", self.id());

        let consumers: Vec<Consumer> = lock(&self.inner.consumers)
            .drain()
            .map(|(_, consumer)| consumer)
            .collect();
        for consumer in consumers {
            consumer.transport_closed();
        }

        self.inner.core.handler.close().await;
    }

    /// Starts receiving a remote producer described by `parameters`
    /// (`{id, producerId, kind, rtpParameters}`).
    ///
    /// Fails with `ErrInvalidState` once closed, `ErrInvalidParameters` for
    /// a malformed document, `ErrUnsupported` when no offered codec of the
    /// document's kind can be received and `ErrDuplicateId` when a consumer
    /// with the same id exists or is being created. The first consume on the
    /// transport triggers the connect handshake.
    pub async fn consume(&self, parameters: &Value, app_data: AppData) -> Result<Consumer> {
        let core = &self.inner.core;
        core.check_open()?;

        let remote = ConsumerRemoteParameters::parse(parameters)?;

        if !can_receive_kind(remote.kind, &remote.rtp_parameters, &core.extended) {
            return Err(Error::ErrUnsupported(format!(
                "cannot consume {} producer {}",
                remote.kind, remote.producer_id
            )));
        }

        let _reservation = self.inner.reserve(&remote.id)?;

        let listener = Arc::clone(&self.inner.listener);
        core.ensure_connected(|parameters| async move { listener.on_connect(parameters).await })
            .await?;

        let rtp_parameters =
            get_receiving_rtp_parameters(remote.kind, &core.extended, &remote.rtp_parameters)?;

        let track = core
            .handler
            .create_receiving_state(&remote.id, remote.kind, &rtp_parameters)
            .await?;

        let consumer = Consumer::new(
            remote.id.clone(),
            remote.producer_id,
            remote.kind,
            track,
            rtp_parameters,
            app_data,
            Arc::downgrade(&self.inner),
        );

        let rejected = {
            let mut consumers = lock(&self.inner.consumers);
            if core.is_closed() {
                Some(Error::ErrInvalidState)
            } else {
                consumers.insert(remote.id.clone(), consumer.clone());
                None
            }
        };
        if let Some(err) = rejected {
            if let Err(stop_err) = core.handler.stop_receiving(&remote.id).await {
                warn!(
                    "recv transport {} failed to stop receiving {}: {}",
                    self.id(),
                    remote.id,
                    stop_err
                );
            }
            return Err(err);
        }

        debug!(
            "recv transport {} consuming {} ({})",
            self.id(),
            remote.id,
            remote.kind
        );

        Ok(consumer)
    }
}
