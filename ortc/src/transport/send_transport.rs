use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde_json::Value;
use shared::error::{Error, Result};

use crate::handler::{Handler, RTCConnectionState, RTCStatsReport};
use crate::media_stream::MediaStreamTrack;
use crate::negotiator::{
    RTCExtendedRtpCapabilities, get_sending_encodings, get_sending_rtp_parameters,
    validate_simulcast,
};
use crate::producer::{Producer, ProducerOptions};
use crate::rtp_parameters::RtpCodecKind;
use crate::transport::{
    AppData, RTCIceParameters, RTCIceServer, SendTransportListener, TransportCore,
};
use crate::util::lock;

/// Transport that sends local tracks to the remote side, one [`Producer`]
/// per track.
#[derive(Clone)]
pub struct SendTransport {
    inner: Arc<SendTransportInner>,
}

pub(crate) struct SendTransportInner {
    pub(crate) core: TransportCore,
    listener: Arc<dyn SendTransportListener>,
    can_produce_by_kind: HashMap<RtpCodecKind, bool>,
    producers: Mutex<HashMap<String, Producer>>,
}

impl SendTransportInner {
    pub(crate) fn remove_producer(&self, id: &str) {
        lock(&self.producers).remove(id);
    }
}

impl SendTransport {
    pub(crate) fn new(
        id: String,
        listener: Arc<dyn SendTransportListener>,
        handler: Arc<dyn Handler>,
        extended: Arc<RTCExtendedRtpCapabilities>,
        can_produce_by_kind: HashMap<RtpCodecKind, bool>,
        app_data: AppData,
    ) -> Self {
        SendTransport {
            inner: Arc::new(SendTransportInner {
                core: TransportCore::new(id, app_data, handler, extended),
                listener,
                can_produce_by_kind,
                producers: Mutex::new(HashMap::new()),
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

    pub fn producer(&self, id: &str) -> Option<Producer> {
        lock(&self.inner.producers).get(id).cloned()
    }

    pub fn producers(&self) -> Vec<Producer> {
        lock(&self.inner.producers).values().cloned().collect()
    }

    /// Closes the transport and every producer on it. Producers are
    /// notified with `ProducerEvent::TransportClose`. Later calls do nothing.
    pub async fn close(&self) {
        if !self.inner.core.set_closed() {
            return;
        }

        debug!("send transport {} closing", self.id());

        let producers: Vec<Producer> = lock(&self.inner.producers)
            .drain()
            .map(|(_, producer)| producer)
            .collect();
        for producer in producers {
            producer.transport_closed();
        }

        self.inner.core.handler.close().await;
    }

    /// Starts sending a track.
    ///
    /// Checks run in this order: transport closed (`ErrInvalidState`),
    /// missing, ended or already bound track (`ErrInvalidTrack`), simulcast
    /// or spatial layers on a non video track (`ErrUnsupportedOperation`),
    /// malformed simulcast (`ErrInvalidSimulcast`). The first produce on the
    /// transport triggers the connect handshake.
    pub async fn produce(&self, options: ProducerOptions) -> Result<Producer> {
        self.inner.core.check_open()?;

        let track = options
            .track
            .clone()
            .ok_or_else(|| Error::ErrInvalidTrack("track cannot be null".to_owned()))?;
        if track.is_ended() {
            return Err(Error::ErrInvalidTrack("track ended".to_owned()));
        }

        let kind = track.kind();
        if kind == RtpCodecKind::Unspecified {
            return Err(Error::ErrInvalidTrack(format!("track {} has no kind", track.id())));
        }
        if kind != RtpCodecKind::Video && !options.simulcast.is_empty() {
            return Err(Error::ErrUnsupportedOperation(format!(
                "cannot set simulcast on {kind} track"
            )));
        }
        if kind != RtpCodecKind::Video && options.max_spatial_layer > 0 {
            return Err(Error::ErrUnsupportedOperation(format!(
                "cannot set max spatial layer on {kind} track"
            )));
        }
        validate_simulcast(&options.simulcast)?;

        if !self.inner.can_produce_by_kind.get(&kind).copied().unwrap_or(false) {
            return Err(Error::ErrUnsupported(format!("cannot produce {kind}")));
        }

        if !track.try_bind() {
            return Err(Error::ErrInvalidTrack(format!(
                "track {} is already handled by a producer",
                track.id()
            )));
        }

        let result = self.produce_bound(&track, options).await;
        if result.is_err() {
            track.unbind();
        }
        result
    }

    async fn produce_bound(
        &self,
        track: &MediaStreamTrack,
        options: ProducerOptions,
    ) -> Result<Producer> {
        let core = &self.inner.core;
        let listener = Arc::clone(&self.inner.listener);
        core.ensure_connected(|parameters| async move { listener.on_connect(parameters).await })
            .await?;

        let kind = track.kind();
        let mut rtp_parameters = get_sending_rtp_parameters(kind, &core.extended)?;
        rtp_parameters.encodings = get_sending_encodings(
            &rtp_parameters,
            &options.simulcast,
            core.handler.max_simulcast_layers(),
        );

        let rtp_parameters = core
            .handler
            .create_sending_state(track, rtp_parameters)
            .await?;

        let mut local_parameters = serde_json::Map::new();
        local_parameters.insert("kind".to_owned(), Value::String(kind.to_string()));
        local_parameters.insert(
            "rtpParameters".to_owned(),
            serde_json::to_value(&rtp_parameters)?,
        );
        local_parameters.insert(
            "appData".to_owned(),
            Value::Object(options.app_data.clone()),
        );

        let id = match self
            .inner
            .listener
            .on_produce(Value::Object(local_parameters))
            .await
        {
            Ok(remote) => match remote.get("id").and_then(Value::as_str) {
                Some(id) => id.to_owned(),
                None => {
                    self.rollback_sending(track).await;
                    return Err(Error::ErrSignalingRejected(
                        "produce response without id".to_owned(),
                    ));
                }
            },
            Err(err) => {
                self.rollback_sending(track).await;
                return Err(err.into_signaling_rejected());
            }
        };

        let producer = Producer::new(
            id.clone(),
            track.clone(),
            rtp_parameters,
            options.max_spatial_layer,
            options.app_data,
            Arc::downgrade(&self.inner),
        );

        let duplicate = {
            let mut producers = lock(&self.inner.producers);
            if core.is_closed() || producers.contains_key(&id) {
                true
            } else {
                producers.insert(id.clone(), producer.clone());
                false
            }
        };
        if duplicate {
            self.rollback_sending(track).await;
            return Err(if core.is_closed() {
                Error::ErrInvalidState
            } else {
                Error::ErrDuplicateId(id)
            });
        }

        producer.watch_track_ended();
        debug!("send transport {} produced {} ({kind})", self.id(), id);

        Ok(producer)
    }

    async fn rollback_sending(&self, track: &MediaStreamTrack) {
        if let Err(err) = self.inner.core.handler.stop_sending(track).await {
            warn!(
                "send transport {} failed to stop sending track {}: {}",
                self.id(),
                track.id(),
                err
            );
        }
    }
}
