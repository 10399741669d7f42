//! Locally sent media.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use log::{debug, trace, warn};
use shared::error::{Error, Result};
use tokio::runtime::Handle;

use crate::handler::RTCStatsReport;
use crate::media_stream::MediaStreamTrack;
use crate::negotiator::SimulcastLayer;
use crate::rtp_parameters::{RTCRtpParameters, RtpCodecKind};
use crate::transport::AppData;
use crate::transport::send_transport::SendTransportInner;
use crate::util::lock;

/// Arguments of `SendTransport::produce`.
#[derive(Default, Debug, Clone)]
pub struct ProducerOptions {
    pub track: Option<MediaStreamTrack>,
    /// Simulcast layers, lowest quality first. Zero or one entry means a
    /// single plain encoding.
    pub simulcast: Vec<SimulcastLayer>,
    /// Highest spatial layer to send. Video only, 0 leaves it unconstrained.
    pub max_spatial_layer: u8,
    pub app_data: AppData,
}

impl ProducerOptions {
    pub fn new(track: MediaStreamTrack) -> Self {
        ProducerOptions {
            track: Some(track),
            ..Default::default()
        }
    }
}

/// Notifications queued on a producer, drained with [`Producer::poll_event`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProducerEvent {
    /// The owning transport was closed.
    TransportClose,
    /// The sent track ended and the producer closed itself.
    TrackEnded,
}

/// One local track sent over a [`SendTransport`](crate::transport::SendTransport).
#[derive(Clone)]
pub struct Producer {
    inner: Arc<ProducerInner>,
}

struct ProducerInner {
    id: String,
    kind: RtpCodecKind,
    track: Mutex<MediaStreamTrack>,
    track_generation: AtomicU64,
    rtp_parameters: RTCRtpParameters,
    max_spatial_layer: AtomicU8,
    paused: AtomicBool,
    closed: AtomicBool,
    app_data: AppData,
    events: Mutex<VecDeque<ProducerEvent>>,
    transport: Weak<SendTransportInner>,
}

impl Producer {
    pub(crate) fn new(
        id: String,
        track: MediaStreamTrack,
        rtp_parameters: RTCRtpParameters,
        max_spatial_layer: u8,
        app_data: AppData,
        transport: Weak<SendTransportInner>,
    ) -> Self {
        let kind = track.kind();
        let paused = !track.enabled();
        Producer {
            inner: Arc::new(ProducerInner {
                id,
                kind,
                track: Mutex::new(track),
                track_generation: AtomicU64::new(0),
                rtp_parameters,
                max_spatial_layer: AtomicU8::new(max_spatial_layer),
                paused: AtomicBool::new(paused),
                closed: AtomicBool::new(false),
                app_data,
                events: Mutex::new(VecDeque::new()),
                transport,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Local identifier of the native sender, the negotiated MID.
    pub fn local_id(&self) -> Option<&str> {
        self.inner.rtp_parameters.mid.as_deref()
    }

    pub fn kind(&self) -> RtpCodecKind {
        self.inner.kind
    }

    pub fn track(&self) -> MediaStreamTrack {
        lock(&self.inner.track).clone()
    }

    pub fn rtp_parameters(&self) -> &RTCRtpParameters {
        &self.inner.rtp_parameters
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn max_spatial_layer(&self) -> u8 {
        self.inner.max_spatial_layer.load(Ordering::SeqCst)
    }

    pub fn app_data(&self) -> &AppData {
        &self.inner.app_data
    }

    pub fn poll_event(&self) -> Option<ProducerEvent> {
        lock(&self.inner.events).pop_front()
    }

    /// Stops sending media by disabling the track.
    pub fn pause(&self) {
        if self.is_closed() {
            warn!("producer {} pause() on closed producer", self.id());
            return;
        }
        self.inner.paused.store(true, Ordering::SeqCst);
        self.track().set_enabled(false);
    }

    pub fn resume(&self) {
        if self.is_closed() {
            warn!("producer {} resume() on closed producer", self.id());
            return;
        }
        self.inner.paused.store(false, Ordering::SeqCst);
        self.track().set_enabled(true);
    }

    /// Closes the producer, stops the native sender and deregisters it from
    /// its transport. Later calls do nothing.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("producer {} closing", self.id());
        self.release().await;
    }

    pub(crate) fn transport_closed(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("producer {} transport closed", self.id());
        self.track().unbind();
        lock(&self.inner.events).push_back(ProducerEvent::TransportClose);
    }

    async fn release(&self) {
        let track = self.track();
        if let Some(transport) = self.inner.transport.upgrade() {
            transport.remove_producer(&self.inner.id);
            if !transport.core.is_closed() {
                if let Err(err) = transport.core.handler.stop_sending(&track).await {
                    warn!("producer {} failed to stop sending: {}", self.id(), err);
                }
            }
        }
        track.unbind();
    }

    fn open_transport(&self) -> Result<Arc<SendTransportInner>> {
        if self.is_closed() {
            return Err(Error::ErrInvalidState);
        }
        match self.inner.transport.upgrade() {
            Some(transport) if !transport.core.is_closed() => Ok(transport),
            _ => Err(Error::ErrInvalidState),
        }
    }

    pub async fn get_stats(&self) -> Result<RTCStatsReport> {
        let transport = self.open_transport()?;
        transport.core.handler.get_sender_stats(&self.track()).await
    }

    /// Swaps the sent track. The new track must be live, of the same kind
    /// and not bound to any producer. The paused state carries over.
    pub async fn replace_track(&self, track: Option<MediaStreamTrack>) -> Result<()> {
        let transport = self.open_transport()?;

        let track =
            track.ok_or_else(|| Error::ErrInvalidTrack("track cannot be null".to_owned()))?;
        if track.is_ended() {
            return Err(Error::ErrInvalidTrack("track ended".to_owned()));
        }
        let old_track = self.track();
        if old_track.same_track(&track) {
            return Err(Error::ErrInvalidTrack(format!(
                "track {} is already the producer track",
                track.id()
            )));
        }
        if track.kind() != self.kind() {
            return Err(Error::ErrInvalidTrack(format!(
                "cannot replace {} track with {} track",
                self.kind(),
                track.kind()
            )));
        }
        if !track.try_bind() {
            return Err(Error::ErrInvalidTrack(format!(
                "track {} is already handled by a producer",
                track.id()
            )));
        }

        if let Err(err) = transport
            .core
            .handler
            .replace_sending(&old_track, &track)
            .await
        {
            track.unbind();
            return Err(err);
        }

        track.set_enabled(!self.is_paused());
        {
            let mut current = lock(&self.inner.track);
            *current = track.clone();
            self.inner.track_generation.fetch_add(1, Ordering::SeqCst);
        }
        old_track.unbind();

        debug!(
            "producer {} replaced track {} with {}",
            self.id(),
            old_track.id(),
            track.id()
        );
        self.watch_track_ended();

        Ok(())
    }

    pub async fn set_max_spatial_layer(&self, spatial_layer: u8) -> Result<()> {
        let transport = self.open_transport()?;
        if self.kind() != RtpCodecKind::Video {
            return Err(Error::ErrUnsupportedOperation(format!(
                "cannot set max spatial layer on {} producer",
                self.kind()
            )));
        }
        if spatial_layer == self.max_spatial_layer() {
            return Ok(());
        }

        transport
            .core
            .handler
            .set_max_spatial_layer(&self.track(), spatial_layer)
            .await?;
        self.inner
            .max_spatial_layer
            .store(spatial_layer, Ordering::SeqCst);

        Ok(())
    }

    /// Closes the producer once its current track ends. Needs a running
    /// tokio runtime; without one the track is not watched.
    pub(crate) fn watch_track_ended(&self) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("producer {} has no runtime to watch its track", self.id());
                return;
            }
        };

        let generation = self.inner.track_generation.load(Ordering::SeqCst);
        let ended = self.track().ended();
        let weak = Arc::downgrade(&self.inner);

        runtime.spawn(async move {
            ended.await;

            let Some(inner) = weak.upgrade() else {
                return;
            };
            let producer = Producer { inner };
            if producer.inner.track_generation.load(Ordering::SeqCst) != generation
                || !producer.track().is_ended()
            {
                trace!("producer {} ignoring stale track watcher", producer.id());
                return;
            }
            if producer.inner.closed.swap(true, Ordering::SeqCst) {
                return;
            }

            debug!("producer {} track ended", producer.id());
            lock(&producer.inner.events).push_back(ProducerEvent::TrackEnded);
            producer.release().await;
        });
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("paused", &self.is_paused())
            .field("closed", &self.is_closed())
            .field("max_spatial_layer", &self.max_spatial_layer())
            .finish()
    }
}
