//! Remotely sent media.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use log::{debug, warn};
use shared::error::{Error, Result};

use crate::handler::RTCStatsReport;
use crate::media_stream::MediaStreamTrack;
use crate::rtp_parameters::{RTCRtpParameters, RtpCodecKind};
use crate::transport::AppData;
use crate::transport::recv_transport::RecvTransportInner;
use crate::util::lock;

/// Notifications queued on a consumer, drained with [`Consumer::poll_event`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConsumerEvent {
    /// The owning transport was closed.
    TransportClose,
}

/// One remote producer received over a [`RecvTransport`](crate::transport::RecvTransport).
#[derive(Clone)]
pub struct Consumer {
    inner: Arc<ConsumerInner>,
}

struct ConsumerInner {
    id: String,
    producer_id: String,
    kind: RtpCodecKind,
    track: MediaStreamTrack,
    rtp_parameters: RTCRtpParameters,
    paused: AtomicBool,
    closed: AtomicBool,
    app_data: AppData,
    events: Mutex<VecDeque<ConsumerEvent>>,
    transport: Weak<RecvTransportInner>,
}

impl Consumer {
    pub(crate) fn new(
        id: String,
        producer_id: String,
        kind: RtpCodecKind,
        track: MediaStreamTrack,
        rtp_parameters: RTCRtpParameters,
        app_data: AppData,
        transport: Weak<RecvTransportInner>,
    ) -> Self {
        let paused = !track.enabled();
        Consumer {
            inner: Arc::new(ConsumerInner {
                id,
                producer_id,
                kind,
                track,
                rtp_parameters,
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

    pub fn producer_id(&self) -> &str {
        &self.inner.producer_id
    }

    pub fn kind(&self) -> RtpCodecKind {
        self.inner.kind
    }

    pub fn track(&self) -> &MediaStreamTrack {
        &self.inner.track
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

    pub fn app_data(&self) -> &AppData {
        &self.inner.app_data
    }

    pub fn poll_event(&self) -> Option<ConsumerEvent> {
        lock(&self.inner.events).pop_front()
    }

    pub fn pause(&self) {
        if self.is_closed() {
            warn!("consumer {} pause() on closed consumer", self.id());
            return;
        }
        self.inner.paused.store(true, Ordering::SeqCst);
        self.inner.track.set_enabled(false);
    }

    pub fn resume(&self) {
        if self.is_closed() {
            warn!("consumer {} resume() on closed consumer", self.id());
            return;
        }
        self.inner.paused.store(false, Ordering::SeqCst);
        self.inner.track.set_enabled(true);
    }

    /// Closes the consumer, stops the native receiver and ends its track.
    /// Later calls do nothing.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("consumer {} closing", self.id());

        if let Some(transport) = self.inner.transport.upgrade() {
            transport.remove_consumer(&self.inner.id);
            if !transport.core.is_closed() {
                if let Err(err) = transport.core.handler.stop_receiving(&self.inner.id).await {
                    warn!("consumer {} failed to stop receiving: {}", self.id(), err);
                }
            }
        }
        self.inner.track.stop();
    }

    pub(crate) fn transport_closed(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("consumer {} transport closed", self.id());
        self.inner.track.stop();
        lock(&self.inner.events).push_back(ConsumerEvent::TransportClose);
    }

    pub async fn get_stats(&self) -> Result<RTCStatsReport> {
        if self.is_closed() {
            return Err(Error::ErrInvalidState);
        }
        match self.inner.transport.upgrade() {
            Some(transport) if !transport.core.is_closed() => {
                transport
                    .core
                    .handler
                    .get_receiver_stats(&self.inner.id)
                    .await
            }
            _ => Err(Error::ErrInvalidState),
        }
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("id", &self.inner.id)
            .field("producer_id", &self.inner.producer_id)
            .field("kind", &self.inner.kind)
            .field("paused", &self.is_paused())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn detached_consumer() -> Consumer {
        Consumer::new(
            "c1".to_owned(),
            "p1".to_owned(),
            RtpCodecKind::Audio,
            MediaStreamTrack::new("c1".to_owned(), RtpCodecKind::Audio, "remote".to_owned()),
            RTCRtpParameters::default(),
            AppData::new(),
            Weak::new(),
        )
    }

    #[test]
    fn test_pause_resume() {
        let consumer = detached_consumer();

        consumer.pause();
        assert!(consumer.is_paused());
        assert!(!consumer.track().enabled());

        consumer.resume();
        consumer.resume();
        assert!(!consumer.is_paused());
        assert!(consumer.track().enabled());
    }

    #[tokio::test]
    async fn test_close_after_transport_close() {
        let consumer = detached_consumer();

        consumer.transport_closed();
        consumer.close().await;
        consumer.transport_closed();

        assert!(consumer.track().is_ended());
        assert_eq!(consumer.poll_event(), Some(ConsumerEvent::TransportClose));
        assert_eq!(consumer.poll_event(), None);
        assert_eq!(consumer.get_stats().await, Err(Error::ErrInvalidState));
    }
}
