use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::media_stream::track_state::MediaStreamTrackState;
use crate::rtp_parameters::RtpCodecKind;

pub type MediaStreamTrackId = String;

/// Handle to a native media track.
///
/// Clones refer to the same track: enabling, stopping or binding through one
/// clone is visible through all of them. A track can be bound to at most one
/// producer at a time.
#[derive(Clone)]
pub struct MediaStreamTrack {
    inner: Arc<TrackInner>,
}

struct TrackInner {
    id: MediaStreamTrackId,
    kind: RtpCodecKind,
    label: String,
    enabled: AtomicBool,
    bound: AtomicBool,
    ready_state: watch::Sender<MediaStreamTrackState>,
}

impl MediaStreamTrack {
    pub fn new(id: MediaStreamTrackId, kind: RtpCodecKind, label: String) -> Self {
        let (ready_state, _) = watch::channel(MediaStreamTrackState::Live);
        Self {
            inner: Arc::new(TrackInner {
                id,
                kind,
                label,
                enabled: AtomicBool::new(true),
                bound: AtomicBool::new(false),
                ready_state,
            }),
        }
    }

    pub fn id(&self) -> &MediaStreamTrackId {
        &self.inner.id
    }

    pub fn kind(&self) -> RtpCodecKind {
        self.inner.kind
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn ready_state(&self) -> MediaStreamTrackState {
        *self.inner.ready_state.borrow()
    }

    pub fn is_ended(&self) -> bool {
        self.ready_state() == MediaStreamTrackState::Ended
    }

    /// Ends the track. A producer sending it closes itself.
    pub fn stop(&self) {
        self.inner.ready_state.send_replace(MediaStreamTrackState::Ended);
    }

    /// Whether the track is currently bound to a producer.
    pub fn is_bound(&self) -> bool {
        self.inner.bound.load(Ordering::SeqCst)
    }

    /// Same underlying track, regardless of which clone is held.
    pub fn same_track(&self, other: &MediaStreamTrack) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn try_bind(&self) -> bool {
        self.inner
            .bound
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn unbind(&self) {
        self.inner.bound.store(false, Ordering::SeqCst);
    }

    /// Resolves once the track has ended, or when every handle to the
    /// track has been dropped.
    pub(crate) fn ended(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.inner.ready_state.subscribe();
        async move {
            let _ = rx
                .wait_for(|state| *state == MediaStreamTrackState::Ended)
                .await;
        }
    }
}

impl PartialEq for MediaStreamTrack {
    fn eq(&self, other: &Self) -> bool {
        self.same_track(other)
    }
}

impl fmt::Debug for MediaStreamTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStreamTrack")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("label", &self.inner.label)
            .field("enabled", &self.enabled())
            .field("ready_state", &self.ready_state())
            .finish()
    }
}
