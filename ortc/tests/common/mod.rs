#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use ortc::handler::bridge;
use ortc::handler::{
    Handler, HandlerFactory, RTCConnectionState, RTCStatsReport, default_native_rtp_capabilities,
};
use ortc::media_stream::MediaStreamTrack;
use ortc::rtp_parameters::{RTCRtpCapabilities, RTCRtpDirection, RTCRtpParameters, RtpCodecKind};
use ortc::shared::error::{Error, Result};
use ortc::transport::{
    RTCDtlsFingerprint, RTCDtlsParameters, RTCDtlsRole, RTCIceParameters, RTCIceServer,
    SendTransportListener, TransportListener, TransportOptions, TransportRemoteParameters,
};

pub fn init_log() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Capabilities a media server router typically advertises.
pub fn router_rtp_capabilities() -> RTCRtpCapabilities {
    serde_json::from_value(json!({
        "codecs": [
            {
                "kind": "audio", "mimeType": "audio/opus", "preferredPayloadType": 100,
                "clockRate": 48000, "channels": 2,
                "parameters": {"useinbandfec": 1},
                "rtcpFeedback": [{"type": "transport-cc"}]
            },
            {
                "kind": "video", "mimeType": "video/VP8", "preferredPayloadType": 101,
                "clockRate": 90000,
                "rtcpFeedback": [
                    {"type": "nack"}, {"type": "nack", "parameter": "pli"},
                    {"type": "ccm", "parameter": "fir"}, {"type": "goog-remb"}
                ]
            },
            {
                "kind": "video", "mimeType": "video/rtx", "preferredPayloadType": 102,
                "clockRate": 90000, "parameters": {"apt": 101}
            },
            {
                "kind": "video", "mimeType": "video/H264", "preferredPayloadType": 103,
                "clockRate": 90000,
                "parameters": {"packetization-mode": 1, "profile-level-id": "42e01f"},
                "rtcpFeedback": [{"type": "nack"}]
            },
            {
                "kind": "video", "mimeType": "video/rtx", "preferredPayloadType": 104,
                "clockRate": 90000, "parameters": {"apt": 103}
            }
        ],
        "headerExtensions": [
            {"kind": "audio", "uri": "urn:ietf:params:rtp-hdrext:sdes:mid", "preferredId": 1},
            {"kind": "video", "uri": "urn:ietf:params:rtp-hdrext:sdes:mid", "preferredId": 1},
            {"kind": "audio", "uri": "urn:ietf:params:rtp-hdrext:ssrc-audio-level", "preferredId": 10},
            {
                "kind": "video",
                "uri": "http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time",
                "preferredId": 4
            }
        ]
    }))
    .unwrap()
}

pub fn remote_transport_parameters(id: &str) -> TransportRemoteParameters {
    serde_json::from_value(json!({
        "id": id,
        "iceParameters": {"usernameFragment": "ufrag", "password": "pwd", "iceLite": true},
        "iceCandidates": [{
            "foundation": "udpcandidate", "priority": 1076302079, "ip": "10.0.0.1",
            "protocol": "udp", "port": 40533, "type": "host"
        }],
        "dtlsParameters": {
            "role": "auto",
            "fingerprints": [{"algorithm": "sha-256", "value": "AB:CD:EF"}]
        }
    }))
    .unwrap()
}

/// Consume request for a VP8 producer as the server would send it.
pub fn vp8_consumer_parameters(id: &str, producer_id: &str) -> Value {
    json!({
        "id": id,
        "producerId": producer_id,
        "kind": "video",
        "rtpParameters": {
            "mid": "1",
            "codecs": [
                {
                    "mimeType": "video/VP8", "payloadType": 101, "clockRate": 90000,
                    "rtcpFeedback": [{"type": "nack"}, {"type": "nack", "parameter": "pli"}]
                },
                {
                    "mimeType": "video/rtx", "payloadType": 102, "clockRate": 90000,
                    "parameters": {"apt": 101}
                }
            ],
            "headerExtensions": [
                {"uri": "urn:ietf:params:rtp-hdrext:sdes:mid", "id": 1},
                {"uri": "http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time", "id": 4}
            ],
            "encodings": [{"ssrc": 11111111, "rtx": {"ssrc": 22222222}}],
            "rtcp": {"cname": "remotecname", "reducedSize": true}
        }
    })
}

pub fn opus_consumer_parameters(id: &str, producer_id: &str) -> Value {
    json!({
        "id": id,
        "producerId": producer_id,
        "kind": "audio",
        "rtpParameters": {
            "codecs": [{
                "mimeType": "audio/opus", "payloadType": 100, "clockRate": 48000,
                "channels": 2, "parameters": {"useinbandfec": 1}
            }],
            "encodings": [{"ssrc": 33333333}],
            "rtcp": {"cname": "remotecname"}
        }
    })
}

pub fn audio_track(id: &str) -> MediaStreamTrack {
    MediaStreamTrack::new(id.to_owned(), RtpCodecKind::Audio, "microphone".to_owned())
}

pub fn video_track(id: &str) -> MediaStreamTrack {
    MediaStreamTrack::new(id.to_owned(), RtpCodecKind::Video, "camera".to_owned())
}

/// Native session double. Completes every request through the one-shot
/// bridge from a spawned task, the way a callback driven engine would.
#[derive(Default)]
pub struct FakeHandler {
    pub direction: RTCRtpDirection,
    pub max_layers: usize,
    pub fail_create_sending: AtomicBool,
    pub sending: Mutex<HashMap<String, RTCRtpParameters>>,
    pub receiving: Mutex<HashMap<String, MediaStreamTrack>>,
    pub spatial_layers: Mutex<HashMap<String, u8>>,
    pub calls: Mutex<Vec<String>>,
    pub closed: AtomicBool,
    next_mid: AtomicUsize,
}

impl FakeHandler {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sending_count(&self) -> usize {
        self.sending.lock().unwrap().len()
    }

    pub fn receiving_count(&self) -> usize {
        self.receiving.lock().unwrap().len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Handler for FakeHandler {
    async fn local_dtls_parameters(&self) -> Result<RTCDtlsParameters> {
        self.record("local_dtls_parameters".to_owned());
        Ok(RTCDtlsParameters {
            role: RTCDtlsRole::Client,
            fingerprints: vec![RTCDtlsFingerprint {
                algorithm: "sha-256".to_owned(),
                value: "00:11:22".to_owned(),
            }],
        })
    }

    async fn create_sending_state(
        &self,
        track: &MediaStreamTrack,
        mut parameters: RTCRtpParameters,
    ) -> Result<RTCRtpParameters> {
        self.record(format!("create_sending_state {}", track.id()));
        if self.fail_create_sending.load(Ordering::SeqCst) {
            return Err(Error::ErrNative("sender rejected".to_owned()));
        }

        parameters.mid = Some(self.next_mid.fetch_add(1, Ordering::SeqCst).to_string());
        self.sending
            .lock()
            .unwrap()
            .insert(track.id().clone(), parameters.clone());

        let (resolver, pending) = bridge::pending();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            resolver.resolve(parameters);
        });
        pending.await
    }

    async fn stop_sending(&self, track: &MediaStreamTrack) -> Result<()> {
        self.record(format!("stop_sending {}", track.id()));
        self.sending.lock().unwrap().remove(track.id());
        Ok(())
    }

    async fn replace_sending(
        &self,
        old_track: &MediaStreamTrack,
        new_track: &MediaStreamTrack,
    ) -> Result<()> {
        self.record(format!("replace_sending {} {}", old_track.id(), new_track.id()));
        let mut sending = self.sending.lock().unwrap();
        let parameters = sending
            .remove(old_track.id())
            .ok_or_else(|| Error::ErrNative("unknown sender".to_owned()))?;
        sending.insert(new_track.id().clone(), parameters);
        Ok(())
    }

    async fn set_max_spatial_layer(&self, track: &MediaStreamTrack, layer: u8) -> Result<()> {
        self.record(format!("set_max_spatial_layer {} {layer}", track.id()));
        self.spatial_layers
            .lock()
            .unwrap()
            .insert(track.id().clone(), layer);
        Ok(())
    }

    async fn create_receiving_state(
        &self,
        id: &str,
        kind: RtpCodecKind,
        _parameters: &RTCRtpParameters,
    ) -> Result<MediaStreamTrack> {
        self.record(format!("create_receiving_state {id}"));
        let track = MediaStreamTrack::new(id.to_owned(), kind, format!("remote {kind}"));
        self.receiving
            .lock()
            .unwrap()
            .insert(id.to_owned(), track.clone());
        Ok(track)
    }

    async fn stop_receiving(&self, id: &str) -> Result<()> {
        self.record(format!("stop_receiving {id}"));
        self.receiving.lock().unwrap().remove(id);
        Ok(())
    }

    async fn get_sender_stats(&self, track: &MediaStreamTrack) -> Result<RTCStatsReport> {
        Ok(json!({"type": "outbound-rtp", "trackId": track.id()}))
    }

    async fn get_receiver_stats(&self, id: &str) -> Result<RTCStatsReport> {
        Ok(json!({"type": "inbound-rtp", "consumerId": id}))
    }

    async fn get_transport_stats(&self) -> Result<RTCStatsReport> {
        Ok(json!({"type": "transport"}))
    }

    async fn restart_ice(&self, ice_parameters: RTCIceParameters) -> Result<()> {
        self.record(format!("restart_ice {}", ice_parameters.username_fragment));
        Ok(())
    }

    async fn update_ice_servers(&self, ice_servers: Vec<RTCIceServer>) -> Result<()> {
        self.record(format!("update_ice_servers {}", ice_servers.len()));
        Ok(())
    }

    async fn close(&self) {
        self.record("close".to_owned());
        self.closed.store(true, Ordering::SeqCst);
    }

    fn connection_state(&self) -> RTCConnectionState {
        RTCConnectionState::New
    }

    fn max_simulcast_layers(&self) -> usize {
        self.max_layers
    }
}

/// Engine double handing out [`FakeHandler`]s and keeping them for
/// inspection.
pub struct FakeHandlerFactory {
    pub native_capabilities: RTCRtpCapabilities,
    pub max_layers: usize,
    pub handlers: Mutex<Vec<Arc<FakeHandler>>>,
}

impl Default for FakeHandlerFactory {
    fn default() -> Self {
        FakeHandlerFactory {
            native_capabilities: default_native_rtp_capabilities(),
            max_layers: 3,
            handlers: Mutex::new(vec![]),
        }
    }
}

impl FakeHandlerFactory {
    pub fn last_handler(&self) -> Arc<FakeHandler> {
        Arc::clone(self.handlers.lock().unwrap().last().unwrap())
    }
}

impl HandlerFactory for FakeHandlerFactory {
    fn name(&self) -> String {
        "FakeHandler".to_owned()
    }

    fn get_native_rtp_capabilities(&self) -> Result<RTCRtpCapabilities> {
        Ok(self.native_capabilities.clone())
    }

    fn create_handler(
        &self,
        direction: RTCRtpDirection,
        _remote_parameters: &TransportRemoteParameters,
        _options: &TransportOptions,
    ) -> Result<Arc<dyn Handler>> {
        let handler = Arc::new(FakeHandler {
            direction,
            max_layers: self.max_layers,
            ..Default::default()
        });
        self.handlers.lock().unwrap().push(Arc::clone(&handler));
        Ok(handler)
    }
}

/// Signaling double. Counts connects and answers produce requests with
/// queued responses, or sequential ids once the queue is empty.
#[derive(Default)]
pub struct FakeSignaling {
    pub connect_count: AtomicUsize,
    pub connect_parameters: Mutex<Vec<Value>>,
    pub connect_error: Mutex<Option<Error>>,
    pub produce_parameters: Mutex<Vec<Value>>,
    pub produce_responses: Mutex<VecDeque<Result<Value>>>,
    next_id: AtomicUsize,
}

impl FakeSignaling {
    pub fn connect_count(&self) -> usize {
        self.connect_count.load(Ordering::SeqCst)
    }

    pub fn push_produce_response(&self, response: Result<Value>) {
        self.produce_responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl TransportListener for FakeSignaling {
    async fn on_connect(&self, parameters: Value) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        self.connect_parameters.lock().unwrap().push(parameters);
        tokio::time::sleep(Duration::from_millis(20)).await;

        match self.connect_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SendTransportListener for FakeSignaling {
    async fn on_produce(&self, parameters: Value) -> Result<Value> {
        self.produce_parameters.lock().unwrap().push(parameters);
        tokio::task::yield_now().await;

        let queued = self.produce_responses.lock().unwrap().pop_front();
        match queued {
            Some(response) => response,
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                Ok(json!({ "id": format!("producer-{id}") }))
            }
        }
    }
}

/// Polls `condition` for up to a second.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
