//! Boundary with the native transport engine.
//!
//! A [`HandlerFactory`] describes the engine and creates one [`Handler`] per
//! transport. The handler owns the native session (ICE, DTLS, SRTP, RTP) and
//! performs the actual send and receive work; everything above it only deals
//! with parameters and object lifecycle.

pub mod bridge;
pub mod connection_state;
pub mod native_capabilities;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared::error::Result;

pub use connection_state::RTCConnectionState;
pub use native_capabilities::default_native_rtp_capabilities;

use crate::media_stream::MediaStreamTrack;
use crate::negotiator::DEFAULT_MAX_SIMULCAST_LAYERS;
use crate::rtp_parameters::{RTCRtpCapabilities, RTCRtpDirection, RTCRtpParameters, RtpCodecKind};
use crate::transport::{
    RTCDtlsParameters, RTCIceParameters, RTCIceServer, TransportOptions, TransportRemoteParameters,
};

/// Statistics document produced by the engine. Its shape is engine defined.
pub type RTCStatsReport = Value;

/// Describes a native engine and creates handlers for it.
pub trait HandlerFactory: Send + Sync {
    /// Name of the engine, for diagnostics.
    fn name(&self) -> String;

    /// Codecs and header extensions the engine supports, for both kinds.
    fn get_native_rtp_capabilities(&self) -> Result<RTCRtpCapabilities>;

    /// Creates the native session backing one transport. `direction` is
    /// `Sendonly` for send transports and `Recvonly` for receive transports.
    fn create_handler(
        &self,
        direction: RTCRtpDirection,
        remote_parameters: &TransportRemoteParameters,
        options: &TransportOptions,
    ) -> Result<Arc<dyn Handler>>;
}

/// Native session of one transport.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Local DTLS parameters, sent to the remote side on connect.
    async fn local_dtls_parameters(&self) -> Result<RTCDtlsParameters>;

    /// Starts sending `track` with the negotiated `parameters`. Returns the
    /// parameters the engine actually uses, which are authoritative.
    async fn create_sending_state(
        &self,
        track: &MediaStreamTrack,
        parameters: RTCRtpParameters,
    ) -> Result<RTCRtpParameters>;

    async fn stop_sending(&self, track: &MediaStreamTrack) -> Result<()>;

    /// Swaps the track fed into an existing sender.
    async fn replace_sending(
        &self,
        old_track: &MediaStreamTrack,
        new_track: &MediaStreamTrack,
    ) -> Result<()>;

    async fn set_max_spatial_layer(&self, track: &MediaStreamTrack, layer: u8) -> Result<()>;

    /// Starts receiving a remote producer and returns the resulting track.
    async fn create_receiving_state(
        &self,
        id: &str,
        kind: RtpCodecKind,
        parameters: &RTCRtpParameters,
    ) -> Result<MediaStreamTrack>;

    async fn stop_receiving(&self, id: &str) -> Result<()>;

    async fn get_sender_stats(&self, track: &MediaStreamTrack) -> Result<RTCStatsReport>;

    async fn get_receiver_stats(&self, id: &str) -> Result<RTCStatsReport>;

    async fn get_transport_stats(&self) -> Result<RTCStatsReport>;

    async fn restart_ice(&self, ice_parameters: RTCIceParameters) -> Result<()>;

    async fn update_ice_servers(&self, ice_servers: Vec<RTCIceServer>) -> Result<()>;

    /// Releases the native session.
    async fn close(&self);

    fn connection_state(&self) -> RTCConnectionState;

    /// Most simulcast layers the engine encodes; extra layers are dropped.
    fn max_simulcast_layers(&self) -> usize {
        DEFAULT_MAX_SIMULCAST_LAYERS
    }
}
