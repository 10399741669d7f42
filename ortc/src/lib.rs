//! # ORTC - Object RTC session layer
//!
//! Client side media session management on top of a native WebRTC engine.
//! The crate negotiates RTP capabilities with a remote media server and
//! drives the lifecycle of the objects a session is made of:
//!
//! - [`Device`](device::Device): loads the remote capabilities once and
//!   computes what can be sent and received.
//! - [`SendTransport`](transport::SendTransport) and
//!   [`RecvTransport`](transport::RecvTransport): one native session each,
//!   connected lazily on first use.
//! - [`Producer`](producer::Producer): a local track sent to the server.
//! - [`Consumer`](consumer::Consumer): a remote track received from the server.
//!
//! The crate performs no network I/O and no signaling. Media is handled by a
//! native engine plugged in through [`HandlerFactory`](handler::HandlerFactory),
//! and every message that must reach the server is handed to a
//! [`TransportListener`](transport::TransportListener) the application
//! implements.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use ortc::device::Device;
//! use ortc::handler::HandlerFactory;
//! use ortc::media_stream::MediaStreamTrack;
//! use ortc::producer::ProducerOptions;
//! use ortc::rtp_parameters::{RTCRtpCapabilities, RtpCodecKind};
//! use ortc::transport::{
//!     SendTransportListener, TransportListener, TransportOptionsBuilder,
//!     TransportRemoteParameters,
//! };
//! use serde_json::{Value, json};
//! use ortc::shared::error::Result;
//!
//! struct Signaling;
//!
//! #[async_trait]
//! impl TransportListener for Signaling {
//!     async fn on_connect(&self, _parameters: Value) -> Result<()> {
//!         // forward {id, dtlsParameters} to the server
//!         Ok(())
//!     }
//! }
//!
//! #[async_trait]
//! impl SendTransportListener for Signaling {
//!     async fn on_produce(&self, _parameters: Value) -> Result<Value> {
//!         // forward {kind, rtpParameters, appData}, answer with the server id
//!         Ok(json!({ "id": "producer-1" }))
//!     }
//! }
//!
//! # async fn example(
//! #     factory: Arc<dyn HandlerFactory>,
//! #     router_capabilities: RTCRtpCapabilities,
//! #     remote_parameters: TransportRemoteParameters,
//! #     track: MediaStreamTrack,
//! # ) -> Result<()> {
//! let device = Device::new(factory);
//! device.load(&router_capabilities)?;
//!
//! if device.can_produce(RtpCodecKind::Audio)? {
//!     let transport = device.create_send_transport(
//!         Arc::new(Signaling),
//!         remote_parameters,
//!         TransportOptionsBuilder::new().build(),
//!     )?;
//!
//!     let producer = transport.produce(ProducerOptions::new(track)).await?;
//!     producer.pause();
//!
//!     transport.close().await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Operations that reach the native engine or the signaling listener are
//! `async`. Nothing times out internally: a listener that never answers keeps
//! the calling operation pending. Concurrent first uses of a transport share a
//! single connect handshake.

#![warn(rust_2018_idioms)]

pub use shared;

pub mod consumer;
pub mod device;
pub mod handler;
pub mod media_stream;
pub mod negotiator;
pub mod producer;
pub mod rtp_parameters;
pub mod transport;

pub(crate) mod constants;
pub(crate) mod util;
