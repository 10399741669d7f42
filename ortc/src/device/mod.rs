//! The endpoint a session starts from.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use log::debug;
use shared::error::{Error, Result};

use crate::handler::HandlerFactory;
use crate::negotiator::{
    RTCExtendedRtpCapabilities, can_send, get_extended_rtp_capabilities, get_recv_rtp_capabilities,
};
use crate::rtp_parameters::{RTCRtpCapabilities, RTCRtpDirection, RtpCodecKind};
use crate::transport::{
    RecvTransport, SendTransport, SendTransportListener, TransportListener, TransportOptions,
    TransportRemoteParameters,
};

struct DeviceState {
    extended: Arc<RTCExtendedRtpCapabilities>,
    recv_rtp_capabilities: RTCRtpCapabilities,
    can_produce_by_kind: HashMap<RtpCodecKind, bool>,
}

/// Negotiates with the remote side once and creates transports from the
/// result.
///
/// ## Example
///
/// ```ignore
/// let device = Device::new(Arc::new(MyHandlerFactory::default()));
/// device.load(&router_rtp_capabilities)?;
///
/// if device.can_produce(RtpCodecKind::Video)? {
///     let transport = device.create_send_transport(
///         listener,
///         remote_parameters,
///         TransportOptionsBuilder::new().build(),
///     )?;
/// }
/// ```
pub struct Device {
    handler_factory: Arc<dyn HandlerFactory>,
    state: OnceLock<DeviceState>,
}

impl Device {
    pub fn new(handler_factory: Arc<dyn HandlerFactory>) -> Self {
        Device {
            handler_factory,
            state: OnceLock::new(),
        }
    }

    pub fn handler_name(&self) -> String {
        self.handler_factory.name()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.get().is_some()
    }

    /// Negotiates the native capabilities against `remote_capabilities`.
    /// Succeeds at most once.
    pub fn load(&self, remote_capabilities: &RTCRtpCapabilities) -> Result<()> {
        if self.is_loaded() {
            return Err(Error::ErrAlreadyLoaded);
        }

        remote_capabilities.validate()?;
        let native_capabilities = self.handler_factory.get_native_rtp_capabilities()?;
        native_capabilities.validate()?;

        let extended = get_extended_rtp_capabilities(&native_capabilities, remote_capabilities)?;
        let recv_rtp_capabilities = get_recv_rtp_capabilities(&extended);
        let can_produce_by_kind = [RtpCodecKind::Audio, RtpCodecKind::Video]
            .into_iter()
            .map(|kind| (kind, can_send(kind, &extended)))
            .collect();

        debug!(
            "device loading with {} handler: {} codecs, {} header extensions",
            self.handler_name(),
            extended.codecs.len(),
            extended.header_extensions.len(),
        );

        let state = DeviceState {
            extended: Arc::new(extended),
            recv_rtp_capabilities,
            can_produce_by_kind,
        };
        self.state.set(state).map_err(|_| Error::ErrAlreadyLoaded)
    }

    fn loaded(&self) -> Result<&DeviceState> {
        self.state.get().ok_or(Error::ErrNotLoaded)
    }

    /// Capabilities this device can receive, to be sent to the remote side.
    pub fn rtp_capabilities(&self) -> Result<&RTCRtpCapabilities> {
        Ok(&self.loaded()?.recv_rtp_capabilities)
    }

    pub fn extended_rtp_capabilities(&self) -> Result<Arc<RTCExtendedRtpCapabilities>> {
        Ok(Arc::clone(&self.loaded()?.extended))
    }

    pub fn can_produce(&self, kind: RtpCodecKind) -> Result<bool> {
        let state = self.loaded()?;
        match kind {
            RtpCodecKind::Audio | RtpCodecKind::Video => {
                Ok(state.can_produce_by_kind.get(&kind).copied().unwrap_or(false))
            }
            RtpCodecKind::Unspecified => Err(Error::ErrInvalidKind(kind.to_string())),
        }
    }

    pub fn create_send_transport(
        &self,
        listener: Arc<dyn SendTransportListener>,
        remote_parameters: TransportRemoteParameters,
        options: TransportOptions,
    ) -> Result<SendTransport> {
        let state = self.loaded()?;
        let handler = self.handler_factory.create_handler(
            RTCRtpDirection::Sendonly,
            &remote_parameters,
            &options,
        )?;

        debug!("device created send transport {}", remote_parameters.id);

        Ok(SendTransport::new(
            remote_parameters.id,
            listener,
            handler,
            Arc::clone(&state.extended),
            state.can_produce_by_kind.clone(),
            options.app_data,
        ))
    }

    pub fn create_recv_transport(
        &self,
        listener: Arc<dyn TransportListener>,
        remote_parameters: TransportRemoteParameters,
        options: TransportOptions,
    ) -> Result<RecvTransport> {
        let state = self.loaded()?;
        let handler = self.handler_factory.create_handler(
            RTCRtpDirection::Recvonly,
            &remote_parameters,
            &options,
        )?;

        debug!("device created recv transport {}", remote_parameters.id);

        Ok(RecvTransport::new(
            remote_parameters.id,
            listener,
            handler,
            Arc::clone(&state.extended),
            options.app_data,
        ))
    }
}
