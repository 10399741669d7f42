//! Capability negotiation.
//!
//! Pure functions that intersect the local engine's native capabilities with
//! a remote advertisement and derive concrete send and receive parameters
//! from the result.

pub mod extended_capabilities;
pub mod simulcast;

use std::collections::HashSet;

use log::{debug, trace};
use shared::error::{Error, Result};
use shared::util::{generate_ssrc, math_rand_alpha};

pub use extended_capabilities::{
    RTCExtendedRtpCapabilities, RTCExtendedRtpCodec, RTCExtendedRtpHeaderExtension,
};
pub use simulcast::{
    DEFAULT_MAX_SIMULCAST_LAYERS, DEFAULT_SIMULCAST_BITRATES, SimulcastLayer, validate_simulcast,
};

use crate::rtp_parameters::rtp_codec::{is_rtx_mime_type, mime_type_eq, rtcp_feedback_intersection};
use crate::rtp_parameters::{
    MIME_TYPE_AV1, MIME_TYPE_H264, MIME_TYPE_HEVC, MIME_TYPE_VP9, PayloadType, RTCRtcpParameters,
    RTCRtpCapabilities, RTCRtpCodecCapability, RTCRtpCodecParameters, RTCRtpCodecParametersMap,
    RTCRtpCodecParametersValue, RTCRtpDirection, RTCRtpEncodingParameters,
    RTCRtpHeaderExtensionCapability, RTCRtpHeaderExtensionParameters, RTCRtpParameters,
    RTCRtpRtxParameters, RtpCodecKind, VALID_EXT_IDS,
};

const CNAME_LENGTH: usize = 8;

/// The fields codec matching looks at, borrowed from either a capability or
/// a parameter entry.
struct CodecView<'a> {
    mime_type: &'a str,
    clock_rate: u32,
    channels: Option<u8>,
    parameters: &'a RTCRtpCodecParametersMap,
}

impl<'a> From<&'a RTCRtpCodecCapability> for CodecView<'a> {
    fn from(c: &'a RTCRtpCodecCapability) -> Self {
        CodecView {
            mime_type: &c.mime_type,
            clock_rate: c.clock_rate,
            channels: c.channels,
            parameters: &c.parameters,
        }
    }
}

impl<'a> From<&'a RTCRtpCodecParameters> for CodecView<'a> {
    fn from(c: &'a RTCRtpCodecParameters) -> Self {
        CodecView {
            mime_type: &c.mime_type,
            clock_rate: c.clock_rate,
            channels: c.channels,
            parameters: &c.parameters,
        }
    }
}

impl<'a> From<&'a RTCExtendedRtpCodec> for CodecView<'a> {
    fn from(c: &'a RTCExtendedRtpCodec) -> Self {
        CodecView {
            mime_type: &c.mime_type,
            clock_rate: c.clock_rate,
            channels: c.channels,
            parameters: &c.parameters,
        }
    }
}

fn parameter_or(parameters: &RTCRtpCodecParametersMap, key: &str, default: u32) -> u32 {
    parameters
        .get(key)
        .and_then(RTCRtpCodecParametersValue::as_number)
        .unwrap_or(default)
}

/// Decides whether two codec entries describe the same codec. Some codecs
/// are only compatible when selected parameters are equal.
fn match_codecs(a: CodecView<'_>, b: CodecView<'_>) -> bool {
    if !mime_type_eq(a.mime_type, b.mime_type) || a.clock_rate != b.clock_rate {
        return false;
    }

    if RtpCodecKind::from_mime_type(a.mime_type) == RtpCodecKind::Audio
        && a.channels.unwrap_or(1) != b.channels.unwrap_or(1)
    {
        return false;
    }

    let strict_key = if mime_type_eq(a.mime_type, MIME_TYPE_H264)
        || mime_type_eq(a.mime_type, MIME_TYPE_HEVC)
    {
        Some("packetization-mode")
    } else if mime_type_eq(a.mime_type, MIME_TYPE_VP9) {
        Some("profile-id")
    } else if mime_type_eq(a.mime_type, MIME_TYPE_AV1) {
        Some("profile")
    } else {
        None
    };

    match strict_key {
        Some(key) => parameter_or(a.parameters, key, 0) == parameter_or(b.parameters, key, 0),
        None => true,
    }
}

fn find_rtx<'a>(
    codecs: &'a [RTCRtpCodecCapability],
    kind: RtpCodecKind,
    apt: PayloadType,
) -> Option<&'a RTCRtpCodecCapability> {
    codecs
        .iter()
        .find(|c| c.kind == kind && c.is_rtx() && c.apt() == Some(apt))
}

fn next_free_ext_id(used: &HashSet<u16>) -> Option<u16> {
    VALID_EXT_IDS.clone().find(|id| !used.contains(id))
}

/// Intersects the local native capabilities with the remote advertisement.
///
/// Remote codecs are walked in advertised order; each is paired with the
/// first matching local codec. RTX codecs are not matched directly but paired
/// with their media codec through `apt` on both sides. Header extensions are
/// matched by kind and URI.
pub fn get_extended_rtp_capabilities(
    local: &RTCRtpCapabilities,
    remote: &RTCRtpCapabilities,
) -> Result<RTCExtendedRtpCapabilities> {
    let mut extended = RTCExtendedRtpCapabilities::default();
    let mut assigned: HashSet<(RtpCodecKind, PayloadType)> = HashSet::new();

    for remote_codec in remote.codecs.iter().filter(|c| !c.is_rtx()) {
        let Some(remote_payload_type) = remote_codec.preferred_payload_type else {
            trace!("skipping remote codec {} without payload type", remote_codec.mime_type);
            continue;
        };
        if !assigned.insert((remote_codec.kind, remote_payload_type)) {
            trace!(
                "skipping remote codec {} reusing payload type {}",
                remote_codec.mime_type, remote_payload_type
            );
            continue;
        }

        let Some(local_codec) = local.codecs.iter().find(|local_codec| {
            local_codec.kind == remote_codec.kind
                && !local_codec.is_rtx()
                && match_codecs((*local_codec).into(), remote_codec.into())
        }) else {
            trace!("no local codec matches remote {}", remote_codec.mime_type);
            continue;
        };

        let mut parameters = local_codec.parameters.clone();
        parameters.extend(
            remote_codec
                .parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let local_rtx_payload_type = local_codec
            .preferred_payload_type
            .and_then(|pt| find_rtx(&local.codecs, local_codec.kind, pt))
            .and_then(|rtx| rtx.preferred_payload_type);
        let remote_rtx_payload_type = find_rtx(&remote.codecs, remote_codec.kind, remote_payload_type)
            .and_then(|rtx| rtx.preferred_payload_type);

        trace!(
            "matched {} remote pt {} local pt {:?}",
            remote_codec.mime_type, remote_payload_type, local_codec.preferred_payload_type
        );

        extended.codecs.push(RTCExtendedRtpCodec {
            kind: remote_codec.kind,
            mime_type: local_codec.mime_type.clone(),
            clock_rate: local_codec.clock_rate,
            channels: local_codec.channels,
            local_payload_type: local_codec.preferred_payload_type.unwrap_or(remote_payload_type),
            local_rtx_payload_type,
            remote_payload_type,
            remote_rtx_payload_type,
            parameters,
            rtcp_feedback: rtcp_feedback_intersection(
                &remote_codec.rtcp_feedback,
                &local_codec.rtcp_feedback,
            ),
        });
    }

    for kind in [RtpCodecKind::Audio, RtpCodecKind::Video] {
        let mut used_ids = HashSet::new();
        for remote_ext in remote.header_extensions.iter().filter(|e| e.kind == kind) {
            let Some(local_ext) = local
                .header_extensions
                .iter()
                .find(|e| e.kind == kind && e.uri == remote_ext.uri)
            else {
                continue;
            };

            let Some(id) = pick_ext_id(remote_ext, local_ext, &used_ids) else {
                debug!("no free header extension id left for {}", remote_ext.uri);
                continue;
            };
            used_ids.insert(id);

            extended.header_extensions.push(RTCExtendedRtpHeaderExtension {
                kind,
                uri: remote_ext.uri.clone(),
                id,
                encrypt: remote_ext.preferred_encrypt,
                direction: remote_ext.direction,
            });
        }
    }

    Ok(extended)
}

fn pick_ext_id(
    remote_ext: &RTCRtpHeaderExtensionCapability,
    local_ext: &RTCRtpHeaderExtensionCapability,
    used: &HashSet<u16>,
) -> Option<u16> {
    [remote_ext.preferred_id, local_ext.preferred_id]
        .into_iter()
        .flatten()
        .find(|id| VALID_EXT_IDS.contains(id) && !used.contains(id))
        .or_else(|| next_free_ext_id(used))
}

/// Capabilities this side can receive with, expressed in the remote's
/// payload types. This is what the signaling layer forwards to the remote
/// so it can build consumer parameters.
pub fn get_recv_rtp_capabilities(extended: &RTCExtendedRtpCapabilities) -> RTCRtpCapabilities {
    let mut caps = RTCRtpCapabilities::default();

    for codec in &extended.codecs {
        caps.codecs.push(RTCRtpCodecCapability {
            kind: codec.kind,
            mime_type: codec.mime_type.clone(),
            preferred_payload_type: Some(codec.remote_payload_type),
            clock_rate: codec.clock_rate,
            channels: codec.channels,
            parameters: codec.parameters.clone(),
            rtcp_feedback: codec.rtcp_feedback.clone(),
        });

        if let Some(rtx_payload_type) = codec.remote_rtx_payload_type {
            caps.codecs.push(RTCRtpCodecCapability {
                kind: codec.kind,
                mime_type: format!("{}/rtx", codec.kind),
                preferred_payload_type: Some(rtx_payload_type),
                clock_rate: codec.clock_rate,
                channels: None,
                parameters: [("apt".to_owned(), codec.remote_payload_type.into())]
                    .into_iter()
                    .collect(),
                rtcp_feedback: vec![],
            });
        }
    }

    for ext in extended
        .header_extensions
        .iter()
        .filter(|e| matches!(e.direction, RTCRtpDirection::Sendrecv | RTCRtpDirection::Recvonly))
    {
        caps.header_extensions.push(RTCRtpHeaderExtensionCapability {
            kind: ext.kind,
            uri: ext.uri.clone(),
            preferred_id: Some(ext.id),
            preferred_encrypt: ext.encrypt,
            direction: ext.direction,
        });
    }

    caps
}

/// Whether at least one codec of `kind` survived negotiation.
pub fn can_send(kind: RtpCodecKind, extended: &RTCExtendedRtpCapabilities) -> bool {
    extended.codecs_of(kind).next().is_some()
}

/// Base parameters for sending `kind`: the preferred negotiated codec and its
/// RTX, the header extensions usable for sending and a fresh cname. Encodings
/// are left empty; see [`get_sending_encodings`].
pub fn get_sending_rtp_parameters(
    kind: RtpCodecKind,
    extended: &RTCExtendedRtpCapabilities,
) -> Result<RTCRtpParameters> {
    let codec = extended
        .codecs_of(kind)
        .next()
        .ok_or_else(|| Error::ErrUnsupported(format!("cannot send {kind}")))?;

    let mut codecs = vec![RTCRtpCodecParameters {
        mime_type: codec.mime_type.clone(),
        payload_type: codec.remote_payload_type,
        clock_rate: codec.clock_rate,
        channels: codec.channels,
        parameters: codec.parameters.clone(),
        rtcp_feedback: codec.rtcp_feedback.clone(),
    }];

    if let Some(rtx_payload_type) = codec.rtx_payload_type() {
        codecs.push(RTCRtpCodecParameters {
            mime_type: format!("{kind}/rtx"),
            payload_type: rtx_payload_type,
            clock_rate: codec.clock_rate,
            channels: None,
            parameters: [("apt".to_owned(), codec.remote_payload_type.into())]
                .into_iter()
                .collect(),
            rtcp_feedback: vec![],
        });
    }

    let header_extensions = extended
        .header_extensions_of(kind)
        .filter(|e| matches!(e.direction, RTCRtpDirection::Sendrecv | RTCRtpDirection::Sendonly))
        .map(|e| RTCRtpHeaderExtensionParameters {
            uri: e.uri.clone(),
            id: e.id,
            encrypt: e.encrypt,
        })
        .collect();

    Ok(RTCRtpParameters {
        mid: None,
        codecs,
        header_extensions,
        encodings: vec![],
        rtcp: RTCRtcpParameters {
            cname: Some(math_rand_alpha(CNAME_LENGTH)),
            reduced_size: true,
        },
    })
}

/// One encoding per effective simulcast layer, each with a fresh SSRC and a
/// paired RTX SSRC when the parameters carry an RTX codec.
pub fn get_sending_encodings(
    parameters: &RTCRtpParameters,
    layers: &[SimulcastLayer],
    max_layers: usize,
) -> Vec<RTCRtpEncodingParameters> {
    let has_rtx = parameters.codecs.iter().any(|c| c.is_rtx());
    let mut used: HashSet<u32> = parameters
        .encodings
        .iter()
        .flat_map(|e| e.ssrc.into_iter().chain(e.rtx.map(|r| r.ssrc)))
        .collect();

    simulcast::effective_layers(layers, max_layers)
        .into_iter()
        .map(|layer| {
            let ssrc = generate_ssrc(&mut used);
            let rtx = has_rtx.then(|| RTCRtpRtxParameters {
                ssrc: generate_ssrc(&mut used),
            });
            RTCRtpEncodingParameters {
                ssrc: Some(ssrc),
                rtx,
                max_bitrate: layer.max_bitrate,
                scale_resolution_down_by: layer.scale_resolution_down_by,
                ..Default::default()
            }
        })
        .collect()
}

fn find_extended_codec<'a>(
    kind: RtpCodecKind,
    extended: &'a RTCExtendedRtpCapabilities,
    codec: &RTCRtpCodecParameters,
) -> Option<&'a RTCExtendedRtpCodec> {
    extended.codecs_of(kind).find(|e| {
        e.remote_payload_type == codec.payload_type && match_codecs(codec.into(), (*e).into())
    })
}

/// Intersects a remote producer's parameters with the extended capabilities.
/// Fails with `ErrUnsupported` when no media codec survives.
pub fn get_receiving_rtp_parameters(
    kind: RtpCodecKind,
    extended: &RTCExtendedRtpCapabilities,
    remote: &RTCRtpParameters,
) -> Result<RTCRtpParameters> {
    let mut codecs: Vec<RTCRtpCodecParameters> = Vec::new();
    let mut rtx_payload_types = HashSet::new();

    for codec in remote.codecs.iter().filter(|c| !c.is_rtx()) {
        if let Some(e) = find_extended_codec(kind, extended, codec) {
            codecs.push(codec.clone());
            if let Some(pt) = e.remote_rtx_payload_type {
                rtx_payload_types.insert((codec.payload_type, pt));
            }
        }
    }

    if codecs.is_empty() {
        return Err(Error::ErrUnsupported(format!(
            "no {kind} codec in the remote parameters is supported"
        )));
    }

    for codec in remote.codecs.iter().filter(|c| c.is_rtx()) {
        if let Some(apt) = codec.apt() {
            if rtx_payload_types.contains(&(apt, codec.payload_type)) {
                codecs.push(codec.clone());
            }
        }
    }

    let has_rtx = codecs.iter().any(|c| c.is_rtx());
    let encodings = remote
        .encodings
        .iter()
        .cloned()
        .map(|mut encoding| {
            if !has_rtx {
                encoding.rtx = None;
            }
            encoding
        })
        .collect();

    let header_extensions = remote
        .header_extensions
        .iter()
        .filter(|ext| {
            extended
                .header_extensions_of(kind)
                .any(|e| e.uri == ext.uri && e.id == ext.id)
        })
        .cloned()
        .collect();

    Ok(RTCRtpParameters {
        mid: remote.mid.clone(),
        codecs,
        header_extensions,
        encodings,
        rtcp: remote.rtcp.clone(),
    })
}

/// Whether a remote producer with these parameters can be consumed, i.e.
/// at least one of its media codecs is part of the extended capabilities.
pub fn can_receive(parameters: &RTCRtpParameters, extended: &RTCExtendedRtpCapabilities) -> bool {
    [RtpCodecKind::Audio, RtpCodecKind::Video]
        .into_iter()
        .any(|kind| can_receive_kind(kind, parameters, extended))
}

/// Like [`can_receive`], restricted to media codecs of `kind`.
pub fn can_receive_kind(
    kind: RtpCodecKind,
    parameters: &RTCRtpParameters,
    extended: &RTCExtendedRtpCapabilities,
) -> bool {
    parameters
        .codecs
        .iter()
        .filter(|c| !is_rtx_mime_type(&c.mime_type) && c.kind() == kind)
        .any(|codec| find_extended_codec(kind, extended, codec).is_some())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::handler::default_native_rtp_capabilities;
    use crate::rtp_parameters::rtp_header_extension::{
        ABS_SEND_TIME_URI, AUDIO_LEVEL_URI, SDES_MID_URI, TRANSPORT_CC_URI,
    };
    use crate::rtp_parameters::{MIME_TYPE_OPUS, MIME_TYPE_VP8, RTCPFeedback, parse_fmtp_line};

    fn codec(
        kind: RtpCodecKind,
        mime_type: &str,
        pt: PayloadType,
        clock_rate: u32,
        channels: Option<u8>,
        fmtp: &str,
    ) -> RTCRtpCodecCapability {
        RTCRtpCodecCapability {
            kind,
            mime_type: mime_type.to_owned(),
            preferred_payload_type: Some(pt),
            clock_rate,
            channels,
            parameters: parse_fmtp_line(fmtp),
            rtcp_feedback: vec![],
        }
    }

    fn ext(kind: RtpCodecKind, uri: &str, id: u16) -> RTCRtpHeaderExtensionCapability {
        RTCRtpHeaderExtensionCapability {
            kind,
            uri: uri.to_owned(),
            preferred_id: Some(id),
            preferred_encrypt: false,
            direction: RTCRtpDirection::Sendrecv,
        }
    }

    fn remote_capabilities() -> RTCRtpCapabilities {
        let mut vp8 = codec(RtpCodecKind::Video, "video/VP8", 101, 90000, None, "");
        vp8.rtcp_feedback = vec![
            RTCPFeedback::new("nack", ""),
            RTCPFeedback::new("nack", "pli"),
            RTCPFeedback::new("transport-cc", ""),
            RTCPFeedback::new("ccm", "tmmbr"),
        ];
        RTCRtpCapabilities {
            codecs: vec![
                codec(RtpCodecKind::Audio, "audio/opus", 100, 48000, Some(2), "useinbandfec=1"),
                vp8,
                codec(RtpCodecKind::Video, "video/rtx", 102, 90000, None, "apt=101"),
                codec(
                    RtpCodecKind::Video,
                    "video/H264",
                    103,
                    90000,
                    None,
                    "packetization-mode=1;profile-level-id=42e01f",
                ),
                codec(RtpCodecKind::Video, "video/rtx", 104, 90000, None, "apt=103"),
            ],
            header_extensions: vec![
                ext(RtpCodecKind::Audio, SDES_MID_URI, 1),
                ext(RtpCodecKind::Video, SDES_MID_URI, 1),
                ext(RtpCodecKind::Audio, AUDIO_LEVEL_URI, 10),
                ext(RtpCodecKind::Video, ABS_SEND_TIME_URI, 4),
                ext(RtpCodecKind::Video, "urn:example:unknown", 9),
            ],
        }
    }

    #[test]
    fn test_extended_capabilities_follow_remote_order() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;

        let names: Vec<_> = extended
            .codecs
            .iter()
            .map(|c| (c.mime_type.as_str(), c.remote_payload_type))
            .collect();
        assert_eq!(
            names,
            vec![("audio/opus", 100), ("video/VP8", 101), ("video/H264", 103)]
        );

        let vp8 = &extended.codecs[1];
        assert_eq!(vp8.remote_rtx_payload_type, Some(102));
        assert!(vp8.local_rtx_payload_type.is_some());
        assert_eq!(
            vp8.rtcp_feedback,
            vec![
                RTCPFeedback::new("nack", ""),
                RTCPFeedback::new("nack", "pli"),
                RTCPFeedback::new("transport-cc", ""),
            ]
        );

        let opus = &extended.codecs[0];
        assert_eq!(opus.local_payload_type, 111);
        assert_eq!(
            opus.parameters.get("useinbandfec"),
            Some(&RTCRtpCodecParametersValue::Number(1))
        );
        assert_eq!(
            opus.parameters.get("minptime"),
            Some(&RTCRtpCodecParametersValue::Number(10))
        );

        let exts: Vec<_> = extended
            .header_extensions
            .iter()
            .map(|e| (e.kind, e.uri.as_str(), e.id))
            .collect();
        assert_eq!(
            exts,
            vec![
                (RtpCodecKind::Audio, SDES_MID_URI, 1),
                (RtpCodecKind::Audio, AUDIO_LEVEL_URI, 10),
                (RtpCodecKind::Video, SDES_MID_URI, 1),
                (RtpCodecKind::Video, ABS_SEND_TIME_URI, 4),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_match_codecs() {
        let opus_stereo = codec(RtpCodecKind::Audio, MIME_TYPE_OPUS, 100, 48000, Some(2), "");
        let opus_mono = codec(RtpCodecKind::Audio, MIME_TYPE_OPUS, 100, 48000, Some(1), "");
        let opus_16k = codec(RtpCodecKind::Audio, MIME_TYPE_OPUS, 100, 16000, Some(2), "");
        let pcmu = codec(RtpCodecKind::Audio, "audio/PCMU", 0, 8000, None, "");
        let pcmu_one = codec(RtpCodecKind::Audio, "audio/pcmu", 0, 8000, Some(1), "");
        let vp8 = codec(RtpCodecKind::Video, MIME_TYPE_VP8, 96, 90000, None, "");
        let h264_pm1 = codec(RtpCodecKind::Video, MIME_TYPE_H264, 96, 90000, None, "packetization-mode=1");
        let h264_pm0 = codec(RtpCodecKind::Video, MIME_TYPE_H264, 96, 90000, None, "");
        let vp9_p0 = codec(RtpCodecKind::Video, MIME_TYPE_VP9, 98, 90000, None, "profile-id=0");
        let vp9_default = codec(RtpCodecKind::Video, MIME_TYPE_VP9, 98, 90000, None, "");
        let vp9_p2 = codec(RtpCodecKind::Video, MIME_TYPE_VP9, 98, 90000, None, "profile-id=2");

        let tests = vec![
            ("same opus", &opus_stereo, &opus_stereo, true),
            ("channel mismatch", &opus_stereo, &opus_mono, false),
            ("clock rate mismatch", &opus_stereo, &opus_16k, false),
            ("mime case and implicit mono", &pcmu, &pcmu_one, true),
            ("different mime", &vp8, &h264_pm0, false),
            ("h264 packetization mode", &h264_pm1, &h264_pm0, false),
            ("vp9 default profile", &vp9_p0, &vp9_default, true),
            ("vp9 profile mismatch", &vp9_p0, &vp9_p2, false),
        ];

        for (name, a, b, expected) in tests {
            assert_eq!(match_codecs(a.into(), b.into()), expected, "testCase: {name}");
        }
    }

    #[test]
    fn test_no_duplicate_payload_type_assignment() -> Result<()> {
        let remote = RTCRtpCapabilities {
            codecs: vec![
                codec(RtpCodecKind::Audio, "audio/opus", 100, 48000, Some(2), ""),
                codec(RtpCodecKind::Audio, "audio/opus", 100, 48000, Some(2), ""),
                codec(RtpCodecKind::Audio, "audio/PCMU", 0, 8000, None, ""),
            ],
            header_extensions: vec![],
        };

        let extended = get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote)?;
        let pts: Vec<_> = extended.codecs.iter().map(|c| c.remote_payload_type).collect();
        assert_eq!(pts, vec![100, 0]);

        Ok(())
    }

    #[test]
    fn test_header_extension_id_collision() -> Result<()> {
        let local = RTCRtpCapabilities {
            codecs: vec![],
            header_extensions: vec![
                ext(RtpCodecKind::Video, SDES_MID_URI, 1),
                ext(RtpCodecKind::Video, TRANSPORT_CC_URI, 3),
                RTCRtpHeaderExtensionCapability {
                    preferred_id: None,
                    ..ext(RtpCodecKind::Video, ABS_SEND_TIME_URI, 0)
                },
            ],
        };
        let remote = RTCRtpCapabilities {
            codecs: vec![],
            header_extensions: vec![
                ext(RtpCodecKind::Video, SDES_MID_URI, 1),
                ext(RtpCodecKind::Video, TRANSPORT_CC_URI, 1),
                RTCRtpHeaderExtensionCapability {
                    preferred_id: None,
                    ..ext(RtpCodecKind::Video, ABS_SEND_TIME_URI, 0)
                },
            ],
        };

        let extended = get_extended_rtp_capabilities(&local, &remote)?;
        let ids: Vec<_> = extended.header_extensions.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        Ok(())
    }

    #[test]
    fn test_recv_rtp_capabilities() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;
        let caps = get_recv_rtp_capabilities(&extended);

        let codecs: Vec<_> = caps
            .codecs
            .iter()
            .map(|c| (c.mime_type.as_str(), c.preferred_payload_type))
            .collect();
        assert_eq!(
            codecs,
            vec![
                ("audio/opus", Some(100)),
                ("video/VP8", Some(101)),
                ("video/rtx", Some(102)),
                ("video/H264", Some(103)),
                ("video/rtx", Some(104)),
            ]
        );
        assert_eq!(caps.codecs[2].apt(), Some(101));
        assert_eq!(caps.validate(), Ok(()));

        Ok(())
    }

    #[test]
    fn test_sending_rtp_parameters() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;

        let audio = get_sending_rtp_parameters(RtpCodecKind::Audio, &extended)?;
        assert_eq!(audio.codecs.len(), 1);
        assert_eq!(audio.codecs[0].payload_type, 100);
        assert_eq!(audio.rtcp.cname.as_ref().map(|c| c.len()), Some(CNAME_LENGTH));
        let uris: Vec<_> = audio.header_extensions.iter().map(|e| e.uri.as_str()).collect();
        assert_eq!(uris, vec![SDES_MID_URI, AUDIO_LEVEL_URI]);

        let mut video = get_sending_rtp_parameters(RtpCodecKind::Video, &extended)?;
        assert_eq!(video.codecs.len(), 2);
        assert_eq!(video.codecs[1].payload_type, 102);
        assert_eq!(video.codecs[1].apt(), Some(101));

        video.encodings = get_sending_encodings(&video, &SimulcastLayer::defaults(), 3);
        assert_eq!(video.encodings.len(), 3);
        assert!(video.encodings.iter().all(|e| e.rtx.is_some()));
        assert_eq!(video.validate(), Ok(()));

        Ok(())
    }

    #[test]
    fn test_sending_rtp_parameters_unsupported_kind() -> Result<()> {
        let remote = RTCRtpCapabilities {
            codecs: vec![codec(RtpCodecKind::Audio, "audio/opus", 100, 48000, Some(2), "")],
            header_extensions: vec![],
        };
        let extended = get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote)?;

        assert!(can_send(RtpCodecKind::Audio, &extended));
        assert!(!can_send(RtpCodecKind::Video, &extended));
        assert!(matches!(
            get_sending_rtp_parameters(RtpCodecKind::Video, &extended),
            Err(Error::ErrUnsupported(_))
        ));

        Ok(())
    }

    #[test]
    fn test_sent_parameters_are_receivable() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;

        for (kind, layers) in [
            (RtpCodecKind::Audio, vec![]),
            (RtpCodecKind::Video, vec![]),
            (RtpCodecKind::Video, SimulcastLayer::defaults()),
        ] {
            let mut params = get_sending_rtp_parameters(kind, &extended)?;
            params.encodings = get_sending_encodings(&params, &layers, DEFAULT_MAX_SIMULCAST_LAYERS);

            assert!(can_receive(&params, &extended), "{kind}");
            let received = get_receiving_rtp_parameters(kind, &extended, &params)?;
            assert_eq!(received.codecs, params.codecs);
            assert_eq!(received.encodings, params.encodings);
        }

        Ok(())
    }

    #[test]
    fn test_receiving_rtp_parameters_filters() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;

        let remote: RTCRtpParameters = serde_json::from_str(
            r#"{
                "codecs": [
                    {"mimeType":"video/VP8","payloadType":101,"clockRate":90000},
                    {"mimeType":"video/rtx","payloadType":105,"clockRate":90000,"parameters":{"apt":101}}
                ],
                "headerExtensions": [
                    {"uri":"http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time","id":4},
                    {"uri":"urn:example:unknown","id":9}
                ],
                "encodings": [{"ssrc":1234,"rtx":{"ssrc":5678}}],
                "rtcp": {"cname":"remote"}
            }"#,
        )
        .map_err(Error::from)?;

        let params = get_receiving_rtp_parameters(RtpCodecKind::Video, &extended, &remote)?;
        assert_eq!(params.codecs.len(), 1);
        assert_eq!(params.encodings[0].rtx, None);
        assert_eq!(params.header_extensions.len(), 1);
        assert_eq!(params.rtcp.cname.as_deref(), Some("remote"));

        Ok(())
    }

    #[test]
    fn test_unsupported_remote_parameters() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;

        let tests = vec![
            ("unknown codec", "video/FOO", 101),
            ("payload type mismatch", "video/VP8", 120),
            ("mime mismatch", "video/H264", 101),
        ];

        for (name, mime_type, payload_type) in tests {
            let remote = RTCRtpParameters {
                codecs: vec![RTCRtpCodecParameters {
                    mime_type: mime_type.to_owned(),
                    payload_type,
                    clock_rate: 90000,
                    parameters: parse_fmtp_line("packetization-mode=1"),
                    ..Default::default()
                }],
                ..Default::default()
            };
            assert!(!can_receive(&remote, &extended), "testCase: {name}");
            assert!(
                matches!(
                    get_receiving_rtp_parameters(RtpCodecKind::Video, &extended, &remote),
                    Err(Error::ErrUnsupported(_))
                ),
                "testCase: {name}"
            );
        }

        assert!(!can_receive(&RTCRtpParameters::default(), &extended));

        Ok(())
    }

    #[test]
    fn test_can_receive_kind() -> Result<()> {
        let extended =
            get_extended_rtp_capabilities(&default_native_rtp_capabilities(), &remote_capabilities())?;
        let vp8 = get_sending_rtp_parameters(RtpCodecKind::Video, &extended)?;

        assert!(can_receive(&vp8, &extended));
        assert!(can_receive_kind(RtpCodecKind::Video, &vp8, &extended));
        assert!(!can_receive_kind(RtpCodecKind::Audio, &vp8, &extended));

        Ok(())
    }
}
