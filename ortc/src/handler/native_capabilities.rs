use crate::rtp_parameters::rtp_header_extension::*;
use crate::rtp_parameters::*;

fn codec(
    kind: RtpCodecKind,
    mime_type: &str,
    payload_type: PayloadType,
    clock_rate: u32,
    channels: Option<u8>,
    sdp_fmtp_line: &str,
    rtcp_feedback: Vec<RTCPFeedback>,
) -> RTCRtpCodecCapability {
    RTCRtpCodecCapability {
        kind,
        mime_type: mime_type.to_owned(),
        preferred_payload_type: Some(payload_type),
        clock_rate,
        channels,
        parameters: parse_fmtp_line(sdp_fmtp_line),
        rtcp_feedback,
    }
}

fn rtx(apt: PayloadType, payload_type: PayloadType) -> RTCRtpCodecCapability {
    codec(
        RtpCodecKind::Video,
        MIME_TYPE_RTX,
        payload_type,
        90000,
        None,
        &format!("apt={apt}"),
        vec![],
    )
}

fn header_extension(
    kind: RtpCodecKind,
    uri: &str,
    preferred_id: u16,
) -> RTCRtpHeaderExtensionCapability {
    RTCRtpHeaderExtensionCapability {
        kind,
        uri: uri.to_owned(),
        preferred_id: Some(preferred_id),
        preferred_encrypt: false,
        direction: RTCRtpDirection::Sendrecv,
    }
}

/// Codecs and header extensions a typical WebRTC engine supports, with the
/// payload types it prefers. Handlers may return this from
/// `HandlerFactory::get_native_rtp_capabilities`.
pub fn default_native_rtp_capabilities() -> RTCRtpCapabilities {
    let audio = RtpCodecKind::Audio;
    let video = RtpCodecKind::Video;

    let video_rtcp_feedback = vec![
        RTCPFeedback::new(TYPE_RTCP_FB_GOOG_REMB, ""),
        RTCPFeedback::new(TYPE_RTCP_FB_TRANSPORT_CC, ""),
        RTCPFeedback::new(TYPE_RTCP_FB_CCM, "fir"),
        RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
        RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
    ];

    let codecs = vec![
        codec(
            audio,
            MIME_TYPE_OPUS,
            111,
            48000,
            Some(2),
            "minptime=10;useinbandfec=1",
            vec![RTCPFeedback::new(TYPE_RTCP_FB_TRANSPORT_CC, "")],
        ),
        codec(audio, MIME_TYPE_G722, 9, 8000, None, "", vec![]),
        codec(audio, MIME_TYPE_PCMU, 0, 8000, None, "", vec![]),
        codec(audio, MIME_TYPE_PCMA, 8, 8000, None, "", vec![]),
        codec(audio, MIME_TYPE_TELEPHONE_EVENT, 126, 8000, None, "", vec![]),
        codec(video, MIME_TYPE_VP8, 96, 90000, None, "", video_rtcp_feedback.clone()),
        rtx(96, 97),
        codec(
            video,
            MIME_TYPE_VP9,
            98,
            90000,
            None,
            "profile-id=0",
            video_rtcp_feedback.clone(),
        ),
        rtx(98, 99),
        codec(
            video,
            MIME_TYPE_VP9,
            100,
            90000,
            None,
            "profile-id=2",
            video_rtcp_feedback.clone(),
        ),
        rtx(100, 101),
        codec(
            video,
            MIME_TYPE_H264,
            102,
            90000,
            None,
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f",
            video_rtcp_feedback.clone(),
        ),
        rtx(102, 103),
        codec(
            video,
            MIME_TYPE_H264,
            127,
            90000,
            None,
            "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=42001f",
            video_rtcp_feedback.clone(),
        ),
        rtx(127, 125),
        codec(
            video,
            MIME_TYPE_H264,
            108,
            90000,
            None,
            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f",
            video_rtcp_feedback.clone(),
        ),
        rtx(108, 109),
        codec(video, MIME_TYPE_AV1, 45, 90000, None, "", video_rtcp_feedback.clone()),
        rtx(45, 46),
        codec(video, MIME_TYPE_HEVC, 49, 90000, None, "", video_rtcp_feedback),
        rtx(49, 50),
        codec(video, MIME_TYPE_ULP_FEC, 116, 90000, None, "", vec![]),
    ];

    let header_extensions = vec![
        header_extension(audio, SDES_MID_URI, 1),
        header_extension(video, SDES_MID_URI, 1),
        header_extension(video, SDES_RTP_STREAM_ID_URI, 2),
        header_extension(video, SDES_REPAIR_RTP_STREAM_ID_URI, 3),
        header_extension(audio, ABS_SEND_TIME_URI, 4),
        header_extension(video, ABS_SEND_TIME_URI, 4),
        header_extension(video, TRANSPORT_CC_URI, 5),
        header_extension(audio, AUDIO_LEVEL_URI, 10),
        header_extension(video, VIDEO_ORIENTATION_URI, 11),
        header_extension(video, TIME_OFFSET_URI, 12),
    ];

    RTCRtpCapabilities {
        codecs,
        header_extensions,
    }
}
