use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

/// Bitrates of the layers returned by [`SimulcastLayer::defaults`], lowest first.
pub const DEFAULT_SIMULCAST_BITRATES: [u32; 3] = [100_000, 500_000, 1_500_000];

/// Layer count used by handlers that do not state their own limit.
pub const DEFAULT_MAX_SIMULCAST_LAYERS: usize = 3;

/// Constraints of one requested simulcast layer.
#[derive(Default, Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulcastLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_resolution_down_by: Option<f64>,
}

impl SimulcastLayer {
    pub fn new(max_bitrate: u32) -> Self {
        SimulcastLayer {
            max_bitrate: Some(max_bitrate),
            scale_resolution_down_by: None,
        }
    }

    /// Three layers at 100 kbps, 500 kbps and 1.5 Mbps.
    pub fn defaults() -> Vec<SimulcastLayer> {
        DEFAULT_SIMULCAST_BITRATES
            .iter()
            .map(|bitrate| SimulcastLayer::new(*bitrate))
            .collect()
    }
}

/// Checks a requested simulcast list. Lists of zero or one entry mean no
/// simulcast and are never rejected; with more entries every layer needs a
/// bitrate and any scale factor must be a finite value of at least 1.
pub fn validate_simulcast(layers: &[SimulcastLayer]) -> Result<()> {
    if layers.len() <= 1 {
        return Ok(());
    }

    for (i, layer) in layers.iter().enumerate() {
        if layer.max_bitrate.is_none() {
            return Err(Error::ErrInvalidSimulcast(format!(
                "layer {i} has no max bitrate"
            )));
        }
        if let Some(scale) = layer.scale_resolution_down_by {
            if !scale.is_finite() || scale < 1.0 {
                return Err(Error::ErrInvalidSimulcast(format!(
                    "layer {i} has invalid scale {scale}"
                )));
            }
        }
    }

    Ok(())
}

/// Layers that will actually be encoded: a single plain layer unless more
/// than one entry was requested, capped at `max_layers`.
pub(crate) fn effective_layers(layers: &[SimulcastLayer], max_layers: usize) -> Vec<SimulcastLayer> {
    if layers.len() <= 1 || max_layers <= 1 {
        return vec![SimulcastLayer::default()];
    }

    if layers.len() > max_layers {
        log::warn!(
            "requested {} simulcast layers, keeping the first {}",
            layers.len(),
            max_layers
        );
    }

    let layers = &layers[..layers.len().min(max_layers)];
    let count = layers.len();
    layers
        .iter()
        .enumerate()
        .map(|(i, layer)| SimulcastLayer {
            max_bitrate: layer.max_bitrate,
            scale_resolution_down_by: Some(
                layer
                    .scale_resolution_down_by
                    .unwrap_or_else(|| 2f64.powi((count - 1 - i) as i32)),
            ),
        })
        .collect()
}
