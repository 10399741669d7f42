pub mod track;
pub mod track_state;

pub use track::{MediaStreamTrack, MediaStreamTrackId};
pub use track_state::MediaStreamTrackState;
