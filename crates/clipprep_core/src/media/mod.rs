//! Media stages of the ingestion pipeline.
//!
//! Each stage is a free function over a [`ToolRunner`](crate::tools::ToolRunner):
//!
//! - **Probe**: container duration, `0.0` when unknown
//! - **Audio**: mono 16kHz speech track, `None` when unusable
//! - **Frames**: up to four stills, possibly empty
//! - **Encode**: base64 rendering of a finished artifact
//!
//! The first three never fail; they degrade their output instead.

pub mod audio;
pub mod encode;
pub mod frames;
pub mod probe;

pub use audio::{extract_audio, try_extract_audio, NoUsableAudio};
pub use encode::{encode_file, EncodeError, EncodeResult};
pub use frames::{frame_count, sample_frames, sample_timestamps};
pub use probe::{parse_duration, probe_duration};
