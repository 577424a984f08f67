pub mod ffmpeg;
pub mod frame;

pub use ffmpeg::FfmpegFrameDecoder;
pub use frame::{DecodeError, DecodedFrame, FrameDecoder, FrameExtractor};
