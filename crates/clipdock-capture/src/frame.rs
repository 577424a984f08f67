use clipdock_contracts::{AppError, AppResult, ExtractFramePayload, ResultExt, codes};
use clipdock_kernel::runtime::run_blocking;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// One decoded still frame, tightly packed RGBA.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug)]
pub enum DecodeError {
    /// The decoder ran but produced no frame at the requested position,
    /// e.g. a seek past the end of the media.
    NoFrame,
    Failed { detail: String },
}

/// Seam to the media-decode facility. Implementations may block; the
/// extractor always calls this from the blocking pool.
pub trait FrameDecoder: Send + Sync {
    fn decode_frame(
        &self,
        video_path: &Path,
        position_seconds: f64,
    ) -> Result<DecodedFrame, DecodeError>;
}

pub struct FrameExtractor {
    decoder: Arc<dyn FrameDecoder>,
    output_dir: PathBuf,
}

impl FrameExtractor {
    pub fn new(decoder: Arc<dyn FrameDecoder>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            decoder,
            output_dir: output_dir.into(),
        }
    }

    /// Decode one frame, encode it as PNG and persist it under a unique name.
    /// The whole pipeline runs on the blocking pool; the completion side is
    /// resolved by the awaiting task, never from the worker thread.
    pub async fn extract(&self, payload: ExtractFramePayload) -> AppResult<PathBuf> {
        payload.validate()?;

        let decoder = Arc::clone(&self.decoder);
        let output_dir = self.output_dir.clone();
        let video_path = PathBuf::from(payload.video_path.trim());
        let position = payload.position_in_seconds;

        run_blocking("frame_extract", move || {
            let frame = decoder
                .decode_frame(&video_path, position)
                .map_err(|error| decode_error_to_app_error(error, &video_path, position))?;
            let png = encode_png(&frame)?;
            write_unique_frame(&output_dir, &png)
        })
        .await
    }
}

fn decode_error_to_app_error(error: DecodeError, video_path: &Path, position: f64) -> AppError {
    match error {
        DecodeError::NoFrame => {
            AppError::new(codes::NO_IMAGE, "no frame decoded at the requested position")
                .with_context("videoPath", video_path.display().to_string())
                .with_context("positionInSeconds", position.to_string())
        }
        DecodeError::Failed { detail } => {
            AppError::new(
                codes::FRAME_EXTRACTION_FAILED,
                "failed to decode a frame from the video",
            )
            .with_context("videoPath", video_path.display().to_string())
            .with_cause(detail)
        }
    }
}

fn encode_png(frame: &DecodedFrame) -> AppResult<Vec<u8>> {
    let image = RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone()).ok_or_else(
        || {
            AppError::new(
                codes::IMAGE_CONVERSION_FAILED,
                "frame buffer does not match its dimensions",
            )
            .with_context("width", frame.width.to_string())
            .with_context("height", frame.height.to_string())
            .with_context("bufferLen", frame.rgba.len().to_string())
        },
    )?;

    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut bytes, ImageFormat::Png)
        .with_code(codes::IMAGE_CONVERSION_FAILED, "failed to encode frame as png")?;
    Ok(bytes.into_inner())
}

fn write_unique_frame(output_dir: &Path, png: &[u8]) -> AppResult<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_code(codes::FILE_WRITE_FAILED, "failed to create frame output directory")
        .with_ctx("outputDir", output_dir.display().to_string())?;

    // Unique per invocation so concurrent extractions never collide.
    let path = output_dir.join(format!("frame_{}.png", Uuid::new_v4()));
    std::fs::write(&path, png)
        .with_code(codes::FILE_WRITE_FAILED, "failed to write frame file")
        .with_ctx("framePath", path.display().to_string())?;
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/frame/frame_tests.rs"]
mod tests;
