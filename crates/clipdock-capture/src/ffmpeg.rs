use crate::frame::{DecodeError, DecodedFrame, FrameDecoder};
use std::path::{Path, PathBuf};
use std::process::Command;

const FFMPEG_ENV: &str = "CLIPDOCK_FFMPEG";
const FFPROBE_ENV: &str = "CLIPDOCK_FFPROBE";

/// Media decode through the standard ffmpeg tools: ffprobe reports the video
/// dimensions, ffmpeg seeks exactly and emits one raw RGBA frame on stdout.
pub struct FfmpegFrameDecoder {
    ffmpeg_bin: PathBuf,
    ffprobe_bin: PathBuf,
}

impl FfmpegFrameDecoder {
    pub fn new(ffmpeg_bin: impl Into<PathBuf>, ffprobe_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    pub fn from_env() -> Self {
        let ffmpeg_bin = std::env::var_os(FFMPEG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));
        let ffprobe_bin = std::env::var_os(FFPROBE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ffprobe"));
        Self::new(ffmpeg_bin, ffprobe_bin)
    }

    fn probe_dimensions(&self, video_path: &Path) -> Result<(u32, u32), DecodeError> {
        let output = Command::new(&self.ffprobe_bin)
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-show_entries")
            .arg("stream=width,height")
            .arg("-of")
            .arg("csv=s=x:p=0")
            .arg(video_path)
            .output()
            .map_err(|error| DecodeError::Failed {
                detail: format!("failed to run ffprobe: {error}"),
            })?;

        if !output.status.success() {
            return Err(DecodeError::Failed {
                detail: format!(
                    "ffprobe exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_dimensions_line(stdout.trim()).ok_or_else(|| DecodeError::Failed {
            detail: format!("ffprobe reported no video dimensions: {:?}", stdout.trim()),
        })
    }
}

impl FrameDecoder for FfmpegFrameDecoder {
    fn decode_frame(
        &self,
        video_path: &Path,
        position_seconds: f64,
    ) -> Result<DecodedFrame, DecodeError> {
        let (width, height) = self.probe_dimensions(video_path)?;

        let output = Command::new(&self.ffmpeg_bin)
            .arg("-v")
            .arg("error")
            .arg("-ss")
            .arg(format_position(position_seconds))
            .arg("-i")
            .arg(video_path)
            .arg("-frames:v")
            .arg("1")
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgba")
            .arg("pipe:1")
            .output()
            .map_err(|error| DecodeError::Failed {
                detail: format!("failed to run ffmpeg: {error}"),
            })?;

        if !output.status.success() {
            return Err(DecodeError::Failed {
                detail: format!(
                    "ffmpeg exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        // Seeking past the end produces an empty stream with a zero exit.
        if output.stdout.is_empty() {
            return Err(DecodeError::NoFrame);
        }

        let expected = width as usize * height as usize * 4;
        if output.stdout.len() != expected {
            return Err(DecodeError::Failed {
                detail: format!(
                    "truncated frame buffer: expected {expected} bytes, got {}",
                    output.stdout.len()
                ),
            });
        }

        Ok(DecodedFrame {
            width,
            height,
            rgba: output.stdout,
        })
    }
}

fn format_position(position_seconds: f64) -> String {
    format!("{position_seconds:.3}")
}

fn parse_dimensions_line(line: &str) -> Option<(u32, u32)> {
    let first_line = line.lines().next()?.trim();
    let (width, height) = first_line.split_once('x')?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}
