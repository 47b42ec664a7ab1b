use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::encode::sink::{EncodedVideo, Encoder, EncoderConfig, Recorder, check_frame_size};
use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::foundation::math::mul_div255_u16;
use crate::foundation::pixels::PixelBuffer;

/// Bitrate of the WebM fallback recording.
pub const WEBM_BITRATE_BPS: u64 = 2_500_000;

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when the system `ffmpeg` lists `name` among its encoders.
pub fn ffmpeg_has_encoder(name: &str) -> bool {
    let Ok(out) = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    else {
        return false;
    };
    out.status.success()
        && String::from_utf8_lossy(&out.stdout)
            .lines()
            .any(|l| l.split_whitespace().nth(1) == Some(name))
}

/// Map an `avc1.PPCCLL` codec string to x264 `(profile, level)`.
pub fn avc1_profile_level(codec: &str) -> Option<(&'static str, String)> {
    let hex = codec.strip_prefix("avc1.")?;
    if hex.len() != 6 {
        return None;
    }
    let profile_idc = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let level_idc = u8::from_str_radix(&hex[4..6], 16).ok()?;
    let profile = match profile_idc {
        0x42 => "baseline",
        0x4D => "main",
        0x64 => "high",
        _ => return None,
    };
    Some((profile, format!("{}.{}", level_idc / 10, level_idc % 10)))
}

/// Flatten straight-alpha RGBA8 over an opaque background.
pub fn flatten_to_opaque_rgba8(dst: &mut [u8], src: &[u8], bg_rgba: [u8; 4]) -> AbstrakResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(AbstrakError::invalid_dimensions(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for i in 0..3 {
            let v = mul_div255_u16(u16::from(s[i]), a) + mul_div255_u16(u16::from(bg_rgba[i]), inv);
            d[i] = v.min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(mut r: R) -> Drain {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(handle: Option<Drain>, what: &str) -> AbstrakResult<Vec<u8>> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| AbstrakError::encoding_failed(format!("ffmpeg {what} drain panicked")))?
            .map_err(|e| AbstrakError::encoding_failed(format!("ffmpeg {what} read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Running `ffmpeg` reading raw RGBA frames on stdin and writing the container to stdout.
///
/// Both output pipes are drained on helper threads so neither can fill up and stall the writer.
/// Dropping a process that was not waited on kills and reaps the child.
struct FfmpegProcess {
    child: Child,
    reaped: bool,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<Drain>,
    stderr_drain: Option<Drain>,
    scratch: Vec<u8>,
    width: u32,
    height: u32,
}

impl FfmpegProcess {
    fn spawn(width: u32, height: u32, fps: u32, output_args: &[String]) -> AbstrakResult<Self> {
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(AbstrakError::invalid_config(format!(
                "ffmpeg output width/height must be even (yuv420p), got {width}x{height}"
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                &format!("{width}x{height}"),
                "-r",
                &fps.to_string(),
                "-i",
                "pipe:0",
                "-an",
            ])
            .args(output_args)
            .arg("pipe:1");
        tracing::debug!(?cmd, "spawning ffmpeg");
        Self::from_command(cmd, width, height)
    }

    fn from_command(mut cmd: Command, width: u32, height: u32) -> AbstrakResult<Self> {
        let scratch = vec![0u8; PixelBuffer::expected_len(width, height)?];
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().map_err(|e| {
            AbstrakError::encoder_unavailable(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child.stdin.take();
        let stdout_drain = child.stdout.take().map(drain);
        let stderr_drain = child.stderr.take().map(drain);
        if stdin.is_none() || stdout_drain.is_none() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AbstrakError::encoding_failed(
                "failed to open ffmpeg pipes (unexpected)",
            ));
        }

        Ok(Self {
            child,
            reaped: false,
            stdin,
            stdout_drain,
            stderr_drain,
            scratch,
            width,
            height,
        })
    }

    fn write_frame(&mut self, frame: &PixelBuffer) -> AbstrakResult<()> {
        check_frame_size(frame, self.width, self.height)?;
        flatten_to_opaque_rgba8(&mut self.scratch, frame.data(), [0, 0, 0, 255])?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(AbstrakError::encoding_failed("ffmpeg stdin already closed"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            AbstrakError::encoding_failed(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn close_input(&mut self) -> AbstrakResult<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.flush().map_err(|e| {
                AbstrakError::encoding_failed(format!("failed to flush ffmpeg stdin: {e}"))
            })?;
        }
        Ok(())
    }

    /// Close stdin, wait for exit and return everything written to stdout.
    fn finish(mut self) -> AbstrakResult<Vec<u8>> {
        self.close_input()?;
        let status = self.child.wait().map_err(|e| {
            AbstrakError::encoding_failed(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        self.reaped = true;
        let stdout = join_drain(self.stdout_drain.take(), "stdout")?;
        let stderr = join_drain(self.stderr_drain.take(), "stderr")?;
        if !status.success() {
            return Err(AbstrakError::encoding_failed(format!(
                "ffmpeg exited with status {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        if stdout.is_empty() {
            return Err(AbstrakError::encoding_failed("ffmpeg produced no output"));
        }
        Ok(stdout)
    }

    fn kill(self) {
        drop(self);
    }
}

impl Drop for FfmpegProcess {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
            self.reaped = true;
        }
        let _ = join_drain(self.stdout_drain.take(), "stdout");
        let _ = join_drain(self.stderr_drain.take(), "stderr");
    }
}

/// Primary encoder: H.264 in fragmented MP4 through the system `ffmpeg`.
///
/// Frames are alpha-flattened over black. Width and height must be even.
#[derive(Default)]
pub struct FfmpegEncoder {
    process: Option<FfmpegProcess>,
    last_ts: Option<u64>,
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Encoder for FfmpegEncoder {
    fn probe(&self) -> AbstrakResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(AbstrakError::encoder_unavailable(
                "ffmpeg was not found on PATH",
            ));
        }
        if !ffmpeg_has_encoder("libx264") {
            return Err(AbstrakError::encoder_unavailable(
                "ffmpeg was built without libx264",
            ));
        }
        Ok(())
    }

    fn configure(&mut self, cfg: &EncoderConfig) -> AbstrakResult<()> {
        cfg.validate()?;
        let (profile, level) = avc1_profile_level(&cfg.codec).ok_or_else(|| {
            AbstrakError::invalid_config(format!("unsupported codec '{}'", cfg.codec))
        })?;
        if let Some(old) = self.process.take() {
            old.kill();
        }
        let args: Vec<String> = [
            "-c:v",
            "libx264",
            "-profile:v",
            profile,
            "-level",
            &level,
            "-b:v",
            &cfg.bitrate_bps.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "frag_keyframe+empty_moov",
            "-f",
            "mp4",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        self.process = Some(FfmpegProcess::spawn(cfg.width, cfg.height, cfg.fps, &args)?);
        self.last_ts = None;
        Ok(())
    }

    fn encode_frame(&mut self, frame: &PixelBuffer, timestamp_micros: u64) -> AbstrakResult<()> {
        if let Some(last) = self.last_ts
            && timestamp_micros <= last
        {
            return Err(AbstrakError::encoding_failed(
                "ffmpeg encoder received out-of-order timestamp",
            ));
        }
        self.last_ts = Some(timestamp_micros);
        self.process
            .as_mut()
            .ok_or_else(|| AbstrakError::encoding_failed("ffmpeg encoder not configured"))?
            .write_frame(frame)
    }

    fn flush(&mut self) -> AbstrakResult<()> {
        match self.process.as_mut() {
            Some(p) => p.close_input(),
            None => Err(AbstrakError::encoding_failed("ffmpeg encoder not configured")),
        }
    }

    fn close(&mut self) -> AbstrakResult<EncodedVideo> {
        let process = self
            .process
            .take()
            .ok_or_else(|| AbstrakError::encoding_failed("ffmpeg encoder not configured"))?;
        Ok(EncodedVideo::new("mp4/h264", process.finish()?))
    }

    fn abort(&mut self) {
        if let Some(p) = self.process.take() {
            p.kill();
        }
    }
}

/// Fallback recorder: VP9 in WebM through the system `ffmpeg`.
#[derive(Default)]
pub struct FfmpegRecorder {
    process: Option<FfmpegProcess>,
}

impl FfmpegRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Recorder for FfmpegRecorder {
    fn start(&mut self, width: u32, height: u32, fps: u32) -> AbstrakResult<()> {
        if fps == 0 {
            return Err(AbstrakError::invalid_config("recorder fps must be non-zero"));
        }
        if !is_ffmpeg_on_path() {
            return Err(AbstrakError::encoder_unavailable(
                "ffmpeg was not found on PATH",
            ));
        }
        let args: Vec<String> = [
            "-c:v",
            "libvpx-vp9",
            "-b:v",
            &WEBM_BITRATE_BPS.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-f",
            "webm",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if let Some(old) = self.process.take() {
            old.kill();
        }
        self.process = Some(FfmpegProcess::spawn(width, height, fps, &args)?);
        Ok(())
    }

    fn capture(&mut self, frame: &PixelBuffer, _elapsed: Duration) -> AbstrakResult<()> {
        self.process
            .as_mut()
            .ok_or_else(|| AbstrakError::encoding_failed("recorder not started"))?
            .write_frame(frame)
    }

    fn stop(&mut self) -> AbstrakResult<EncodedVideo> {
        let process = self
            .process
            .take()
            .ok_or_else(|| AbstrakError::encoding_failed("recorder not started"))?;
        Ok(EncodedVideo::new("webm/vp9", process.finish()?))
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        self.abort();
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        if let Some(p) = self.process.take() {
            p.kill();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
