//! Narration decoding into a mono PCM buffer.
//!
//! WAV files are read directly with hound. Compressed containers (MP3, AAC,
//! FLAC, Vorbis) and WAV encodings hound rejects are decoded in-process with
//! Symphonia, or optionally transcoded by `ffmpeg` into a scoped temporary WAV.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, info, warn};

use super::AudioBuffer;
use crate::error::{VizError, VizResult};
use crate::params::{DecoderBackend, DecoderConfig};

/// Decodes narration files into [`AudioBuffer`]s at their native sample rate
#[derive(Debug, Clone, Default)]
pub struct AudioDecoder {
    config: DecoderConfig,
}

impl AudioDecoder {
    pub fn new(config: DecoderConfig) -> VizResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Decode `path` into a mono buffer
    ///
    /// Fails with [`VizError::FileNotFound`] before any decoding work when the
    /// path is not an existing file, and with [`VizError::Decode`] when the
    /// stream cannot be parsed.
    pub fn decode(&self, path: impl AsRef<Path>) -> VizResult<AudioBuffer> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(VizError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let buffer = match self.config.backend {
            DecoderBackend::Native if is_wav(path) => read_wav_or_probe(path)?,
            DecoderBackend::Native => decode_with_symphonia(path)?,
            DecoderBackend::Ffmpeg => self.transcode_with_ffmpeg(path)?,
        };

        if buffer.is_empty() {
            return Err(VizError::decode(path, "no audio samples decoded"));
        }

        info!(
            path = %path.display(),
            sample_rate = buffer.sample_rate(),
            samples = buffer.len(),
            duration_s = buffer.duration_s(),
            peak = buffer.peak_amplitude(),
            "decoded narration"
        );
        Ok(buffer)
    }

    /// Transcode through `ffmpeg` into a temporary 16-bit WAV, then read it
    ///
    /// The temporary file is removed when the guard drops, on every path.
    fn transcode_with_ffmpeg(&self, path: &Path) -> VizResult<AudioBuffer> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("voiceshape-").suffix(".wav");
        let temp_wav = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        debug!(temp = %temp_wav.path().display(), "transcoding narration with ffmpeg");

        let out = Command::new("ffmpeg")
            .args(["-v", "error", "-y", "-i"])
            .arg(path)
            .args(["-vn", "-acodec", "pcm_s16le", "-f", "wav"])
            .arg(temp_wav.path())
            .output()
            .map_err(|e| VizError::decode(path, format!("failed to run ffmpeg: {e}")))?;

        if !out.status.success() {
            return Err(VizError::decode(
                path,
                format!(
                    "ffmpeg transcode failed: {}",
                    String::from_utf8_lossy(&out.stderr).trim()
                ),
            ));
        }

        let reader = hound::WavReader::open(temp_wav.path())
            .map_err(|e| VizError::decode(path, e.to_string()))?;
        wav_to_buffer(reader, path)
    }
}

/// Decode `path` with the default configuration
pub fn decode_file(path: impl AsRef<Path>) -> VizResult<AudioBuffer> {
    AudioDecoder::default().decode(path)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("wave"))
}

fn read_wav(path: &Path) -> VizResult<AudioBuffer> {
    let reader =
        hound::WavReader::open(path).map_err(|e| VizError::decode(path, e.to_string()))?;
    wav_to_buffer(reader, path)
}

/// Read with hound, then let Symphonia probe the contents if hound refuses
///
/// Covers mislabelled files and WAV encodings hound does not read (A-law,
/// mu-law, ADPCM). The hound error is reported when both fail.
fn read_wav_or_probe(path: &Path) -> VizResult<AudioBuffer> {
    read_wav(path).or_else(|wav_err| {
        debug!(path = %path.display(), error = %wav_err, "hound rejected file, probing contents");
        decode_with_symphonia(path).map_err(|_| wav_err)
    })
}

/// Read every sample of a WAV stream as `f32` and downmix to mono
///
/// Integer PCM is scaled by `2^(bits - 1)`.
fn wav_to_buffer<R: Read>(reader: hound::WavReader<R>, path: &Path) -> VizResult<AudioBuffer> {
    let spec = reader.spec();
    let interleaved: Result<Vec<f32>, hound::Error> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect(),
        hound::SampleFormat::Int => {
            let scale = (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect()
        }
    };
    let interleaved = interleaved.map_err(|e| VizError::decode(path, e.to_string()))?;

    AudioBuffer::from_interleaved(&interleaved, spec.channels as usize, spec.sample_rate)
        .map_err(|e| VizError::decode(path, e.to_string()))
}

/// Demux and decode the default audio track with Symphonia
fn decode_with_symphonia(path: &Path) -> VizResult<AudioBuffer> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| VizError::decode(path, format!("probe error: {e}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| VizError::decode(path, "no audio track found"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| VizError::decode(path, format!("decoder creation error: {e}")))?;

    let mut interleaved = Vec::new();
    let mut channels = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(VizError::decode(path, e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if sample_rate.is_none() {
                    sample_rate = Some(spec.rate);
                }
                if channels.is_none() {
                    channels = Some(spec.channels.count().max(1));
                }

                let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                interleaved.extend_from_slice(sample_buf.samples());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped_packets += 1;
                warn!(path = %path.display(), "skipping corrupt packet: {msg}");
            }
            Err(e) => return Err(VizError::decode(path, e.to_string())),
        }
    }

    if skipped_packets > 0 {
        debug!(skipped_packets, "symphonia decode finished with skipped packets");
    }

    let sample_rate =
        sample_rate.ok_or_else(|| VizError::decode(path, "unknown sample rate"))?;
    AudioBuffer::from_interleaved(&interleaved, channels.unwrap_or(1), sample_rate)
        .map_err(|e| VizError::decode(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_wav_i16(path: &Path, channels: u16, sample_rate: u32, frames: &[Vec<i16>]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in frame {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = decode_file("/no/such/narration.mp3").unwrap_err();
        assert!(matches!(err, VizError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(dir.path()).unwrap_err();
        assert!(matches!(err, VizError::FileNotFound { .. }));
    }

    #[test]
    fn test_stereo_wav_downmixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_wav_i16(
            &path,
            2,
            22050,
            &[vec![16384, 0], vec![-16384, -16384], vec![8192, -8192]],
        );

        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 22050);
        assert_eq!(buffer.samples(), &[0.25, -0.5, 0.0]);
    }

    #[test]
    fn test_symphonia_path_keeps_rate_and_downmixes() {
        // Unknown extension skips hound; Symphonia identifies the RIFF contents
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narration.dat");
        write_wav_i16(&path, 2, 1000, &vec![vec![16384, 0]; 2000]);

        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 1000);
        assert_eq!(buffer.len(), 2000);
        assert!(buffer.samples().iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_wav_hound_rejects_falls_back_to_symphonia() {
        // 8-bit mu-law mono: a valid WAV that hound does not support
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mulaw.wav");
        let frames = 800u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(4 + 26 + 8 + frames).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&18u32.to_le_bytes());
        bytes.extend_from_slice(&7u16.to_le_bytes()); // WAVE_FORMAT_MULAW
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&frames.to_le_bytes());
        // 0xFF encodes silence
        bytes.extend_from_slice(&vec![0xFFu8; frames as usize]);
        std::fs::write(&path, bytes).unwrap();

        assert!(hound::WavReader::open(&path).is_err());
        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 8000);
        assert_eq!(buffer.len(), frames as usize);
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_float_wav_native_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.WAV");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 1000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..2000 {
            writer.write_sample((i % 7) as f32 * 0.1).unwrap();
        }
        writer.finalize().unwrap();

        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.sample_rate(), 1000);
        assert_eq!(buffer.len(), 2000);
        assert!((buffer.duration_s() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_corrupt_wav_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFF but not really a wave file").unwrap();

        match decode_file(&path) {
            Err(VizError::Decode { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_mp3_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"this is plain text, not an mp3 stream").unwrap();

        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, VizError::Decode { .. }));
        assert!(err.to_string().contains("broken.mp3"));
    }

    #[test]
    fn test_empty_wav_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav_i16(&path, 1, 8000, &[]);

        assert!(matches!(
            decode_file(&path),
            Err(VizError::Decode { .. })
        ));
    }

    #[test]
    fn test_ffmpeg_failure_leaves_no_temp_file() {
        // Fails whether or not ffmpeg is installed; the scratch dir must end up empty
        let scratch = tempfile::tempdir().unwrap();
        let input_dir = tempfile::tempdir().unwrap();
        let path = input_dir.path().join("broken.mp3");
        std::fs::write(&path, b"not audio").unwrap();

        let decoder = AudioDecoder::new(DecoderConfig {
            backend: DecoderBackend::Ffmpeg,
            temp_dir: Some(scratch.path().to_path_buf()),
        })
        .unwrap();

        assert!(matches!(
            decoder.decode(&path),
            Err(VizError::Decode { .. })
        ));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_ffmpeg_missing_file_checked_first() {
        let decoder = AudioDecoder::new(DecoderConfig {
            backend: DecoderBackend::Ffmpeg,
            temp_dir: None,
        })
        .unwrap();
        let err = decoder.decode(PathBuf::from("/no/such/file.mp3")).unwrap_err();
        assert!(matches!(err, VizError::FileNotFound { .. }));
    }
}
