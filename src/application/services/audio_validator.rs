use std::io::Cursor;
use std::path::Path;

pub const MIN_FILE_SIZE: usize = 100;
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "m4a", "ogg"];
const MIN_DURATION_SECS: f64 = 1.0;
const MAX_DURATION_SECS: f64 = 300.0;
const MIN_SAMPLE_RATE: u32 = 8000;

/// Rejection reasons, worded as they are surfaced to the submitting
/// client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported file type.")]
    UnsupportedType,
    #[error("File is empty or too small.")]
    TooSmall,
    #[error("File is too large.")]
    TooLarge,
    #[error("Audio too short.")]
    TooShort,
    #[error("Audio too long.")]
    TooLong,
    #[error("Sample rate too low.")]
    SampleRateTooLow,
    #[error("Corrupted or invalid WAV file.")]
    CorruptedWav,
}

/// Admission check run synchronously at submission, before a job id is
/// generated.
///
/// Checks run in order: extension allow-list, minimum size, maximum size,
/// then a WAV header inspection for `.wav` uploads only. Other formats are
/// admitted on size and extension alone without looking inside the
/// container; that asymmetry is deliberate and load-bearing for callers.
pub fn validate_audio_file(filename: &str, audio: &[u8]) -> Result<(), ValidationError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or(ValidationError::UnsupportedType)?;

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ValidationError::UnsupportedType);
    }
    if audio.len() < MIN_FILE_SIZE {
        return Err(ValidationError::TooSmall);
    }
    if audio.len() > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge);
    }

    if ext == "wav" {
        inspect_wav(audio)?;
    }

    Ok(())
}

fn inspect_wav(audio: &[u8]) -> Result<(), ValidationError> {
    let reader =
        hound::WavReader::new(Cursor::new(audio)).map_err(|_| ValidationError::CorruptedWav)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(ValidationError::CorruptedWav);
    }

    // duration() is frames per channel, so this holds for multi-channel
    // files too.
    let duration = f64::from(reader.duration()) / f64::from(spec.sample_rate);
    if duration < MIN_DURATION_SECS {
        return Err(ValidationError::TooShort);
    }
    if duration > MAX_DURATION_SECS {
        return Err(ValidationError::TooLong);
    }
    if spec.sample_rate < MIN_SAMPLE_RATE {
        return Err(ValidationError::SampleRateTooLow);
    }

    Ok(())
}
