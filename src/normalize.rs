//! Image normalization through an external ImageMagick process.
//!
//! The converter resizes the input to fit a square bound, flattens it on a
//! background, converts it to grayscale and thresholds it. Its PNG output is
//! read from stdout and decoded into a bitmap for the grid reducer.

use std::ffi::OsString;
use std::io::Cursor;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use image::{DynamicImage, ImageFormat};

/// Default converter executable.
pub const DEFAULT_PROGRAM: &str = "convert";
/// Default bound for both output dimensions, in pixels.
pub const DEFAULT_RESOLUTION: u32 = 40;
/// Default binarization threshold, in percent.
pub const DEFAULT_THRESHOLD: u8 = 97;
/// Default color used to replace transparency.
pub const DEFAULT_BACKGROUND: &str = "white";

/// Accepted resolution bounds, in pixels.
pub const RESOLUTION_RANGE: RangeInclusive<u32> = 1..=1000;
/// Accepted threshold bounds, in percent.
pub const THRESHOLD_RANGE: RangeInclusive<u8> = 1..=100;

/// Check a resolution against [`RESOLUTION_RANGE`].
pub fn validate_resolution(resolution: u32) -> Result<u32, String> {
    if !RESOLUTION_RANGE.contains(&resolution) {
        return Err(format!(
            "Resolution must be between {} and {}, got {}",
            RESOLUTION_RANGE.start(),
            RESOLUTION_RANGE.end(),
            resolution
        ));
    }
    Ok(resolution)
}

/// Check a threshold percent against [`THRESHOLD_RANGE`].
pub fn validate_threshold(threshold: u8) -> Result<u8, String> {
    if !THRESHOLD_RANGE.contains(&threshold) {
        return Err(format!(
            "Threshold must be between {} and {}, got {}",
            THRESHOLD_RANGE.start(),
            THRESHOLD_RANGE.end(),
            threshold
        ));
    }
    Ok(threshold)
}

/// Errors that can occur during normalization
#[derive(Debug)]
pub enum NormalizeError {
    /// Input image does not exist
    InputNotFound(PathBuf),
    /// Converter executable not found
    ConverterNotFound(String),
    /// Failed to spawn the converter process
    SpawnFailed(std::io::Error),
    /// Converter exited with non-zero status
    ProcessFailed { exit_code: Option<i32>, stderr: String },
    /// Converter output is not a decodable PNG
    Decode(image::ImageError),
    /// I/O error while talking to the converter
    IoError(std::io::Error),
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::InputNotFound(path) => {
                write!(f, "Input image '{}' not found", path.display())
            }
            NormalizeError::ConverterNotFound(program) => {
                write!(
                    f,
                    "'{}' not found. Please install ImageMagick, or point --converter at its convert binary",
                    program
                )
            }
            NormalizeError::SpawnFailed(e) => write!(f, "Failed to spawn converter: {}", e),
            NormalizeError::ProcessFailed { exit_code, stderr } => {
                write!(f, "Converter exited with code {:?}", exit_code)?;
                if !stderr.trim().is_empty() {
                    write!(f, "\n{}", stderr.trim_end())?;
                }
                Ok(())
            }
            NormalizeError::Decode(e) => write!(f, "Failed to decode converter output: {}", e),
            NormalizeError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for NormalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NormalizeError::SpawnFailed(e) | NormalizeError::IoError(e) => Some(e),
            NormalizeError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NormalizeError {
    fn from(e: std::io::Error) -> Self {
        NormalizeError::IoError(e)
    }
}

impl From<image::ImageError> for NormalizeError {
    fn from(e: image::ImageError) -> Self {
        NormalizeError::Decode(e)
    }
}

/// Settings for the external converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeSettings {
    /// Converter executable
    pub program: String,
    /// Square bound for the output, in pixels
    pub resolution: u32,
    /// Threshold percent, 1-100
    pub threshold: u8,
    /// Background color replacing transparency
    pub background: String,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            resolution: DEFAULT_RESOLUTION,
            threshold: DEFAULT_THRESHOLD,
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl NormalizeSettings {
    /// Build converter arguments for an input image.
    ///
    /// The output goes to stdout as PNG (`png:-`).
    pub fn args(&self, input: &Path) -> Vec<OsString> {
        vec![
            input.as_os_str().to_os_string(),
            "-background".into(),
            self.background.clone().into(),
            "-alpha".into(),
            "remove".into(),
            "-type".into(),
            "Grayscale".into(),
            "-resize".into(),
            format!("{0}x{0}", self.resolution).into(),
            "-threshold".into(),
            format!("{}%", self.threshold).into(),
            "png:-".into(),
        ]
    }
}

/// Normalize an input image and decode the result.
///
/// Blocks until the converter exits. The converter's stderr is captured and
/// reported when it fails.
///
/// # Errors
/// * `NormalizeError::InputNotFound` - If the input path does not exist
/// * `NormalizeError::ConverterNotFound` - If the converter is not installed
/// * `NormalizeError::ProcessFailed` - If the converter exits with an error
/// * `NormalizeError::Decode` - If the converter output is not a PNG
pub fn normalize(input: &Path, settings: &NormalizeSettings) -> Result<DynamicImage, NormalizeError> {
    if !input.exists() {
        return Err(NormalizeError::InputNotFound(input.to_path_buf()));
    }

    let args = settings.args(input);
    log::info!("Running {} {:?}", settings.program, args);

    let child = Command::new(&settings.program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NormalizeError::ConverterNotFound(settings.program.clone())
            } else {
                NormalizeError::SpawnFailed(e)
            }
        })?;

    let output = child.wait_with_output()?;
    check_status(output.status, &output.stderr)?;

    let image = decode_png(&output.stdout)?;
    log::debug!(
        "Decoded {}x{} bitmap ({:?})",
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

fn check_status(status: ExitStatus, stderr: &[u8]) -> Result<(), NormalizeError> {
    log::debug!("Converter exited with {}", status);
    if status.success() {
        Ok(())
    } else {
        Err(NormalizeError::ProcessFailed {
            exit_code: status.code(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        })
    }
}

/// Decode PNG bytes into a bitmap.
pub fn decode_png(bytes: &[u8]) -> Result<DynamicImage, NormalizeError> {
    let mut reader = image::ImageReader::new(Cursor::new(bytes));
    reader.set_format(ImageFormat::Png);
    Ok(reader.decode()?)
}
