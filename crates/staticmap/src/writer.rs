//! JPEG output.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{DynamicImage, codecs::jpeg::JpegEncoder};
use log::{debug, info, warn};

use crate::StaticMapError;

/// Encoder quality used for written images.
pub const JPEG_QUALITY: u8 = 75;

/// Checks that `name` can be used as the base name of an output file.
///
/// # Errors
///
/// Returns [`StaticMapError::InvalidFileName`] for empty names, `.`/`..`,
/// and names containing a path separator.
pub fn validate_file_name(name: &str) -> Result<(), StaticMapError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);

    if invalid {
        return Err(StaticMapError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// Encodes `image` as JPEG into `<dir>/<name>.jpg`.
///
/// The image is converted to RGB first since JPEG has no alpha channel.
/// The file is flushed, synced and closed before returning. A partially
/// written file is removed if encoding fails.
///
/// # Errors
///
/// Returns [`StaticMapError::InvalidFileName`] before touching the
/// filesystem if `name` is unusable, [`StaticMapError::CreateFile`] if the
/// file cannot be created, [`StaticMapError::Encode`] if encoding fails, and
/// [`StaticMapError::Io`] if the final flush or sync fails.
pub fn write_jpeg(
    dir: impl AsRef<Path>,
    name: &str,
    image: DynamicImage,
) -> Result<PathBuf, StaticMapError> {
    validate_file_name(name)?;

    let path = dir.as_ref().join(format!("{name}.jpg"));
    info!(path = path.display().to_string(); "Creating image file");

    let file = File::create(&path).map_err(|source| StaticMapError::CreateFile {
        path: path.clone(),
        source,
    })?;

    if let Err(err) = encode(file, image) {
        if let Err(remove_err) = fs::remove_file(&path) {
            warn!(path = path.display().to_string(), err:% = remove_err; "Failed to remove partial image file");
        }
        return Err(err);
    }

    info!(path = path.display().to_string(); "Image file written");
    Ok(path)
}

fn encode(file: File, image: DynamicImage) -> Result<(), StaticMapError> {
    let rgb = image.into_rgb8();
    debug!(width = rgb.width(), height = rgb.height(); "Encoding JPEG");

    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(StaticMapError::Encode)?;
    writer.flush()?;

    let file = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    drop(file);

    Ok(())
}
