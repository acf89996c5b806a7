//! EXIF orientation reading and orientation-to-rotation resolution.

use std::io::{BufRead, Seek};

use exif::{In, Reader, Tag};
use log::{debug, warn};

use super::{DecodeError, ImageSource, Orientation, RotationAngle};

/// Clockwise rotation for each EXIF orientation code, indexed by code.
///
/// Flip variants and unknown codes need no rotation.
const ROTATION_BY_CODE: [RotationAngle; 9] = [
    RotationAngle::Deg0,   // 0: undefined
    RotationAngle::Deg0,   // 1: normal
    RotationAngle::Deg0,   // 2: flip horizontal
    RotationAngle::Deg180, // 3: rotate 180
    RotationAngle::Deg0,   // 4: flip vertical
    RotationAngle::Deg0,   // 5: transpose
    RotationAngle::Deg90,  // 6: rotate 90
    RotationAngle::Deg0,   // 7: transverse
    RotationAngle::Deg270, // 8: rotate 270
];

/// Rotation needed to display an image with the given orientation upright.
#[inline]
pub fn rotation_for(orientation: Orientation) -> RotationAngle {
    rotation_for_code(orientation.code())
}

/// Same as [`rotation_for`], for a raw EXIF code. Unknown codes map to 0°.
pub fn rotation_for_code(code: u32) -> RotationAngle {
    ROTATION_BY_CODE
        .get(code as usize)
        .copied()
        .unwrap_or_default()
}

/// Read the EXIF orientation tag from an encoded image container.
///
/// Returns `Orientation::Normal` when the container holds no EXIF data or the
/// tag is absent.
///
/// # Errors
///
/// Returns `DecodeError::Exif` when the container cannot be parsed.
pub fn read_orientation<R: BufRead + Seek>(reader: &mut R) -> Result<Orientation, DecodeError> {
    let exif = match Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(Orientation::Normal),
        Err(e) => return Err(DecodeError::Exif(e.to_string())),
    };

    let orientation = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default();
    Ok(orientation)
}

/// Read a source's orientation, falling back to `Orientation::Normal`.
///
/// Read failures are logged and never surfaced to the caller.
pub fn orientation_or_normal<S: ImageSource + ?Sized>(source: &S) -> Orientation {
    match source.read_orientation() {
        Ok(orientation) => {
            debug!("{}: orientation {:?}", source.describe(), orientation);
            orientation
        }
        Err(e) => {
            warn!(
                "{}: could not read orientation ({e}), assuming normal",
                source.describe()
            );
            Orientation::Normal
        }
    }
}
