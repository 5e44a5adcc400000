//! EXIF orientation for still pages.
//!
//! Still pages may carry an orientation tag instead of rotated pixels. The
//! tag value (1-8) is applied as the matching flip or rotation.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

/// Read the primary-image orientation tag, if the container carries EXIF.
pub(crate) fn read_orientation(bytes: &[u8]) -> Option<u32> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)?
        .value
        .get_uint(0)
}

/// Apply an orientation tag value; unknown values and 1 leave `img` as is.
pub(crate) fn orient(img: DynamicImage, tag: u32) -> DynamicImage {
    match tag {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
