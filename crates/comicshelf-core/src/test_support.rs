//! In-memory fixtures shared by the unit tests.

use std::io::{Cursor, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use image::codecs::gif::GifEncoder;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::decode::Frame;

pub(crate) fn solid_frame(width: u32, height: u32, color: [u8; 3]) -> Frame {
    let pixels = color
        .iter()
        .copied()
        .cycle()
        .take((width * height * 3) as usize)
        .collect();
    Frame::new(width, height, pixels)
}

fn encode(width: u32, height: u32, color: [u8; 3], format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb(color));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("encode fixture");
    buf
}

pub(crate) fn jpeg_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(width, height, color, ImageFormat::Jpeg)
}

pub(crate) fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(width, height, color, ImageFormat::Png)
}

/// A GIF with one solid-colored frame per entry of `colors`.
pub(crate) fn gif_bytes(width: u32, height: u32, colors: &[[u8; 3]]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buf);
        let frames = colors.iter().map(|&[r, g, b]| {
            image::Frame::new(RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, 255])))
        });
        encoder.encode_frames(frames).expect("encode gif fixture");
    }
    buf
}

/// A GIF with a 1x1 logical screen and no image data: header, screen, trailer.
pub(crate) fn frameless_gif() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x00\x00\x00\x3b".to_vec()
}

/// One member of a fixture ZIP archive.
pub(crate) struct ZipMember {
    pub name: String,
    pub data: Vec<u8>,
    pub method: u16,
    pub crc_override: Option<u32>,
}

impl ZipMember {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            method: 0,
            crc_override: None,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            method: 8,
            ..Self::stored(name, data)
        }
    }
}

/// Write a minimal (non-ZIP64, no comment) archive.
pub(crate) fn zip_bytes(members: &[ZipMember]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for member in members {
        let mut crc = Crc::new();
        crc.update(&member.data);
        let crc = member.crc_override.unwrap_or(crc.sum());

        let payload = if member.method == 8 {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&member.data).unwrap();
            encoder.finish().unwrap()
        } else {
            member.data.clone()
        };

        let offset = out.len() as u32;
        let name = member.name.as_bytes();

        out.extend_from_slice(b"PK\x03\x04");
        out.write_u16::<LittleEndian>(20).unwrap(); // version needed
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(member.method).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap(); // mod time + date
        out.write_u32::<LittleEndian>(crc).unwrap();
        out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(member.data.len() as u32).unwrap();
        out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // extra len
        out.extend_from_slice(name);
        out.extend_from_slice(&payload);

        central.extend_from_slice(b"PK\x01\x02");
        central.write_u16::<LittleEndian>(20).unwrap(); // version made by
        central.write_u16::<LittleEndian>(20).unwrap(); // version needed
        central.write_u16::<LittleEndian>(0).unwrap(); // flags
        central.write_u16::<LittleEndian>(member.method).unwrap();
        central.write_u32::<LittleEndian>(0).unwrap(); // mod time + date
        central.write_u32::<LittleEndian>(crc).unwrap();
        central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        central.write_u32::<LittleEndian>(member.data.len() as u32).unwrap();
        central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap(); // extra len
        central.write_u16::<LittleEndian>(0).unwrap(); // comment len
        central.write_u16::<LittleEndian>(0).unwrap(); // disk start
        central.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        central.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        central.write_u32::<LittleEndian>(offset).unwrap();
        central.extend_from_slice(name);
    }

    let cd_offset = out.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(b"PK\x05\x06");
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap();
    out.write_u16::<LittleEndian>(members.len() as u16).unwrap();
    out.write_u16::<LittleEndian>(members.len() as u16).unwrap();
    out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(cd_offset).unwrap();
    out.write_u16::<LittleEndian>(0).unwrap(); // comment len
    out
}
