//! In-process test payloads.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imgpull_core::decode::{CodecError, ContainerCodec, PixelLayout, RawPlane};

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let rgb = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 40) as u8, (y * 40) as u8, 128])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut buffer, format)
        .expect("encoding a test image should not fail");
    buffer.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub const BOX_MAGIC: &[u8; 8] = b"TESTBOX1";

/// Stand-in container format the primary codec cannot read:
/// magic, width (u8), height (u8), row stride (u8), then RGB rows padded to the stride.
pub struct TestBoxCodec;

impl ContainerCodec for TestBoxCodec {
    fn name(&self) -> &'static str {
        "testbox"
    }

    fn decode_raw(&self, payload: &[u8]) -> Result<RawPlane, CodecError> {
        let body = payload
            .strip_prefix(BOX_MAGIC.as_slice())
            .ok_or_else(|| CodecError::new("not a testbox container"))?;
        let (header, data) = body
            .split_first_chunk::<3>()
            .ok_or_else(|| CodecError::new("truncated testbox header"))?;
        let [width, height, stride] = *header;
        Ok(RawPlane {
            layout: PixelLayout::Rgb,
            width: u32::from(width),
            height: u32::from(height),
            stride: usize::from(stride),
            data: data.to_vec(),
        })
    }
}

/// Builds a testbox payload filled with `rgb`, with two padding bytes per row.
pub fn testbox_bytes(width: u8, height: u8, rgb: [u8; 3]) -> Vec<u8> {
    let stride = width * 3 + 2;
    let mut payload = BOX_MAGIC.to_vec();
    payload.extend_from_slice(&[width, height, stride]);
    for _ in 0..height {
        for _ in 0..width {
            payload.extend_from_slice(&rgb);
        }
        payload.extend_from_slice(&[0xEE, 0xEE]);
    }
    payload
}
