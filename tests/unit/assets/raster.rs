use std::io::Cursor;

use super::*;

fn encode_png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let raster = decode_raster(&encode_png(img)).unwrap();
    assert_eq!(raster.width, 1);
    assert_eq!(raster.height, 1);
    assert_eq!(
        raster.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_raster(b"not an image").unwrap_err();
    assert!(err.to_string().contains("decode frame image"));
}

#[test]
fn from_parts_checks_length() {
    assert!(Raster::from_premul_rgba8(2, 2, vec![0; 16]).is_ok());
    assert!(Raster::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
}

#[test]
fn solid_fills_every_pixel() {
    let r = Raster::solid(3, 2, [10, 20, 30, 255]);
    assert_eq!(r.rgba8_premul.len(), 24);
    assert!(r.rgba8_premul.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    assert_eq!(r.size(), Size::new(3.0, 2.0));
    assert!(Raster::solid(0, 4, [0, 0, 0, 255]).is_empty());
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = [64u8, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [128, 64, 0, 128]);

    let mut opaque = [1u8, 2, 3, 255];
    unpremultiply_rgba8_in_place(&mut opaque);
    assert_eq!(opaque, [1, 2, 3, 255]);
}
