#[macro_use]
extern crate pretty_assertions;

use image::codecs::gif::GifEncoder;
use image::{Frame, GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use ndarray::{Array, IxDyn};
use smallvol::{read, DataType};
use std::fs::{self, File};
use tempfile::TempDir;

mod util;

use util::{write_tiff, write_tiff_rgb};

#[test]
fn tiff_stack_region() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stack.tiff");
    let array = Array::from_shape_fn(IxDyn(&[20, 6, 8]), |ix| (ix[0] * 10 + ix[1] + ix[2]) as u8);
    write_tiff(&path, &array);

    let volume = read(&path, Some([5, 1, 2]), Some([3, 4, 4]), None, None).unwrap();
    assert_eq!(volume.shape(), &[3, 4, 4]);
    let got = volume.into_array::<u8>().unwrap();
    assert_eq!(got[[0, 0, 0]], 50 + 1 + 2);
    assert_eq!(got[[2, 3, 3]], 70 + 4 + 5);

    // past the last page
    let volume = read(&path, Some([18, 0, 0]), Some([10, 6, 8]), None, None).unwrap();
    assert_eq!(volume.shape(), &[2, 6, 8]);
}

#[test]
fn rgb_tiff_keeps_channels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rgb.tif");
    let array = Array::from_shape_fn(IxDyn(&[3, 4, 5, 3]), |ix| (ix[0] * 60 + ix[1] * 5 + ix[2] + ix[3] * 20) as u8);
    write_tiff_rgb(&path, &array);

    let volume = read(&path, Some([1, 0, 0]), None, None, None).unwrap();
    assert_eq!(volume.shape(), &[2, 4, 5, 3]);
    let got = volume.into_array::<u8>().unwrap();
    assert_eq!(got[[0, 1, 2, 2]], 60 + 5 + 2 + 40);
}

#[test]
fn animated_gif() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anim.gif");
    {
        let mut encoder = GifEncoder::new(File::create(&path).unwrap());
        let frames = (0..4u8).map(|i| {
            Frame::new(RgbaImage::from_fn(6, 5, |x, y| {
                let v = i * 40 + x as u8 * 5 + y as u8;
                Rgba([v, v, v, 255])
            }))
        });
        encoder.encode_frames(frames).unwrap();
    }

    let volume = read(&path, Some([1, 1, 0]), Some([2, 3, 6]), None, None).unwrap();
    assert_eq!(volume.shape(), &[2, 3, 6, 4]);
    assert_eq!(volume.data_type(), DataType::Uint8);
    let got = volume.into_array::<u8>().unwrap();
    assert_eq!(got[[0, 0, 2, 0]], 40 + 10 + 1);
    assert_eq!(got[[1, 2, 5, 1]], 80 + 25 + 3);
    assert_eq!(got[[1, 2, 5, 3]], 255);
}

#[test]
fn still_images() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("still.png");
    GrayImage::from_fn(7, 4, |x, y| Luma([(x * 10 + y) as u8]))
        .save(&path)
        .unwrap();

    let volume = read(&path, None, None, None, None).unwrap();
    assert_eq!(volume.shape(), &[1, 4, 7]);
    assert_eq!(volume.as_array::<u8>().unwrap()[[0, 3, 6]], 63);

    // the only frame is outside of the range
    let volume = read(&path, Some([1, 0, 0]), None, None, None).unwrap();
    assert!(volume.is_empty());

    // codec guessed from the contents
    let bare = dir.path().join("still");
    fs::copy(&path, &bare).unwrap();
    let volume = read(&bare, Some([0, 1, 1]), None, None, None).unwrap();
    assert_eq!(volume.shape(), &[1, 3, 6]);

    let path = dir.path().join("deep.png");
    let deep: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(3, 2, |x, y| Luma([(x * 1000 + y) as u16]));
    deep.save(&path).unwrap();
    let volume = read(&path, None, None, None, None).unwrap();
    assert_eq!(volume.data_type(), DataType::Uint16);
    assert_eq!(volume.as_array::<u16>().unwrap()[[0, 1, 2]], 2001);
}
