//! Image-file decode and encode for rasters.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType};

use crate::error::WfcError;
use crate::raster::Raster;

/// Read a raster from a png/bmp/tga/jpg file, preserving the decoded
/// component count for the packed 8-bit layouts.
pub fn load_raster(path: &Path) -> Result<Raster, WfcError> {
    check_extension(path)?;
    let decoded = image::open(path)?;
    let raster = match decoded {
        DynamicImage::ImageLuma8(buffer) => {
            let (w, h) = buffer.dimensions();
            Raster::from_bytes(w as usize, h as usize, 1, buffer.into_raw())
        }
        DynamicImage::ImageLumaA8(buffer) => {
            let (w, h) = buffer.dimensions();
            Raster::from_bytes(w as usize, h as usize, 2, buffer.into_raw())
        }
        DynamicImage::ImageRgb8(buffer) => {
            let (w, h) = buffer.dimensions();
            Raster::from_bytes(w as usize, h as usize, 3, buffer.into_raw())
        }
        DynamicImage::ImageRgba8(buffer) => {
            let (w, h) = buffer.dimensions();
            Raster::from_bytes(w as usize, h as usize, 4, buffer.into_raw())
        }
        other => {
            let buffer = other.to_rgb8();
            let (w, h) = buffer.dimensions();
            Raster::from_bytes(w as usize, h as usize, 3, buffer.into_raw())
        }
    };
    Ok(raster)
}

/// Write a raster to a png/bmp/tga/jpg file; JPEG is encoded at quality 100.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<(), WfcError> {
    let extension = check_extension(path)?;
    let color = match raster.components {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    };
    let (width, height) = (raster.width as u32, raster.height as u32);
    if matches!(extension.as_str(), "jpg" | "jpeg") {
        let writer = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(writer, 100).encode(&raster.bytes, width, height, color)?;
    } else {
        image::save_buffer(path, &raster.bytes, width, height, color)?;
    }
    Ok(())
}

fn check_extension(path: &Path) -> Result<String, WfcError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension {
        Some(ext) if matches!(ext.as_str(), "png" | "bmp" | "tga" | "jpg" | "jpeg") => Ok(ext),
        _ => Err(WfcError::UnsupportedFormat(path.display().to_string())),
    }
}
