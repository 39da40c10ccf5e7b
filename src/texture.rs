//! Asynchronous texture provider. Images are decoded on a worker thread and
//! handed to the frame loop over a channel; the loop polls without blocking.

use figure_core::FigureError;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

const GRADIENT_SIZE: u32 = 256;

/// Tightly packed RGBA8 pixels, top row first.
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Vertical sky gradient: pale horizon at the bottom, deep blue at the top.
    pub fn sky_gradient(width: u32, height: u32) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            let t = y as f32 / (height.max(2) - 1) as f32;
            let r = (40.0 + 170.0 * t) as u8;
            let g = (90.0 + 140.0 * t) as u8;
            let b = (200.0 + 50.0 * t) as u8;
            for _ in 0..width {
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FigureError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| FigureError::ResourceUnavailable(format!("decode failed: {e}")))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// Reject images that cannot be uploaded as one 2D texture of at most
    /// `max_dimension` texels per side.
    pub fn check_fits(&self, max_dimension: u32) -> Result<(), FigureError> {
        if self.width == 0 || self.height == 0 {
            return Err(FigureError::ResourceUnavailable("empty image".into()));
        }
        if self.width > max_dimension || self.height > max_dimension {
            return Err(FigureError::ResourceUnavailable(format!(
                "image {}x{} exceeds the {max_dimension} texel limit",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(FigureError::ResourceUnavailable(format!(
                "pixel buffer holds {} bytes, expected {expected}",
                self.rgba.len()
            )));
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, FigureError> {
        let bytes = std::fs::read(path).map_err(|e| {
            FigureError::ResourceUnavailable(format!("{}: {e}", path.display()))
        })?;
        Self::decode(&bytes)
    }
}

pub type TextureResult = Result<TextureImage, FigureError>;

/// Resolve the texture in the background. Without a path a generated sky
/// gradient is delivered instead.
pub fn spawn_loader(path: Option<PathBuf>) -> Receiver<TextureResult> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("texture-loader".into())
        .spawn(move || {
            let result = match path {
                Some(p) => TextureImage::load(&p),
                None => Ok(TextureImage::sky_gradient(GRADIENT_SIZE, GRADIENT_SIZE)),
            };
            _ = tx.send(result);
        });
    if let Err(e) = spawned {
        log::error!("[texture] could not start loader thread: {e}");
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_has_expected_layout() {
        let img = TextureImage::sky_gradient(4, 8);
        assert_eq!(img.rgba.len(), 4 * 8 * 4);
        // top row darker than bottom row
        assert!(img.rgba[0] < img.rgba[img.rgba.len() - 4]);
    }

    #[test]
    fn garbage_bytes_are_resource_unavailable() {
        let err = TextureImage::decode(&[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, FigureError::ResourceUnavailable(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TextureImage::load(Path::new("/definitely/not/here.jpg")).unwrap_err();
        match err {
            FigureError::ResourceUnavailable(msg) => assert!(msg.contains("here.jpg")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn oversized_image_does_not_fit() {
        let img = TextureImage {
            width: 10_000,
            height: 4,
            rgba: Vec::new(),
        };
        let err = img.check_fits(8192).unwrap_err();
        match err {
            FigureError::ResourceUnavailable(msg) => assert!(msg.contains("10000x4")),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(TextureImage::sky_gradient(16, 16).check_fits(16).is_ok());
        assert!(TextureImage::solid([0, 0, 0, 255]).check_fits(8192).is_ok());
    }

    #[test]
    fn short_pixel_buffer_does_not_fit() {
        let mut img = TextureImage::sky_gradient(4, 4);
        img.rgba.truncate(10);
        assert!(matches!(
            img.check_fits(8192),
            Err(FigureError::ResourceUnavailable(_))
        ));
    }

    #[test]
    fn loader_delivers_gradient_without_path() {
        let rx = spawn_loader(None);
        let img = rx.recv().expect("loader result").expect("gradient");
        assert_eq!((img.width, img.height), (GRADIENT_SIZE, GRADIENT_SIZE));
    }
}
