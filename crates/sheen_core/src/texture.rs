//! Texture loading for the demo scenes.
//!
//! Images are decoded to RGBA8 for direct GPU upload. Asset load failures
//! are non-fatal by design: the affected material falls back to a 1x1
//! placeholder and the scene keeps rendering, matching the behavior of the
//! original demos when a texture path was missing.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Cubemap face {path} is {got_w}x{got_h}, expected {want_w}x{want_h}")]
    FaceSizeMismatch {
        path: String,
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },
}

/// A decoded image in RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Pixel data, 4 bytes per pixel
    pub pixels: Vec<u8>,
    /// Original file path (for diagnostics)
    pub path: String,
}

impl Image {
    /// Decode an image file (PNG/JPEG/TGA) to RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::debug!("loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
            path: path.display().to_string(),
        })
    }

    /// Load an image, substituting a 1x1 solid placeholder on failure.
    ///
    /// The failure is reported through the log and the caller continues
    /// with the placeholder rather than aborting the frame loop.
    pub fn load_or_placeholder(path: impl AsRef<Path>, fallback: [u8; 4]) -> Self {
        match Self::load(path.as_ref()) {
            Ok(image) => image,
            Err(err) => {
                log::error!("{err}; using placeholder");
                Self::solid_color(fallback)
            }
        }
    }

    /// A 1x1 solid color image.
    pub fn solid_color(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
            path: "<solid>".to_string(),
        }
    }

    /// Total size of the pixel data in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Load the six faces of a cubemap in +X, -X, +Y, -Y, +Z, -Z order.
///
/// All faces must decode and share the dimensions of the first face; a
/// cubemap with mismatched faces cannot be uploaded, so any problem fails
/// the whole load and the caller substitutes a placeholder cubemap.
pub fn load_cubemap<P: AsRef<Path>>(faces: &[P; 6]) -> Result<[Image; 6], TextureError> {
    let first = Image::load(faces[0].as_ref())?;
    let (want_w, want_h) = (first.width, first.height);

    let mut images = Vec::with_capacity(6);
    images.push(first);
    for face in &faces[1..] {
        let image = Image::load(face.as_ref())?;
        if image.width != want_w || image.height != want_h {
            return Err(TextureError::FaceSizeMismatch {
                path: image.path,
                got_w: image.width,
                got_h: image.height,
                want_w,
                want_h,
            });
        }
        images.push(image);
    }

    // Length checked by construction
    Ok(images.try_into().expect("six cubemap faces"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color() {
        let img = Image::solid_color([255, 128, 0, 255]);
        assert_eq!(img.width, 1);
        assert_eq!(img.height, 1);
        assert_eq!(img.pixels, vec![255, 128, 0, 255]);
        assert_eq!(img.size_bytes(), 4);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let img = Image::load_or_placeholder("does/not/exist.png", [1, 2, 3, 255]);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.pixels, vec![1, 2, 3, 255]);
    }

    #[test]
    fn test_load_reports_path() {
        let err = Image::load("does/not/exist.png").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
