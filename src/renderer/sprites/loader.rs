//! Finding and decoding sheet images.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::core::error::{Result, SpriteError};

use super::buffer::ImageBuffer;

/// Maps a requested path to a concrete file.
pub trait PathResolver {
    fn resolve(&self, path: &Path) -> Result<PathBuf>;
}

/// Turns a resolved file into pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<ImageBuffer>;
}

/// Anything that can produce an image for a requested path.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<ImageBuffer>;
}

/// Resolves paths against an ordered list of directories.
///
/// A path that exists as given (absolute or relative to the working
/// directory) wins; otherwise each directory is tried in order.
#[derive(Clone, Debug, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn find(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        if path.is_absolute() {
            return None;
        }
        self.dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
    }

    /// Like [`PathResolver::resolve`], but a missing file is only a warning.
    pub fn resolve_optional(&self, path: &Path) -> Option<PathBuf> {
        let found = self.find(path);
        if found.is_none() {
            warn!("Search path: {:?}", self.dirs);
            warn!("Failed to find optional file: {}", path.display());
        }
        found
    }
}

impl PathResolver for SearchPath {
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        self.find(path).ok_or_else(|| {
            warn!("Search path: {:?}", self.dirs);
            error!("Failed to find file: {}", path.display());
            SpriteError::NotFound(path.to_path_buf())
        })
    }
}

/// Decodes files from disk with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<ImageBuffer> {
        let img = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(io) if io.kind() == io::ErrorKind::NotFound => {
                SpriteError::NotFound(path.to_path_buf())
            }
            other => SpriteError::from(other),
        })?;
        Ok(ImageBuffer::from_dynamic(img))
    }
}

/// Resolve-then-decode, the usual way sheets are loaded.
#[derive(Clone, Debug, Default)]
pub struct SheetLoader<R = SearchPath, D = FileDecoder> {
    resolver: R,
    decoder: D,
}

impl<R: PathResolver, D: ImageDecoder> SheetLoader<R, D> {
    pub fn new(resolver: R, decoder: D) -> Self {
        Self { resolver, decoder }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: PathResolver, D: ImageDecoder> ImageLoader for SheetLoader<R, D> {
    fn load(&self, path: &Path) -> Result<ImageBuffer> {
        let resolved = self.resolver.resolve(path)?;
        debug!("Loading sheet image: {}", resolved.display());

        let image = self.decoder.decode(&resolved)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(SpriteError::InvalidDimension {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(image)
    }
}

impl<T: ImageLoader + ?Sized> ImageLoader for &T {
    fn load(&self, path: &Path) -> Result<ImageBuffer> {
        (**self).load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_search_path_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_png(&second.path().join("hero.png"), 2, 2);

        let search = SearchPath::new()
            .with_dir(first.path())
            .with_dir(second.path());
        let resolved = search.resolve(Path::new("hero.png")).unwrap();
        assert_eq!(resolved, second.path().join("hero.png"));

        write_png(&first.path().join("hero.png"), 2, 2);
        let resolved = search.resolve(Path::new("hero.png")).unwrap();
        assert_eq!(resolved, first.path().join("hero.png"));
    }

    #[test]
    fn test_missing_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let search = SearchPath::new().with_dir(dir.path());

        assert!(matches!(
            search.resolve(Path::new("nope.png")),
            Err(SpriteError::NotFound(_))
        ));
        assert_eq!(search.resolve_optional(Path::new("nope.png")), None);
    }

    #[test]
    fn test_sheet_loader_decodes() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("sheet.png"), 6, 4);

        let loader = SheetLoader::new(SearchPath::new().with_dir(dir.path()), FileDecoder);
        let image = loader.load(Path::new("sheet.png")).unwrap();
        assert_eq!(image.dimensions(), (6, 4));
        assert!(image.has_alpha());
        assert_eq!(image.pixel(5, 3), [1, 2, 3, 255]);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let result = FileDecoder.decode(&path);
        assert!(matches!(result, Err(SpriteError::DecodeError(_))));
    }

    #[test]
    fn test_decoder_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileDecoder.decode(&dir.path().join("gone.png"));
        assert!(matches!(result, Err(SpriteError::NotFound(_))));
    }
}
