//! Per-composition cache of decoded source images.
//!
//! A cache lives for exactly one composition pass. Each filename is decoded
//! at most once per pass, and the first successful decode fixes the working
//! size every later image must match.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::composer::common::argb::{DecodedImage, Size};
use crate::composer::common::error::{ComposeError, Result};
use crate::composer::source::reader::ImageDecoder;

pub struct ImageCache<'a, D: ImageDecoder> {
    decoder: &'a D,
    images: HashMap<PathBuf, Arc<DecodedImage>>,
    working_size: Option<Size>,
}

impl<'a, D: ImageDecoder> ImageCache<'a, D> {
    pub fn new(decoder: &'a D) -> Self {
        Self {
            decoder,
            images: HashMap::new(),
            working_size: None,
        }
    }

    /// Returns the decoded image for `path`, decoding it on first request.
    pub fn get_image(&mut self, path: &Path) -> Result<Arc<DecodedImage>> {
        if let Some(image) = self.images.get(path) {
            debug!(path = %path.display(), "Image cache hit");
            return Ok(Arc::clone(image));
        }

        let image = self.decoder.decode(path)?;
        let size = image.size();

        match self.working_size {
            None => self.working_size = Some(size),
            Some(expected) if expected != size => {
                warn!(
                    path = %path.display(),
                    expected = %expected,
                    actual = %size,
                    "Input image size mismatch"
                );
                return Err(ComposeError::SizeMismatch {
                    path: path.to_path_buf(),
                    expected,
                    actual: size,
                });
            }
            Some(_) => {}
        }

        let image = Arc::new(image);
        self.images.insert(path.to_path_buf(), Arc::clone(&image));
        Ok(image)
    }

    /// Size of the first image decoded in this pass, if any.
    pub fn working_size(&self) -> Option<Size> {
        self.working_size
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::composer::common::argb::ArgbImage;

    struct CountingDecoder {
        sizes: HashMap<PathBuf, Size>,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl CountingDecoder {
        fn new(entries: &[(&str, Size)]) -> Self {
            Self {
                sizes: entries.iter().map(|(p, s)| (PathBuf::from(p), *s)).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageDecoder for CountingDecoder {
        fn decode(&self, path: &Path) -> Result<DecodedImage> {
            self.calls.borrow_mut().push(path.to_path_buf());
            let size = self.sizes.get(path).copied().ok_or_else(|| ComposeError::Decode {
                path: path.to_path_buf(),
                reason: "no such file".to_string(),
            })?;
            Ok(ArgbImage::from_pixels(size, vec![0; size.pixel_count()]).unwrap())
        }
    }

    #[test]
    fn same_filename_is_decoded_once() {
        let decoder = CountingDecoder::new(&[("a.png", Size::new(2, 2))]);
        let mut cache = ImageCache::new(&decoder);

        let first = cache.get_image(Path::new("a.png")).unwrap();
        let second = cache.get_image(Path::new("a.png")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(decoder.calls.borrow().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn first_decode_sets_working_size() {
        let decoder = CountingDecoder::new(&[("a.png", Size::new(4, 3))]);
        let mut cache = ImageCache::new(&decoder);
        assert_eq!(cache.working_size(), None);

        cache.get_image(Path::new("a.png")).unwrap();
        assert_eq!(cache.working_size(), Some(Size::new(4, 3)));
    }

    #[test]
    fn differently_sized_second_image_is_rejected() {
        let decoder = CountingDecoder::new(&[
            ("a.png", Size::new(2, 2)),
            ("b.png", Size::new(3, 2)),
        ]);
        let mut cache = ImageCache::new(&decoder);
        cache.get_image(Path::new("a.png")).unwrap();

        let err = cache.get_image(Path::new("b.png")).unwrap_err();
        match err {
            ComposeError::SizeMismatch { path, expected, actual } => {
                assert_eq!(path, PathBuf::from("b.png"));
                assert_eq!(expected, Size::new(2, 2));
                assert_eq!(actual, Size::new(3, 2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cache.working_size(), Some(Size::new(2, 2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn decode_failure_does_not_set_working_size() {
        let decoder = CountingDecoder::new(&[("a.png", Size::new(2, 2))]);
        let mut cache = ImageCache::new(&decoder);

        let err = cache.get_image(Path::new("missing.png")).unwrap_err();
        assert!(matches!(err, ComposeError::Decode { .. }));
        assert_eq!(cache.working_size(), None);
        assert!(cache.is_empty());
    }
}
