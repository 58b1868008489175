//! Supported image formats and file-dialog style filters.

use std::path::Path;

use image::ImageFormat;

use crate::composer::common::error::{ComposeError, Result};

fn primary_extension(format: ImageFormat) -> Option<&'static str> {
    format.extensions_str().first().copied()
}

/// Formats the `image` crate in this build can decode.
pub fn supported_input_formats() -> Vec<ImageFormat> {
    ImageFormat::all().filter(|f| f.reading_enabled()).collect()
}

/// Formats the `image` crate in this build can encode.
pub fn supported_output_formats() -> Vec<ImageFormat> {
    ImageFormat::all().filter(|f| f.writing_enabled()).collect()
}

/// `Images (*.png *.jpg ...);;png (*.png);;jpg (*.jpg);;...`
pub fn input_filename_filter() -> String {
    let extensions: Vec<&str> = supported_input_formats()
        .into_iter()
        .flat_map(|f| f.extensions_str().iter().copied())
        .collect();

    let all = extensions
        .iter()
        .map(|ext| format!("*.{ext}"))
        .collect::<Vec<_>>()
        .join(" ");

    std::iter::once(format!("Images ({all})"))
        .chain(extensions.iter().map(|ext| format!("{ext} (*.{ext})")))
        .collect::<Vec<_>>()
        .join(";;")
}

/// `png (*.png);;jpg (*.jpg);;...`, one entry per writable format.
pub fn output_filename_filter() -> String {
    supported_output_formats()
        .into_iter()
        .filter_map(primary_extension)
        .map(|ext| format!("{ext} (*.{ext})"))
        .collect::<Vec<_>>()
        .join(";;")
}

/// Parses a format name or extension such as `png`, `JPEG` or `tif`.
/// A filter entry like `png (*.png)` is accepted as well.
pub fn parse_output_format(name: &str) -> Result<ImageFormat> {
    let name = name.split_whitespace().next().unwrap_or_default();
    let format = ImageFormat::from_extension(name)
        .ok_or_else(|| ComposeError::UnsupportedFormat(name.to_string()))?;

    if !format.writing_enabled() {
        return Err(ComposeError::UnsupportedFormat(name.to_string()));
    }
    Ok(format)
}

/// Canonical name stored for `format` (its primary extension).
pub fn format_name(format: ImageFormat) -> &'static str {
    primary_extension(format).unwrap_or("png")
}

/// Picks the output format: explicit choice, then the destination's
/// extension, then the previously used format.
pub fn resolve_output_format(
    explicit: Option<ImageFormat>,
    destination: &Path,
    remembered: ImageFormat,
) -> ImageFormat {
    explicit
        .or_else(|| {
            ImageFormat::from_path(destination)
                .ok()
                .filter(|f| f.writing_enabled())
        })
        .unwrap_or(remembered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_is_readable_and_writable() {
        assert!(supported_input_formats().contains(&ImageFormat::Png));
        assert!(supported_output_formats().contains(&ImageFormat::Png));
    }

    #[test]
    fn input_filter_starts_with_catch_all_entry() {
        let filter = input_filename_filter();
        assert!(filter.starts_with("Images ("));
        assert!(filter.contains("*.png"));
        assert!(filter.contains(";;png (*.png)"));
    }

    #[test]
    fn output_filter_lists_one_entry_per_format() {
        let filter = output_filename_filter();
        assert!(filter.split(";;").any(|entry| entry == "png (*.png)"));
        assert_eq!(filter.split(";;").count(), supported_output_formats().len());
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!(parse_output_format("PNG").unwrap(), ImageFormat::Png);
        assert_eq!(parse_output_format("tif").unwrap(), ImageFormat::Tiff);
        assert_eq!(parse_output_format("png (*.png)").unwrap(), ImageFormat::Png);
        assert!(matches!(parse_output_format("doc"), Err(ComposeError::UnsupportedFormat(_))));
    }

    #[test]
    fn output_format_precedence() {
        let path = Path::new("out.tiff");
        assert_eq!(
            resolve_output_format(Some(ImageFormat::Png), path, ImageFormat::Bmp),
            ImageFormat::Png
        );
        assert_eq!(resolve_output_format(None, path, ImageFormat::Bmp), ImageFormat::Tiff);
        assert_eq!(
            resolve_output_format(None, Path::new("out"), ImageFormat::Bmp),
            ImageFormat::Bmp
        );
    }
}
