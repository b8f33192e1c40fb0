//! Image types the renderer can produce

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Output image format
///
/// Each variant knows the format name passed to the renderer, the canonical
/// file extension appended to extension-less output names, and whether the
/// format has an alpha channel. Opaque formats get a white background by
/// default so transparent pages don't come out black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl ImageType {
    /// All supported types, in registry order
    pub const ALL: [ImageType; 3] = [ImageType::Png, ImageType::Jpeg, ImageType::Gif];

    /// Format name understood by the renderer
    pub fn format(self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpeg => "jpeg",
            ImageType::Gif => "gif",
        }
    }

    /// Canonical file extension (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpeg => "jpg",
            ImageType::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpeg => "image/jpeg",
            ImageType::Gif => "image/gif",
        }
    }

    /// Whether the format cannot represent transparency
    pub fn is_opaque(self) -> bool {
        matches!(self, ImageType::Jpeg)
    }

    /// Whether a quality setting affects the output
    pub fn is_lossy(self) -> bool {
        matches!(self, ImageType::Jpeg)
    }
}

impl FromStr for ImageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageType::Png),
            "jpg" | "jpeg" => Ok(ImageType::Jpeg),
            "gif" => Ok(ImageType::Gif),
            _ => Err(Error::UnknownImageFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("PNG".parse::<ImageType>().unwrap(), ImageType::Png);
        assert_eq!("jpg".parse::<ImageType>().unwrap(), ImageType::Jpeg);
        assert_eq!(" Jpeg ".parse::<ImageType>().unwrap(), ImageType::Jpeg);
        assert_eq!("gif".parse::<ImageType>().unwrap(), ImageType::Gif);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "tiff".parse::<ImageType>().unwrap_err();
        assert!(matches!(err, Error::UnknownImageFormat(ref f) if f == "tiff"));
    }

    #[test]
    fn only_jpeg_is_opaque() {
        let opaque: Vec<_> = ImageType::ALL.iter().filter(|t| t.is_opaque()).collect();
        assert_eq!(opaque, vec![&ImageType::Jpeg]);
        assert_eq!(ImageType::Jpeg.extension(), "jpg");
        assert_eq!(ImageType::Jpeg.format(), "jpeg");
        assert_eq!(ImageType::default(), ImageType::Png);
    }
}
