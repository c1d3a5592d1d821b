//! Fonts and images read from the assets directory.
//!
//! Nothing here is fatal: a font that cannot be read falls back to a
//! built-in PDF face and an image that cannot be decoded is skipped.

use image::DynamicImage;
use printpdf::{BuiltinFont, Image, IndirectFontRef, PdfDocumentReference};
use rusttype::{point, Font, Scale};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::layout::{Script, Weight};
use super::ReportError;
use crate::config::{
    AssetPaths, AGENCY_LOGO_IMAGE, ARABIC_BOLD_FONT, ARABIC_REGULAR_FONT, COUNTRY_NAME_IMAGE,
    GEOMETRIC_SHAPE_IMAGE, HEALTH_INFO_CENTER_LOGO_IMAGE, HOSPITAL_LOGO_IMAGE, LATIN_BOLD_FONT,
    LATIN_REGULAR_FONT,
};

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Fixed images of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAsset {
    AgencyLogo,
    GeometricShape,
    CountryName,
    HospitalLogo,
    HealthInfoCenterLogo,
}

impl ImageAsset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::AgencyLogo => AGENCY_LOGO_IMAGE,
            Self::GeometricShape => GEOMETRIC_SHAPE_IMAGE,
            Self::CountryName => COUNTRY_NAME_IMAGE,
            Self::HospitalLogo => HOSPITAL_LOGO_IMAGE,
            Self::HealthInfoCenterLogo => HEALTH_INFO_CENTER_LOGO_IMAGE,
        }
    }
}

/// A font registered with the document plus what is needed to measure it.
pub struct LoadedFont {
    pub pdf: IndirectFontRef,
    metrics: Option<Font<'static>>,
    /// Average advance in em used when no metrics are available.
    average_advance: f32,
}

impl LoadedFont {
    pub fn is_builtin(&self) -> bool {
        self.metrics.is_none()
    }

    /// Width of `text` in millimetres at `size_pt`.
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        match &self.metrics {
            Some(font) => measure(font, text, size_pt) * MM_PER_PT,
            None => text.chars().count() as f32 * self.average_advance * size_pt * MM_PER_PT,
        }
    }
}

// rusttype scales by ascent-descent height, convert so one unit is one em.
fn measure(font: &Font<'static>, text: &str, size_pt: f32) -> f32 {
    let units_per_em = f32::from(font.units_per_em());
    let v = font.v_metrics_unscaled();
    let height_units = v.ascent - v.descent;
    if units_per_em <= 0.0 || height_units <= 0.0 {
        return 0.0;
    }
    let scale = Scale::uniform(size_pt * height_units / units_per_em);

    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// The four faces used on the page.
pub struct FontSet {
    arabic_bold: LoadedFont,
    arabic_regular: LoadedFont,
    latin_bold: LoadedFont,
    latin_regular: LoadedFont,
}

impl FontSet {
    pub fn load(doc: &PdfDocumentReference, assets: &AssetPaths) -> Result<Self, ReportError> {
        Ok(Self {
            arabic_bold: load_font(doc, &assets.font(ARABIC_BOLD_FONT), BuiltinFont::HelveticaBold, 0.55)?,
            arabic_regular: load_font(doc, &assets.font(ARABIC_REGULAR_FONT), BuiltinFont::Helvetica, 0.55)?,
            latin_bold: load_font(doc, &assets.font(LATIN_BOLD_FONT), BuiltinFont::TimesBold, 0.5)?,
            latin_regular: load_font(doc, &assets.font(LATIN_REGULAR_FONT), BuiltinFont::TimesRoman, 0.5)?,
        })
    }

    pub fn get(&self, script: Script, weight: Weight) -> &LoadedFont {
        match (script, weight) {
            (Script::Arabic, Weight::Bold) => &self.arabic_bold,
            (Script::Arabic, Weight::Regular) => &self.arabic_regular,
            (Script::Latin, Weight::Bold) => &self.latin_bold,
            (Script::Latin, Weight::Regular) => &self.latin_regular,
        }
    }
}

fn load_font(
    doc: &PdfDocumentReference,
    path: &Path,
    builtin: BuiltinFont,
    average_advance: f32,
) -> Result<LoadedFont, ReportError> {
    match fs::read(path) {
        Ok(bytes) => match doc.add_external_font(bytes.as_slice()) {
            Ok(pdf) => {
                let metrics = Font::try_from_vec(bytes);
                if metrics.is_none() {
                    log::warn!("No metrics for {}, centring is estimated", path.display());
                }
                return Ok(LoadedFont { pdf, metrics, average_advance });
            }
            Err(e) => log::warn!("Font {} rejected: {}; using {:?}", path.display(), e, builtin),
        },
        Err(e) => log::warn!("Font {} unavailable: {}; using {:?}", path.display(), e, builtin),
    }

    let pdf = doc
        .add_builtin_font(builtin)
        .map_err(|e| ReportError::Pdf(format!("built-in font error: {e}")))?;
    Ok(LoadedFont { pdf, metrics: None, average_advance })
}

/// A decoded image ready to be placed on a layer.
pub struct LoadedImage {
    pub image: Image,
    pub width_px: u32,
    pub height_px: u32,
}

/// Decode an image file. Missing or broken files yield `None` with a warning.
pub fn load_image(path: &Path) -> Option<LoadedImage> {
    if !path.is_file() {
        log::warn!("Image {} not found, skipping", path.display());
        return None;
    }
    match image::open(path) {
        Ok(decoded) => {
            // Flatten alpha onto RGB.
            let rgb = decoded.to_rgb8();
            let (width_px, height_px) = rgb.dimensions();
            Some(LoadedImage {
                image: Image::from_dynamic_image(&DynamicImage::ImageRgb8(rgb)),
                width_px,
                height_px,
            })
        }
        Err(e) => {
            log::warn!("Image {} could not be decoded: {}", path.display(), e);
            None
        }
    }
}

pub fn load_asset(assets: &AssetPaths, asset: ImageAsset) -> Option<LoadedImage> {
    load_image(&assets.image(asset.file_name()))
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("'{path}' cannot be resolved: {source}")]
    Unresolvable {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("'{0}' is outside the uploads directory")]
    OutsideUploads(String),
}

/// Resolve an uploaded file path, relative or absolute, inside `uploads_dir`.
///
/// Symlinks and `..` are resolved before the containment check.
pub fn resolve_upload(uploads_dir: &Path, raw: &str) -> Result<PathBuf, UploadError> {
    let unresolvable = |source| UploadError::Unresolvable {
        path: raw.to_string(),
        source,
    };
    let root = uploads_dir.canonicalize().map_err(unresolvable)?;
    let resolved = root.join(raw).canonicalize().map_err(unresolvable)?;

    if resolved.starts_with(&root) && resolved != root {
        Ok(resolved)
    } else {
        Err(UploadError::OutsideUploads(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::{Mm, PdfDocument};

    #[test]
    fn test_missing_fonts_fall_back_to_builtin() {
        let (doc, _, _) = PdfDocument::new("test", Mm(10.0), Mm(10.0), "Layer 1");
        let assets = AssetPaths::new("/nonexistent/assets");
        let fonts = FontSet::load(&doc, &assets).unwrap();

        let font = fonts.get(Script::Latin, Weight::Bold);
        assert!(font.is_builtin());
        assert!(font.text_width_mm("Leave ID", 13.0) > 0.0);
        assert_eq!(font.text_width_mm("", 13.0), 0.0);
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let assets = AssetPaths::new("/nonexistent/assets");
        assert!(load_asset(&assets, ImageAsset::AgencyLogo).is_none());
    }

    #[test]
    fn test_undecodable_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(load_image(&path).is_none());
    }

    #[test]
    fn test_external_font_is_measured() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("fonts").join(LATIN_BOLD_FONT);
        std::fs::create_dir_all(font_path.parent().unwrap()).unwrap();
        std::fs::write(&font_path, include_bytes!("../../tests/fixtures/fonts/RobotoMedium.ttf")).unwrap();

        let (doc, _, _) = PdfDocument::new("test", Mm(10.0), Mm(10.0), "Layer 1");
        let fonts = FontSet::load(&doc, &AssetPaths::new(dir.path())).unwrap();

        let latin = fonts.get(Script::Latin, Weight::Bold);
        assert!(!latin.is_builtin());
        assert!(latin.text_width_mm("WWWW", 13.0) > latin.text_width_mm("iiii", 13.0));
        assert!(fonts.get(Script::Arabic, Weight::Bold).is_builtin());
    }

    #[test]
    fn test_upload_inside_root_resolves() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("logos")).unwrap();
        std::fs::write(dir.path().join("logos/clinic.png"), b"x").unwrap();

        let relative = resolve_upload(dir.path(), "logos/clinic.png").unwrap();
        let absolute = resolve_upload(dir.path(), dir.path().join("logos/clinic.png").to_str().unwrap()).unwrap();
        assert_eq!(relative, absolute);
    }

    #[test]
    fn test_upload_outside_root_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        std::fs::create_dir(&uploads).unwrap();
        let secret = root.path().join("private_scan.png");
        std::fs::write(&secret, b"x").unwrap();

        assert!(matches!(
            resolve_upload(&uploads, secret.to_str().unwrap()),
            Err(UploadError::OutsideUploads(_))
        ));
        assert!(matches!(
            resolve_upload(&uploads, "../private_scan.png"),
            Err(UploadError::OutsideUploads(_))
        ));
        assert!(matches!(
            resolve_upload(&uploads, "missing.png"),
            Err(UploadError::Unresolvable { .. })
        ));
    }
}
