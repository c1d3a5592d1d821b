//! PDF rendering of the leave report template.
//!
//! Draws the header images, titles, the main table and the footer onto a
//! single page, then writes the file. Everything decorative degrades to a
//! logged warning; only saving and writing the document can fail.

use chrono::Local;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    Color, ImageTransform, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon, Rgb,
};
use qrcode::QrCode;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::assets::{load_asset, load_image, resolve_upload, FontSet, ImageAsset, LoadedImage};
use super::calendar::current_gregorian_date;
use super::common::{format_render_date, output_filename};
use super::layout::{
    self, Align, Frame, LayoutCell, LineSlot, RgbColor, TextSlot, BORDER_GREY, BORDER_WIDTH_MM,
    PAGE_HEIGHT_MM, PAGE_WIDTH_MM, WHITE,
};
use super::parser::{DEFAULT_HOSPITAL_NAME_AR, DEFAULT_HOSPITAL_NAME_EN, DEFAULT_TIME};
use super::record::{FieldKey, Record};
use super::shaping::{contains_arabic, shape_arabic};
use super::ReportError;
use crate::config::{AppConfig, AssetPaths};

const DOCUMENT_TITLE: &str = "Sick Leave Report";
const IMAGE_DPI: f32 = 300.0;
const PT_PER_MM: f32 = 72.0 / 25.4;
/// Cell padding applied to left and right aligned text.
const CELL_MARGIN_MM: f32 = 1.0;
/// Blank modules around the QR symbol.
const QR_QUIET_ZONE: usize = 5;

/// A report written to disk.
#[derive(Debug)]
pub struct RenderedReport {
    pub filename: String,
    pub path: PathBuf,
    pub pdf: Vec<u8>,
}

/// Stateless renderer; one instance can serve concurrent renders.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    assets: AssetPaths,
    output_dir: PathBuf,
    uploads_dir: PathBuf,
    verification_url: String,
}

impl ReportRenderer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            assets: config.assets.clone(),
            output_dir: config.output_dir.clone(),
            uploads_dir: config.uploads_dir.clone(),
            verification_url: config.verification_url.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Render `record` and write it to the output directory.
    ///
    /// `requester` only appears in logs.
    pub fn render(
        &self,
        record: &Record,
        leave_id: &str,
        requester: &str,
    ) -> Result<RenderedReport, ReportError> {
        let pdf = self.render_document(record, leave_id)?;

        let id_number = record.get_non_empty(FieldKey::IdNumber).unwrap_or("UNKNOWN");
        let issue_date = record
            .get_non_empty(FieldKey::IssueDateGregorian)
            .map(str::to_string)
            .unwrap_or_else(current_gregorian_date);
        let filename = output_filename(id_number, &issue_date);
        let path = write_atomically(&self.output_dir, &filename, &pdf)?;

        log::info!(
            "Rendered {} for {} ({} bytes) to {}",
            leave_id,
            requester,
            pdf.len(),
            path.display()
        );

        Ok(RenderedReport { filename, path, pdf })
    }

    /// Render `record` to PDF bytes without touching the output directory.
    pub fn render_document(&self, record: &Record, leave_id: &str) -> Result<Vec<u8>, ReportError> {
        let (doc, page, layer) = PdfDocument::new(
            DOCUMENT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let fonts = FontSet::load(&doc, &self.assets)?;
        let canvas = Canvas {
            layer: doc.get_page(page).get_layer(layer),
            fonts: &fonts,
        };

        self.draw_header(&canvas);
        draw_titles(&canvas);
        draw_table(&canvas, &layout::table_cells(record, leave_id));
        self.draw_footer(&canvas, record);

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ReportError::Pdf(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ReportError::Pdf(format!("PDF buffer error: {e}")))
    }

    fn draw_header(&self, canvas: &Canvas) {
        for slot in layout::HEADER_IMAGES {
            if let Some(image) = load_asset(&self.assets, slot.asset) {
                canvas.image(image, slot.frame);
            }
        }
    }

    fn draw_footer(&self, canvas: &Canvas, record: &Record) {
        match QrCode::new(self.verification_url.as_bytes()) {
            Ok(code) => canvas.qr_code(&code, layout::QR_FRAME),
            Err(e) => log::warn!("QR code skipped: {}", e),
        }

        if let Some((_, logo)) = self.facility_logo(record) {
            canvas.image(logo, layout::FACILITY_LOGO_FRAME);
        }

        let name_ar = record
            .get_non_empty(FieldKey::HospitalNameAr)
            .unwrap_or(DEFAULT_HOSPITAL_NAME_AR);
        let name_en = record
            .get_non_empty(FieldKey::HospitalNameEn)
            .unwrap_or(DEFAULT_HOSPITAL_NAME_EN);
        canvas.text_in(name_ar, &layout::FACILITY_NAME_AR);
        canvas.text_in(name_en, &layout::FACILITY_NAME_EN);

        canvas.text_in(layout::VERIFY_AR_TEXT, &layout::VERIFY_AR);
        canvas.text_in(layout::VERIFY_EN_TEXT, &layout::VERIFY_EN);
        canvas.text_in(&self.verification_url, &layout::LINK);
        canvas.line(&layout::LINK_UNDERLINE);

        if let Some(logo) = load_asset(&self.assets, layout::HEALTH_CENTER_LOGO.asset) {
            canvas.image(logo, layout::HEALTH_CENTER_LOGO.frame);
        }

        let time = record.get_non_empty(FieldKey::Time).unwrap_or(DEFAULT_TIME);
        canvas.text_in(time, &layout::TIME);
        canvas.text_in(&format_render_date(Local::now().naive_local()), &layout::RENDER_DATE);
    }

    /// Custom logo from the uploads directory when readable, else the
    /// default hospital logo.
    fn facility_logo(&self, record: &Record) -> Option<(PathBuf, LoadedImage)> {
        if let Some(custom) = record.get_non_empty(FieldKey::CustomLogo) {
            match resolve_upload(&self.uploads_dir, custom) {
                Ok(path) => match load_image(&path) {
                    Some(image) => return Some((path, image)),
                    None => log::warn!("Custom logo {} unusable, using default logo", custom),
                },
                Err(e) => log::warn!("Custom logo rejected: {}", e),
            }
        }
        let path = self.assets.image(ImageAsset::HospitalLogo.file_name());
        load_image(&path).map(|image| (path, image))
    }
}

fn draw_titles(canvas: &Canvas) {
    canvas.text_in(layout::TITLE_AR_TEXT, &layout::TITLE_AR);
    canvas.text_in(layout::TITLE_EN_TEXT, &layout::TITLE_EN);
}

fn draw_table(canvas: &Canvas, cells: &[LayoutCell]) {
    canvas.set_outline(BORDER_GREY, BORDER_WIDTH_MM);

    for cell in cells.iter().filter(|cell| !cell.covered) {
        match cell.fill {
            Some(fill) => {
                canvas.set_fill(fill);
                canvas.rect(cell.frame, PaintMode::FillStroke);
            }
            None => canvas.rect(cell.frame, PaintMode::Stroke),
        }

        canvas.text(&cell.text, cell.frame, cell.font, cell.color, cell.align);
    }
    log::debug!("Table drawn with {} cells", cells.len());

    canvas.line(&layout::TABLE_DIVIDER);
}

/// Convert a top-left millimetre y coordinate to the PDF bottom-left origin.
fn flip_y(y: f32) -> f32 {
    PAGE_HEIGHT_MM - y
}

fn pdf_color(color: RgbColor) -> Color {
    let RgbColor(r, g, b) = color;
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(flip_y(y))), false)
}

/// Drawing primitives in template coordinates.
struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a FontSet,
}

impl Canvas<'_> {
    fn set_fill(&self, color: RgbColor) {
        self.layer.set_fill_color(pdf_color(color));
    }

    fn set_outline(&self, color: RgbColor, width_mm: f32) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(width_mm * PT_PER_MM);
    }

    fn rect(&self, frame: Frame, mode: PaintMode) {
        let ring = vec![
            point(frame.x, frame.y),
            point(frame.x + frame.w, frame.y),
            point(frame.x + frame.w, frame.y + frame.h),
            point(frame.x, frame.y + frame.h),
        ];
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn line(&self, slot: &LineSlot) {
        self.set_outline(slot.color, slot.thickness_mm);
        self.layer.add_line(Line {
            points: vec![point(slot.from.0, slot.from.1), point(slot.to.0, slot.to.1)],
            is_closed: false,
        });
    }

    fn text_in(&self, text: &str, slot: &TextSlot) {
        self.text(text, slot.frame, slot.font, slot.color, slot.align);
    }

    /// Single-line text vertically centred in `frame`.
    fn text(&self, text: &str, frame: Frame, font: layout::FontSpec, color: RgbColor, align: Align) {
        if text.is_empty() {
            return;
        }
        let text = if contains_arabic(text) {
            shape_arabic(text)
        } else {
            text.to_string()
        };

        let face = self.fonts.get(font.script, font.weight);
        let width = face.text_width_mm(&text, font.size_pt);
        let x = match align {
            Align::Left => frame.x + CELL_MARGIN_MM,
            Align::Center => frame.x + (frame.w - width) / 2.0,
            Align::Right => frame.x + frame.w - CELL_MARGIN_MM - width,
        };
        let baseline = frame.y + frame.h / 2.0 + 0.3 * font.size_pt / PT_PER_MM;

        self.set_fill(color);
        self.layer
            .use_text(text, font.size_pt, Mm(x), Mm(flip_y(baseline)), &face.pdf);
    }

    fn image(&self, loaded: LoadedImage, frame: Frame) {
        let native_w = loaded.width_px as f32 / IMAGE_DPI * 25.4;
        let native_h = loaded.height_px as f32 / IMAGE_DPI * 25.4;
        if native_w <= 0.0 || native_h <= 0.0 {
            log::warn!("Empty image skipped at ({}, {})", frame.x, frame.y);
            return;
        }

        loaded.image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(frame.x)),
                translate_y: Some(Mm(flip_y(frame.y + frame.h))),
                scale_x: Some(frame.w / native_w),
                scale_y: Some(frame.h / native_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
    }

    /// Vector QR symbol stretched to `frame`, dark runs merged per row.
    fn qr_code(&self, code: &QrCode, frame: Frame) {
        let modules = code.width();
        let total = (modules + 2 * QR_QUIET_ZONE) as f32;
        let module_w = frame.w / total;
        let module_h = frame.h / total;
        let colors = code.to_colors();

        self.set_fill(WHITE);
        self.rect(frame, PaintMode::Fill);
        self.set_fill(RgbColor(0, 0, 0));

        for row in 0..modules {
            let mut col = 0;
            while col < modules {
                if colors[row * modules + col] != qrcode::Color::Dark {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < modules && colors[row * modules + col] == qrcode::Color::Dark {
                    col += 1;
                }
                self.rect(
                    Frame::new(
                        frame.x + (QR_QUIET_ZONE + start) as f32 * module_w,
                        frame.y + (QR_QUIET_ZONE + row) as f32 * module_h,
                        (col - start) as f32 * module_w,
                        module_h,
                    ),
                    PaintMode::Fill,
                );
            }
        }
    }
}

/// Write through a unique temporary file in `dir`, then move it into place.
fn write_atomically(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(filename);
    let output_error = |source| ReportError::Output {
        path: path.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(output_error)?;
    tmp.write_all(bytes).map_err(output_error)?;
    tmp.flush().map_err(output_error)?;
    tmp.persist(&path).map_err(|e| output_error(e.error))?;

    Ok(path)
}
