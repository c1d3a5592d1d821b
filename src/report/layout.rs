//! Fixed page template for the leave report.
//!
//! Every position, font, colour and merge rule lives here as data so the
//! template can be audited and tested without drawing anything. Coordinates
//! are millimetres from the top-left corner of the page.

use super::assets::ImageAsset;
use super::calendar::compute_duration;
use super::record::{FieldKey, Record};

pub const PAGE_WIDTH_MM: f32 = 297.0;
pub const PAGE_HEIGHT_MM: f32 = 419.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

pub const ACCENT: RgbColor = RgbColor(44, 62, 119); // #2c3e77
pub const LIGHT_FILL: RgbColor = RgbColor(247, 247, 247); // #f7f7f7
pub const LABEL_BLUE: RgbColor = RgbColor(54, 111, 181); // #366fb5
pub const TITLE_BLUE: RgbColor = RgbColor(48, 109, 181); // #306db5
pub const BORDER_GREY: RgbColor = RgbColor(217, 217, 217); // #d9d9d9
pub const LINK_BLUE: RgbColor = RgbColor(0, 0, 255);
pub const WHITE: RgbColor = RgbColor(255, 255, 255);
pub const BLACK: RgbColor = RgbColor(0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Arabic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub script: Script,
    pub weight: Weight,
    pub size_pt: f32,
}

impl FontSpec {
    pub const fn new(script: Script, weight: Weight, size_pt: f32) -> Self {
        Self { script, weight, size_pt }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// An axis-aligned box in page millimetres, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Fixed text drawn at a fixed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSlot {
    pub frame: Frame,
    pub font: FontSpec,
    pub color: RgbColor,
    pub align: Align,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSlot {
    pub asset: ImageAsset,
    pub frame: Frame,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSlot {
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub thickness_mm: f32,
    pub color: RgbColor,
}

// ---------------------------------------------------------------------------
// Header and titles
// ---------------------------------------------------------------------------

pub const HEADER_IMAGES: [ImageSlot; 3] = [
    ImageSlot { asset: ImageAsset::AgencyLogo, frame: Frame::new(11.0, 12.0, 56.0, 26.0) },
    ImageSlot { asset: ImageAsset::GeometricShape, frame: Frame::new(191.0, 12.0, 94.0, 40.0) },
    ImageSlot { asset: ImageAsset::CountryName, frame: Frame::new(100.0, 13.0, 94.0, 45.0) },
];

pub const TITLE_AR_TEXT: &str = "تقرير إجازة مرضية";
pub const TITLE_EN_TEXT: &str = "Sick Leave Report";

pub const TITLE_AR: TextSlot = TextSlot {
    frame: Frame::new(116.0, 57.0, 68.0, 10.0),
    font: FontSpec::new(Script::Arabic, Weight::Bold, 22.0),
    color: TITLE_BLUE,
    align: Align::Center,
};

pub const TITLE_EN: TextSlot = TextSlot {
    frame: Frame::new(123.0, 69.0, 52.0, 7.0),
    font: FontSpec::new(Script::Latin, Weight::Bold, 18.0),
    color: ACCENT,
    align: Align::Center,
};

// ---------------------------------------------------------------------------
// Main table
// ---------------------------------------------------------------------------

pub const TABLE_X: f32 = 12.5;
pub const TABLE_Y: f32 = 85.0;
pub const ROW_COUNT: usize = 11;
pub const COLUMN_COUNT: usize = 4;
pub const ROW_HEIGHT: f32 = 15.0;
pub const BORDER_WIDTH_MM: f32 = 0.5;

/// Column 0 Latin label, 1 Latin data, 2 Arabic data, 3 Arabic label.
pub const COLUMN_WIDTHS: [f32; COLUMN_COUNT] = [58.0, 83.0, 83.0, 48.0];

/// What a table row shows in its two data columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowContent {
    LeaveId,
    Duration,
    /// Latin and Arabic data columns.
    Pair(FieldKey, FieldKey),
    /// One value spanning both data columns.
    Merged(FieldKey),
}

pub struct RowSpec {
    pub label_en: &'static str,
    pub label_ar: &'static str,
    pub content: RowContent,
    pub fill: Option<RgbColor>,
    pub text_override: Option<RgbColor>,
}

pub const ROWS: [RowSpec; ROW_COUNT] = [
    RowSpec { label_en: "Leave ID", label_ar: "رمز الإجازة", content: RowContent::LeaveId, fill: None, text_override: None },
    RowSpec { label_en: "Leave Duration", label_ar: "مدة الإجازة", content: RowContent::Duration, fill: Some(ACCENT), text_override: Some(WHITE) },
    RowSpec {
        label_en: "Admission Date",
        label_ar: "تاريخ الدخول",
        content: RowContent::Pair(FieldKey::AdmissionDateGregorian, FieldKey::AdmissionDateHijri),
        fill: None,
        text_override: None,
    },
    RowSpec {
        label_en: "Discharge Date",
        label_ar: "تاريخ الخروج",
        content: RowContent::Pair(FieldKey::DischargeDateGregorian, FieldKey::DischargeDateHijri),
        fill: Some(LIGHT_FILL),
        text_override: None,
    },
    RowSpec { label_en: "Issue Date", label_ar: "تاريخ إصدار التقرير", content: RowContent::Merged(FieldKey::IssueDateGregorian), fill: None, text_override: None },
    RowSpec {
        label_en: "Name",
        label_ar: "الاسم",
        content: RowContent::Pair(FieldKey::PatientNameEn, FieldKey::PatientNameAr),
        fill: Some(LIGHT_FILL),
        text_override: None,
    },
    RowSpec { label_en: "National ID / Iqama", label_ar: "رقم الهوية / الإقامة", content: RowContent::Merged(FieldKey::IdNumber), fill: None, text_override: None },
    RowSpec {
        label_en: "Nationality",
        label_ar: "الجنسية",
        content: RowContent::Pair(FieldKey::NationalityEn, FieldKey::NationalityAr),
        fill: Some(LIGHT_FILL),
        text_override: None,
    },
    RowSpec {
        label_en: "Employer",
        label_ar: "جهة العمل",
        content: RowContent::Pair(FieldKey::EmployerEn, FieldKey::EmployerAr),
        fill: None,
        text_override: None,
    },
    RowSpec {
        label_en: "Practitioner Name",
        label_ar: "اسم الممارس",
        content: RowContent::Pair(FieldKey::DoctorNameEn, FieldKey::DoctorNameAr),
        fill: Some(LIGHT_FILL),
        text_override: None,
    },
    RowSpec {
        label_en: "Position",
        label_ar: "المسمى الوظيفي",
        content: RowContent::Pair(FieldKey::PositionEn, FieldKey::PositionAr),
        fill: None,
        text_override: None,
    },
];

/// Script, weight and colour of each column.
pub const COLUMN_STYLES: [(Script, Weight, RgbColor); COLUMN_COUNT] = [
    (Script::Latin, Weight::Bold, LABEL_BLUE),
    (Script::Latin, Weight::Regular, ACCENT),
    (Script::Arabic, Weight::Regular, ACCENT),
    (Script::Arabic, Weight::Bold, LABEL_BLUE),
];

/// Point size per (row, column). The Latin data column is smaller on the
/// rows that carry long names.
pub const FONT_SIZES: [[f32; COLUMN_COUNT]; ROW_COUNT] = [
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 11.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 11.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
    [13.0, 11.0, 13.0, 13.0],
    [13.0, 13.0, 13.0, 13.0],
];

pub const COLUMN_ALIGN: [Align; COLUMN_COUNT] = [Align::Center; COLUMN_COUNT];

/// Divider between the two halves of the lower table.
pub const TABLE_DIVIDER: LineSlot = LineSlot {
    from: (152.0, 254.0),
    to: (152.0, 335.0),
    thickness_mm: BORDER_WIDTH_MM,
    color: BORDER_GREY,
};

/// One computed table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCell {
    pub row: usize,
    pub col: usize,
    pub text: String,
    pub font: FontSpec,
    pub color: RgbColor,
    pub align: Align,
    pub fill: Option<RgbColor>,
    /// This cell also spans the next column.
    pub merge_next: bool,
    /// Swallowed by the merge of the previous column; not drawn.
    pub covered: bool,
    pub frame: Frame,
}

pub fn is_merged_row(row: usize) -> bool {
    matches!(ROWS.get(row).map(|r| r.content), Some(RowContent::LeaveId | RowContent::Merged(_)))
}

fn column_x(col: usize) -> f32 {
    TABLE_X + COLUMN_WIDTHS[..col].iter().sum::<f32>()
}

/// English and Arabic leave duration strings.
pub fn duration_texts(record: &Record) -> (String, String) {
    let admission = record.get(FieldKey::AdmissionDateGregorian);
    let discharge = record.get(FieldKey::DischargeDateGregorian);
    let days = compute_duration(admission, discharge);
    let day_word = if days == 1 { "day" } else { "days" };

    let en = format!("{days} {day_word} ({admission} to {discharge})");
    let ar = format!(
        "{} يوم ({} إلى {})",
        days,
        record.get(FieldKey::AdmissionDateHijri),
        record.get(FieldKey::DischargeDateHijri)
    );
    (en, ar)
}

fn row_texts(row_spec: &RowSpec, record: &Record, leave_id: &str) -> [String; COLUMN_COUNT] {
    let (latin, arabic) = match row_spec.content {
        RowContent::LeaveId => (leave_id.to_string(), String::new()),
        RowContent::Duration => duration_texts(record),
        RowContent::Pair(en, ar) => (record.get(en).to_string(), record.get(ar).to_string()),
        RowContent::Merged(key) => (record.get(key).to_string(), String::new()),
    };
    [row_spec.label_en.to_string(), latin, arabic, row_spec.label_ar.to_string()]
}

/// All 44 table cells for `record`, in row-major logical column order.
pub fn table_cells(record: &Record, leave_id: &str) -> Vec<LayoutCell> {
    let mut cells = Vec::with_capacity(ROW_COUNT * COLUMN_COUNT);

    for (row, row_spec) in ROWS.iter().enumerate() {
        let texts = row_texts(row_spec, record, leave_id);
        let merged = is_merged_row(row);
        let y = TABLE_Y + ROW_HEIGHT * row as f32;

        for (col, text) in texts.into_iter().enumerate() {
            let (script, weight, color) = COLUMN_STYLES[col];
            let merge_next = merged && col == 1;
            let width = if merge_next {
                COLUMN_WIDTHS[1] + COLUMN_WIDTHS[2]
            } else {
                COLUMN_WIDTHS[col]
            };

            cells.push(LayoutCell {
                row,
                col,
                text,
                font: FontSpec::new(script, weight, FONT_SIZES[row][col]),
                color: row_spec.text_override.unwrap_or(color),
                align: if merge_next { Align::Center } else { COLUMN_ALIGN[col] },
                fill: row_spec.fill,
                merge_next,
                covered: merged && col == 2,
                frame: Frame::new(column_x(col), y, width, ROW_HEIGHT),
            });
        }
    }

    cells
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub const QR_FRAME: Frame = Frame::new(60.0, 265.0, 42.0, 40.0);
pub const FACILITY_LOGO_FRAME: Frame = Frame::new(203.0, 266.0, 43.0, 42.0);
pub const HEALTH_CENTER_LOGO: ImageSlot = ImageSlot {
    asset: ImageAsset::HealthInfoCenterLogo,
    frame: Frame::new(231.0, 336.0, 54.0, 26.0),
};

pub const FACILITY_NAME_AR: TextSlot = TextSlot {
    frame: Frame::new(188.0, 309.0, 67.0, 10.0),
    font: FontSpec::new(Script::Arabic, Weight::Bold, 12.0),
    color: BLACK,
    align: Align::Center,
};

pub const FACILITY_NAME_EN: TextSlot = TextSlot {
    frame: Frame::new(188.0, 320.0, 67.0, 10.0),
    font: FontSpec::new(Script::Latin, Weight::Bold, 12.0),
    color: BLACK,
    align: Align::Center,
};

pub const VERIFY_AR_TEXT: &str =
    "للتحقق من بيانات التقرير يرجى التأكد من زيارة موقع منصة صحة الرسمي";
pub const VERIFY_EN_TEXT: &str = "To Check the report please visit seha's official website";

pub const VERIFY_AR: TextSlot = TextSlot {
    frame: Frame::new(24.0, 308.0, 112.0, 10.0),
    font: FontSpec::new(Script::Arabic, Weight::Bold, 11.0),
    color: BLACK,
    align: Align::Center,
};

pub const VERIFY_EN: TextSlot = TextSlot {
    frame: Frame::new(24.0, 318.0, 112.0, 10.0),
    font: FontSpec::new(Script::Latin, Weight::Bold, 11.0),
    color: BLACK,
    align: Align::Center,
};

pub const LINK: TextSlot = TextSlot {
    frame: Frame::new(48.0, 330.0, 60.0, 7.0),
    font: FontSpec::new(Script::Latin, Weight::Bold, 11.0),
    color: LINK_BLUE,
    align: Align::Center,
};

pub const LINK_UNDERLINE: LineSlot = LineSlot {
    from: (48.0, 337.0),
    to: (108.0, 337.0),
    thickness_mm: 0.2,
    color: LINK_BLUE,
};

pub const TIME: TextSlot = TextSlot {
    frame: Frame::new(11.0, 339.0, 20.0, 6.0),
    font: FontSpec::new(Script::Latin, Weight::Bold, 12.0),
    color: BLACK,
    align: Align::Left,
};

pub const RENDER_DATE: TextSlot = TextSlot {
    frame: Frame::new(11.0, 347.0, 47.0, 6.0),
    font: FontSpec::new(Script::Latin, Weight::Bold, 12.0),
    color: BLACK,
    align: Align::Left,
};
