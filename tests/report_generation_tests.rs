use std::fs;
use std::path::Path;

use leave_report_server::config::{
    AppConfig, AssetPaths, ARABIC_BOLD_FONT, ARABIC_REGULAR_FONT, LATIN_BOLD_FONT,
    LATIN_REGULAR_FONT,
};
use leave_report_server::report::generator::prepare_record;
use leave_report_server::report::assets::ImageAsset;
use leave_report_server::report::layout::{table_cells, COLUMN_COUNT, ROW_COUNT};
use leave_report_server::report::{FieldKey, Record, ReportError, ReportGenerator};

fn generator(output: &std::path::Path) -> ReportGenerator {
    let config = AppConfig::default()
        .with_assets_dir("/nonexistent/assets")
        .with_output_dir(output);
    ReportGenerator::new(&config)
}

fn full_record() -> Record {
    Record::new()
        .with(FieldKey::PatientNameAr, "عبدالله محمد علي")
        .with(FieldKey::PatientNameEn, "Abdullah Mohammed Ali")
        .with(FieldKey::IdNumber, "828287654")
        .with(FieldKey::NationalityAr, "السعودية")
        .with(FieldKey::NationalityEn, "Saudi Arabia")
        .with(FieldKey::EmployerAr, "طالب جامعي")
        .with(FieldKey::EmployerEn, "University Student")
        .with(FieldKey::DoctorNameAr, "المقبني")
        .with(FieldKey::DoctorNameEn, "Almakbany")
        .with(FieldKey::PositionAr, "طبيب عام")
        .with(FieldKey::PositionEn, "General")
        .with(FieldKey::AdmissionDateGregorian, "20-09-2025")
        .with(FieldKey::DischargeDateGregorian, "21-09-2025")
        .with(FieldKey::HospitalNameAr, "مستشفى الملك فيصل التخصصي")
        .with(FieldKey::HospitalNameEn, "King Faisal Specialist Hospital")
        .with(FieldKey::Time, "10:20 AM")
}

#[test]
fn test_generate_from_record() {
    let dir = tempfile::tempdir().unwrap();
    let report = generator(dir.path())
        .generate_from_record(full_record(), "tester")
        .unwrap();

    assert_eq!(report.leave_id, "PSL76540252025");
    assert_eq!(report.issue_date, "21-09-2025");
    assert_eq!(report.filename, "Sick Leave828287654_21092025.pdf");
    assert!(report.pdf.starts_with(b"%PDF"));
    assert!(report.degraded.is_empty());
    assert_eq!(fs::read(&report.path).unwrap(), report.pdf);
}

#[test]
fn test_generate_from_empty_record() {
    let dir = tempfile::tempdir().unwrap();
    let report = generator(dir.path())
        .generate_from_record(Record::new(), "tester")
        .unwrap();

    assert!(!report.pdf.is_empty());
    assert!(report.pdf.starts_with(b"%PDF"));
    assert!(report.path.exists());
}

#[test]
fn test_generate_from_unstructured_message() {
    let dir = tempfile::tempdir().unwrap();
    let result = generator(dir.path()).generate_from_message("just some text", "tester");
    assert!(matches!(result, Err(ReportError::NotStructured)));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_concurrent_renders_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(dir.path());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let generator = &generator;
                scope.spawn(move || {
                    let record = full_record().with(FieldKey::IdNumber, format!("10000000{i}"));
                    generator.generate_from_record(record, "tester").unwrap()
                })
            })
            .collect();
        for handle in handles {
            let report = handle.join().unwrap();
            assert_eq!(fs::read(&report.path).unwrap(), report.pdf);
        }
    });

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 4);
}

#[test]
fn test_table_cells_identical_for_same_record() {
    let first = prepare_record(full_record());
    let second = prepare_record(full_record());

    let a = table_cells(&first.record, &first.leave_id);
    let b = table_cells(&second.record, &second.leave_id);
    assert_eq!(a.len(), ROW_COUNT * COLUMN_COUNT);
    assert_eq!(a, b);
}

#[test]
fn test_duration_row_uses_enriched_dates() {
    let prepared = prepare_record(full_record());
    let cells = table_cells(&prepared.record, &prepared.leave_id);

    assert_eq!(cells[COLUMN_COUNT + 1].text, "2 days (20-09-2025 to 21-09-2025)");
    assert_eq!(cells[COLUMN_COUNT + 2].text, "2 يوم (27-03-1447 إلى 28-03-1447)");
}

fn write_image(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_fn(width, height, |x, y| image::Rgb([(x * 3) as u8, (y * 5) as u8, 200]))
        .save(path)
        .unwrap();
}

fn generator_with_assets(root: &Path) -> (ReportGenerator, AppConfig) {
    let assets = AssetPaths::new(root.join("assets"));
    for font in [ARABIC_BOLD_FONT, ARABIC_REGULAR_FONT, LATIN_BOLD_FONT, LATIN_REGULAR_FONT] {
        let path = assets.font(font);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, include_bytes!("fixtures/fonts/RobotoMedium.ttf")).unwrap();
    }
    for asset in [
        ImageAsset::AgencyLogo,
        ImageAsset::GeometricShape,
        ImageAsset::CountryName,
        ImageAsset::HospitalLogo,
        ImageAsset::HealthInfoCenterLogo,
    ] {
        write_image(&assets.image(asset.file_name()), 60, 30);
    }
    fs::create_dir_all(root.join("uploads")).unwrap();

    let config = AppConfig::default()
        .with_assets_dir(root.join("assets"))
        .with_uploads_dir(root.join("uploads"))
        .with_output_dir(root.join("output"));
    (ReportGenerator::new(&config), config)
}

#[test]
fn test_generate_with_full_asset_set() {
    let dir = tempfile::tempdir().unwrap();
    let (generator, config) = generator_with_assets(dir.path());
    write_image(&config.uploads_dir.join("clinic.png"), 200, 200);

    let plain = generator.generate_from_record(full_record(), "tester").unwrap();
    let branded = generator
        .generate_from_record(full_record().with(FieldKey::CustomLogo, "clinic.png"), "tester")
        .unwrap();

    assert!(plain.pdf.starts_with(b"%PDF"));
    assert!(plain.degraded.is_empty());
    assert!(branded.degraded.is_empty());
    assert!(branded.pdf.len() > plain.pdf.len());
    assert_eq!(fs::read(&branded.path).unwrap(), branded.pdf);
}
