use dotenvy::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ASSETS_DIR: &str = "./assets";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_UPLOADS_DIR: &str = "./uploads";
pub const DEFAULT_VERIFICATION_URL: &str = "https://www.seha.sa/#/inquiries/slenquiry";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

pub const FONTS_DIR: &str = "fonts";
pub const ARABIC_BOLD_FONT: &str = "noto_sans_arabic/NotoSansArabic-Bold.ttf";
pub const ARABIC_REGULAR_FONT: &str = "noto_sans_arabic/NotoSansArabic-Regular.ttf";
pub const LATIN_BOLD_FONT: &str = "times_nr_mt/TimesNRMTPro-Bold.otf";
pub const LATIN_REGULAR_FONT: &str = "times_nr_mt/TimesNRMTPro-Regular.otf";

pub const AGENCY_LOGO_IMAGE: &str = "شعارصحةseha.jpg";
pub const GEOMETRIC_SHAPE_IMAGE: &str = "الشكلالهندسي.jpg";
pub const COUNTRY_NAME_IMAGE: &str = "كلمةالمملكةالعربيةالسعوديةKingdomofSaudiArabia.jpg";
pub const HOSPITAL_LOGO_IMAGE: &str = "شعارالمستشفى.png";
pub const HEALTH_INFO_CENTER_LOGO_IMAGE: &str = "شعارالمركزالوطنيللمعلوماتالصحية.jpg";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid SERVER_PORT '{0}'")]
    InvalidPort(String),
}

/// Where fonts and images are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn font(&self, relative: &str) -> PathBuf {
        self.root.join(FONTS_DIR).join(relative)
    }

    pub fn image(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new(DEFAULT_ASSETS_DIR)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub assets: AssetPaths,
    pub output_dir: PathBuf,
    /// Root that client supplied logo paths must resolve into.
    pub uploads_dir: PathBuf,
    pub verification_url: String,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            verification_url: DEFAULT_VERIFICATION_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match var("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        Ok(Self {
            assets: var("REPORT_ASSETS_DIR")
                .map(AssetPaths::new)
                .unwrap_or(defaults.assets),
            output_dir: var("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            uploads_dir: var("REPORT_UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            verification_url: var("REPORT_VERIFICATION_URL").unwrap_or(defaults.verification_url),
            host: var("SERVER_HOST").unwrap_or(defaults.host),
            port,
        })
    }

    /// Same configuration writing into `output_dir`.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_uploads_dir(mut self, uploads_dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = uploads_dir.into();
        self
    }

    pub fn with_assets_dir(mut self, assets_dir: impl Into<PathBuf>) -> Self {
        self.assets = AssetPaths::new(assets_dir);
        self
    }
}
