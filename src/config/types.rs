use segcut_av::{SplitOptions, Toolchain, DEFAULT_ARCHIVE_NAME};
use segcut_timeline::{EditError, EngineSettings, NameTemplate, SegmentLength, DEFAULT_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub segments: SegmentsConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentsConfig {
    /// Default segment length, `"90"` or `"HH:MM:SS"`.
    #[serde(default = "default_length")]
    pub length: String,

    #[serde(default = "default_keep_locked")]
    pub keep_locked: bool,

    /// Supports `{n}`, `{nn}` and `{base}`.
    #[serde(default = "default_name_template")]
    pub name_template: String,

    #[serde(default)]
    pub strict_anchors: bool,
}

fn default_length() -> String {
    "60".to_string()
}
fn default_keep_locked() -> bool {
    true
}
fn default_name_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            keep_locked: default_keep_locked(),
            name_template: default_name_template(),
            strict_anchors: false,
        }
    }
}

impl SegmentsConfig {
    pub fn segment_length(&self) -> Result<SegmentLength, EditError> {
        SegmentLength::parse(&self.length)
    }

    /// Engine settings seeded from this section.
    pub fn engine_settings(&self) -> Result<EngineSettings, EditError> {
        let mut settings = EngineSettings::default()
            .with_length(self.segment_length()?)
            .with_template(NameTemplate::new(self.name_template.clone()));
        settings.keep_locked = self.keep_locked;
        settings.strict_anchors = self.strict_anchors;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Where parts are written when no directory is given. Defaults to
    /// `./Output`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_archive_name")]
    pub archive_name: String,
}

fn default_extension() -> String {
    "mp3".to_string()
}
fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            extension: default_extension(),
            archive_name: default_archive_name(),
        }
    }
}

impl ExportConfig {
    /// The output directory with `~` expanded, made absolute against the
    /// working directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        let dir = match &self.output_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref()),
            None => PathBuf::from("Output"),
        };
        if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir().unwrap_or_default().join(dir)
        }
    }

    pub fn split_options(&self, archive: bool) -> SplitOptions {
        SplitOptions {
            extension: self.extension.clone(),
            archive: archive.then(|| self.archive_name.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::with_overrides(self.ffmpeg_path.as_deref(), self.ffprobe_path.as_deref())
    }
}
