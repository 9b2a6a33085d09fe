//! Canvas configuration for SchemaCanvas
//!
//! Every diagram scene owns one `CanvasConfig`, so several open diagrams
//! can use different grids, page layouts and interaction settings.
//! Supports JSON and TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Grid settings (size, snapping, pattern)
//! - Page settings (paper, orientation, margins, delimiters)
//! - Interaction settings (auto-scroll, range selection, timers)
//! - Layer decoration settings
//! - Print scale bounds

use crate::error::{ConfigError, ConfigResult, SettingsResult};
use schemacanvas_core::constants::{
    CORNER_HOVER_TIMEOUT_MS, DEFAULT_GRID_SIZE, DEFAULT_LAYER_NAME, LAYER_LABEL_HEIGHT,
    LAYER_PADDING, MAX_SCALE_FACTOR, MIN_GRID_SIZE, MIN_SCALE_FACTOR, OBJECT_MOVE_TIMEOUT_MS,
    POINTS_PER_MM, SCENE_MOVE_STEP, SCENE_MOVE_THRESHOLD, SCENE_MOVE_TIMEOUT_MS,
};
use schemacanvas_core::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Grid drawing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridPattern {
    #[default]
    Square,
    Dot,
}

/// Grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Grid cell size in canvas units (never below 20)
    pub size: u32,
    /// Snap objects to the grid when they settle
    pub align_objects_to_grid: bool,
    /// Whether the grid is drawn
    pub show_grid: bool,
    /// Grid pattern
    #[serde(default)]
    pub pattern: GridPattern,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            align_objects_to_grid: false,
            show_grid: true,
            pattern: GridPattern::default(),
        }
    }
}

impl GridSettings {
    /// Sets the grid size, raising it to the minimum when smaller.
    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(MIN_GRID_SIZE);
    }
}

/// Paper size selection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
    /// Custom paper size in millimetres (portrait orientation)
    Custom { width_mm: f64, height_mm: f64 },
}

impl PaperSize {
    /// Portrait dimensions in millimetres.
    pub fn size_mm(&self) -> Size {
        match self {
            PaperSize::A4 => Size::new(210.0, 297.0),
            PaperSize::A3 => Size::new(297.0, 420.0),
            PaperSize::Letter => Size::new(215.9, 279.4),
            PaperSize::Legal => Size::new(215.9, 355.6),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => Size::new(*width_mm, *height_mm),
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    #[default]
    Landscape,
}

/// Page margins in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            left: 10.0,
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
        }
    }
}

/// Page layout and delimiter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSettings {
    pub orientation: PageOrientation,
    /// Draw page delimiter lines on the canvas
    pub show_delimiters: bool,
    /// Keep delimiters at the zoom level they were locked at
    pub lock_delimiter_scale: bool,
    /// Scale used for delimiters while locked, in (0, 1]
    pub delimiter_scale: f64,
    pub paper: PaperSize,
    pub margins_mm: PageMargins,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            orientation: PageOrientation::default(),
            show_delimiters: true,
            lock_delimiter_scale: false,
            delimiter_scale: 1.0,
            paper: PaperSize::default(),
            margins_mm: PageMargins::default(),
        }
    }
}

impl PageSettings {
    /// Printable area of a page in typographic points, orientation and
    /// margins applied. The rectangle is anchored at the origin.
    pub fn paint_rect_points(&self) -> Rect {
        let paper = self.paper.size_mm();
        let (width, height) = match self.orientation {
            PageOrientation::Portrait => (paper.width, paper.height),
            PageOrientation::Landscape => (paper.height, paper.width),
        };
        let m = &self.margins_mm;

        Rect::new(
            0.0,
            0.0,
            ((width - m.left - m.right) * POINTS_PER_MM).max(0.0),
            ((height - m.top - m.bottom) * POINTS_PER_MM).max(0.0),
        )
    }

    /// Locks the delimiter scale to `current_scale` when it is a zoom-out
    /// factor in (0, 1); any other value or an unlock resets it to 1.
    pub fn set_lock_delimiter_scale(&mut self, lock: bool, current_scale: f64) {
        self.delimiter_scale = if lock && current_scale > 0.0 && current_scale < 1.0 {
            current_scale
        } else {
            1.0
        };
        self.lock_delimiter_scale = lock;
    }
}

/// Interaction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Auto-scroll the view when dragging near its edges
    pub corner_move: bool,
    /// Start range selection with no modifier instead of Shift
    pub invert_range_selection_trigger: bool,
    /// Allow rubber-band selection at all
    pub range_selection_enabled: bool,
    /// Distance scrolled per auto-scroll tick
    pub scroll_step: f64,
    /// Edge band width that triggers auto-scroll
    pub scroll_threshold: f64,
    /// Auto-scroll tick interval
    pub scroll_interval_ms: u64,
    /// Hover time near an edge before auto-scroll starts
    pub hover_delay_ms: u64,
    /// Quiet time after the last arrow key before a keyboard move settles
    pub settle_delay_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            corner_move: true,
            invert_range_selection_trigger: false,
            range_selection_enabled: true,
            scroll_step: SCENE_MOVE_STEP,
            scroll_threshold: SCENE_MOVE_THRESHOLD,
            scroll_interval_ms: SCENE_MOVE_TIMEOUT_MS,
            hover_delay_ms: CORNER_HOVER_TIMEOUT_MS,
            settle_delay_ms: OBJECT_MOVE_TIMEOUT_MS,
        }
    }
}

impl InteractionSettings {
    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }

    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Layer decoration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSettings {
    /// Name of layer 0 in a new scene
    pub default_layer_name: String,
    /// Padding between an object and its layer outline
    pub padding: f64,
    /// Height reserved for a layer name label
    pub label_height: f64,
    /// Draw layer outlines
    pub show_layer_rects: bool,
    /// Draw layer names on the outlines
    pub show_layer_names: bool,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            default_layer_name: DEFAULT_LAYER_NAME.to_string(),
            padding: LAYER_PADDING,
            label_height: LAYER_LABEL_HEIGHT,
            show_layer_rects: false,
            show_layer_names: false,
        }
    }
}

/// Print scale bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintSettings {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE_FACTOR,
            max_scale: MAX_SCALE_FACTOR,
        }
    }
}

impl PrintSettings {
    /// Clamps a requested print scale into the configured range.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Complete canvas configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CanvasConfig {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub page: PageSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub layers: LayerSettings,
    #[serde(default)]
    pub print: PrintSettings,
}

impl CanvasConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the canvas configuration file:
    /// `<config_dir>/schemacanvas/canvas.toml`.
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("schemacanvas").join("canvas.toml"))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let mut config: Self = match Self::format_of(path)? {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.grid.set_size(config.grid.size);
        config.validate()?;
        tracing::debug!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Self::format_of(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        tracing::debug!("Saved canvas config to {}", path.display());
        Ok(())
    }

    fn format_of(path: &Path) -> ConfigResult<FileFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(FileFormat::Json),
            Some("toml") => Ok(FileFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.grid.size < MIN_GRID_SIZE {
            return Err(ConfigError::out_of_range("grid.size", self.grid.size));
        }

        let paint = self.page.paint_rect_points();
        if paint.is_degenerate() {
            return Err(ConfigError::out_of_range(
                "page.margins_mm",
                format!("{:?}", self.page.margins_mm),
            ));
        }

        if self.page.delimiter_scale <= 0.0 || self.page.delimiter_scale > 1.0 {
            return Err(ConfigError::out_of_range(
                "page.delimiter_scale",
                self.page.delimiter_scale,
            ));
        }

        let i = &self.interaction;
        if i.scroll_step <= 0.0 {
            return Err(ConfigError::out_of_range("interaction.scroll_step", i.scroll_step));
        }
        if i.scroll_threshold < 0.0 {
            return Err(ConfigError::out_of_range(
                "interaction.scroll_threshold",
                i.scroll_threshold,
            ));
        }
        if i.scroll_interval_ms == 0 {
            return Err(ConfigError::out_of_range(
                "interaction.scroll_interval_ms",
                i.scroll_interval_ms,
            ));
        }

        if self.layers.default_layer_name.trim().is_empty() {
            return Err(ConfigError::out_of_range("layers.default_layer_name", "\"\""));
        }
        if self.layers.padding < 0.0 || self.layers.label_height < 0.0 {
            return Err(ConfigError::out_of_range("layers.padding", self.layers.padding));
        }

        if self.print.min_scale <= 0.0 || self.print.min_scale > self.print.max_scale {
            return Err(ConfigError::out_of_range("print.min_scale", self.print.min_scale));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum FileFormat {
    Json,
    Toml,
}
