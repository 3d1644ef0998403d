//! Configuration: config directory management, `config.toml` parsing, and
//! the color theme used across the UI.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use supports_color::Stream;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);
        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Write the default configuration template to config.toml.
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");
        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }
        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
        Ok(config_path)
    }

    /// Load config.toml if present, falling back to defaults.
    pub fn load_config(&self) -> Result<AppConfig> {
        let config_path = self.config_path("config.toml");
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }
        let text = std::fs::read_to_string(&config_path)?;
        toml::from_str(&text)
            .map_err(|e| eyre!("invalid config {}: {}", config_path.display(), e))
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub display: DisplayConfig,
    pub performance: PerformanceConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Enable mouse capture for chart scrubbing and clickable tabs.
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub event_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// "auto", "truecolor", "256", or "16"
    pub color_mode: String,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub background: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub dimmed: String,
    pub axis: String,
    pub guideline: String,
    pub detail_border: String,
    pub table_header: String,
    pub table_header_bg: String,
    pub good: String,
    pub bad: String,
    pub tab_active_fg: String,
    pub tab_active_bg: String,
    pub series_1: String,
    pub series_2: String,
    pub series_3: String,
    pub series_4: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.3".to_string(),
            display: DisplayConfig::default(),
            performance: PerformanceConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            event_poll_interval_ms: 25,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_mode: "auto".to_string(),
            colors: ColorConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#124b73".to_string(),
            background: "default".to_string(),
            text_primary: "default".to_string(),
            text_secondary: "gray".to_string(),
            dimmed: "darkgray".to_string(),
            axis: "gray".to_string(),
            guideline: "gray".to_string(),
            detail_border: "#124b73".to_string(),
            table_header: "white".to_string(),
            table_header_bg: "#124b73".to_string(),
            good: "green".to_string(),
            bad: "red".to_string(),
            tab_active_fg: "white".to_string(),
            tab_active_bg: "#124b73".to_string(),
            series_1: "#124b73".to_string(),
            series_2: "#3fcbf9".to_string(),
            series_3: "orange".to_string(),
            series_4: "#2ca02c".to_string(),
        }
    }
}

/// Terminal color capability the parser downgrades to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    TrueColor,
    Ansi256,
    Basic,
}

impl ColorMode {
    /// Resolve a config string, probing the terminal for "auto".
    pub fn from_config(mode: &str) -> Self {
        match mode {
            "truecolor" => Self::TrueColor,
            "256" => Self::Ansi256,
            "16" => Self::Basic,
            _ => match supports_color::on(Stream::Stdout) {
                Some(support) if support.has_16m => Self::TrueColor,
                Some(support) if support.has_256 => Self::Ansi256,
                Some(_) => Self::Basic,
                None => Self::Basic,
            },
        }
    }
}

/// Parses color strings (hex or named) and downgrades them to what the
/// terminal supports.
pub struct ColorParser {
    mode: ColorMode,
}

impl ColorParser {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }

    pub fn parse(&self, s: &str) -> Result<Color> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(Color::Reset);
        }
        if let Some(color) = named_ansi(s) {
            return Ok(color);
        }
        if let Some((r, g, b)) = parse_hex(s).or_else(|| named_rgb(s)) {
            return Ok(match self.mode {
                ColorMode::TrueColor => Color::Rgb(r, g, b),
                ColorMode::Ansi256 => Color::Indexed(rgb_to_256_color(r, g, b)),
                ColorMode::Basic => rgb_to_basic_ansi(r, g, b),
            });
        }
        Err(eyre!("unrecognized color '{}'", s))
    }
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Names that map directly onto the basic ANSI palette.
fn named_ansi(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}

/// A few CSS names the default theme and payload styling use.
fn named_rgb(s: &str) -> Option<(u8, u8, u8)> {
    match s.to_ascii_lowercase().as_str() {
        "orange" => Some((255, 165, 0)),
        "lightblue" => Some((173, 216, 230)),
        "steelblue" => Some((70, 130, 180)),
        _ => None,
    }
}

/// Map an RGB triple to the nearest xterm-256 palette index.
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    // Grayscale ramp (232-255) when the channels are close together.
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r as u16 - 8) / 10) as u8;
    }
    let quant = |c: u8| -> u8 { ((c as u16 * 5 + 127) / 255) as u8 };
    16 + 36 * quant(r) + 6 * quant(g) + quant(b)
}

/// Map an RGB triple to the nearest of the 16 basic ANSI colors.
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    const BASIC: [(Color, (u8, u8, u8)); 10] = [
        (Color::Black, (0, 0, 0)),
        (Color::Red, (205, 49, 49)),
        (Color::Green, (13, 188, 121)),
        (Color::Yellow, (229, 229, 16)),
        (Color::Blue, (36, 114, 200)),
        (Color::Magenta, (188, 63, 188)),
        (Color::Cyan, (17, 168, 205)),
        (Color::White, (229, 229, 229)),
        (Color::Gray, (150, 150, 150)),
        (Color::DarkGray, (102, 102, 102)),
    ];
    let dist = |(cr, cg, cb): (u8, u8, u8)| -> i32 {
        let dr = cr as i32 - r as i32;
        let dg = cg as i32 - g as i32;
        let db = cb as i32 - b as i32;
        dr * dr + dg * dg + db * db
    };
    BASIC
        .iter()
        .min_by_key(|(_, rgb)| dist(*rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::Reset)
}

/// Color theme for UI rendering, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new(ColorMode::from_config(&config.color_mode));
        let c = &config.colors;
        let entries: [(&str, &String); 18] = [
            ("primary", &c.primary),
            ("background", &c.background),
            ("text_primary", &c.text_primary),
            ("text_secondary", &c.text_secondary),
            ("dimmed", &c.dimmed),
            ("axis", &c.axis),
            ("guideline", &c.guideline),
            ("detail_border", &c.detail_border),
            ("table_header", &c.table_header),
            ("table_header_bg", &c.table_header_bg),
            ("good", &c.good),
            ("bad", &c.bad),
            ("tab_active_fg", &c.tab_active_fg),
            ("tab_active_bg", &c.tab_active_bg),
            ("series_1", &c.series_1),
            ("series_2", &c.series_2),
            ("series_3", &c.series_3),
            ("series_4", &c.series_4),
        ];
        let mut colors = HashMap::new();
        for (name, value) in entries {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Get a color by name, returns Reset if not found
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }

    /// Color for the series at `idx` (cycles past the configured set).
    pub fn series(&self, idx: usize) -> Color {
        const SERIES_KEYS: [&str; 4] = ["series_1", "series_2", "series_3", "series_4"];
        self.get(SERIES_KEYS[idx % SERIES_KEYS.len()])
    }
}

// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");
