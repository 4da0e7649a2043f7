use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::style::{ColorRole, FontRole};

/// Rendering configuration: font, color, symbol and layout roles.
///
/// All sections and fields are optional in TOML; anything omitted keeps its
/// default.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Theme {
    pub font: FontTheme,
    pub color: ColorTheme,
    pub symbol: SymbolTheme,
    pub layout: LayoutTheme,
}

/// Family slot of a font descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Sans,
    Mono,
    /// Text face with fixed-width digits, for ordinal markers.
    MonoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Concrete font descriptor a role resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: FontFamily::Sans,
            weight: FontWeight::Regular,
            size: 15.0,
        }
    }
}

impl FontSpec {
    fn sans(weight: FontWeight, size: f32) -> Self {
        Self {
            family: FontFamily::Sans,
            weight,
            size,
        }
    }

    fn mono(size: f32) -> Self {
        Self {
            family: FontFamily::Mono,
            weight: FontWeight::Regular,
            size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontTheme {
    pub base: FontSpec,
    pub table_header: FontSpec,
    pub inline_code: FontSpec,
    pub code_block: FontSpec,
    pub ordinal_numeral: FontSpec,
    pub new_line: FontSpec,
    pub heading1: FontSpec,
    pub heading2: FontSpec,
    pub heading3: FontSpec,
    pub heading4: FontSpec,
    pub heading5: FontSpec,
    pub heading6: FontSpec,
}

impl Default for FontTheme {
    fn default() -> Self {
        let heading = |level: f32| FontSpec::sans(FontWeight::Bold, 28.0 - level * 2.0);
        Self {
            base: FontSpec::sans(FontWeight::Regular, 15.0),
            table_header: FontSpec::sans(FontWeight::Bold, 15.0),
            inline_code: FontSpec::mono(14.0),
            code_block: FontSpec::mono(14.0),
            ordinal_numeral: FontSpec {
                family: FontFamily::MonoDigit,
                weight: FontWeight::Regular,
                size: 15.0,
            },
            new_line: FontSpec::sans(FontWeight::Regular, 15.0),
            heading1: heading(1.0),
            heading2: heading(2.0),
            heading3: heading(3.0),
            heading4: heading(4.0),
            heading5: heading(5.0),
            heading6: heading(6.0),
        }
    }
}

impl FontTheme {
    /// Font for a heading level, or `None` outside 1-6.
    pub fn heading(&self, level: u8) -> Option<&FontSpec> {
        match level {
            1 => Some(&self.heading1),
            2 => Some(&self.heading2),
            3 => Some(&self.heading3),
            4 => Some(&self.heading4),
            5 => Some(&self.heading5),
            6 => Some(&self.heading6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorTheme {
    pub inline_code_foreground: String,
    pub inline_code_background: String,
    pub code_block_foreground: String,
    pub code_block_background: String,
    pub link: String,
    pub quote: String,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            inline_code_foreground: "#8e8e93".to_string(),
            inline_code_background: "#f6f8fa".to_string(),
            code_block_foreground: "#8e8e93".to_string(),
            code_block_background: "#f6f8fa".to_string(),
            link: "#007aff".to_string(),
            quote: "#8e8e93".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SymbolTheme {
    pub single_newline: String,
    pub double_newline: String,
    pub table_delimiter: String,
    pub bullet: String,
    pub quote_bullet: String,
    pub checkbox_checked: String,
    pub checkbox_unchecked: String,
}

impl Default for SymbolTheme {
    fn default() -> Self {
        Self {
            single_newline: "\n".to_string(),
            double_newline: "\n\n".to_string(),
            table_delimiter: "｜".to_string(),
            bullet: "‧".to_string(),
            quote_bullet: "。".to_string(),
            checkbox_checked: "☑".to_string(),
            checkbox_unchecked: "☐".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutTheme {
    /// Constant left inset applied before depth indentation.
    pub base_left_margin: f32,
    /// Additional inset per level of list/quote nesting.
    pub indent_unit: f32,
    /// Gap between a list marker and the item content.
    pub marker_gap: f32,
    /// Extra line spacing attached to heading runs.
    pub heading_line_spacing: f32,
}

impl Default for LayoutTheme {
    fn default() -> Self {
        Self {
            base_left_margin: 15.0,
            indent_unit: 20.0,
            marker_gap: 8.0,
            heading_line_spacing: 10.0,
        }
    }
}

impl Theme {
    /// Load a theme from a TOML file, or return defaults if unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Parse a theme from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Font descriptor for a role. Heading levels outside 1-6 resolve to the
    /// base font.
    pub fn font(&self, role: FontRole) -> &FontSpec {
        match role {
            FontRole::Base => &self.font.base,
            FontRole::TableHeader => &self.font.table_header,
            FontRole::InlineCode => &self.font.inline_code,
            FontRole::CodeBlock => &self.font.code_block,
            FontRole::OrdinalNumeral => &self.font.ordinal_numeral,
            FontRole::NewLine => &self.font.new_line,
            FontRole::Heading(level) => self.font.heading(level).unwrap_or(&self.font.base),
        }
    }

    /// Color value for a role.
    pub fn color(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::InlineCodeForeground => &self.color.inline_code_foreground,
            ColorRole::InlineCodeBackground => &self.color.inline_code_background,
            ColorRole::CodeBlockForeground => &self.color.code_block_foreground,
            ColorRole::CodeBlockBackground => &self.color.code_block_background,
            ColorRole::Link => &self.color.link,
            ColorRole::Quote => &self.color.quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_step_heading_sizes_down() {
        let theme = Theme::default();
        assert_eq!(theme.font.heading1.size, 26.0);
        assert_eq!(theme.font.heading6.size, 16.0);
        assert_eq!(theme.font.heading1.weight, FontWeight::Bold);
    }

    #[test]
    fn heading_lookup_falls_back_to_base_outside_range() {
        let theme = Theme::default();
        assert_eq!(theme.font(FontRole::Heading(0)), &theme.font.base);
        assert_eq!(theme.font(FontRole::Heading(7)), &theme.font.base);
        assert_eq!(theme.font(FontRole::Heading(3)), &theme.font.heading3);
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let theme = Theme::from_toml(
            r#"
            [symbol]
            bullet = "*"

            [font.base]
            size = 18.0

            [layout]
            indent_unit = 24.0
            "#,
        )
        .expect("valid theme TOML");

        assert_eq!(theme.symbol.bullet, "*");
        assert_eq!(theme.symbol.double_newline, "\n\n");
        assert_eq!(theme.font.base.size, 18.0);
        assert_eq!(theme.font.base.family, FontFamily::Sans);
        assert_eq!(theme.layout.indent_unit, 24.0);
        assert_eq!(theme.layout.marker_gap, 8.0);
    }

    #[test]
    fn load_returns_defaults_for_missing_file() {
        let theme = Theme::load(Path::new("does-not-exist.toml"));
        assert_eq!(theme.symbol.bullet, "‧");
    }
}
