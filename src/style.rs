use std::ops::Range;

use serde::Serialize;

/// Font slot a run points at; the theme maps roles to concrete descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontRole {
    Base,
    TableHeader,
    InlineCode,
    CodeBlock,
    OrdinalNumeral,
    NewLine,
    Heading(u8),
}

/// Color slot a run points at; the theme maps roles to concrete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorRole {
    InlineCodeForeground,
    InlineCodeBackground,
    CodeBlockForeground,
    CodeBlockBackground,
    Link,
    Quote,
}

/// Font selection for a run: a role plus trait flags that compose on top.
///
/// Bold and italic are independent so that nested emphasis combines instead
/// of replacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontAttr {
    pub role: FontRole,
    pub bold: bool,
    pub italic: bool,
    /// Point-size override; `None` uses the role's configured size.
    pub size: Option<f32>,
}

impl FontAttr {
    pub fn new(role: FontRole) -> Self {
        Self {
            role,
            bold: false,
            italic: false,
            size: None,
        }
    }
}

/// Tab alignment for marker/content column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabAlignment {
    Left,
    Right,
}

/// A logical horizontal alignment marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TabStop {
    pub alignment: TabAlignment,
    pub location: f32,
}

impl TabStop {
    pub fn left(location: f32) -> Self {
        Self {
            alignment: TabAlignment::Left,
            location,
        }
    }

    pub fn right(location: f32) -> Self {
        Self {
            alignment: TabAlignment::Right,
            location,
        }
    }
}

/// Paragraph-level layout attached to list markers, quote indents and
/// headings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphStyle {
    /// Nesting depth of the enclosing list or quote chain.
    pub depth: usize,
    pub tab_stops: Vec<TabStop>,
    pub head_indent: f32,
    pub line_spacing: Option<f32>,
}

/// Everything a rendering host needs to draw one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attributes {
    pub font: FontAttr,
    pub foreground: Option<ColorRole>,
    pub background: Option<ColorRole>,
    pub strikethrough: bool,
    /// Navigable link target, if any.
    pub link: Option<String>,
    pub paragraph: Option<ParagraphStyle>,
}

impl Attributes {
    /// Plain attributes in the given font role.
    pub fn with_font(role: FontRole) -> Self {
        Self {
            font: FontAttr::new(role),
            foreground: None,
            background: None,
            strikethrough: false,
            link: None,
            paragraph: None,
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::with_font(FontRole::Base)
    }
}

/// A contiguous span of text sharing one attribute set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub attributes: Attributes,
}

/// Attribute set applied to a byte range of the flattened text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRange {
    pub range: Range<usize>,
    pub attributes: Attributes,
}

/// Ordered sequence of styled runs.
///
/// Serves both as the append-only builder during one conversion and as the
/// returned text model. A parent node styles the output of its children by
/// recording a mark, appending their rendered runs, and mutating everything
/// from the mark onward.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one run.
    pub fn push(&mut self, text: impl Into<String>, attributes: Attributes) {
        self.runs.push(StyledRun {
            text: text.into(),
            attributes,
        });
    }

    pub fn push_run(&mut self, run: StyledRun) {
        self.runs.push(run);
    }

    /// Append a fully rendered sub-result.
    pub fn extend(&mut self, other: StyledText) {
        self.runs.extend(other.runs);
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Number of runs; record this before appending to address the appended
    /// range later.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Mutate the attributes of every run from `mark` to the end.
    ///
    /// `mark == len()` addresses an empty range and is a no-op. Whether a
    /// mutation composes with existing attributes (bold, italic,
    /// strikethrough) or overwrites them (colors, font role, link) is decided
    /// by the closure.
    pub fn apply_from(&mut self, mark: usize, f: impl Fn(&mut Attributes)) {
        for run in self.runs.iter_mut().skip(mark) {
            f(&mut run.attributes);
        }
    }

    /// Mutate every run's attributes.
    pub fn apply(&mut self, f: impl Fn(&mut Attributes)) {
        self.apply_from(0, f);
    }

    /// Add the bold trait across all runs, composing with existing traits.
    pub fn embolden(&mut self) {
        self.apply(|attrs| attrs.font.bold = true);
    }

    /// Add the italic trait across all runs, composing with existing traits.
    pub fn italicize(&mut self) {
        self.apply(|attrs| attrs.font.italic = true);
    }

    /// Strike through all runs.
    pub fn strike_through(&mut self) {
        self.apply(|attrs| attrs.strikethrough = true);
    }

    /// Concatenation of all run texts, attributes discarded.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Flat string plus byte-addressed attribute ranges.
    pub fn attributed(&self) -> (String, Vec<AttributeRange>) {
        let mut text = String::new();
        let mut ranges = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            let start = text.len();
            text.push_str(&run.text);
            ranges.push(AttributeRange {
                range: start..text.len(),
                attributes: run.attributes.clone(),
            });
        }
        (text, ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_compose_instead_of_replacing() {
        let mut styled = StyledText::new();
        styled.push("x", Attributes::default());
        styled.italicize();
        styled.embolden();

        let run = &styled.runs()[0];
        assert!(run.attributes.font.bold);
        assert!(run.attributes.font.italic);
    }

    #[test]
    fn apply_from_only_touches_the_marked_range() {
        let mut styled = StyledText::new();
        styled.push("before", Attributes::default());
        let mark = styled.len();
        styled.push("after", Attributes::default());
        styled.apply_from(mark, |attrs| attrs.strikethrough = true);

        assert!(!styled.runs()[0].attributes.strikethrough);
        assert!(styled.runs()[1].attributes.strikethrough);
    }

    #[test]
    fn apply_from_on_empty_range_is_a_no_op() {
        let mut styled = StyledText::new();
        styled.push("x", Attributes::default());
        let mark = styled.len();
        styled.apply_from(mark, |attrs| attrs.strikethrough = true);

        assert!(!styled.runs()[0].attributes.strikethrough);
    }

    #[test]
    fn extend_keeps_run_order() {
        let mut left = StyledText::new();
        left.push("a", Attributes::default());
        let mut right = StyledText::new();
        right.push("b", Attributes::default());
        left.extend(right);

        assert_eq!(left.plain_text(), "ab");
    }

    #[test]
    fn attributed_ranges_tile_the_flat_text() {
        let mut styled = StyledText::new();
        styled.push("héllo", Attributes::default());
        styled.push("", Attributes::default());
        styled.push("world", Attributes::with_font(FontRole::InlineCode));

        let (text, ranges) = styled.attributed();
        assert_eq!(text, "hélloworld");
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].range, 0..6);
        assert_eq!(ranges[1].range, 6..6);
        assert_eq!(ranges[2].range, 6..11);
        assert_eq!(ranges[2].attributes.font.role, FontRole::InlineCode);
    }
}
