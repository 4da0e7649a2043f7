mod config;
mod measure;
mod node;
mod parser;
mod render;
mod style;

pub use config::{
    ColorTheme, FontFamily, FontSpec, FontTheme, FontWeight, LayoutTheme, SymbolTheme, Theme,
};
pub use measure::{MonospaceMeasurer, TextMeasurer};
pub use node::{Checkbox, MarkupTree, NodeId, NodeKind};
pub use style::{
    AttributeRange, Attributes, ColorRole, FontAttr, FontRole, ParagraphStyle, StyledRun,
    StyledText, TabAlignment, TabStop,
};

/// Parse markdown text into a markup tree.
pub fn parse(markdown: &str) -> MarkupTree {
    parser::parse(markdown)
}

/// Convert a markup tree into styled runs.
pub fn styled_text(tree: &MarkupTree, theme: &Theme, measurer: &dyn TextMeasurer) -> StyledText {
    render::styled_text(tree, theme, measurer)
}

/// Convert markdown to styled runs using the default theme and measurer.
pub fn markdown_to_styled(markdown: &str) -> StyledText {
    markdown_to_styled_with(markdown, &Theme::default(), &MonospaceMeasurer::default())
}

/// Convert markdown to styled runs with a custom theme and measurer.
pub fn markdown_to_styled_with(
    markdown: &str,
    theme: &Theme,
    measurer: &dyn TextMeasurer,
) -> StyledText {
    styled_text(&parse(markdown), theme, measurer)
}
