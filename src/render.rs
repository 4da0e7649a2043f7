use crate::config::Theme;
use crate::measure::TextMeasurer;
use crate::node::{Checkbox, MarkupTree, NodeId, NodeKind};
use crate::style::{
    Attributes, ColorRole, FontAttr, FontRole, ParagraphStyle, StyledRun, StyledText, TabStop,
};

/// Convert a markup tree into the styled text model.
pub fn styled_text(tree: &MarkupTree, theme: &Theme, measurer: &dyn TextMeasurer) -> StyledText {
    let renderer = Renderer {
        tree,
        theme,
        measurer,
    };
    renderer.visit(tree.root())
}

struct Renderer<'a> {
    tree: &'a MarkupTree,
    theme: &'a Theme,
    measurer: &'a dyn TextMeasurer,
}

impl Renderer<'_> {
    fn visit(&self, id: NodeId) -> StyledText {
        match self.tree.kind(id) {
            NodeKind::Document | NodeKind::TableRow | NodeKind::TableCell => {
                self.visit_children(id)
            }
            NodeKind::Text(text) => {
                let mut result = StyledText::new();
                result.push(text.clone(), Attributes::with_font(FontRole::Base));
                result
            }
            NodeKind::Emphasis => {
                let mut result = self.visit_children(id);
                result.italicize();
                result
            }
            NodeKind::Strong => {
                let mut result = self.visit_children(id);
                result.embolden();
                result
            }
            NodeKind::Strikethrough => {
                let mut result = self.visit_children(id);
                result.strike_through();
                result
            }
            NodeKind::Link { destination } => self.visit_link(id, destination.as_deref()),
            NodeKind::InlineCode(code) => {
                let mut attrs = Attributes::with_font(FontRole::InlineCode);
                attrs.foreground = Some(ColorRole::InlineCodeForeground);
                attrs.background = Some(ColorRole::InlineCodeBackground);
                let mut result = StyledText::new();
                result.push(code.clone(), attrs);
                result
            }
            NodeKind::CodeBlock { code, .. } => self.visit_code_block(id, code),
            NodeKind::Paragraph => self.visit_paragraph(id),
            NodeKind::Heading { level } => self.visit_heading(id, *level),
            NodeKind::UnorderedList => self.visit_unordered_list(id),
            NodeKind::OrderedList => self.visit_ordered_list(id),
            NodeKind::ListItem { .. } => self.visit_list_item(id),
            NodeKind::BlockQuote => self.visit_block_quote(id),
            NodeKind::Table => self.visit_table(id),
        }
    }

    fn visit_children(&self, id: NodeId) -> StyledText {
        let mut result = StyledText::new();
        for &child in self.tree.children(id) {
            result.extend(self.visit(child));
        }
        result
    }

    fn visit_link(&self, id: NodeId, destination: Option<&str>) -> StyledText {
        let mut result = self.visit_children(id);
        let target = destination
            .filter(|dest| !dest.is_empty())
            .map(str::to_owned);
        result.apply(|attrs| {
            attrs.foreground = Some(ColorRole::Link);
            attrs.link = target.clone();
        });
        result
    }

    fn visit_code_block(&self, id: NodeId, code: &str) -> StyledText {
        let mut attrs = Attributes::with_font(FontRole::CodeBlock);
        attrs.foreground = Some(ColorRole::CodeBlockForeground);
        attrs.background = Some(ColorRole::CodeBlockBackground);
        let mut result = StyledText::new();
        result.push(code.to_owned(), attrs);
        if self.tree.has_successor(id) {
            result.push_run(self.single_newline());
        }
        result
    }

    fn visit_paragraph(&self, id: NodeId) -> StyledText {
        let mut result = StyledText::new();
        for &child in self.tree.children(id) {
            let content = self.visit(child);
            let rendered_empty = content.plain_text().is_empty();
            result.extend(content);
            // Degenerate inline nodes render empty; pad with a line break.
            if rendered_empty {
                result.push_run(self.single_newline());
            }
        }
        if self.tree.has_successor(id) {
            if self.tree.is_inside_list(id) {
                result.push_run(self.single_newline());
            } else {
                result.push_run(self.double_newline());
            }
        }
        result
    }

    fn visit_heading(&self, id: NodeId, level: u8) -> StyledText {
        let mut result = self.visit_children(id);
        let role = if (1..=6).contains(&level) {
            FontRole::Heading(level)
        } else {
            FontRole::Base
        };
        let line_spacing = self.theme.layout.heading_line_spacing;
        result.apply(|attrs| {
            attrs.font = FontAttr::new(role);
            attrs.paragraph = Some(ParagraphStyle {
                line_spacing: Some(line_spacing),
                ..ParagraphStyle::default()
            });
        });
        if self.tree.has_successor(id) {
            result.push_run(self.single_newline());
        }
        result
    }

    fn visit_unordered_list(&self, id: NodeId) -> StyledText {
        let mut result = StyledText::new();
        let depth = self.tree.ancestor_depth(id, NodeKind::is_list);

        for &item in self.tree.children(id) {
            let marker = match self.tree.kind(item) {
                NodeKind::ListItem {
                    checkbox: Some(Checkbox::Checked),
                } => &self.theme.symbol.checkbox_checked,
                NodeKind::ListItem {
                    checkbox: Some(Checkbox::Unchecked),
                } => &self.theme.symbol.checkbox_unchecked,
                _ => &self.theme.symbol.bullet,
            };
            let marker_width = self.marker_width(marker, FontRole::Base);
            let mut attrs = Attributes::with_font(FontRole::Base);
            attrs.paragraph = Some(self.marker_column(depth, marker_width));
            result.push(format!("\t{marker}\t"), attrs);
            result.extend(self.visit(item));
        }

        if self.tree.has_successor(id) {
            result.push_run(self.double_newline());
        }
        result
    }

    fn visit_ordered_list(&self, id: NodeId) -> StyledText {
        let mut result = StyledText::new();
        let depth = self.tree.ancestor_depth(id, NodeKind::is_list);

        // One column for the whole list, sized from the largest index.
        let highest = self.tree.child_count(id);
        let column_width = self.marker_width(&format!("{highest}."), FontRole::OrdinalNumeral);

        for (index, &item) in self.tree.children(id).iter().enumerate() {
            let mut attrs = Attributes::with_font(FontRole::OrdinalNumeral);
            attrs.paragraph = Some(self.marker_column(depth, column_width));
            result.push(format!("\t{}.\t", index + 1), attrs);
            result.extend(self.visit(item));
        }

        if self.tree.has_successor(id) {
            if self.tree.is_inside_list(id) {
                result.push_run(self.single_newline());
            } else {
                result.push_run(self.double_newline());
            }
        }
        result
    }

    fn visit_list_item(&self, id: NodeId) -> StyledText {
        let mut result = self.visit_children(id);
        if self.tree.has_successor(id) {
            result.push_run(self.single_newline());
        }
        result
    }

    fn visit_block_quote(&self, id: NodeId) -> StyledText {
        let mut result = StyledText::new();
        let depth = self.tree.ancestor_depth(id, NodeKind::is_block_quote);
        let margin = self.left_margin(depth);

        for &child in self.tree.children(id) {
            let mark = result.len();
            let mut attrs = Attributes::with_font(FontRole::Base);
            attrs.paragraph = Some(ParagraphStyle {
                depth,
                tab_stops: vec![TabStop::left(margin)],
                head_indent: margin,
                line_spacing: None,
            });
            result.push("\t", attrs);
            result.extend(self.visit(child));
            result.apply_from(mark, |attrs| attrs.foreground = Some(ColorRole::Quote));
        }

        if self.tree.has_successor(id) {
            result.push_run(self.double_newline());
        }
        result
    }

    fn visit_table(&self, id: NodeId) -> StyledText {
        let mut result = StyledText::new();
        let rows = self.tree.children(id);
        let (head, body) = match rows.split_first() {
            Some((&head, body)) => (Some(head), body),
            None => (None, &[][..]),
        };

        result.push_run(self.delimiter());
        if let Some(head) = head {
            for &cell in self.tree.children(head) {
                let mark = result.len();
                result.extend(self.visit(cell));
                result.apply_from(mark, |attrs| {
                    attrs.font = FontAttr::new(FontRole::TableHeader);
                });
                if self.tree.has_successor(cell) {
                    result.push_run(self.delimiter());
                }
            }
        }
        result.push_run(self.delimiter());

        if !body.is_empty() {
            result.push_run(self.single_newline());
        }

        for &row in body {
            result.push_run(self.delimiter());
            for &cell in self.tree.children(row) {
                result.extend(self.visit(cell));
                if self.tree.has_successor(cell) {
                    result.push_run(self.delimiter());
                }
            }
            result.push_run(self.delimiter());
            if self.tree.has_successor(row) {
                result.push_run(self.single_newline());
            }
        }

        if self.tree.has_successor(id) {
            result.push_run(self.double_newline());
        }
        result
    }

    fn left_margin(&self, depth: usize) -> f32 {
        self.theme.layout.base_left_margin + self.theme.layout.indent_unit * depth as f32
    }

    /// Rendered marker width, rounded up to keep tab stops on whole units.
    fn marker_width(&self, text: &str, role: FontRole) -> f32 {
        self.measurer.width(text, role).ceil()
    }

    fn marker_column(&self, depth: usize, marker_width: f32) -> ParagraphStyle {
        let first = self.left_margin(depth) + marker_width;
        let second = first + self.theme.layout.marker_gap;
        ParagraphStyle {
            depth,
            tab_stops: vec![TabStop::right(first), TabStop::left(second)],
            head_indent: second,
            line_spacing: None,
        }
    }

    fn separator(&self, text: &str) -> StyledRun {
        StyledRun {
            text: text.to_owned(),
            attributes: Attributes::with_font(FontRole::NewLine),
        }
    }

    fn single_newline(&self) -> StyledRun {
        self.separator(&self.theme.symbol.single_newline)
    }

    fn double_newline(&self) -> StyledRun {
        self.separator(&self.theme.symbol.double_newline)
    }

    fn delimiter(&self) -> StyledRun {
        self.separator(&self.theme.symbol.table_delimiter)
    }
}
