use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::node::{Checkbox, MarkupTree, NodeId, NodeKind};

/// Parse markdown text into a markup tree.
pub fn parse(markdown: &str) -> MarkupTree {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);

    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.process(event);
    }
    builder.finish()
}

struct TreeBuilder {
    tree: MarkupTree,
    /// Open containers; events attach under the innermost one.
    stack: Vec<NodeId>,

    // Code block state; fenced content arrives as bare text events
    in_code_block: bool,
    code_language: Option<String>,
    code_content: String,
}

impl TreeBuilder {
    fn new() -> Self {
        let tree = MarkupTree::new();
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
            in_code_block: false,
            code_language: None,
            code_content: String::new(),
        }
    }

    fn finish(self) -> MarkupTree {
        self.tree
    }

    fn top(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn open(&mut self, kind: NodeKind) {
        let id = self.tree.push(self.top(), kind);
        self.stack.push(id);
    }

    fn close(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.tree.push(self.top(), kind);
    }

    fn process(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.code_content.push_str(&text);
                } else {
                    self.leaf(NodeKind::Text(text.into_string()));
                }
            }
            Event::Code(code) => self.leaf(NodeKind::InlineCode(code.into_string())),
            Event::SoftBreak => self.leaf(NodeKind::Text(" ".to_string())),
            Event::HardBreak => self.leaf(NodeKind::Text("\n".to_string())),
            Event::TaskListMarker(checked) => self.mark_checkbox(checked),
            // Rules, HTML and math have no node representation
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.open(NodeKind::Paragraph),
            Tag::Heading { level, .. } => self.open(NodeKind::Heading {
                level: heading_level(level),
            }),
            Tag::BlockQuote(_) => self.open(NodeKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                self.code_language = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.into_string();
                        if lang.is_empty() { None } else { Some(lang) }
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code_content.clear();
            }
            Tag::List(first_item) => self.open(if first_item.is_some() {
                NodeKind::OrderedList
            } else {
                NodeKind::UnorderedList
            }),
            Tag::Item => self.open(NodeKind::ListItem { checkbox: None }),
            Tag::Emphasis => self.open(NodeKind::Emphasis),
            Tag::Strong => self.open(NodeKind::Strong),
            Tag::Strikethrough => self.open(NodeKind::Strikethrough),
            Tag::Link { dest_url, .. } => {
                let dest = dest_url.into_string();
                self.open(NodeKind::Link {
                    destination: if dest.is_empty() { None } else { Some(dest) },
                });
            }
            Tag::Table(_) => self.open(NodeKind::Table),
            Tag::TableHead | Tag::TableRow => self.open(NodeKind::TableRow),
            Tag::TableCell => self.open(NodeKind::TableCell),
            // Images and the remaining containers are not represented; their
            // inline children flow into the enclosing node
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                let code = std::mem::take(&mut self.code_content);
                let language = self.code_language.take();
                self.leaf(NodeKind::CodeBlock { language, code });
            }
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell => self.close(),
            _ => {}
        }
    }

    /// Record the checkbox state on the innermost open list item. In loose
    /// lists the marker event arrives inside the item's first paragraph.
    fn mark_checkbox(&mut self, checked: bool) {
        let state = if checked {
            Checkbox::Checked
        } else {
            Checkbox::Unchecked
        };
        for &open in self.stack.iter().rev() {
            if let NodeKind::ListItem { checkbox } = self.tree.kind_mut(open) {
                *checkbox = Some(state);
                break;
            }
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_kinds(tree: &MarkupTree, id: NodeId) -> Vec<&NodeKind> {
        tree.children(id)
            .iter()
            .map(|&child| tree.kind(child))
            .collect()
    }

    #[test]
    fn heading_and_paragraph_become_siblings() {
        let tree = parse("# Title\n\nBody text");
        let kinds = child_kinds(&tree, tree.root());
        assert!(matches!(kinds[0], NodeKind::Heading { level: 1 }));
        assert!(matches!(kinds[1], NodeKind::Paragraph));
    }

    #[test]
    fn emphasis_nests_inside_strong() {
        let tree = parse("**a *b***");
        let para = tree.children(tree.root())[0];
        let strong = tree.children(para)[0];
        assert!(matches!(tree.kind(strong), NodeKind::Strong));
        let inner = child_kinds(&tree, strong);
        assert!(matches!(inner[0], NodeKind::Text(text) if text == "a "));
        assert!(matches!(inner[1], NodeKind::Emphasis));
    }

    #[test]
    fn fenced_code_keeps_language_and_content() {
        let tree = parse("```rust\nlet x = 1;\n```");
        let block = tree.children(tree.root())[0];
        match tree.kind(block) {
            NodeKind::CodeBlock { language, code } => {
                assert_eq!(language.as_deref(), Some("rust"));
                assert_eq!(code, "let x = 1;\n");
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn list_ordering_flag_selects_the_kind() {
        let tree = parse("1. a\n\n- b");
        let kinds = child_kinds(&tree, tree.root());
        assert!(matches!(kinds[0], NodeKind::OrderedList));
        assert!(matches!(kinds[1], NodeKind::UnorderedList));
    }

    #[test]
    fn nested_list_hangs_off_the_outer_item() {
        let tree = parse("- a\n  - b");
        let outer = tree.children(tree.root())[0];
        let item = tree.children(outer)[0];
        let kinds = child_kinds(&tree, item);
        assert!(matches!(kinds[0], NodeKind::Text(text) if text == "a"));
        assert!(matches!(kinds[1], NodeKind::UnorderedList));
    }

    #[test]
    fn task_markers_set_checkbox_state() {
        let tree = parse("- [x] done\n- [ ] todo\n- plain");
        let list = tree.children(tree.root())[0];
        let states: Vec<_> = tree
            .children(list)
            .iter()
            .map(|&item| match tree.kind(item) {
                NodeKind::ListItem { checkbox } => *checkbox,
                other => panic!("expected list item, got {other:?}"),
            })
            .collect();
        assert_eq!(
            states,
            [Some(Checkbox::Checked), Some(Checkbox::Unchecked), None]
        );
    }

    #[test]
    fn loose_task_markers_still_reach_the_item() {
        // Blank line between items makes the list loose, so the marker event
        // arrives inside a paragraph.
        let tree = parse("- [x] done\n\n- [ ] todo");
        let list = tree.children(tree.root())[0];
        let states: Vec<_> = tree
            .children(list)
            .iter()
            .map(|&item| match tree.kind(item) {
                NodeKind::ListItem { checkbox } => *checkbox,
                other => panic!("expected list item, got {other:?}"),
            })
            .collect();
        assert_eq!(states, [Some(Checkbox::Checked), Some(Checkbox::Unchecked)]);
    }

    #[test]
    fn table_rows_start_with_the_head() {
        let tree = parse("| H1 | H2 |\n|---|---|\n| a | b |\n| c | d |");
        let table = tree.children(tree.root())[0];
        assert!(matches!(tree.kind(table), NodeKind::Table));
        let rows = tree.children(table);
        assert_eq!(rows.len(), 3);

        let head_cells = tree.children(rows[0]);
        assert_eq!(head_cells.len(), 2);
        assert!(matches!(tree.kind(head_cells[0]), NodeKind::TableCell));
        let text = tree.children(head_cells[0])[0];
        assert!(matches!(tree.kind(text), NodeKind::Text(t) if t == "H1"));
    }

    #[test]
    fn empty_link_destination_is_absent() {
        let tree = parse("[text]()");
        let para = tree.children(tree.root())[0];
        let link = tree.children(para)[0];
        assert!(matches!(
            tree.kind(link),
            NodeKind::Link { destination: None }
        ));
    }

    #[test]
    fn soft_and_hard_breaks_become_text() {
        let tree = parse("one\ntwo  \nthree");
        let para = tree.children(tree.root())[0];
        let kinds = child_kinds(&tree, para);
        assert!(matches!(kinds[1], NodeKind::Text(text) if text == " "));
        assert!(matches!(kinds[3], NodeKind::Text(text) if text == "\n"));
    }

    #[test]
    fn strikethrough_parses_as_a_container() {
        let tree = parse("~~gone~~");
        let para = tree.children(tree.root())[0];
        assert!(matches!(
            tree.kind(tree.children(para)[0]),
            NodeKind::Strikethrough
        ));
    }
}
