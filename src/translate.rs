//! Tree-to-document translator: the class-vocabulary mapping engine.
//!
//! Walks the parsed HTML tree exactly once, in document order, and emits
//! styled paragraphs/runs into the output model. Block-level nodes
//! (name-header, contact-info, section-title, list containers) each open
//! one paragraph; everything else is inline content. Bold/italic state is
//! an immutable value carried down the recursion so nested spans inherit
//! it, and right-spans are extracted to a tab-positioned run instead of
//! flowing inline. Unrecognized markup never fails: unknown elements are
//! transparent containers.

use crate::docx::{Document, Paragraph, Run};
use crate::error::{ConvertError, Result};
use crate::styles::{classify, spec_for, StyleClass, StyleSpec, DOT_INDENT, RIGHT_TAB_POS};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse HTML and translate it into an in-memory document.
///
/// The only failure is an empty or missing root container; structurally
/// unexpected markup degrades to plain inline text instead.
pub fn convert_html(html: &str) -> Result<Document> {
    let dom = parse_to_dom(html);
    let children = body_children(&dom);
    if !children.iter().any(has_renderable_content) {
        return Err(ConvertError::EmptyInput);
    }
    let doc = translate(&children);
    debug!("translated {} paragraphs", doc.paragraphs.len());
    Ok(doc)
}

/// Translate an already-parsed sequence of root nodes. Infallible: every
/// construct either matches a rule or is treated as transparent content.
pub fn translate(nodes: &[Handle]) -> Document {
    let mut walker = Walker::default();
    walker.walk_blocks(nodes);
    walker.flush_pending();
    walker.doc
}

fn parse_to_dom(input: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(input)
}

fn body_children(dom: &RcDom) -> Vec<Handle> {
    fn find_elem(node: &Handle, name: &str) -> Option<Handle> {
        if let NodeData::Element { name: q, .. } = &node.data {
            if q.local.to_string().eq_ignore_ascii_case(name) {
                return Some(node.clone());
            }
        }
        for c in node.children.borrow().iter() {
            if let Some(x) = find_elem(c, name) {
                return Some(x);
            }
        }
        None
    }

    if let Some(body) = find_elem(&dom.document, "body") {
        return body.children.borrow().clone();
    }
    dom.document.children.borrow().clone()
}

fn node_children(h: &Handle) -> Vec<Handle> {
    h.children.borrow().clone()
}

fn elem_tag_lower(h: &Handle) -> Option<String> {
    match &h.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn class_attr(h: &Handle) -> String {
    match &h.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.to_string() == "class")
            .map(|a| a.value.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn node_class(h: &Handle) -> Option<StyleClass> {
    classify(&class_attr(h))
}

fn is_drop_content_tag(lower: &str) -> bool {
    matches!(lower, "script" | "style" | "noscript" | "template")
}

fn is_list_tag(lower: &str) -> bool {
    matches!(lower, "ul" | "ol")
}

/// Block-level per rule 1: one of the three header classes, or a list
/// container.
fn is_block(h: &Handle) -> bool {
    let Some(tag) = elem_tag_lower(h) else {
        return false;
    };
    if is_list_tag(&tag) {
        return true;
    }
    matches!(
        node_class(h),
        Some(StyleClass::NameHeader | StyleClass::ContactInfo | StyleClass::SectionTitle)
    )
}

fn contains_block(h: &Handle) -> bool {
    is_block(h) || node_children(h).iter().any(contains_block)
}

fn has_renderable_content(h: &Handle) -> bool {
    match &h.data {
        NodeData::Text { contents } => !contents.borrow().trim().is_empty(),
        NodeData::Element { .. } => true,
        _ => false,
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

/// Concatenated, collapsed text of a subtree (right-span extraction uses
/// the whole subtree regardless of nested markup).
fn subtree_text(h: &Handle) -> String {
    fn gather(h: &Handle, out: &mut String) {
        match &h.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => {
                let tag = elem_tag_lower(h).unwrap_or_default();
                if is_drop_content_tag(&tag) {
                    return;
                }
                for c in node_children(h) {
                    gather(&c, out);
                }
            }
            _ => {}
        }
    }
    let mut raw = String::new();
    gather(h, &mut raw);
    collapse_whitespace(&raw).trim().to_string()
}

/// Formatting state accumulated down the recursion. Bold and italic are
/// OR-accumulated, never overwritten.
#[derive(Debug, Clone, Copy, Default)]
struct Inline {
    bold: bool,
    italic: bool,
}

#[derive(Default)]
struct Walker {
    doc: Document,
    /// Inline content encountered outside any block accumulates here as a
    /// default body paragraph until the next block flushes it.
    pending: Option<(Paragraph, Vec<Run>)>,
}

impl Walker {
    fn walk_blocks(&mut self, nodes: &[Handle]) {
        for node in nodes {
            match &node.data {
                NodeData::Text { .. } => self.inline_content(node),
                NodeData::Element { .. } => {
                    let tag = elem_tag_lower(node).unwrap_or_default();
                    if is_drop_content_tag(&tag) {
                        continue;
                    }
                    if is_list_tag(&tag) {
                        self.flush_pending();
                        self.emit_list(node);
                    } else if let Some(
                        class @ (StyleClass::NameHeader
                        | StyleClass::ContactInfo
                        | StyleClass::SectionTitle),
                    ) = node_class(node)
                    {
                        self.flush_pending();
                        self.emit_block(node, class);
                    } else if node_children(node).iter().any(contains_block) {
                        // Transparent wrapper around further blocks.
                        self.flush_pending();
                        self.walk_blocks(&node_children(node));
                    } else {
                        self.inline_content(node);
                    }
                }
                _ => {}
            }
        }
    }

    /// One centered/bordered/etc. paragraph per header-class node.
    fn emit_block(&mut self, node: &Handle, class: StyleClass) {
        let spec = spec_for(class);
        let mut para = paragraph_from(&spec);
        let mut rights = Vec::new();
        let state = Inline {
            bold: spec.bold,
            italic: spec.italic,
        };
        collect_inline(&node_children(node), state, spec.size, &mut para.runs, &mut rights);
        push_finished(&mut self.doc, para, rights, 0);
    }

    /// Each child `li` of a list container becomes one compact paragraph.
    fn emit_list(&mut self, node: &Handle) {
        let spec = spec_for(StyleClass::ListSection);
        for child in node_children(node) {
            if elem_tag_lower(&child).as_deref() != Some("li") {
                continue;
            }
            let mut para = paragraph_from(&spec);
            if has_dot_marker(&child) {
                para.left_indent = DOT_INDENT;
                para.add_run(Run::new("\u{2022} ", spec.size));
            }
            let base = para.runs.len();
            let mut rights = Vec::new();
            collect_inline(
                &node_children(&child),
                Inline::default(),
                spec.size,
                &mut para.runs,
                &mut rights,
            );
            push_finished(&mut self.doc, para, rights, base);
        }
    }

    fn inline_content(&mut self, node: &Handle) {
        if self.pending.is_none() {
            let spec = crate::styles::BODY;
            self.pending = Some((paragraph_from(&spec), Vec::new()));
        }
        let (para, rights) = self.pending.as_mut().unwrap();
        collect_inline(
            std::slice::from_ref(node),
            Inline::default(),
            crate::styles::BODY.size,
            &mut para.runs,
            rights,
        );
    }

    fn flush_pending(&mut self) {
        if let Some((para, rights)) = self.pending.take() {
            push_finished(&mut self.doc, para, rights, 0);
        }
    }
}

fn paragraph_from(spec: &StyleSpec) -> Paragraph {
    Paragraph {
        alignment: spec.align,
        line: spec.line,
        space_before: spec.space_before,
        space_after: spec.space_after,
        bottom_border: spec.bottom_border,
        left_indent: spec.left_indent,
        right_tab_stop: None,
        runs: Vec::new(),
    }
}

fn has_dot_marker(h: &Handle) -> bool {
    node_children(h).iter().any(|c| {
        matches!(node_class(c), Some(StyleClass::DotMarker)) || has_dot_marker(c)
    })
}

/// Collect inline runs from `nodes`, OR-accumulating bold/italic down the
/// recursion. Right-spans do not flow inline; their text lands in `rights`
/// carrying the state accumulated at their position in the tree.
fn collect_inline(
    nodes: &[Handle],
    state: Inline,
    size: u32,
    out: &mut Vec<Run>,
    rights: &mut Vec<Run>,
) {
    for node in nodes {
        match &node.data {
            NodeData::Text { contents } => {
                let text = collapse_whitespace(&contents.borrow());
                if text.is_empty() {
                    continue;
                }
                out.push(styled_run(text, state, size, false));
            }
            NodeData::Element { .. } => {
                let tag = elem_tag_lower(node).unwrap_or_default();
                if is_drop_content_tag(&tag) {
                    continue;
                }
                match node_class(node) {
                    Some(StyleClass::RightSpan) => {
                        let text = subtree_text(node);
                        if !text.is_empty() {
                            rights.push(styled_run(text, state, size, true));
                        }
                    }
                    // Marker text never contributes content; the enclosing
                    // list item reads its presence separately.
                    Some(StyleClass::DotMarker) => {}
                    _ => {
                        let next = match tag.as_str() {
                            "b" | "strong" => Inline { bold: true, ..state },
                            "i" | "em" => Inline {
                                italic: true,
                                ..state
                            },
                            _ => state,
                        };
                        if tag == "br" {
                            out.push(styled_run(" ".to_string(), state, size, false));
                            continue;
                        }
                        collect_inline(&node_children(node), next, size, out, rights);
                    }
                }
            }
            _ => {}
        }
    }
}

fn styled_run(text: String, state: Inline, size: u32, tab_before: bool) -> Run {
    Run {
        text,
        bold: state.bold,
        italic: state.italic,
        size,
        tab_before,
    }
}

/// Trim edge whitespace of the inline portion (runs past `base`), append
/// any extracted right runs with the paragraph-level tab stop, and drop
/// the paragraph entirely when nothing visible remains.
fn push_finished(doc: &mut Document, mut para: Paragraph, rights: Vec<Run>, base: usize) {
    while para.runs.len() > base && para.runs[base].text.trim().is_empty() {
        para.runs.remove(base);
    }
    if let Some(first) = para.runs.get_mut(base) {
        let trimmed = first.text.trim_start();
        if trimmed.len() != first.text.len() {
            first.text = trimmed.to_string();
        }
    }
    while para.runs.len() > base
        && para
            .runs
            .last()
            .map(|r| r.text.trim().is_empty())
            .unwrap_or(false)
    {
        para.runs.pop();
    }
    if para.runs.len() > base {
        if let Some(last) = para.runs.last_mut() {
            let trimmed = last.text.trim_end();
            if trimmed.len() != last.text.len() {
                last.text = trimmed.to_string();
            }
        }
    }

    if para.runs.len() <= base && rights.is_empty() {
        return;
    }
    if !rights.is_empty() {
        para.right_tab_stop = Some(RIGHT_TAB_POS);
        para.runs.extend(rights);
    }
    doc.add_paragraph(para);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Alignment;

    fn convert(html: &str) -> Document {
        convert_html(html).unwrap()
    }

    fn text_of(p: &Paragraph) -> String {
        p.runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn scenario_emits_four_styled_paragraphs() {
        let doc = convert(
            r#"<div class="name-header">Jane Doe</div>
               <div class="contact-info">a@b.com</div>
               <div class="section-title">Education</div>
               <ul class="ul-section"><li><b>State U<span class="right-span">2020-2024</span></b></li></ul>"#,
        );
        assert_eq!(doc.paragraphs.len(), 4);

        let name = &doc.paragraphs[0];
        assert_eq!(text_of(name), "Jane Doe");
        assert_eq!(name.alignment, Alignment::Center);
        assert!(name.runs[0].bold);
        assert_eq!(name.runs[0].size, 50);

        let contact = &doc.paragraphs[1];
        assert_eq!(text_of(contact), "a@b.com");
        assert_eq!(contact.alignment, Alignment::Center);
        assert!(!contact.runs[0].bold);

        let title = &doc.paragraphs[2];
        assert_eq!(text_of(title), "Education");
        assert!(title.bottom_border);
        assert!(title.runs[0].bold);

        let item = &doc.paragraphs[3];
        assert_eq!(item.runs.len(), 2);
        assert_eq!(item.runs[0].text, "State U");
        assert!(item.runs[0].bold);
        assert_eq!(item.runs[1].text, "2020-2024");
        assert!(item.runs[1].bold);
        assert!(item.runs[1].tab_before);
        assert_eq!(item.right_tab_stop, Some(RIGHT_TAB_POS));
    }

    #[test]
    fn right_span_inherits_accumulated_state() {
        let doc = convert(
            r#"<ul class="ul-section">
                 <li><b>x<span class="right-span">a</span></b></li>
                 <li><i>x<span class="right-span">b</span></i></li>
                 <li><b><i>x<span class="right-span">c</span></i></b></li>
                 <li>x<span class="right-span">d</span></li>
               </ul>"#,
        );
        assert_eq!(doc.paragraphs.len(), 4);
        let flags: Vec<(bool, bool)> = doc
            .paragraphs
            .iter()
            .map(|p| {
                let r = p.runs.last().unwrap();
                assert!(r.tab_before);
                (r.bold, r.italic)
            })
            .collect();
        assert_eq!(
            flags,
            vec![(true, false), (false, true), (true, true), (false, false)]
        );
    }

    #[test]
    fn border_flag_only_on_section_titles() {
        let doc = convert(
            r#"<div class="name-header">N</div>
               <div class="section-title">S1</div>
               <ul class="ul-section"><li>item</li></ul>
               <div class="section-title">S2</div>"#,
        );
        let bordered: Vec<bool> = doc.paragraphs.iter().map(|p| p.bottom_border).collect();
        assert_eq!(bordered, vec![false, true, false, true]);
    }

    #[test]
    fn sibling_order_is_preserved() {
        let doc = convert(
            r#"<div class="section-title">One</div>
               <div class="section-title">Two</div>
               <div class="section-title">Three</div>"#,
        );
        let texts: Vec<String> = doc.paragraphs.iter().map(text_of).collect();
        assert_eq!(texts, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn unknown_class_degrades_to_body_text() {
        let doc = convert(r#"<div class="headline">Hello there</div>"#);
        assert_eq!(doc.paragraphs.len(), 1);
        let p = &doc.paragraphs[0];
        assert_eq!(p.alignment, Alignment::Left);
        assert!(!p.bottom_border);
        assert_eq!(p.runs[0].size, 22);
        assert!(!p.runs[0].bold);
        assert_eq!(text_of(p), "Hello there");
    }

    #[test]
    fn dot_marker_sets_indent_and_plain_glyph() {
        let doc = convert(
            r#"<ul class="ul-section"><li><span class="dot">&#8226;</span><b>Led team</b></li></ul>"#,
        );
        assert_eq!(doc.paragraphs.len(), 1);
        let p = &doc.paragraphs[0];
        assert_eq!(p.left_indent, DOT_INDENT);
        assert_eq!(p.runs[0].text, "\u{2022} ");
        assert!(!p.runs[0].bold);
        assert!(!p.runs[0].tab_before);
        // Marker text itself contributes nothing beyond the glyph.
        assert_eq!(text_of(p), "\u{2022} Led team");
        assert!(p.runs[1].bold);
    }

    #[test]
    fn item_without_marker_keeps_zero_indent() {
        let doc = convert(r#"<ul class="ul-section"><li>plain item</li></ul>"#);
        let p = &doc.paragraphs[0];
        assert_eq!(p.left_indent, 0);
        assert_eq!(text_of(p), "plain item");
        assert_eq!(p.line, Some(276));
    }

    #[test]
    fn wrappers_without_known_class_are_transparent() {
        let doc = convert(
            r#"<div class="resume"><section>
                 <div class="name-header">Jane</div>
                 <div class="section-title">Skills</div>
               </section></div>"#,
        );
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(text_of(&doc.paragraphs[0]), "Jane");
        assert_eq!(text_of(&doc.paragraphs[1]), "Skills");
    }

    #[test]
    fn top_level_inline_text_becomes_body_paragraph() {
        let doc = convert(r#"stray <b>bold</b> text<div class="section-title">After</div>"#);
        assert_eq!(doc.paragraphs.len(), 2);
        let p = &doc.paragraphs[0];
        assert_eq!(text_of(p), "stray bold text");
        assert!(p.runs.iter().any(|r| r.bold && r.text == "bold"));
        assert_eq!(text_of(&doc.paragraphs[1]), "After");
    }

    #[test]
    fn right_span_without_block_context_still_lands_right() {
        let doc = convert(r#"before<span class="right-span">2024</span>"#);
        assert_eq!(doc.paragraphs.len(), 1);
        let p = &doc.paragraphs[0];
        assert_eq!(p.right_tab_stop, Some(RIGHT_TAB_POS));
        let last = p.runs.last().unwrap();
        assert!(last.tab_before);
        assert_eq!(last.text, "2024");
    }

    #[test]
    fn newlines_collapse_to_single_spaces() {
        let doc = convert("<div class=\"contact-info\">a@b.com\n\t  +1 555\n0100</div>");
        assert_eq!(text_of(&doc.paragraphs[0]), "a@b.com +1 555 0100");
    }

    #[test]
    fn empty_input_is_rejected_before_emission() {
        assert!(matches!(convert_html(""), Err(ConvertError::EmptyInput)));
        assert!(matches!(
            convert_html("   \n\t "),
            Err(ConvertError::EmptyInput)
        ));
    }

    #[test]
    fn whitespace_only_list_item_is_dropped() {
        let doc = convert(r#"<ul class="ul-section"><li>  </li><li>kept</li></ul>"#);
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(text_of(&doc.paragraphs[0]), "kept");
    }

    #[test]
    fn multiple_right_spans_append_in_encounter_order() {
        let doc = convert(
            r#"<div class="section-title">T<span class="right-span">first</span><span class="right-span">second</span></div>"#,
        );
        let p = &doc.paragraphs[0];
        let tabs: Vec<&str> = p
            .runs
            .iter()
            .filter(|r| r.tab_before)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(tabs, vec!["first", "second"]);
    }
}
