//! Style catalog for the recognized resume class vocabulary.
//!
//! Pure data: each semantic class maps to an immutable paragraph/run
//! specification. Lookup never fails; unknown classes fall back to the
//! default body style. Units follow WordprocessingML conventions
//! (half-points for font size, twips for spacing and indents, 240ths
//! for line spacing).

use crate::docx::Alignment;

/// Twips for a whole point value.
const fn pt(n: u32) -> u32 {
    n * 20
}

/// Extra left indent applied to list items that carry a dot marker (0.3in).
pub const DOT_INDENT: u32 = 432;

/// Right tab stop position for extracted right-spans (6.0in).
pub const RIGHT_TAB_POS: u32 = 8640;

/// Semantic classes carried by the fixed resume vocabulary, in lookup
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    NameHeader,
    ContactInfo,
    SectionTitle,
    ListSection,
    RightSpan,
    DotMarker,
}

const PRIORITY: [(&str, StyleClass); 6] = [
    ("name-header", StyleClass::NameHeader),
    ("contact-info", StyleClass::ContactInfo),
    ("section-title", StyleClass::SectionTitle),
    ("ul-section", StyleClass::ListSection),
    ("right-span", StyleClass::RightSpan),
    ("dot", StyleClass::DotMarker),
];

/// Classify a raw `class` attribute value. Tokens are case-sensitive and
/// matched in priority order, not attribute order.
pub fn classify(class_attr: &str) -> Option<StyleClass> {
    PRIORITY
        .iter()
        .find(|(token, _)| class_attr.split_whitespace().any(|t| t == *token))
        .map(|&(_, class)| class)
}

/// Paragraph/run formatting for one semantic class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpec {
    /// Font size in half-points.
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub align: Alignment,
    /// Line spacing in 240ths of a line; `None` means single spacing.
    pub line: Option<u32>,
    /// Space before/after the paragraph, in twips.
    pub space_before: u32,
    pub space_after: u32,
    /// Synthesized bottom border (section titles only).
    pub bottom_border: bool,
    /// Left indent in twips.
    pub left_indent: u32,
}

/// Default body text: left-aligned 11pt, no border, single spacing.
pub const BODY: StyleSpec = StyleSpec {
    size: 22,
    bold: false,
    italic: false,
    align: Alignment::Left,
    line: None,
    space_before: 0,
    space_after: 0,
    bottom_border: false,
    left_indent: 0,
};

const NAME_HEADER: StyleSpec = StyleSpec {
    size: 50,
    bold: true,
    align: Alignment::Center,
    space_after: pt(6),
    ..BODY
};

const CONTACT_INFO: StyleSpec = StyleSpec {
    size: 24,
    align: Alignment::Center,
    space_after: pt(12),
    ..BODY
};

const SECTION_TITLE: StyleSpec = StyleSpec {
    size: 26,
    bold: true,
    space_before: pt(6),
    space_after: pt(6),
    bottom_border: true,
    ..BODY
};

// 1.15x line spacing, compact 1pt gaps.
const LIST_ITEM: StyleSpec = StyleSpec {
    line: Some(276),
    space_before: pt(1),
    space_after: pt(1),
    ..BODY
};

/// Specification for a recognized class. Right-spans and dot markers have
/// no paragraph style of their own; they inherit the enclosing block's and
/// are listed here only so the catalog covers the full vocabulary.
pub fn spec_for(class: StyleClass) -> StyleSpec {
    match class {
        StyleClass::NameHeader => NAME_HEADER,
        StyleClass::ContactInfo => CONTACT_INFO,
        StyleClass::SectionTitle => SECTION_TITLE,
        StyleClass::ListSection => LIST_ITEM,
        StyleClass::RightSpan | StyleClass::DotMarker => BODY,
    }
}

/// Lookup contract from class tokens to a specification: first recognized
/// token wins, anything else degrades to the body default.
pub fn lookup(class_attr: &str) -> StyleSpec {
    classify(class_attr).map(spec_for).unwrap_or(BODY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_picks_highest_priority_token() {
        assert_eq!(
            classify("right-span name-header"),
            Some(StyleClass::NameHeader)
        );
        assert_eq!(classify("dot"), Some(StyleClass::DotMarker));
        assert_eq!(classify("foo section-title bar"), Some(StyleClass::SectionTitle));
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(classify("Name-Header"), None);
        assert_eq!(classify("SECTION-TITLE"), None);
    }

    #[test]
    fn unknown_classes_fall_back_to_body() {
        assert_eq!(lookup("headline fancy"), BODY);
        assert_eq!(lookup(""), BODY);
    }

    #[test]
    fn section_title_is_the_only_bordered_spec() {
        for (token, class) in PRIORITY {
            let spec = spec_for(class);
            assert_eq!(spec.bottom_border, token == "section-title");
        }
        assert!(!BODY.bottom_border);
    }

    #[test]
    fn catalog_matches_layout_constants() {
        let name = lookup("name-header");
        assert_eq!(name.size, 50);
        assert!(name.bold);
        assert_eq!(name.align, Alignment::Center);

        let list = spec_for(StyleClass::ListSection);
        assert_eq!(list.line, Some(276));
        assert_eq!(list.space_before, 20);
        assert_eq!(list.space_after, 20);
    }
}
