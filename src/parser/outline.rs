//! Outline notation parser: dash and numbered markers into a list forest.
//!
//! ```text
//! - item            level 1, unordered
//! -- sub-item       level 2, unordered
//! 1. step           level 1, ordered, list number "1."
//! 1.1. sub-step     level 2, ordered, list number "1.1."
//! ```
//!
//! A blank line or a plain text line resets nesting: the next list item starts
//! a new root.

use crate::model::ListItem;
use regex::Regex;
use std::sync::LazyLock;

static RE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-+)\s*(.*)$").unwrap());

static RE_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)*)\.\s*(.*)$").unwrap());

/// Classification of a single trimmed line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Unordered { level: usize, text: &'a str },
    Ordered { number: String, text: &'a str },
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.is_empty() {
        return Line::Blank;
    }
    if let Some(caps) = RE_DASH.captures(line) {
        let level = caps.get(1).map_or(0, |m| m.as_str().len());
        let text = caps.get(2).map_or("", |m| m.as_str());
        return Line::Unordered { level, text };
    }
    if let Some(caps) = RE_NUMBERED.captures(line) {
        let number = format!("{}.", caps.get(1).map_or("", |m| m.as_str()));
        let text = caps.get(2).map_or("", |m| m.as_str());
        return Line::Ordered { number, text };
    }
    Line::Text(line)
}

/// Parse outline text into an ordered forest of [`ListItem`].
pub fn parse(text: &str) -> Vec<ListItem> {
    let mut roots: Vec<ListItem> = Vec::new();
    // Path of the most recent list item as indices: roots[p0].children[p1]...
    // Every entry on the path is a list item, so the "pop non-list" rule is
    // enforced by clearing the path whenever a paragraph is emitted.
    let mut path: Vec<usize> = Vec::new();

    for raw in text.split('\n') {
        let item = match classify(raw.trim()) {
            Line::Blank => {
                roots.push(ListItem::paragraph(""));
                path.clear();
                continue;
            }
            Line::Text(line) => {
                roots.push(ListItem::paragraph(line));
                path.clear();
                continue;
            }
            Line::Unordered { level, text } => ListItem {
                level,
                text: text.to_string(),
                children: Vec::new(),
                is_list: true,
                is_ordered: false,
                list_number: String::new(),
            },
            Line::Ordered { number, text } => ListItem {
                level: number.matches('.').count(),
                text: text.to_string(),
                children: Vec::new(),
                is_list: true,
                is_ordered: true,
                list_number: number,
            },
        };

        while !path.is_empty() && node_at(&roots, &path).level >= item.level {
            path.pop();
        }

        if path.is_empty() {
            roots.push(item);
            path.push(roots.len() - 1);
        } else {
            let parent = node_at_mut(&mut roots, &path);
            parent.children.push(item);
            let index = parent.children.len() - 1;
            path.push(index);
        }
    }

    roots
}

fn node_at<'a>(roots: &'a [ListItem], path: &[usize]) -> &'a ListItem {
    let mut node = &roots[path[0]];
    for &i in &path[1..] {
        node = &node.children[i];
    }
    node
}

fn node_at_mut<'a>(roots: &'a mut [ListItem], path: &[usize]) -> &'a mut ListItem {
    let mut node = &mut roots[path[0]];
    for &i in &path[1..] {
        node = &mut node.children[i];
    }
    node
}

/// Bullet glyph for an unordered item at `level`.
pub fn bullet(level: usize) -> &'static str {
    match level {
        1 => "•",
        2 => "○",
        3 => "▪",
        _ => "‣",
    }
}

/// Marker shown in front of a list item: the list number or a bullet glyph.
pub fn marker(item: &ListItem) -> &str {
    if item.is_ordered {
        &item.list_number
    } else {
        bullet(item.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[ListItem]) -> Vec<&str> {
        items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn lone_level_two_dash_is_root() {
        let items = parse("-- Hi");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].level, 2);
        assert_eq!(items[0].text, "Hi");
        assert!(items[0].is_list);
        assert!(!items[0].is_ordered);
        assert!(items[0].children.is_empty());
    }

    #[test]
    fn numbered_outline_nests_by_segments() {
        let items = parse("1. A\n1.1. B\n1.2. C\n2. D");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].list_number, "1.");
        assert_eq!(items[0].level, 1);
        let children: Vec<&str> = items[0]
            .children
            .iter()
            .map(|c| c.list_number.as_str())
            .collect();
        assert_eq!(children, vec!["1.1.", "1.2."]);
        assert!(items[0].children.iter().all(|c| c.level == 2 && c.is_ordered));
        assert_eq!(items[1].list_number, "2.");
        assert!(items[1].children.is_empty());
    }

    #[test]
    fn blank_line_resets_nesting() {
        let items = parse("- A\n\n-- B");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text, "A");
        assert!(items[0].children.is_empty());
        assert!(items[1].is_blank());
        assert_eq!(items[2].text, "B");
        assert_eq!(items[2].level, 2);
    }

    #[test]
    fn paragraph_resets_nesting() {
        let items = parse("- A\nplain words\n-- B");
        assert_eq!(texts(&items), vec!["A", "plain words", "B"]);
        assert!(!items[1].is_list);
        assert_eq!(items[1].level, 0);
        assert!(items[0].children.is_empty());
    }

    #[test]
    fn skipped_level_nests_under_nearest_smaller() {
        let items = parse("- top\n--- deep\n-- mid");
        assert_eq!(items.len(), 1);
        let top = &items[0];
        assert_eq!(texts(&top.children), vec!["deep", "mid"]);
        assert_eq!(top.children[0].level, 3);
        assert_eq!(top.children[1].level, 2);
    }

    #[test]
    fn mixed_markers_nest_by_level() {
        let items = parse("1. Intro\n-- detail\n2. Next");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].children.len(), 1);
        assert!(!items[0].children[0].is_ordered);
        assert_eq!(items[1].list_number, "2.");
    }

    #[test]
    fn lines_are_trimmed_and_dash_needs_no_space() {
        let items = parse("   -tight\r\n  --  spaced  ");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "tight");
        assert_eq!(items[0].children[0].text, "spaced");
    }

    #[test]
    fn dash_only_line_is_empty_item() {
        let items = parse("---");
        assert_eq!(items[0].level, 3);
        assert_eq!(items[0].text, "");
        assert!(items[0].is_list);
    }

    #[test]
    fn decimal_prose_backtracks_to_first_segment() {
        // "1.5 apples" has no dot after the last segment, so only "1." is a marker.
        let items = parse("1.5 apples");
        assert!(items[0].is_ordered);
        assert_eq!(items[0].list_number, "1.");
        assert_eq!(items[0].text, "5 apples");
    }

    #[test]
    fn number_without_dot_is_text() {
        let items = parse("42 things");
        assert!(!items[0].is_list);
        assert_eq!(items[0].text, "42 things");
    }

    #[test]
    fn empty_input_is_single_blank() {
        let items = parse("");
        assert_eq!(items.len(), 1);
        assert!(items[0].is_blank());
    }

    #[test]
    fn levels_match_marker_counts() {
        let items = parse("---- four\n1.2.3. three");
        assert_eq!(items[0].level, 4);
        // level 3 is shallower than 4, so it starts a new root
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].level, 3);
    }

    #[test]
    fn glyphs_by_level() {
        assert_eq!(bullet(1), "•");
        assert_eq!(bullet(2), "○");
        assert_eq!(bullet(3), "▪");
        assert_eq!(bullet(7), "‣");
        let items = parse("3.1. x");
        assert_eq!(marker(&items[0]), "3.1.");
    }
}
