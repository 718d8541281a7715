//! Plain-text statistics used by the assessments. Bodies are markdown,
//! possibly with raw HTML blocks; words split on whitespace and sentences
//! on `.!?`.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Visible text of a body, split into the blocks a reader sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainText {
    /// Every block in document order, separated by blank lines.
    pub text: String,
    pub paragraphs: Vec<String>,
    pub headings: Vec<String>,
}

impl PlainText {
    pub fn parse(raw: &str) -> Self {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let mut collector = Collector::default();
        for event in Parser::new_ext(raw, options) {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    collector.flush();
                    collector.in_heading = true;
                }
                Event::End(TagEnd::Heading(_)) => {
                    collector.flush();
                    collector.in_heading = false;
                }
                Event::Start(
                    Tag::Paragraph
                    | Tag::Item
                    | Tag::List(_)
                    | Tag::CodeBlock(_)
                    | Tag::BlockQuote(_)
                    | Tag::HtmlBlock
                    | Tag::TableHead
                    | Tag::TableRow,
                )
                | Event::End(
                    TagEnd::Paragraph
                    | TagEnd::Item
                    | TagEnd::CodeBlock
                    | TagEnd::HtmlBlock
                    | TagEnd::TableHead
                    | TagEnd::TableRow,
                ) => collector.flush(),
                Event::Text(text) | Event::Code(text) => collector.current.push_str(&text),
                Event::Html(html) | Event::InlineHtml(html) => collector.html(&html),
                Event::SoftBreak | Event::HardBreak | Event::End(TagEnd::TableCell) => collector.space(),
                _ => {}
            }
        }
        collector.flush();
        collector.finish()
    }

    pub fn has_heading(&self) -> bool {
        !self.headings.is_empty()
    }
}

#[derive(Default)]
struct Collector {
    current: String,
    in_heading: bool,
    /// Tag being read inside raw HTML; tags may span events.
    tag: Option<String>,
    blocks: Vec<String>,
    out: PlainText,
}

impl Collector {
    fn space(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with(char::is_whitespace) {
            self.current.push(' ');
        }
    }

    fn flush(&mut self) {
        let block = self.current.split_whitespace().collect::<Vec<_>>().join(" ");
        self.current.clear();
        if block.is_empty() {
            return;
        }
        if self.in_heading {
            self.out.headings.push(block.clone());
        } else {
            self.out.paragraphs.push(block.clone());
        }
        self.blocks.push(block);
    }

    /// Keep the text of raw HTML; block tags end a block and `<h1>`..`<h6>`
    /// open a heading.
    fn html(&mut self, html: &str) {
        for ch in html.chars() {
            if let Some(tag) = self.tag.as_mut() {
                if ch == '>' {
                    let tag = std::mem::take(tag);
                    self.tag = None;
                    self.html_tag(&tag);
                } else {
                    tag.push(ch);
                }
            } else if ch == '<' {
                self.tag = Some(String::new());
            } else {
                self.current.push(ch);
            }
        }
    }

    fn html_tag(&mut self, tag: &str) {
        let name = tag
            .trim_start_matches('/')
            .chars()
            .take_while(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        match name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                self.in_heading = !tag.starts_with('/');
            }
            "p" | "div" | "li" | "ul" | "ol" | "blockquote" | "section" | "article" | "table" | "tr" => {
                self.flush()
            }
            "br" | "td" | "th" => self.space(),
            _ => {}
        }
    }

    fn finish(mut self) -> PlainText {
        self.out.text = self.blocks.join("\n\n");
        self.out
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Literal, case-insensitive, whole-word occurrences of `needle`.
/// The keyword is never interpreted as a pattern.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    let haystack = haystack.to_lowercase();
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            count += 1;
            from = end;
        } else {
            from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
        }
    }
    count
}

pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    count_occurrences(haystack, needle) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_blocks_keep_their_text() {
        let doc = PlainText::parse("<p>Hello <b>big</b> world</p>\n<p>Second\none</p>");
        assert_eq!(doc.paragraphs, ["Hello big world", "Second one"]);
        assert_eq!(word_count(&doc.text), 5);
    }

    #[test]
    fn markdown_syntax_is_not_counted() {
        let doc = PlainText::parse("Some **bold** and `code` with a [link](https://example.com).");
        assert_eq!(doc.text, "Some bold and code with a link.");
    }

    #[test]
    fn splits_sentences_and_paragraphs() {
        assert_eq!(sentences("One. Two!  Three? "), ["One", "Two", "Three"]);
        assert!(sentences("   ").is_empty());
        let doc = PlainText::parse("First para\nstill first.\n\n\nSecond para.\n");
        assert_eq!(doc.paragraphs, ["First para still first.", "Second para."]);
        assert_eq!(doc.text, "First para still first.\n\nSecond para.");
    }

    #[test]
    fn list_items_are_blocks() {
        let doc = PlainText::parse("- first item\n- second item\n\nAfter the list.");
        assert_eq!(doc.paragraphs, ["first item", "second item", "After the list."]);
    }

    #[test]
    fn counts_whole_words_literally() {
        assert_eq!(count_occurrences("test test test test", "test"), 4);
        assert_eq!(count_occurrences("Testing the TEST, test.", "test"), 2);
        assert_eq!(count_occurrences("c++ and c+++", "c++"), 2);
        assert_eq!(count_occurrences("anything", "a.*"), 0);
        assert_eq!(count_occurrences("ERP migration, erp migration", "erp migration"), 2);
        assert_eq!(count_occurrences("abc", ""), 0);
    }

    #[test]
    fn detects_headings() {
        let doc = PlainText::parse("# Title\n\nintro\n## Section\nbody");
        assert_eq!(doc.headings, ["Title", "Section"]);
        assert_eq!(doc.paragraphs, ["intro", "body"]);
        assert!(PlainText::parse("<H2>Section</H2>\n<p>body</p>").has_heading());
        assert!(!PlainText::parse("#hashtag only").has_heading());
    }
}
