//! Structural scan of Markdown-like text.
//!
//! One pass over the lines of a normalized document, classifying runs of
//! lines into blocks:
//!
//! ````text
//! # Guide                  Heading { level: 1 }
//!                          Blank
//! Some intro text that     Paragraph
//! spans two lines.
//!                          Blank
//! ```python                Fence { language: Some("python"), closed: true }
//! print("hi")
//! ```
//! | a | b |                Table { malformed: false }
//! |---|---|
//! | 1 | 2 |
//! ````
//!
//! Blocks tile the document: their byte spans are contiguous and cover every
//! byte, so any run of blocks maps back to one slice of the text.
//!
//! Nothing here fails. An unterminated fence runs to the end of the
//! document, a table with ragged rows is kept verbatim and flagged, and a run
//! of seven or more `#` is just text.

use std::ops::Range;

/// Deepest heading level recognised.
const MAX_HEADING_LEVEL: usize = 6;

/// Markdown allows up to three spaces before a block marker.
const MAX_MARKER_INDENT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Heading { level: u8 },
    Fence { language: Option<String>, closed: bool },
    Table { malformed: bool },
    Paragraph,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub kind: BlockKind,
    /// Byte span in the normalized text, trailing newline included.
    pub span: Range<usize>,
    /// Index into [`ScannedDocument::path`]. For a heading this is the path
    /// that ends with the heading itself.
    pub path: usize,
}

/// A normalized document and its block structure.
#[derive(Debug)]
pub(crate) struct ScannedDocument<'a> {
    text: &'a str,
    blocks: Vec<Block>,
    /// Distinct header paths in order of appearance; `paths[0]` is the root.
    paths: Vec<Vec<String>>,
    line_starts: Vec<usize>,
    headings: usize,
    fences: usize,
    tables: usize,
}

impl<'a> ScannedDocument<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn path(&self, index: usize) -> &[String] {
        &self.paths[index]
    }

    pub fn has_headings(&self) -> bool {
        self.headings > 0
    }

    pub fn has_fences(&self) -> bool {
        self.fences > 0
    }

    pub fn table_count(&self) -> usize {
        self.tables
    }

    /// 1-based line number containing the byte at `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: usize,
    /// Line text without its terminating `\n`.
    body: &'a str,
    /// Byte offset just past the terminating `\n` (or end of text).
    end: usize,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split_inclusive('\n') {
        let end = start + raw.len();
        lines.push(Line {
            start,
            body: raw.strip_suffix('\n').unwrap_or(raw),
            end,
        });
        start = end;
    }
    lines
}

/// Strip up to three leading spaces; `None` if the line is indented deeper.
fn strip_marker_indent(line: &str) -> Option<&str> {
    let indent = line.bytes().take_while(|&b| b == b' ').count();
    (indent <= MAX_MARKER_INDENT).then(|| &line[indent..])
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse an ATX heading: `#`..`######`, then whitespace or end of line.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let rest = strip_marker_indent(line)?;
    let level = rest.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return None;
    }

    let after = &rest[level..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }

    let title = after.trim();
    // Optional closing sequence: "## Title ##". "C#" keeps its hash.
    let unclosed = title.trim_end_matches('#');
    let title = if unclosed.is_empty() || unclosed.ends_with([' ', '\t']) {
        unclosed.trim_end()
    } else {
        title
    };

    if title.is_empty() {
        return None;
    }
    Some((level as u8, title))
}

#[derive(Debug, Clone, Copy)]
struct FenceOpen {
    marker: u8,
    len: usize,
}

impl FenceOpen {
    fn parse(line: &str) -> Option<(Self, Option<&str>)> {
        let rest = strip_marker_indent(line)?;
        let marker = *rest.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = rest.bytes().take_while(|&b| b == marker).count();
        if len < 3 {
            return None;
        }

        let info = rest[len..].trim();
        if marker == b'`' && info.contains('`') {
            return None;
        }
        let language = info
            .split_whitespace()
            .next()
            .map(|word| word.trim_matches(|c| c == '{' || c == '}' || c == '.'))
            .filter(|word| !word.is_empty());

        Some((Self { marker, len }, language))
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(rest) = strip_marker_indent(line) else {
            return false;
        };
        let rest = rest.trim_end();
        rest.len() >= self.len && rest.bytes().all(|b| b == self.marker)
    }
}

/// `|---|:---:|` style delimiter row.
fn is_table_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn is_table_row(line: &str) -> bool {
    !is_blank(line) && line.contains('|')
}

fn cell_count(row: &str) -> usize {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').count()
}

fn table_starts_at(lines: &[Line<'_>], i: usize) -> bool {
    is_table_row(lines[i].body)
        && !is_table_delimiter(lines[i].body)
        && lines.get(i + 1).is_some_and(|next| is_table_delimiter(next.body))
}

struct Scanner<'a> {
    text: &'a str,
    lines: Vec<Line<'a>>,
    blocks: Vec<Block>,
    paths: Vec<Vec<String>>,
    open_headings: Vec<(u8, String)>,
    current_path: usize,
    headings: usize,
    fences: usize,
    tables: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: split_lines(text),
            blocks: Vec::new(),
            paths: vec![Vec::new()],
            open_headings: Vec::new(),
            current_path: 0,
            headings: 0,
            fences: 0,
            tables: 0,
        }
    }

    fn push(&mut self, kind: BlockKind, first_line: usize, last_line: usize) {
        let span = self.lines[first_line].start..self.lines[last_line].end;
        self.blocks.push(Block {
            kind,
            span,
            path: self.current_path,
        });
    }

    fn enter_heading(&mut self, level: u8, title: &str) {
        while self
            .open_headings
            .last()
            .is_some_and(|(open, _)| *open >= level)
        {
            self.open_headings.pop();
        }
        self.open_headings.push((level, title.to_string()));
        self.paths
            .push(self.open_headings.iter().map(|(_, t)| t.clone()).collect());
        self.current_path = self.paths.len() - 1;
    }

    /// Whether line `i` begins a block other than a paragraph.
    fn interrupts_paragraph(&self, i: usize) -> bool {
        let body = self.lines[i].body;
        is_blank(body)
            || parse_heading(body).is_some()
            || FenceOpen::parse(body).is_some()
            || table_starts_at(&self.lines, i)
    }

    fn run(mut self) -> ScannedDocument<'a> {
        let count = self.lines.len();
        let mut i = 0;

        while i < count {
            let body = self.lines[i].body;

            if let Some((fence, language)) = FenceOpen::parse(body) {
                let close = (i + 1..count).find(|&j| fence.is_closed_by(self.lines[j].body));
                let last = close.unwrap_or(count - 1);
                let kind = BlockKind::Fence {
                    language: language.map(str::to_string),
                    closed: close.is_some(),
                };
                self.push(kind, i, last);
                self.fences += 1;
                i = last + 1;
                continue;
            }

            if is_blank(body) {
                let last = (i..count)
                    .take_while(|&j| is_blank(self.lines[j].body))
                    .last()
                    .unwrap_or(i);
                self.push(BlockKind::Blank, i, last);
                i = last + 1;
                continue;
            }

            if let Some((level, title)) = parse_heading(body) {
                self.enter_heading(level, title);
                self.push(BlockKind::Heading { level }, i, i);
                self.headings += 1;
                i += 1;
                continue;
            }

            if table_starts_at(&self.lines, i) {
                let columns = cell_count(body);
                let mut last = i + 1;
                let mut malformed = cell_count(self.lines[last].body) != columns;
                while last + 1 < count && is_table_row(self.lines[last + 1].body) {
                    last += 1;
                    malformed |= cell_count(self.lines[last].body) != columns;
                }
                self.push(BlockKind::Table { malformed }, i, last);
                self.tables += 1;
                i = last + 1;
                continue;
            }

            let mut last = i;
            while last + 1 < count && !self.interrupts_paragraph(last + 1) {
                last += 1;
            }
            self.push(BlockKind::Paragraph, i, last);
            i = last + 1;
        }

        let line_starts = self.lines.iter().map(|line| line.start).collect();
        ScannedDocument {
            text: self.text,
            blocks: self.blocks,
            paths: self.paths,
            line_starts,
            headings: self.headings,
            fences: self.fences,
            tables: self.tables,
        }
    }
}

/// Scan a normalized document into blocks.
pub(crate) fn scan(text: &str) -> ScannedDocument<'_> {
    Scanner::new(text).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &ScannedDocument<'_>) -> Vec<BlockKind> {
        doc.blocks().iter().map(|b| b.kind.clone()).collect()
    }

    #[test]
    fn test_blocks_tile_the_text() {
        let text = "# T\n\npara one\nstill one\n\n```rs\nfn x() {}\n```\n| a | b |\n|---|---|\n| 1 | 2 |\ntail";
        let doc = scan(text);
        let mut cursor = 0;
        for block in doc.blocks() {
            assert_eq!(block.span.start, cursor);
            cursor = block.span.end;
        }
        assert_eq!(cursor, text.len());
    }

    #[test]
    fn test_block_kinds() {
        let text = "# T\n\npara\n```python\nx = 1\n```\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let doc = scan(text);
        assert_eq!(
            kinds(&doc),
            vec![
                BlockKind::Heading { level: 1 },
                BlockKind::Blank,
                BlockKind::Paragraph,
                BlockKind::Fence {
                    language: Some("python".into()),
                    closed: true
                },
                BlockKind::Table { malformed: false },
            ]
        );
        assert_eq!(doc.table_count(), 1);
    }

    #[test]
    fn test_heading_parsing() {
        assert_eq!(parse_heading("# Title"), Some((1, "Title")));
        assert_eq!(parse_heading("   ###   Deep  "), Some((3, "Deep")));
        assert_eq!(parse_heading("## Closed ##"), Some((2, "Closed")));
        assert_eq!(parse_heading("# C#"), Some((1, "C#")));
        assert_eq!(parse_heading("###### Six"), Some((6, "Six")));
        assert_eq!(parse_heading("####### Seven"), None);
        assert_eq!(parse_heading("#hashtag"), None);
        assert_eq!(parse_heading("#"), None);
        assert_eq!(parse_heading("    # indented code"), None);
    }

    #[test]
    fn test_header_paths() {
        let doc = scan("# L1\n## L2\n### L3\nBody\n## Back\nMore");
        let paths: Vec<&[String]> = doc.blocks().iter().map(|b| doc.path(b.path)).collect();
        assert_eq!(paths[3], ["L1", "L2", "L3"]);
        assert_eq!(paths[4], ["L1", "Back"]);
        assert_eq!(paths[5], ["L1", "Back"]);
    }

    #[test]
    fn test_skipped_levels_accepted() {
        let doc = scan("# A\n### C\ntext\n## B\ntext");
        let last = doc.blocks().last().unwrap();
        assert_eq!(doc.path(last.path), ["A", "B"]);
        assert_eq!(doc.path(doc.blocks()[2].path), ["A", "C"]);
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let text = "intro\n```js\nlet a = 1;\n# not a heading\n";
        let doc = scan(text);
        let fence = doc.blocks().last().unwrap();
        assert_eq!(
            fence.kind,
            BlockKind::Fence {
                language: Some("js".into()),
                closed: false
            }
        );
        assert_eq!(fence.span.end, text.len());
        assert!(!doc.has_headings());
    }

    #[test]
    fn test_fence_close_rules() {
        let doc = scan("````\n```\nstill code\n````\nafter");
        assert_eq!(
            doc.blocks()[0].kind,
            BlockKind::Fence {
                language: None,
                closed: true
            }
        );
        assert_eq!(doc.blocks()[1].kind, BlockKind::Paragraph);

        let doc = scan("~~~ {.rust}\nfn main() {}\n~~~");
        assert_eq!(
            doc.blocks()[0].kind,
            BlockKind::Fence {
                language: Some("rust".into()),
                closed: true
            }
        );
    }

    #[test]
    fn test_malformed_table_kept() {
        let doc = scan("| a | b |\n|---|---|\n| 1 | 2 | 3 |\n| only |\nafter");
        assert_eq!(doc.blocks()[0].kind, BlockKind::Table { malformed: true });
        assert_eq!(doc.blocks()[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_pipe_without_delimiter_is_text() {
        let doc = scan("a | b\nc | d");
        assert_eq!(kinds(&doc), vec![BlockKind::Paragraph]);
        assert_eq!(doc.table_count(), 0);
    }

    #[test]
    fn test_line_of() {
        let doc = scan("one\ntwo\n\nfour");
        assert_eq!(doc.line_of(0), 1);
        assert_eq!(doc.line_of(3), 1);
        assert_eq!(doc.line_of(4), 2);
        assert_eq!(doc.line_of(9), 4);
    }

    #[test]
    fn test_empty_text() {
        let doc = scan("");
        assert!(doc.blocks().is_empty());
        assert!(!doc.has_headings());
        assert!(!doc.has_fences());
    }
}
