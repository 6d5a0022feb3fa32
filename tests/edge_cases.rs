//! Edge cases a content-chunking utility has to survive.
//!
//! Empty and tiny inputs, header hierarchies, code fences, tables, broken
//! Markdown, Unicode and very large documents.

use std::time::{Duration, Instant};

use mdslabs::{Chunk, ChunkingEngine, ChunkingStrategy, EngineConfig, Error};

fn contents(chunks: &[Chunk]) -> Vec<&str> {
    chunks.iter().map(|c| c.content.as_str()).collect()
}

fn chunk_containing<'a>(chunks: &'a [Chunk], needle: &str) -> &'a Chunk {
    chunks
        .iter()
        .find(|c| c.content.contains(needle))
        .unwrap_or_else(|| panic!("no chunk contains {needle:?}: {chunks:#?}"))
}

// =============================================================================
// Empty and Minimal Input
// =============================================================================

#[test]
fn empty_input_produces_no_chunks() {
    for strategy in ChunkingStrategy::ALL {
        let engine = ChunkingEngine::with_strategy(strategy, 100);
        assert!(engine.process_content("").is_empty());
        assert!(engine.process_content("   \n\t ").is_empty());
        assert!(engine.process_content("\r\n\r\n").is_empty());
    }
}

#[test]
fn single_character_input() {
    for strategy in ChunkingStrategy::ALL {
        let chunks = ChunkingEngine::with_strategy(strategy, 100).process_content("A");
        assert_eq!(contents(&chunks), vec!["A"]);
        assert_eq!(chunks[0].metadata.char_count, 1);
        assert!(chunks[0].metadata.header_path.is_empty());
    }
}

#[test]
fn single_character_with_max_one() {
    let chunks = ChunkingEngine::prose(1).process_content("\n  x  \n");
    assert_eq!(contents(&chunks), vec!["x"]);
    assert!(!chunks[0].metadata.oversized);
}

// =============================================================================
// Header Hierarchy
// =============================================================================

#[test]
fn header_hierarchy_is_preserved() {
    let chunks = ChunkingEngine::markdown(1000).process_content("# L1\n## L2\n### L3\nBody");
    let body = chunk_containing(&chunks, "Body");
    assert_eq!(body.metadata.header_path, ["L1", "L2", "L3"]);
    assert_eq!(body.metadata.chunking_strategy, ChunkingStrategy::HeaderBased);
}

#[test]
fn header_hierarchy_under_size_pressure() {
    let text = "# L1\n## L2\n### L3\nBody text that is long enough to need its own chunk.";
    let chunks = ChunkingEngine::markdown(30).process_content(text);
    let body = chunk_containing(&chunks, "Body");
    assert_eq!(body.metadata.header_path, ["L1", "L2", "L3"]);
}

#[test]
fn sibling_sections_pop_the_stack() {
    let text = "# Guide\n## Install\nRun it.\n## Configure\nEdit it.\n# Reference\nLook it up.";
    let chunks = ChunkingEngine::markdown(1000).process_content(text);

    assert_eq!(chunk_containing(&chunks, "Run it").metadata.header_path, ["Guide", "Install"]);
    assert_eq!(chunk_containing(&chunks, "Edit it").metadata.header_path, ["Guide", "Configure"]);
    assert_eq!(chunk_containing(&chunks, "Look it up").metadata.header_path, ["Reference"]);
    // One chunk per section.
    assert_eq!(chunks.len(), 3);
}

#[test]
fn seven_hashes_is_plain_text() {
    let chunks = ChunkingEngine::markdown(1000).process_content("####### Not a header\nBody");
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].metadata.header_path.is_empty());
    assert_eq!(chunks[0].metadata.chunking_strategy, ChunkingStrategy::SizeBased);
}

#[test]
fn invalid_nesting_does_not_fail() {
    let text = "### Deep first\ntext\n# Top\nmore\n##### Skip\nend";
    let chunks = ChunkingEngine::markdown(1000).process_content(text);
    assert_eq!(chunk_containing(&chunks, "text").metadata.header_path, ["Deep first"]);
    assert_eq!(chunk_containing(&chunks, "end").metadata.header_path, ["Top", "Skip"]);
}

#[test]
fn preamble_has_empty_path() {
    let chunks = ChunkingEngine::markdown(1000).process_content("Preface.\n\n# Chapter\nText.");
    assert!(chunk_containing(&chunks, "Preface").metadata.header_path.is_empty());
    assert_eq!(chunk_containing(&chunks, "Text.").metadata.header_path, ["Chapter"]);
}

// =============================================================================
// Code Fences
// =============================================================================

#[test]
fn code_block_is_detected_with_language() {
    let text = "Example:\n\n```python\ndef hello():\n    print('hi')\n```\n";
    let chunks = ChunkingEngine::markdown(1000).process_content(text);
    let code = chunk_containing(&chunks, "def hello");
    assert!(code.metadata.contains_code);
    assert_eq!(code.metadata.code_language.as_deref(), Some("python"));
}

#[test]
fn code_block_without_language() {
    let chunks = ChunkingEngine::markdown(1000).process_content("```\nraw\n```");
    assert!(chunks[0].metadata.contains_code);
    assert_eq!(chunks[0].metadata.code_language, None);
}

#[test]
fn unknown_language_tag_is_kept_verbatim() {
    let chunks = ChunkingEngine::markdown(1000).process_content("```brainfudge++\n+[-]\n```");
    assert_eq!(chunks[0].metadata.code_language.as_deref(), Some("brainfudge++"));
}

#[test]
fn code_block_is_never_split() {
    let body = "let x = 1;\n".repeat(50);
    let text = format!("Intro paragraph.\n\n```rust\n{body}```\n\nOutro paragraph.");
    let chunks = ChunkingEngine::prose(100).process_content(&text);

    let code = chunk_containing(&chunks, "let x");
    assert!(code.content.starts_with("```rust"));
    assert!(code.content.ends_with("```"));
    assert!(code.metadata.oversized);
    assert_eq!(chunks.iter().filter(|c| c.content.contains("let x")).count(), 1);
}

#[test]
fn hash_lines_inside_code_are_not_headers() {
    let text = "# Real\n```python\n# comment, not a header\nx = 1\n```";
    let chunks = ChunkingEngine::markdown(1000).process_content(text);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.header_path, ["Real"]);
}

#[test]
fn unterminated_fence_consumes_rest() {
    let text = "# Doc\nIntro.\n```js\nconst a = 1;\n# still code\n\nmore code";
    let chunks = ChunkingEngine::markdown(20).process_content(text);
    let code = chunk_containing(&chunks, "const a");
    assert!(code.content.ends_with("more code"));
    assert!(code.metadata.contains_code);
    assert_eq!(code.metadata.code_language.as_deref(), Some("js"));
    assert_eq!(code.metadata.header_path, ["Doc"]);
    assert!(code.metadata.unterminated_fence);
    assert!(chunks.iter().all(|c| !c.metadata.malformed_table));
}

// =============================================================================
// Tables
// =============================================================================

#[test]
fn table_is_kept_whole() {
    let text = "| name | value |\n|------|-------|\n| a | 1 |\n| b | 2 |\n| c | 3 |";
    let chunks = ChunkingEngine::prose(20).process_content(text);
    assert_eq!(contents(&chunks), vec![text]);
    assert!(chunks[0].metadata.contains_table);
    assert!(chunks[0].metadata.oversized);
    assert!(!chunks[0].metadata.malformed_table);
}

#[test]
fn broken_table_does_not_fail() {
    let text = "| a | b |\n|---|\n| 1 | 2 | 3 | 4 |\n|\nplain text after";
    let chunks = ChunkingEngine::markdown(1000).process_content(text);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.contains("| 1 | 2 | 3 | 4 |"));
    assert!(chunks[0].metadata.contains_table);
    assert!(chunks[0].metadata.malformed_table);
}

#[test]
fn pipe_text_without_delimiter_is_not_a_table() {
    let chunks = ChunkingEngine::markdown(1000).process_content("this | that\nthese | those");
    assert!(!chunks[0].metadata.contains_table);
}

// =============================================================================
// Malformed Input
// =============================================================================

#[test]
fn malformed_markdown_never_fails() {
    let inputs = [
        "```",
        "```\n```\n```",
        "#",
        "# ",
        "|",
        "|---|",
        "| a |\n|---|",
        "####### \n######## x",
        "```python\n| a | b |\n|---|---|",
        "\u{0000}\u{0007}\u{001b}[31m red \u{001b}[0m",
        "~~~\n```\n~~~~",
    ];
    for strategy in ChunkingStrategy::ALL {
        let engine = ChunkingEngine::with_strategy(strategy, 5);
        for input in inputs {
            let chunks = engine.process_content(input);
            assert!(chunks.iter().all(|c| !c.content.trim().is_empty()), "{input:?}");
        }
    }
}

#[test]
fn non_text_input_is_rejected() {
    let engine = ChunkingEngine::default();
    let result = engine.process_bytes(&[0xff, 0xfe, 0x00, 0x41]);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn zero_size_config_is_rejected() {
    let result = ChunkingEngine::new(EngineConfig::default().with_max_chunk_size(0));
    assert!(matches!(result, Err(Error::InvalidChunkSize(0))));
}

// =============================================================================
// Unicode
// =============================================================================

#[test]
fn cjk_counts_characters_not_bytes() {
    let chunks = ChunkingEngine::prose(4).process_content("你好世界");
    assert_eq!(contents(&chunks), vec!["你好世界"]);
    assert_eq!(chunks[0].metadata.char_count, 4);
    assert!(!chunks[0].metadata.oversized);
}

#[test]
fn cjk_splits_between_characters() {
    let text = "你好世界".repeat(10);
    let chunks = ChunkingEngine::prose(7).process_content(&text);
    assert!(chunks.len() >= 6);
    for chunk in &chunks {
        assert!(chunk.metadata.char_count <= 7);
    }
    assert_eq!(contents(&chunks).concat(), text);
}

#[test]
fn mixed_scripts_and_emoji() {
    let text = "Hello 世界! مرحبا بالعالم 🎉🎉🎉 Привет мир! 👨‍👩‍👧 family";
    let chunks = ChunkingEngine::prose(8).process_content(text);
    for chunk in &chunks {
        assert_eq!(chunk.metadata.char_count, chunk.content.chars().count());
        // The ZWJ family sequence is one grapheme and never torn apart.
        assert!(!chunk.content.starts_with('\u{200d}'));
        assert!(!chunk.content.ends_with('\u{200d}'));
    }
    assert!(chunks.iter().any(|c| c.content.contains("👨‍👩‍👧")));
}

#[test]
fn combining_marks_stay_attached() {
    let text = "e\u{301}".repeat(30);
    let chunks = ChunkingEngine::prose(5).process_content(&text);
    for chunk in &chunks {
        assert!(!chunk.content.starts_with('\u{301}'));
    }
}

// =============================================================================
// Line Endings
// =============================================================================

#[test]
fn mixed_line_endings_are_normalized() {
    let text = "# Title\r\nLine one\rLine two\nLine three\u{2028}Line four";
    let chunks = ChunkingEngine::markdown(1000).process_content(text);
    assert_eq!(chunks.len(), 1);
    assert_eq!(
        chunks[0].content,
        "# Title\nLine one\nLine two\nLine three\nLine four"
    );
    assert_eq!(chunks[0].metadata.end_line, 5);
}

// =============================================================================
// Large Input
// =============================================================================

#[test]
fn large_input_completes_quickly() {
    let paragraph = "The quick brown fox jumps over the lazy dog. Pack my box with five \
                     dozen liquor jugs. How vexingly quick daft zebras jump!\n\n";
    let text = paragraph.repeat(45_000 / paragraph.len() + 1);
    assert!(text.chars().count() >= 45_000);

    for strategy in ChunkingStrategy::ALL {
        let engine = ChunkingEngine::with_strategy(strategy, 500);
        let started = Instant::now();
        let chunks = engine.process_content(&text);
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(5), "{strategy} took {elapsed:?}");
        assert!(chunks.len() > 50);
        assert!(chunks.iter().all(|c| c.metadata.char_count <= 500));
    }
}

#[test]
fn large_single_line_is_bounded() {
    let text = "word ".repeat(20_000);
    let chunks = ChunkingEngine::prose(1000).process_content(&text);
    assert!(chunks.iter().all(|c| c.metadata.char_count <= 1000));
    assert!(chunks.len() >= 100);
}

#[test]
fn deep_heading_nesting_is_bounded() {
    let mut text = String::new();
    for i in 0..5_000 {
        let level = i % 6 + 1;
        text.push_str(&format!("{} H{i}\nbody {i}\n", "#".repeat(level)));
    }
    let chunks = ChunkingEngine::markdown(200).process_content(&text);
    assert!(chunks.iter().all(|c| c.metadata.header_path.len() <= 6));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn repeated_calls_are_identical() {
    let text = "# A\nalpha beta\n\n```sh\nls\n```\n\n| x | y |\n|---|---|\n| 1 | 2 |\n## B\ngamma";
    let engine = ChunkingEngine::markdown(16);
    let first = engine.process_content(text);
    for _ in 0..5 {
        assert_eq!(engine.process_content(text), first);
    }
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = std::sync::Arc::new(ChunkingEngine::markdown(64));
    let text = "# Shared\nsome body text that gets chunked";
    let expected = engine.process_content(text);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = std::sync::Arc::clone(&engine);
            std::thread::spawn(move || engine.process_content(text))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
