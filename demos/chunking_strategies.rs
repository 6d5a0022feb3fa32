//! Chunking Strategies Comparison
//!
//! Runs the same document through every strategy and shows where each one
//! draws chunk boundaries.
//!
//! ```bash
//! cargo run --example chunking_strategies
//! ```

use mdslabs::{Chunk, ChunkingEngine, ChunkingStrategy};

const DOCUMENT: &str = r#"# Training Guide

Machine learning models learn patterns from data. They generalize these patterns to make predictions on new, unseen examples.

## The Loop

The training process involves three key steps:

1. Forward pass: Input flows through the network, producing predictions.
2. Loss computation: Predictions are compared against ground truth.
3. Backpropagation: Gradients flow backward, updating weights.

```python
for batch in loader:
    loss = model(batch).loss
    loss.backward()
    optimizer.step()
```

## Results

| epoch | loss |
|-------|------|
| 1     | 2.31 |
| 10    | 0.42 |

Dr. Hinton pioneered backpropagation in the 1980s. In 2024, the work was recognized with the Nobel Prize.
"#;

fn show(chunks: &[Chunk]) {
    println!("   Chunks: {}", chunks.len());
    for chunk in chunks {
        let preview: String = chunk
            .content
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let path = chunk.metadata.header_path.join(" > ");
        let mut flags = Vec::new();
        if let Some(lang) = &chunk.metadata.code_language {
            flags.push(format!("code:{lang}"));
        } else if chunk.metadata.contains_code {
            flags.push("code".to_string());
        }
        if chunk.metadata.contains_table {
            flags.push("table".to_string());
        }
        if chunk.metadata.oversized {
            flags.push("oversized".to_string());
        }
        println!(
            "   [{}] lines {}-{} ({} chars) [{}] {}: \"{}...\"",
            chunk.metadata.chunk_index,
            chunk.metadata.start_line,
            chunk.metadata.end_line,
            chunk.metadata.char_count,
            path,
            flags.join(","),
            preview
        );
    }
}

fn main() {
    println!("Markdown Chunking Strategies");
    println!("============================\n");
    println!("Document length: {} characters\n", DOCUMENT.chars().count());

    for (i, strategy) in ChunkingStrategy::ALL.into_iter().enumerate() {
        println!("{}. {strategy}", i + 1);
        println!("   {}", "-".repeat(strategy.as_str().len()));

        let chunks = ChunkingEngine::with_strategy(strategy, 250).process_content(DOCUMENT);
        if let Some(first) = chunks.first() {
            println!("   Resolved to: {}", first.metadata.chunking_strategy);
        }
        show(&chunks);
        println!();
    }

    println!("Small cap (60 chars): atomic units stay whole and are flagged.\n");
    show(&ChunkingEngine::markdown(60).process_content(DOCUMENT));

    println!("\n--- Summary ---\n");
    println!("| Strategy     | Boundaries             | Best For             |");
    println!("|--------------|------------------------|----------------------|");
    println!("| header-based | heading sections       | docs, READMEs        |");
    println!("| size-based   | paragraph, line, words | prose, plain text    |");
    println!("| code-aware   | every code fence       | tutorials, snippets  |");
    println!("| auto         | headings if present    | mixed corpora        |");
}
