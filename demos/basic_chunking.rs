//! Basic Markdown Chunking
//!
//! The minimal example: chunk a README for indexing and print each chunk
//! with its metadata as JSON.
//!
//! ```bash
//! RUST_LOG=mdslabs=debug cargo run --example basic_chunking
//! ```

use mdslabs::{ChunkingEngine, EngineConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let document = "# Widget\n\
        \n\
        Widgets turn raw input into tidy output.\n\
        \n\
        ## Install\n\
        \n\
        ```bash\n\
        cargo install widget\n\
        ```\n\
        \n\
        ## Options\n\
        \n\
        | flag | meaning |\n\
        |------|---------|\n\
        | -q   | quiet   |\n";

    let config = EngineConfig::from_toml_str("max_chunk_size = 200")?;
    let engine = ChunkingEngine::new(config)?;
    let chunks = engine.process_content(document);

    println!("Document: {} chars", document.chars().count());
    println!("Chunks: {}\n", chunks.len());

    for chunk in &chunks {
        println!("{chunk}");
        println!("{}", serde_json::to_string_pretty(&chunk.metadata)?);
        println!("---\n{}\n", chunk.content);
    }

    Ok(())
}
