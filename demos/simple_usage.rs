/// docsearch walkthrough
///
/// Builds a snapshot from a small API reference, publishes it,
/// runs a few queries and reloads the snapshot from disk.

use docsearch::compression::compress::CompressionType;
use docsearch::core::config::{Config, QueryConfig};
use docsearch::core::types::{ObjectKind, ObjectPriority, RawDocument, RawObject};
use docsearch::mvcc::publisher::SnapshotPublisher;
use docsearch::mvcc::snapshot::Snapshot;
use docsearch::query::engine::QueryEngine;
use docsearch::writer::index_builder::IndexBuilder;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   docsearch - Build and Search Demo           ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Build a snapshot
    println!("Step 1: BUILD - Indexing pages...");
    let config = Config::default();
    let snapshot = IndexBuilder::new(&config).build(&create_corpus())?;
    println!("  Indexed {} pages, {} terms\n", snapshot.doc_count(), snapshot.term_count());

    // Step 2: Publish it
    println!("Step 2: PUBLISH - Handing the snapshot to readers...");
    let publisher = SnapshotPublisher::with_snapshot(snapshot);
    let engine = publisher.engine(config.query.clone())?;
    println!("  Generation {}\n", publisher.generation());

    // Step 3: Search
    println!("Step 3: SEARCH - Querying...");
    for query in ["lens distortion", "crop_factor", "camera remap", "zzqx lens", "calibratoin"] {
        print_results(&engine, query)?;
    }

    // Step 4: Save and load
    println!("Step 4: PERSIST - Saving and reloading...");
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("docs.dsix");
    engine.snapshot().save(&path, CompressionType::Lz4)?;
    let loaded = Snapshot::load(&path)?;
    println!("  Reloaded snapshot {}", loaded.id());

    let reloaded = QueryEngine::new(Arc::new(loaded), QueryConfig::default());
    print_results(&reloaded, "interpolate")?;

    println!("Done!");
    Ok(())
}

fn print_results(engine: &QueryEngine, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let results = engine.search(query);
    println!("  '{}': {:?}, {} hits", query, results.status, results.total_hits);

    for hit in &results.hits {
        let (document, object) = engine.resolve_hit(hit)?;
        match object {
            Some(object) => println!("    {:>6.1}  {} ({} {})",
                                     hit.score, document.path, object.kind.label(), object.name),
            None => println!("    {:>6.1}  {}", hit.score, document.path),
        }
    }
    if results.fallback_used {
        println!("    (no page matched every word)");
    }
    if let Some(hint) = results.hint() {
        println!("    {}", hint);
    }
    for suggestion in &results.suggestions {
        println!("    did you mean: {}?", suggestion.candidates.join(", "));
    }
    println!();
    Ok(())
}

fn create_corpus() -> Vec<RawDocument> {
    vec![
        RawDocument::new("Lens class", "api/lensfunpy.Lens", "Optical lens with calibration data.")
            .add_section("Interpolation", "interpolation")
            .add_object(RawObject::new("lensfunpy.Lens", ObjectKind::Class)
                .with_priority(ObjectPriority::Important))
            .add_object(RawObject::new("lensfunpy.Lens.interpolate_distortion", ObjectKind::Method)
                .with_description("Interpolate distortion parameters for a focal length"))
            .add_object(RawObject::new("lensfunpy.Lens.crop_factor", ObjectKind::Attribute)),
        RawDocument::new("Camera class", "api/lensfunpy.Camera", "A camera body with a sensor and a mount.")
            .add_object(RawObject::new("lensfunpy.Camera", ObjectKind::Class)
                .with_priority(ObjectPriority::Important))
            .add_object(RawObject::new("lensfunpy.Camera.crop_factor", ObjectKind::Attribute)
                .with_description("Crop factor of the sensor")),
        RawDocument::new("util module", "api/lensfunpy.util", "Remapping helpers for images.")
            .add_object(RawObject::new("lensfunpy.util.remap", ObjectKind::Function)
                .with_priority(ObjectPriority::Unimportant)
                .with_description("Remap an image with undistorted coordinates")),
    ]
}
