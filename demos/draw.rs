//! Zonage drawing demo — draws two overlapping squares in a temp-dir
//! store, saves, and prints the merged ring plus the persisted document.
//!
//! ```text
//! cargo run --example draw
//! ```

use zonage::session::ZoneDrawingSession;
use zonage::storage::{read_document, FileZoneStore};
use zonage::zone::ZoneCategory;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default: WARN for everything, DEBUG for zonage.
    // Override with RUST_LOG env var (e.g. RUST_LOG=zonage=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("zonage=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dir = tempfile::tempdir()?;
    let store = FileZoneStore::new(dir.path());
    let mut session = ZoneDrawingSession::new(store, ZoneCategory::Internal);

    // First square.
    session.add_point(0.0, 0.0);
    session.add_point(0.0, 10.0);
    session.add_point(10.0, 10.0);
    session.add_point(10.0, 0.0);
    session.save()?;

    // Overlapping square; saving merges it into the first entry.
    session.add_point(5.0, 5.0);
    session.add_point(5.0, 15.0);
    session.add_point(15.0, 15.0);
    session.add_point(15.0, 5.0);
    session.save()?;

    println!("saved rings: {}", session.saved_rings().len());
    for (i, ring) in session.saved_rings().iter().enumerate() {
        let coords: Vec<String> = ring
            .iter()
            .map(|p| format!("({}, {})", p.latitude, p.longitude))
            .collect();
        println!("  ring {i}: {}", coords.join(" "));
    }

    let path = dir.path().join(ZoneCategory::Internal.file_name());
    let document = read_document(&path);
    println!(
        "persisted {} with {} polygon(s)",
        path.display(),
        document.polygons.len()
    );

    Ok(())
}
