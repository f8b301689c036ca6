//! Deploy command implementation.

use std::fs;
use std::path::Path;

/// Runs the deploy command.
pub fn run(
    store_path: &Path,
    slug: &str,
    manifest: &Path,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(manifest)
        .map_err(|e| format!("Cannot read manifest {:?}: {}", manifest, e))?;
    let body: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("Manifest is not valid JSON: {}", e))?;

    let handler = super::open_handler(store_path)?;
    let response = handler.handle_deploy(slug, None, body)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&response)?),
        _ => {
            println!("Deployed course: {}", response.course);
            println!(
                "  course {}",
                serde_json::to_value(response.changes.course)?
                    .as_str()
                    .unwrap_or("updated")
            );
            let s = &response.summary.sections;
            println!(
                "  sections: {} desired, {} added, {} updated, {} removed",
                s.total, s.added, s.updated, s.removed
            );
            let l = &response.summary.lessons;
            println!(
                "  lessons:  {} desired, {} added, {} updated, {} removed",
                l.total, l.added, l.updated, l.removed
            );
        }
    }
    Ok(())
}
