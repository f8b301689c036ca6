//! Curriculum command implementation.

use std::path::Path;

/// Runs the curriculum command.
pub fn run(store_path: &Path, slug: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handler = super::open_handler(store_path)?;
    let response = handler.get_curriculum(slug)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&response)?),
        _ => {
            println!("{}", response.title);
            for (i, section) in response.curriculum.iter().enumerate() {
                println!("  {}. {}", i + 1, section.title);
                for lesson in &section.lessons {
                    println!("     - {} ({})", lesson.name, lesson.slug);
                }
            }
        }
    }
    Ok(())
}
