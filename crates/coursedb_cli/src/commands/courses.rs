//! Courses listing command implementation.

use std::path::Path;

/// Runs the courses command.
pub fn run(store_path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let handler = super::open_handler(store_path)?;
    let listing = handler.list_courses()?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&listing)?),
        _ => {
            if listing.courses.is_empty() {
                println!("No courses stored");
                return Ok(());
            }
            for summary in &listing.courses {
                let category = summary.course.category.as_deref().unwrap_or("-");
                println!(
                    "{:24} {:32} {}",
                    summary.course.slug, summary.course.title, category
                );
            }
        }
    }
    Ok(())
}
