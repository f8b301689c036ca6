//! Deterministic category colors.
//!
//! Categories get a stable color by hashing the category name into a
//! fixed palette. The hash runs over UTF-16 code units with i32
//! wrapping arithmetic so colors match those already rendered by the
//! existing site for the same names.

/// The display palette, indexed by name hash.
const PALETTE: [&str; 18] = [
    "#667eea", // Purple-blue
    "#f093fb", // Pink-purple
    "#4facfe", // Light blue
    "#43e97b", // Green
    "#fa709a", // Pink-orange
    "#a8edea", // Mint
    "#ff9a9e", // Coral
    "#a18cd1", // Lavender
    "#ffecd2", // Peach
    "#ff8a80", // Salmon
    "#326ce5", // Blue (Kubernetes-like)
    "#2563eb", // Professional blue
    "#7c3aed", // Purple
    "#dc2626", // Red
    "#059669", // Emerald
    "#d97706", // Orange
    "#be185d", // Rose
    "#0891b2", // Cyan
];

/// Returns the hex color for a category name.
///
/// The same name always maps to the same palette entry.
#[must_use]
pub fn category_color(name: &str) -> &'static str {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    PALETTE[hash.unsigned_abs() as usize % PALETTE.len()]
}
