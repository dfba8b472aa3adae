//! CSV report generation
//!
//! Row schema, one row per line:
//!
//! ```text
//! URL,<url>
//! Timestamp,<timestamp>
//! Type,Link
//! Internal,<link>      (one per internal link)
//! External,<link>      (one per external link)
//! Images
//! Image,<url>          (one per image)
//! HTML Tag Count
//! <tag>,<count>        (one per vocabulary tag)
//! ```
//!
//! Fields are not quoted; a comma inside a URL ends up as an extra column.

use crate::crawler::PageFacts;

/// Formats page facts as a CSV report
pub fn format_csv_report(facts: &PageFacts) -> String {
    let mut rows = vec![
        format!("URL,{}", facts.source),
        format!("Timestamp,{}", facts.timestamp()),
        "Type,Link".to_string(),
    ];

    rows.extend(facts.internal_links.iter().map(|link| format!("Internal,{}", link)));
    rows.extend(facts.external_links.iter().map(|link| format!("External,{}", link)));

    rows.push("Images".to_string());
    rows.extend(facts.images.iter().map(|image| format!("Image,{}", image)));

    rows.push("HTML Tag Count".to_string());
    rows.extend(
        facts
            .tag_counts
            .iter()
            .map(|entry| format!("{},{}", entry.tag, entry.count)),
    );

    rows.join("\n")
}
