//! Statistics reporting.

use console::style;

use crate::download::DownloadState;

/// Print statistics for an artist run.
pub fn print_artist_stats(state: &DownloadState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Statistics for {}:", state.artist_name)).bold()
    );
    println!(
        "  Pages:       {}/{}",
        state.pages_processed, state.total_pages
    );
    println!("  Submissions: {}", state.submissions_processed);
    println!(
        "  Downloaded:  {} ({})",
        style(state.downloaded_count).green(),
        format_bytes(state.downloaded_bytes)
    );
    println!("  Existing:    {} (skipped)", style(state.existing_count).yellow());
    if state.failed_count > 0 {
        println!("  Failed:      {}", style(state.failed_count).red());
    }
    if state.skipped_entries > 0 {
        println!("  Unusable:    {} (no URL or bad name)", state.skipped_entries);
    }
    println!("  Total:       {} files", state.total_successful());
    println!("{}", style("═".repeat(50)).dim());
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
