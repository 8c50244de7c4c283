use std::time::Duration;

use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "fullfeed".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Full-text RSS for link aggregators\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print an indented label/value detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print elapsed time, colored by how long the run took
pub fn print_timing(label: &str, duration: Duration) {
    let secs = duration.as_secs_f64();
    let label = format!("{}:", label);
    if secs < 1.0 {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "fast".dimmed());
    } else if secs < 10.0 {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}s ({})", label.dimmed(), secs, "slow".bright_red());
    }
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
