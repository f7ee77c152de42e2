//! Human readable sizes and ratios

const UNIT_LABELS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
const STEP: u64 = 1024;

/// Format a byte count using 1024 steps ("1.0 GB", "340 kB", "0 B").
///
/// The scaled value is rounded to one decimal place and keeps that decimal
/// only while it is below 10.
pub fn human_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let mut exponent = 0;
    let mut divisor = 1u64;
    while exponent < UNIT_LABELS.len() - 1 && bytes / divisor >= STEP {
        divisor *= STEP;
        exponent += 1;
    }

    let value = (bytes as f64 / divisor as f64 * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{:.1} {}", value, UNIT_LABELS[exponent])
    } else {
        format!("{:.0} {}", value, UNIT_LABELS[exponent])
    }
}

/// Format a transfer rate in bytes per second
pub fn human_speed(bytes_per_second: u64) -> String {
    format!("{}/s", human_bytes(bytes_per_second))
}

/// Shortest decimal representation of a ratio ("1.5", "2", "0")
pub fn format_ratio(ratio: f64) -> String {
    format!("{}", ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(9), "9 B");
        assert_eq!(human_bytes(10), "10 B");
        assert_eq!(human_bytes(1023), "1023 B");
    }

    #[test]
    fn test_scaled_values() {
        assert_eq!(human_bytes(1024), "1.0 kB");
        assert_eq!(human_bytes(340 * 1024), "340 kB");
        assert_eq!(human_bytes(1536 * 1024), "1.5 MB");
        assert_eq!(human_bytes(1 << 30), "1.0 GB");
        assert_eq!(human_bytes(1288490189), "1.2 GB");
        assert_eq!(human_bytes(3 << 40), "3.0 TB");
    }

    #[test]
    fn test_largest_unit() {
        assert_eq!(human_bytes(u64::MAX), "16 EB");
    }

    #[test]
    fn test_speed() {
        assert_eq!(human_speed(0), "0 B/s");
        assert_eq!(human_speed(340 * 1024), "340 kB/s");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(format_ratio(0.0), "0");
        assert_eq!(format_ratio(2.0), "2");
        assert_eq!(format_ratio(1.5), "1.5");
        assert_eq!(format_ratio(0.125), "0.125");
    }
}
