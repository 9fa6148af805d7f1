const SIZE_UNITS: [&str; 9] = ["B", "K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Formats a byte count with binary prefixes, e.g. `1536` -> `"1.5 K"`.
///
/// Plain bytes are printed as an integer; every larger unit gets one decimal.
/// `Y` is the last unit, so anything beyond it keeps growing in yottabytes.
pub fn sizeof_fmt(num: u128) -> String {
    if num < 1024 {
        return format!("{} {}", num, SIZE_UNITS[0]);
    }

    let mut value = num as f64;
    for unit in &SIZE_UNITS[..SIZE_UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }

    format!("{:.1} {}", value, SIZE_UNITS[SIZE_UNITS.len() - 1])
}
