use colored::{ColoredString, Colorize};

/// Colours a remaining-credit counter by how close it is to running out.
pub fn color_number(num: i64) -> ColoredString {
    let text = num.to_string();
    if num <= 10 {
        text.red()
    } else if num <= 100 {
        text.yellow()
    } else {
        text.green()
    }
}
