use super::CellValue;

/// Format a value for display.
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Error(e) => format!("#ERR! {}", e),
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    // -0.0 shows as 0
    let n = if n == 0.0 { 0.0 } else { n };
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
