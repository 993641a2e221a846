/// Format a float with thousands separators and two decimals: -1,234.56
pub fn amount(val: f64) -> String {
    let negative = val < 0.0 && (val * 100.0).round() != 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Like [`amount`], blank when the figure does not apply.
pub fn optional_amount(val: Option<f64>) -> String {
    val.map(amount).unwrap_or_default()
}
