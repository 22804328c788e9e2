/// Форматирует число с разделителями тысяч (точками): 1234567 -> "1.234.567"
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let first = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };

    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    result.push_str(&digits[..first]);
    let mut rest = &digits[first..];
    while !rest.is_empty() {
        result.push('.');
        result.push_str(&rest[..3]);
        rest = &rest[3..];
    }
    result
}
