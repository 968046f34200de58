/// Splits one line into trimmed fields.
///
/// A `"` toggles the in-quotes state and is dropped; a `,` only ends a field
/// outside quotes. There is no escaping, so unbalanced quotes simply swallow
/// the rest of the line into the current field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
