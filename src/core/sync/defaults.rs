/// Human-readable default value for a new source-locale key.
///
/// Uses the last key segment, split on camelCase, `_`, `-` and whitespace.
/// Words are lowercased except all-caps acronyms, and the first letter is
/// capitalized: `form.submitButton` becomes `Submit button`.
pub fn default_value(key: &str, delimiter: &str) -> String {
    let segment = key
        .rsplit(delimiter)
        .find(|s| !s.trim().is_empty())
        .unwrap_or(key);

    let words: Vec<String> = split_words(segment)
        .into_iter()
        .map(|word| {
            if word.len() > 1 && word.chars().all(|c| !c.is_lowercase()) {
                word
            } else {
                word.to_lowercase()
            }
        })
        .collect();

    capitalize(&words.join(" "))
}

fn split_words(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            // `userId` splits before `I`; `HTMLParser` splits before `P`.
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
