/// Convert a name to snake_case for output paths and generated identifiers.
///
/// Handles camel humps, spaces and dashes; output is stable across runs.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(to_snake_case("BottleService"), "bottle_service");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c == ' ' || c == '-' || c == '_' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out.trim_matches('_').to_string()
}

/// Convert a snake_case or spaced name to CamelCase for generated struct
/// names.
pub fn to_camel_case(s: &str) -> String {
    s.split(|c: char| c == '_' || c == ' ' || c == '-')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Make a string safe to use as a Rust identifier in generated code.
pub fn sanitize_ident(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
        "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
        "use", "where", "while", "async", "await", "dyn",
    ];
    let mut s: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.is_empty() {
        s = "_".to_string();
    }
    if s.chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
    {
        s.insert(0, '_');
    }
    // `r#` does not work for these four keywords; suffix instead.
    if matches!(s.as_str(), "self" | "Self" | "crate" | "super") {
        format!("{}_", s)
    } else if KEYWORDS.contains(&s.as_str()) {
        format!("r#{}", s)
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("BottleService"), "bottle_service");
        assert_eq!(to_snake_case("calculator"), "calculator");
        assert_eq!(to_snake_case("my-api name"), "my_api_name");
        assert_eq!(to_snake_case("HTTPServer"), "httpserver");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("hello_world"), "HelloWorld");
        assert_eq!(to_camel_case("user id"), "UserId");
        assert_eq!(to_camel_case("single"), "Single");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("type"), "r#type");
        assert_eq!(sanitize_ident("self"), "self_");
        assert_eq!(sanitize_ident("4chan"), "_4chan");
        assert_eq!(sanitize_ident("a b"), "a_b");
        assert_eq!(sanitize_ident(""), "_");
    }
}
