//! Naming utilities for code generation

use heck::{ToPascalCase, ToSnakeCase};

/// Convert a table name to a struct name (PascalCase)
/// e.g., "user-events.v2" -> "UserEventsV2", "self" -> "TSelf"
pub fn to_struct_name(table_name: &str) -> String {
    let name = table_name.replace(['-', '.'], "_").to_pascal_case();
    if name.starts_with(|c: char| c.is_ascii_digit()) || is_reserved_type_name(&name) {
        format!("T{}", name)
    } else {
        name
    }
}

/// `Self` and the prelude names generated models refer to
fn is_reserved_type_name(name: &str) -> bool {
    matches!(
        name,
        "Self" | "Option" | "Some" | "None" | "Result" | "Ok" | "Err" | "String" | "Vec" | "Box"
    )
}

/// Convert an attribute name to a field name (snake_case)
pub fn to_field_name(attribute_name: &str) -> String {
    attribute_name.replace(['-', '.'], "_").to_snake_case()
}

/// Convert a table name to a module name for its CRUD functions
/// e.g., "UserEvents" -> "user_events", "Type" -> "r#type"
pub fn to_module_name(table_name: &str) -> String {
    escape_field_name(table_name)
}

/// Escape a field name if it's a Rust keyword or starts with a digit
pub fn escape_field_name(name: &str) -> String {
    let snake = to_field_name(name);
    if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", snake)
    } else if is_rust_keyword(&snake) {
        // `self`, `super` and `crate` cannot be raw identifiers
        if matches!(snake.as_str(), "self" | "super" | "crate") {
            format!("{}_", snake)
        } else {
            format!("r#{}", snake)
        }
    } else {
        snake
    }
}

/// Pluralize a word for generated function names, e.g. `scan_users`
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_string();
    }

    let irregulars: &[(&str, &str)] = &[
        ("person", "people"),
        ("child", "children"),
        ("index", "indices"),
    ];
    for (singular, plural) in irregulars {
        if word == *singular {
            return plural.to_string();
        }
    }

    // Already plural-looking names stay as they are (Users, orders)
    if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
        return word.to_string();
    }

    if word.ends_with("ss")
        || word.ends_with("us")
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before_y = stem.chars().last().unwrap_or('a');
        if !"aeiou".contains(before_y) {
            return format!("{}ies", stem);
        }
    }

    format!("{}s", word)
}

/// Check if a name is a Rust reserved keyword
pub fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "gen"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "try"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
    )
}
