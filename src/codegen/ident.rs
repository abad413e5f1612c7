//! Header names and type paths to Rust identifiers.

use std::collections::HashSet;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// `ScientificName` -> `scientific_name`, `MapID` -> `map_id`,
/// `Canopy %` -> `canopy`. Runs of separators collapse to one `_`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
                let boundary = prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_lower);
                if boundary && !out.ends_with('_') {
                    out.push('_');
                }
            }
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// A usable field name for a header cell.
pub fn field_ident(name: &str) -> String {
    let mut ident = snake_case(name);
    if ident.is_empty() {
        ident.push_str("field");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Field names for a whole header, with repeats made unique (`name`, `name_2`, ...).
pub fn field_idents(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            let base = field_ident(name);
            let mut ident = base.clone();
            let mut n = 1;
            while !seen.insert(ident.clone()) {
                n += 1;
                ident = format!("{base}_{n}");
            }
            ident
        })
        .collect()
}

/// Splits `a.b.Type` or `a::b::Type` into module segments and the type name.
/// The type name keeps its case; anything not alphanumeric or `_` becomes `_`.
pub fn split_type_path(path: &str) -> (Vec<String>, String) {
    let mut segments: Vec<&str> = path
        .split("::")
        .flat_map(|part| part.split('.'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let name = segments.pop().unwrap_or_default();

    let mut type_name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if type_name.is_empty() || type_name.starts_with(|c: char| c.is_ascii_digit()) {
        type_name.insert(0, '_');
    }
    let modules = segments.into_iter().map(field_ident).collect();
    (modules, type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_cases_headers() {
        assert_eq!(snake_case("ScientificName"), "scientific_name");
        assert_eq!(snake_case("TSN"), "tsn");
        assert_eq!(snake_case("MapID"), "map_id");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("WoodyIV_ByName"), "woody_iv_by_name");
        assert_eq!(snake_case("Canopy %"), "canopy");
        assert_eq!(snake_case("  height (m)"), "height_m");
    }

    #[test]
    fn field_idents_are_valid_and_unique() {
        let names: Vec<String> = ["type", "1hr", "", "Name", "name", "NAME"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            field_idents(&names),
            vec!["type_", "_1hr", "field", "name", "name_2", "name_3"]
        );
    }

    #[test]
    fn splits_type_paths() {
        let (mods, ty) = split_type_path("fuelbed.calculators.WoodyIV");
        assert_eq!(mods, vec!["fuelbed", "calculators"]);
        assert_eq!(ty, "WoodyIV");

        let (mods, ty) = split_type_path("tables::Species-Row");
        assert_eq!(mods, vec!["tables"]);
        assert_eq!(ty, "Species_Row");

        let (mods, ty) = split_type_path("Plain");
        assert!(mods.is_empty());
        assert_eq!(ty, "Plain");
    }
}
