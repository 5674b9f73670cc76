//! Size / Color Code Normalizer
//!
//! Maps free-text size and color input to the short codes embedded in
//! SKUs. Lookup misses fall back to the first three alphanumeric
//! characters of the input, uppercased — a documented heuristic, not an
//! error. The normalizer never fails.

/// Sentinel size for products without size variation
pub const SIZE_ONE_SIZE: &str = "OS";
/// Sentinel color for products without color variation
pub const COLOR_NONE: &str = "NON";

/// Synonym table lookup for sizes (input already trimmed + lowercased)
fn size_code(text: &str) -> Option<&'static str> {
    let code = match text {
        "extra small" | "x-small" | "xsmall" | "xs" => "XS",
        "small" | "sm" | "s" => "S",
        "medium" | "med" | "m" => "M",
        "large" | "lg" | "l" => "L",
        "extra large" | "x-large" | "xlarge" | "xl" => "XL",
        "extra extra large" | "double extra large" | "xx-large" | "xxl" | "2xl" => "XXL",
        "one size" | "one-size" | "free size" | "os" => SIZE_ONE_SIZE,
        _ => return None,
    };
    Some(code)
}

/// Synonym table lookup for colors (input already trimmed + lowercased)
fn color_code(text: &str) -> Option<&'static str> {
    let code = match text {
        "black" => "BLK",
        "white" => "WHT",
        "red" => "RED",
        "blue" => "BLU",
        "navy" | "navy blue" => "NVY",
        "green" => "GRN",
        "yellow" => "YLW",
        "grey" | "gray" => "GRY",
        "pink" => "PNK",
        "purple" => "PRP",
        "orange" => "ORG",
        "brown" => "BRN",
        "beige" => "BGE",
        "silver" => "SLV",
        "gold" => "GLD",
        "multicolor" | "multi" => "MUL",
        "none" => COLOR_NONE,
        _ => return None,
    };
    Some(code)
}

/// First 3 alphanumeric characters, uppercased
///
/// Restricting to alphanumerics keeps the fallback inside the Formatter's
/// `[A-Z0-9]` charset ("hot pink" → "HOT", "off-white" → "OFF").
fn fallback_code(text: &str) -> Option<String> {
    let code: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    if code.is_empty() { None } else { Some(code) }
}

/// Resolve a size code; absent/blank input maps to the one-size sentinel
pub fn normalize_size(input: Option<&str>) -> String {
    let Some(text) = input.map(str::trim).filter(|t| !t.is_empty()) else {
        return SIZE_ONE_SIZE.to_string();
    };
    let lowered = text.to_lowercase();
    size_code(&lowered)
        .map(String::from)
        .or_else(|| fallback_code(text))
        .unwrap_or_else(|| SIZE_ONE_SIZE.to_string())
}

/// Resolve a color code; absent/blank input maps to the no-color sentinel
pub fn normalize_color(input: Option<&str>) -> String {
    let Some(text) = input.map(str::trim).filter(|t| !t.is_empty()) else {
        return COLOR_NONE.to_string();
    };
    let lowered = text.to_lowercase();
    color_code(&lowered)
        .map(String::from)
        .or_else(|| fallback_code(text))
        .unwrap_or_else(|| COLOR_NONE.to_string())
}
