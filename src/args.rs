//! Parsing of the free-text `"<case name> [count]"` open argument.

/// A parsed open request, count already clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub case_name: String,
    pub count: u32,
}

/// Split `"<name> [count]"` into a case name and a count in `1..=max_count`.
///
/// Returns `None` when no case name was given.
pub fn parse_open_args(input: &str, max_count: u32) -> Option<OpenRequest> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (case_name, count) = match parts.as_slice() {
        [] => return None,
        [name] => (name.to_string(), 1),
        [head @ .., last] => match parse_count(last) {
            Some(count) => (head.join(" "), count),
            None => legacy_trailing_count(&parts.join(" ")),
        },
    };

    if case_name.is_empty() {
        return None;
    }
    Some(OpenRequest {
        case_name,
        count: clamp_count(count, max_count),
    })
}

/// Legacy argument heuristic: peel trailing digits off the whole argument
/// and treat them as the count, e.g. `"命运 武器箱10"`.
///
/// Only reached when the last whitespace token is not an integer. Case names
/// that themselves end in a digit are misread: `"光谱 武器箱2"` opens
/// `"光谱 武器箱"` twice.
pub fn legacy_trailing_count(joined: &str) -> (String, i64) {
    let head = joined.trim_end_matches(|c: char| ascii_digit(c).is_some());
    let digits = &joined[head.len()..];
    if digits.is_empty() {
        return (joined.to_string(), 1);
    }
    // Anything too long for i64 is far above the cap anyway.
    let count = normalize_digits(digits).parse::<i64>().unwrap_or(i64::MAX);
    (head.trim().to_string(), count)
}

fn parse_count(token: &str) -> Option<i64> {
    normalize_digits(token).parse::<i64>().ok()
}

/// ASCII and full-width (U+FF10..=U+FF19) decimal digits, as ASCII.
fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')),
        _ => None,
    }
}

/// Full-width input methods produce `１０` for `10`.
fn normalize_digits(token: &str) -> String {
    token.chars().map(|c| ascii_digit(c).unwrap_or(c)).collect()
}

fn clamp_count(count: i64, max_count: u32) -> u32 {
    count.clamp(1, i64::from(max_count.max(1))) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 100;

    fn req(name: &str, count: u32) -> Option<OpenRequest> {
        Some(OpenRequest {
            case_name: name.to_string(),
            count,
        })
    }

    #[test]
    fn name_only_defaults_to_one() {
        assert_eq!(parse_open_args("命运武器箱", MAX), req("命运武器箱", 1));
        assert_eq!(parse_open_args("  命运武器箱  ", MAX), req("命运武器箱", 1));
    }

    #[test]
    fn trailing_integer_token_is_the_count() {
        assert_eq!(parse_open_args("命运武器箱 10", MAX), req("命运武器箱", 10));
        assert_eq!(parse_open_args("光谱 2号 武器箱 3", MAX), req("光谱 2号 武器箱", 3));
        assert_eq!(parse_open_args("命运武器箱 +7", MAX), req("命运武器箱", 7));
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(parse_open_args("命运武器箱 500", MAX), req("命运武器箱", 100));
        assert_eq!(parse_open_args("命运武器箱 0", MAX), req("命运武器箱", 1));
        assert_eq!(parse_open_args("命运武器箱 -3", MAX), req("命运武器箱", 1));
        assert_eq!(
            parse_open_args("命运武器箱 99999999999999999999999", MAX),
            req("命运武器箱", 100)
        );
    }

    #[test]
    fn full_width_digits_count() {
        assert_eq!(parse_open_args("命运武器箱 １０", MAX), req("命运武器箱", 10));
        assert_eq!(parse_open_args("命运 武器箱１０", MAX), req("命运 武器箱", 10));
        assert_eq!(parse_open_args("命运武器箱 1０", MAX), req("命运武器箱", 10));
        assert_eq!(parse_open_args("命运武器箱 ５００", MAX), req("命运武器箱", 100));
        assert_eq!(legacy_trailing_count("光谱 武器箱２"), ("光谱 武器箱".into(), 2));
    }

    #[test]
    fn single_token_is_never_digit_scanned() {
        assert_eq!(parse_open_args("命运武器箱10", MAX), req("命运武器箱10", 1));
    }

    #[test]
    fn legacy_heuristic_peels_trailing_digits() {
        assert_eq!(parse_open_args("命运 武器箱10", MAX), req("命运 武器箱", 10));
        assert_eq!(parse_open_args("命运 武器箱", MAX), req("命运 武器箱", 1));
        assert_eq!(parse_open_args("命运 武器箱250", MAX), req("命运 武器箱", 100));
    }

    #[test]
    fn legacy_heuristic_misreads_names_ending_in_digits() {
        // A case literally called "光谱 武器箱2" opened without a count is
        // read as two openings of "光谱 武器箱".
        assert_eq!(parse_open_args("光谱 武器箱2", MAX), req("光谱 武器箱", 2));
        assert_eq!(legacy_trailing_count("光谱 武器箱2"), ("光谱 武器箱".into(), 2));
    }

    #[test]
    fn empty_input_has_no_case() {
        assert_eq!(parse_open_args("", MAX), None);
        assert_eq!(parse_open_args("   ", MAX), None);
        assert_eq!(parse_open_args("a 12", MAX), req("a", 12));
        assert_eq!(parse_open_args("12 34", MAX), req("12", 34));
    }

    #[test]
    fn legacy_heuristic_on_raw_strings() {
        assert_eq!(legacy_trailing_count("x 1"), ("x".into(), 1));
        assert_eq!(legacy_trailing_count("12"), ("".into(), 12));
    }
}
