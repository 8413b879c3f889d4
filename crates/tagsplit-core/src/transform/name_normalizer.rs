use std::fmt;

use heck::{ToLowerCamelCase, ToPascalCase};

use crate::parse::operation::HttpMethod;

/// A name with the casing variants the emitters need.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: prefix_leading_digit(sanitized.to_pascal_case()),
        camel_case: prefix_leading_digit(sanitized.to_lower_camel_case()),
    }
}

/// Name an operation that has no `operationId` from its method and route.
///
/// `GET /users` is `listUsers`, `GET /users/{userId}` is `getUser` and
/// `GET /users/{userId}/messages` is `listUsersMessages`.
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let targets_one = segments.last().is_some_and(|s| is_path_param(s));
    let resources: Vec<&str> = segments
        .into_iter()
        .filter(|s| !is_path_param(s))
        .collect();

    let verb = match method {
        HttpMethod::Get if targets_one => "get",
        HttpMethod::Get => "list",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        HttpMethod::Delete => "delete",
        HttpMethod::Patch => "patch",
        HttpMethod::Options => "options",
        HttpMethod::Head => "head",
    };

    let last = resources.len().saturating_sub(1);
    let noun: String = resources
        .iter()
        .enumerate()
        .map(|(i, &segment)| {
            let word = if i == last && targets_one {
                singular(segment)
            } else {
                segment
            };
            sanitize_identifier(word).to_pascal_case()
        })
        .collect();

    format!("{verb}{noun}")
}

fn is_path_param(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Drop a plural `s`. Good enough for REST collection names.
fn singular(word: &str) -> &str {
    if word.ends_with("ss") {
        return word;
    }
    word.strip_suffix('s').filter(|w| !w.is_empty()).unwrap_or(word)
}

/// Join the alphanumeric runs of `name` with `_`.
fn sanitize_identifier(name: &str) -> String {
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        "unnamed".to_string()
    } else {
        words.join("_")
    }
}

/// TypeScript identifiers cannot start with a digit.
fn prefix_leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}
