//! Header sanitization for subprocess argv boundaries.

/// Encode a header value so it survives the trip through a subprocess
/// argument.
///
/// Contract: CR and LF are stripped, so a captured value cannot smuggle a
/// second header or terminate the argument early. Literal `{` and `}`
/// become `%7B`/`%7D`; the fetch tool expands `{}` placeholders in its
/// arguments, and consent-platform cookies routinely contain JSON.
/// Everything else passes through untouched.
pub fn sanitize_header_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .replace('{', "%7B")
        .replace('}', "%7D")
}
