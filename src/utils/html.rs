use ammonia;

/// Sanitize user-supplied free text (bios, video descriptions, comments)
/// with the ammonia whitelist before it is stored.
///
/// This strips dangerous tags (<script>, <iframe>) and attributes (onclick)
/// while keeping harmless formatting, as a fail-safe against stored XSS in
/// whatever client renders the content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
