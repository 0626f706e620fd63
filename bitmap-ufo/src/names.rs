//! Glyph naming

/// Looks up the name of a character, e.g. `LATIN SMALL LETTER A`.
pub trait CharNames {
    fn name_of(&self, ch: char) -> Option<String>;
}

/// Character names from the Unicode character database.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeNames;

impl CharNames for UnicodeNames {
    fn name_of(&self, ch: char) -> Option<String> {
        unicode_names2::name(ch).map(|name| name.to_string())
    }
}

impl<F> CharNames for F
where
    F: Fn(char) -> Option<String>,
{
    fn name_of(&self, ch: char) -> Option<String> {
        self(ch)
    }
}

/// Replace every character outside `[A-Za-z0-9_.-]` with an underscore.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '.' | '-' => ch,
            _ => '_',
        })
        .collect()
}
