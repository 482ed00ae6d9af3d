use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Matcher, Utf32Str};

/// Case-insensitive substring matcher over entity names.
///
/// ASCII pairs go through nucleo; anything else is compared on Unicode-lowercased text.
pub struct NameMatcher {
    matcher: Matcher,
    atom: Atom,
    needle: String,
    ascii_query: bool,
    buf: Vec<char>,
}

impl NameMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            atom: Atom::new(
                query,
                CaseMatching::Ignore,
                Normalization::Never,
                AtomKind::Substring,
                false,
            ),
            needle: query.to_lowercase(),
            ascii_query: query.is_ascii(),
            buf: Vec::new(),
        }
    }

    pub fn is_match(&mut self, name: &str) -> bool {
        if !(self.ascii_query && name.is_ascii()) {
            return name.to_lowercase().contains(&self.needle);
        }
        let haystack = Utf32Str::new(name, &mut self.buf);
        self.atom.score(haystack, &mut self.matcher).is_some()
    }
}
