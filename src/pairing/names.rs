//! Decide whether a file name identifies a movie or only describes a subtitle track.
//!
//! Subtitle files are often named after their language or track type
//! (`English.srt`, `2_Forced.srt`, `SDH.eng.HI.srt`), in which case the movie
//! identity has to come from one of the directories above the file instead.
//! Classification is table driven: a name is generic only when every word in it
//! is a known language, region, subtitle qualifier or track number.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::pairing::descriptor::FileDescriptor;
use crate::pairing::path::{PathSegments, strip_extension};

/// Names shorter than this are never used as a movie identity.
pub const MIN_IDENTITY_LENGTH: usize = 4;

static RE_TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.()\[\]{}\s_,\-]+").expect("Failed to compile token separator regex"));

/// Canonical ISO 639-2/B code, codes, and names for each recognized language.
static LANGUAGES: [(&str, &[&str], &[&str]); 47] = [
    ("ara", &["ar", "ara"], &["arabic"]),
    ("baq", &["eu", "baq", "eus"], &["basque"]),
    ("ben", &["bn", "ben"], &["bengali"]),
    ("bos", &["bs", "bos"], &["bosnian"]),
    ("bul", &["bg", "bul"], &["bulgarian"]),
    ("cat", &["ca", "cat"], &["catalan"]),
    ("chi", &["zh", "chi", "zho", "chs", "cht"], &["chinese", "mandarin", "cantonese"]),
    ("cze", &["cs", "cze", "ces"], &["czech", "cesky"]),
    ("dan", &["da", "dan"], &["danish", "dansk"]),
    ("dut", &["nl", "dut", "nld"], &["dutch", "nederlands", "flemish"]),
    ("eng", &["en", "eng"], &["english"]),
    ("est", &["et", "est"], &["estonian"]),
    ("fin", &["fi", "fin"], &["finnish", "suomi"]),
    ("fre", &["fr", "fre", "fra"], &["french", "francais", "français"]),
    ("ger", &["de", "ger", "deu"], &["german", "deutsch"]),
    ("glg", &["gl", "glg"], &["galician"]),
    ("gre", &["el", "gre", "ell"], &["greek"]),
    ("heb", &["he", "heb"], &["hebrew"]),
    ("hin", &["hin"], &["hindi"]),
    ("hrv", &["hr", "hrv", "scr"], &["croatian", "hrvatski"]),
    ("hun", &["hu", "hun"], &["hungarian", "magyar"]),
    ("ice", &["is", "ice", "isl"], &["icelandic"]),
    ("ind", &["id", "ind"], &["indonesian"]),
    ("ita", &["it", "ita"], &["italian", "italiano"]),
    ("jpn", &["ja", "jpn", "jap"], &["japanese"]),
    ("kor", &["ko", "kor"], &["korean"]),
    ("lav", &["lv", "lav"], &["latvian"]),
    ("lit", &["lt", "lit"], &["lithuanian"]),
    ("mac", &["mk", "mac", "mkd"], &["macedonian"]),
    ("may", &["ms", "may", "msa"], &["malay"]),
    ("nor", &["no", "nor", "nb", "nob", "nn", "nno"], &["norwegian", "norsk", "bokmal"]),
    ("per", &["fa", "per", "fas"], &["persian", "farsi"]),
    ("pob", &["pb", "pob", "ptbr"], &[]),
    ("pol", &["pl", "pol"], &["polish", "polski"]),
    ("por", &["pt", "por"], &["portuguese", "portugues", "português"]),
    ("rum", &["ro", "rum", "ron"], &["romanian"]),
    ("rus", &["ru", "rus"], &["russian"]),
    ("scc", &["sr", "scc", "srp"], &["serbian"]),
    ("slo", &["sk", "slo", "slk"], &["slovak"]),
    ("slv", &["sl", "slv"], &["slovenian", "slovene"]),
    ("spa", &["es", "spa", "esp"], &["spanish", "espanol", "español", "castellano", "castilian"]),
    ("swe", &["sv", "swe"], &["swedish", "svenska"]),
    ("tam", &["ta", "tam"], &["tamil"]),
    ("tel", &["te", "tel"], &["telugu"]),
    ("tha", &["th", "tha"], &["thai"]),
    ("tur", &["tr", "tur"], &["turkish", "turkce"]),
    ("ukr", &["uk", "ukr"], &["ukrainian"]),
];

/// Words qualifying a language, like the `Simplified` in `Chinese (Simplified)`.
static REGIONS: [&str; 18] = [
    "american",
    "br",
    "brazilian",
    "canadian",
    "cn",
    "european",
    "gb",
    "hans",
    "hant",
    "hk",
    "lat",
    "latam",
    "latin",
    "latino",
    "mexican",
    "simplified",
    "traditional",
    "tw",
];

/// Places that also name movies, like `Brazil` or `Mexico`.
/// Generic only next to a language, as in `Portuguese (Brazil)`.
static PLACES: [&str; 9] = [
    "brazil", "canada", "europe", "hong", "kong", "mexico", "portugal", "spain", "taiwan",
];

/// Subtitle track types. `hi` is read as hearing impaired, not Hindi.
static QUALIFIERS: [(&str, Qualifier); 7] = [
    ("cc", Qualifier::HearingImpaired),
    ("deaf", Qualifier::HearingImpaired),
    ("forced", Qualifier::Forced),
    ("hearing", Qualifier::HearingImpaired),
    ("hi", Qualifier::HearingImpaired),
    ("impaired", Qualifier::HearingImpaired),
    ("sdh", Qualifier::HearingImpaired),
];

/// Track types that are also movie titles, like `Signs` (2002).
/// Generic only next to a language, as in `English (Signs)`.
static TITLE_QUALIFIERS: [(&str, Qualifier); 5] = [
    ("default", Qualifier::Other),
    ("foreign", Qualifier::Forced),
    ("full", Qualifier::Other),
    ("signs", Qualifier::Forced),
    ("songs", Qualifier::Other),
];

/// Directory names that only hold subtitles, compared after folding to lowercase alphanumerics.
static CONTAINER_DIRECTORY_NAMES: [&str; 8] = [
    "legendas",
    "sub",
    "subs",
    "subtitle",
    "subtitles",
    "subtitulos",
    "subz",
    "untertitel",
];

/// Substrings marking a multilingual subtitle bundle directory.
static CONTAINER_DIRECTORY_MARKERS: [&str; 4] = ["multilingual", "sous-titres", "soustitres", "titulky"];

static TOKENS: LazyLock<HashMap<&'static str, Token>> = LazyLock::new(|| {
    let mut tokens = HashMap::new();
    for (word, qualifier) in QUALIFIERS {
        tokens.insert(word, Token::Qualifier(qualifier));
    }
    for (word, qualifier) in TITLE_QUALIFIERS {
        tokens.insert(word, Token::TitleQualifier(qualifier));
    }
    for (code, codes, names) in &LANGUAGES {
        for word in *codes {
            tokens.entry(*word).or_insert(Token::LanguageCode(*code));
        }
        for word in *names {
            tokens.entry(*word).or_insert(Token::LanguageName(*code));
        }
    }
    for word in REGIONS {
        tokens.entry(word).or_insert(Token::Region);
    }
    for word in PLACES {
        tokens.entry(word).or_insert(Token::Place);
    }
    tokens
});

static DEFAULT_NORMALIZER: LazyLock<NameNormalizer> = LazyLock::new(NameNormalizer::default);

/// Result of classifying a name candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClass {
    /// Usable as a movie identity.
    Identity(String),
    /// Not usable, with the reason.
    Generic(GenericReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericReason {
    /// Fewer than [`MIN_IDENTITY_LENGTH`] characters.
    TooShort,
    /// Only separators and brackets.
    NoWords,
    /// Language given by a code like `en` or `eng`.
    LanguageCode,
    /// Language or region given by name like `English` or `Chinese (Simplified)`.
    LanguageName,
    /// Only track type words like `Forced` or `SDH`.
    Qualifier,
    /// Directory that only holds subtitles, like `Subs`.
    ContainerDirectory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    Forced,
    HearingImpaired,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    LanguageCode(&'static str),
    LanguageName(&'static str),
    Region,
    Place,
    Qualifier(Qualifier),
    TitleQualifier(Qualifier),
    TrackNumber,
}

/// Language and track type read from the end of a subtitle name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtitleTags {
    /// ISO 639-2/B code.
    pub language: Option<&'static str>,
    pub forced: bool,
    pub hearing_impaired: bool,
}

/// Name classifier with an extendable list of subtitle container directories.
#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    extra_container_dirs: Vec<String>,
}

impl NameClass {
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity(_))
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        !self.is_identity()
    }
}

impl NameNormalizer {
    /// Add container directory names on top of the built-in ones.
    #[must_use]
    pub fn with_container_dirs<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra_container_dirs = names
            .into_iter()
            .map(|name| fold_alphanumeric(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();

        Self { extra_container_dirs }
    }

    /// Check if a directory name denotes a folder of subtitles rather than a movie.
    #[must_use]
    pub fn is_container_directory(&self, segment: &str) -> bool {
        let folded = fold_alphanumeric(segment);
        if CONTAINER_DIRECTORY_NAMES.contains(&folded.as_str()) || self.extra_container_dirs.contains(&folded) {
            return true;
        }
        let lower = segment.to_lowercase();
        CONTAINER_DIRECTORY_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    /// Classify a directory segment: container directories are generic
    /// on top of the normal name rules.
    #[must_use]
    pub fn classify_directory(&self, segment: &str) -> NameClass {
        if self.is_container_directory(segment) {
            NameClass::Generic(GenericReason::ContainerDirectory)
        } else {
            classify_name(segment)
        }
    }

    /// Best string to identify the movie a file belongs to.
    ///
    /// Returns the file name without extension when it is usable,
    /// otherwise the nearest usable directory name,
    /// and falls back to the file name without extension.
    #[must_use]
    pub fn detection_name(&self, name: &str, full_path: &str) -> String {
        let candidate = strip_extension(name);
        if let NameClass::Identity(identity) = classify_name(candidate) {
            return identity;
        }

        PathSegments::from_full_path(full_path)
            .walk_up()
            .find(|segment| self.classify_directory(segment).is_identity())
            .unwrap_or(candidate)
            .to_string()
    }
}

/// Classify a file or directory name without extension.
///
/// ```rust
/// use subpair::pairing::{GenericReason, NameClass, classify_name};
///
/// assert_eq!(
///     classify_name("The Matrix (1999)"),
///     NameClass::Identity("The Matrix (1999)".to_string())
/// );
/// assert_eq!(classify_name("Chinese (Simplified)"), NameClass::Generic(GenericReason::LanguageName));
/// assert_eq!(classify_name("SDH.eng.HI"), NameClass::Generic(GenericReason::LanguageCode));
/// assert_eq!(classify_name("en"), NameClass::Generic(GenericReason::TooShort));
/// ```
#[must_use]
pub fn classify_name(candidate: &str) -> NameClass {
    if candidate.chars().count() < MIN_IDENTITY_LENGTH {
        return NameClass::Generic(GenericReason::TooShort);
    }

    let lower = candidate.to_lowercase();
    let mut words = 0;
    let mut has_code = false;
    let mut has_language_name = false;
    let mut has_region = false;
    let mut has_place = false;
    let mut has_qualifier = false;
    let mut has_title_qualifier = false;

    for word in split_words(&lower) {
        words += 1;
        match lookup_token(word) {
            Some(Token::LanguageCode(_)) => has_code = true,
            Some(Token::LanguageName(_)) => has_language_name = true,
            Some(Token::Region) => has_region = true,
            Some(Token::Place) => has_place = true,
            Some(Token::Qualifier(_)) => has_qualifier = true,
            Some(Token::TitleQualifier(_)) => has_title_qualifier = true,
            Some(Token::TrackNumber) => {}
            None => return NameClass::Identity(candidate.to_string()),
        }
    }

    // Places and title-like track types only count next to a language
    if (has_place || has_title_qualifier) && !(has_code || has_language_name) {
        return NameClass::Identity(candidate.to_string());
    }

    if words == 0 {
        NameClass::Generic(GenericReason::NoWords)
    } else if has_language_name || has_region || has_place {
        NameClass::Generic(GenericReason::LanguageName)
    } else if has_code {
        NameClass::Generic(GenericReason::LanguageCode)
    } else if has_qualifier || has_title_qualifier {
        NameClass::Generic(GenericReason::Qualifier)
    } else {
        // Only track numbers, like "01_02"
        NameClass::Identity(candidate.to_string())
    }
}

/// Check if a name is generic using the built-in tables.
#[must_use]
pub fn is_generic_name(candidate: &str) -> bool {
    classify_name(candidate).is_generic()
}

/// Check if a directory name is a subtitle container using the built-in tables.
#[must_use]
pub fn is_container_directory(segment: &str) -> bool {
    DEFAULT_NORMALIZER.is_container_directory(segment)
}

/// Best movie identity for a file using the built-in tables.
///
/// ```rust
/// use subpair::pairing::{FileDescriptor, best_detection_name};
///
/// let file = FileDescriptor::subtitle("Spirited Away (2022)/Subs/English.srt");
/// assert_eq!(best_detection_name(&file), "Spirited Away (2022)");
///
/// let file = FileDescriptor::subtitle("en.srt");
/// assert_eq!(best_detection_name(&file), "en");
/// ```
#[must_use]
pub fn best_detection_name(file: &FileDescriptor) -> String {
    DEFAULT_NORMALIZER.detection_name(&file.name, &file.full_path)
}

/// Read language and track type from the trailing dot-separated parts of a subtitle base name.
///
/// Parts are read from the end until one contains an unknown word,
/// so `Movie.en.forced` gives English forced and `The.French.Connection` gives nothing.
#[must_use]
pub fn subtitle_tags(base_name: &str) -> SubtitleTags {
    let lower = base_name.to_lowercase();
    let mut tags = SubtitleTags::default();

    for part in lower.rsplit('.') {
        let tokens: Option<Vec<Token>> = split_words(part).map(lookup_token).collect();
        let Some(tokens) = tokens else {
            break;
        };
        for token in tokens {
            match token {
                Token::LanguageCode(code) | Token::LanguageName(code) => {
                    tags.language.get_or_insert(code);
                }
                Token::Qualifier(Qualifier::Forced) | Token::TitleQualifier(Qualifier::Forced) => tags.forced = true,
                Token::Qualifier(Qualifier::HearingImpaired) | Token::TitleQualifier(Qualifier::HearingImpaired) => {
                    tags.hearing_impaired = true;
                }
                Token::Qualifier(Qualifier::Other)
                | Token::TitleQualifier(Qualifier::Other)
                | Token::Region
                | Token::Place
                | Token::TrackNumber => {}
            }
        }
    }

    tags
}

fn split_words(lower: &str) -> impl Iterator<Item = &str> {
    RE_TOKEN_SEPARATOR.split(lower).filter(|word| !word.is_empty())
}

fn lookup_token(word: &str) -> Option<Token> {
    if word.len() <= 2 && word.chars().all(|c| c.is_ascii_digit()) {
        return Some(Token::TrackNumber);
    }
    TOKENS.get(word).copied()
}

fn fold_alphanumeric(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
