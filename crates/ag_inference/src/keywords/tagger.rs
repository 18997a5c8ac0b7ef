use ag_core::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::stopwords::is_stop_word;

/// Universal part-of-speech categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Auxiliary,
    Particle,
    Numeral,
    Punctuation,
}

impl PartOfSpeech {
    pub fn is_noun(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
}

/// Assigns a part of speech to every token of a text.
pub trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>>;
}

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[.!?]+").expect("token pattern is valid")
});

static CLOSED_CLASS: Lazy<HashMap<&'static str, PartOfSpeech>> = Lazy::new(|| {
    use PartOfSpeech::*;
    let groups: [(&[&str], PartOfSpeech); 7] = [
        (
            &[
                "a", "an", "the", "this", "that", "these", "those", "each", "every", "some",
                "any", "no", "another", "such", "either", "neither",
            ],
            Determiner,
        ),
        (
            &[
                "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his", "she",
                "her", "hers", "it", "its", "we", "us", "our", "ours", "they", "them", "their",
                "theirs", "who", "whom", "whose", "which", "what", "myself", "yourself",
                "himself", "herself", "itself", "ourselves", "themselves", "someone",
                "something", "anyone", "anything", "everyone", "everything", "nobody", "nothing",
            ],
            Pronoun,
        ),
        (
            &[
                "of", "in", "on", "at", "by", "for", "with", "about", "against", "between",
                "into", "through", "during", "before", "after", "above", "below", "from", "up",
                "down", "over", "under", "across", "among", "around", "behind", "beyond",
                "within", "without", "toward", "towards", "upon", "via", "per", "onto", "since",
                "until", "despite",
            ],
            Adposition,
        ),
        (
            &[
                "and", "or", "but", "nor", "yet", "so", "because", "although", "though",
                "while", "whereas", "if", "unless", "whether", "than",
            ],
            Conjunction,
        ),
        (
            &[
                "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had",
                "having", "do", "does", "did", "will", "would", "shall", "should", "can",
                "could", "may", "might", "must",
            ],
            Auxiliary,
        ),
        (&["not", "to", "n't"], Particle),
        (
            &[
                "very", "also", "just", "only", "even", "still", "already", "often", "never",
                "always", "here", "there", "then", "now", "how", "when", "where", "why", "too",
                "quite", "rather", "almost", "again",
            ],
            Adverb,
        ),
    ];

    let mut lexicon = HashMap::new();
    for (words, pos) in groups {
        for word in words {
            lexicon.insert(*word, pos);
        }
    }
    lexicon
});

static COMMON_VERBS: &[&str] = &[
    "said", "says", "say", "make", "makes", "get", "gets", "got", "go", "goes", "went", "take",
    "takes", "took", "come", "comes", "came", "see", "sees", "saw", "know", "knows", "knew",
    "think", "thinks", "thought", "give", "gives", "gave", "find", "finds", "found", "tell",
    "tells", "told", "become", "becomes", "became", "leave", "leaves", "left", "feel", "feels",
    "felt", "bring", "brings", "brought", "begin", "begins", "began", "keep", "keeps", "kept",
    "hold", "holds", "held", "write", "writes", "wrote", "stand", "stands", "stood", "hear",
    "hears", "heard", "let", "lets", "mean", "means", "meant", "set", "sets", "meet", "meets",
    "met", "run", "runs", "ran", "pay", "pays", "paid", "sit", "sits", "sat", "speak", "speaks",
    "spoke", "lie", "lies", "lay", "lead", "leads", "led", "grow", "grows", "grew", "lose",
    "loses", "lost", "fall", "falls", "fell", "send", "sends", "sent", "build", "builds",
    "built", "understand", "understands", "understood", "draw", "draws", "drew", "break",
    "breaks", "broke", "spend", "spends", "spent", "rise", "rises", "rose", "drive", "drives",
    "drove", "buy", "buys", "bought", "wear", "wears", "wore", "choose", "chooses", "chose",
    "seek", "seeks", "sought", "use", "uses", "want", "wants", "need", "needs", "help", "helps",
    "allow", "allows", "provide", "provides", "include", "includes",
];

const ADVERB_SUFFIXES: &[&str] = &["ly"];
const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ize", "ise", "ify"];
const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ical", "ish"];

/// Rule-based English tagger: a closed-class lexicon, a list of frequent
/// verbs, suffix rules for open-class words and capitalisation for proper
/// nouns. Anything unrecognised is a common noun.
#[derive(Debug, Default, Clone)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    fn classify(word: &str, lower: &str, sentence_start: bool) -> PartOfSpeech {
        if word.chars().all(|c| c.is_numeric() || c == '-') {
            return PartOfSpeech::Numeral;
        }
        if let Some(pos) = CLOSED_CLASS.get(lower) {
            return *pos;
        }
        if COMMON_VERBS.contains(&lower) {
            return PartOfSpeech::Verb;
        }

        let capitalized = word.chars().next().map_or(false, char::is_uppercase);
        let acronym = word.chars().count() > 1 && word.chars().all(|c| !c.is_lowercase());
        if acronym || (capitalized && !sentence_start) {
            return PartOfSpeech::ProperNoun;
        }

        let len = lower.chars().count();
        if len > 4 && has_suffix(lower, ADVERB_SUFFIXES) {
            PartOfSpeech::Adverb
        } else if len > 4 && has_suffix(lower, VERB_SUFFIXES) {
            PartOfSpeech::Verb
        } else if len > 4 && has_suffix(lower, ADJECTIVE_SUFFIXES) {
            PartOfSpeech::Adjective
        } else {
            PartOfSpeech::Noun
        }
    }
}

fn has_suffix(word: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| word.ends_with(suffix))
}

/// Drop a trailing possessive `'s`.
fn strip_possessive(token: &str) -> &str {
    token
        .strip_suffix("'s")
        .or_else(|| token.strip_suffix("’s"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(token)
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;

        for m in TOKEN_RE.find_iter(text) {
            let raw = m.as_str();
            if raw.starts_with(['.', '!', '?']) {
                tokens.push(TaggedToken {
                    text: raw.to_string(),
                    pos: PartOfSpeech::Punctuation,
                    is_stop: false,
                });
                sentence_start = true;
                continue;
            }

            let word = strip_possessive(raw);
            let lower = word.to_lowercase();
            let pos = Self::classify(word, &lower, sentence_start);
            tokens.push(TaggedToken {
                text: word.to_string(),
                pos,
                is_stop: is_stop_word(&lower),
            });
            sentence_start = false;
        }

        Ok(tokens)
    }
}
