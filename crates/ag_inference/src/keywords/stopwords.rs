use once_cell::sync::Lazy;
use std::collections::HashSet;

pub(crate) static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
        "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
        "becomes", "been", "before", "beforehand", "behind", "being", "below", "beside",
        "besides", "between", "beyond", "both", "bottom", "but", "by", "call", "can", "cannot",
        "could", "did", "do", "does", "doing", "done", "down", "due", "during", "each", "either",
        "else", "elsewhere", "empty", "enough", "even", "ever", "every", "everyone",
        "everything", "everywhere", "except", "few", "first", "for", "former", "formerly",
        "from", "front", "full", "further", "get", "give", "go", "had", "has", "have", "he",
        "hence", "her", "here", "hereafter", "hereby", "herein", "hers", "herself", "him",
        "himself", "his", "how", "however", "hundred", "i", "if", "in", "indeed", "into", "is",
        "it", "its", "itself", "just", "keep", "last", "latter", "least", "less", "made", "make",
        "many", "may", "me", "meanwhile", "might", "mine", "more", "moreover", "most", "mostly",
        "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
        "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
        "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
        "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part", "per",
        "perhaps", "please", "put", "quite", "rather", "really", "regarding", "same", "say",
        "see", "seem", "seemed", "seeming", "seems", "several", "she", "should", "show", "side",
        "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
        "somewhere", "still", "such", "take", "than", "that", "the", "their", "them",
        "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
        "therein", "thereupon", "these", "they", "third", "this", "those", "though", "three",
        "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward",
        "towards", "two", "under", "unless", "until", "up", "upon", "us", "used", "using",
        "various", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
        "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
        "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
        "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stop_word() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("The"));
        assert!(is_stop_word("whereas"));
        assert!(!is_stop_word("cluster"));
    }
}
