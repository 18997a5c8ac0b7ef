pub const MIN_WORDS: usize = 400;
pub const MAX_WORDS: usize = 600;

/// Prompt asking for a professional 400-600 word article built around `keywords`.
pub fn build_prompt(keywords: &[String]) -> String {
    format!(
        "Based on the following keywords, write a comprehensive article:\n\
         Keywords: {}\n\
         \n\
         Please make sure the content is:\n\
         - Well-structured with clear paragraphs\n\
         - Engaging and informative\n\
         - Between {}-{} words\n\
         - Written in a professional tone\n",
        keywords.join(", "),
        MIN_WORDS,
        MAX_WORDS
    )
}

/// The keyword list embedded in a prompt built by [`build_prompt`].
pub fn keywords_from_prompt(prompt: &str) -> Vec<String> {
    prompt
        .lines()
        .find_map(|line| line.trim().strip_prefix("Keywords:"))
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_constraints() {
        let keywords = vec!["server".to_string(), "cluster".to_string(), "node".to_string()];
        let prompt = build_prompt(&keywords);
        assert!(prompt.contains("Keywords: server, cluster, node"));
        assert!(prompt.contains("Between 400-600 words"));
        assert!(prompt.contains("professional tone"));
        assert_eq!(keywords_from_prompt(&prompt), keywords);
    }

    #[test]
    fn test_no_keyword_line() {
        assert!(keywords_from_prompt("write something").is_empty());
    }
}
