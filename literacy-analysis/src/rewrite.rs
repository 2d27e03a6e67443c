//! Audience-targeted rewrites of analyzed content
//!
//! Produces three plain-language renditions of an article, one per age
//! band, from a fixed gloss table. The rewrite is a deterministic text
//! transform with no network calls, so it stays available after the
//! provider quota is spent.

use std::sync::LazyLock;

use literacy_core::clip_to_boundary;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix budgets per audience, in bytes
const CHILDREN_LIMIT: usize = 200;
const TEEN_LIMIT: usize = 300;
const ADULT_LIMIT: usize = 400;

/// Complex terms and their plain-language glosses, in replacement order
///
/// Order matters: overlapping entries ("cap" before "no cap") are applied
/// first-wins, so the earlier gloss consumes the shared text.
const TERM_SIMPLIFICATIONS: [(&str, &str); 34] = [
    // Financial terms
    ("cryptocurrency", "digital money"),
    ("blockchain", "secure digital record system"),
    ("inflation", "when things cost more money"),
    ("recession", "when the economy slows down"),
    ("GDP", "how much money a country makes"),
    ("stock market", "place where company shares are bought and sold"),
    // Political terms
    ("legislation", "new laws"),
    ("amendment", "change to the law"),
    ("bipartisan", "both political parties working together"),
    ("filibuster", "long speech to delay voting"),
    ("caucus", "group meeting to make decisions"),
    ("gerrymandering", "unfairly changing voting districts"),
    // Tech terms
    ("artificial intelligence", "computer that can think like humans"),
    ("machine learning", "computers that learn by themselves"),
    ("algorithm", "computer instructions"),
    ("cloud computing", "storing data on internet servers"),
    ("cybersecurity", "protecting computers from attacks"),
    ("metaverse", "virtual reality world"),
    // Slang
    ("slay", "do something amazing"),
    ("cap", "lie or false statement"),
    ("no cap", "no lie, being honest"),
    ("bussin", "really good"),
    ("periodt", "end of discussion"),
    ("stan", "really support someone"),
    ("simp", "someone who does too much for someone they like"),
    ("vibe check", "checking someone's mood or attitude"),
    ("slaps", "sounds really good"),
    ("fire", "excellent or amazing"),
    // Scientific terms
    ("pandemic", "disease that spreads around the world"),
    ("vaccine", "medicine that prevents disease"),
    ("antibodies", "body's defense against germs"),
    ("climate change", "Earth's weather getting warmer"),
    ("carbon emissions", "pollution that warms the planet"),
    ("renewable energy", "power from sources that don't run out"),
];

struct TermPattern {
    term: &'static str,
    simple: &'static str,
    lower: String,
    /// Matches the term anywhere, including inside longer words
    anywhere: Regex,
    /// Matches the term only at word boundaries
    word: Regex,
}

static TERMS: LazyLock<Vec<TermPattern>> = LazyLock::new(|| {
    TERM_SIMPLIFICATIONS
        .iter()
        .map(|&(term, simple)| {
            let escaped = regex::escape(term);
            TermPattern {
                term,
                simple,
                lower: term.to_lowercase(),
                anywhere: Regex::new(&format!("(?i){escaped}")).expect("term pattern is valid"),
                word: Regex::new(&format!(r"(?i)\b{escaped}\b")).expect("term pattern is valid"),
            }
        })
        .collect()
});

static CHILD_SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile_substitutions(&[
        (r"(?i)\b(investigation|probe|inquiry)\b", "looking into"),
        (r"(?i)\b(authorities|officials)\b", "people in charge"),
        (r"(?i)\b(significant|substantial)\b", "big"),
        (r"(?i)\b(implement|execute)\b", "do"),
        (r"(?i)\b(controversy|dispute)\b", "disagreement"),
        (r"(?i)\b(demonstrate|indicate|suggest)\b", "show"),
        (r"(?i)\b(approximately|roughly)\b", "about"),
    ])
});

static TEEN_SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    compile_substitutions(&[
        (r"(?i)\bsubsequently\b", "then"),
        (r"(?i)\bnevertheless\b", "however"),
        (r"(?i)\bfurthermore\b", "also"),
        (r"(?i)\btherefore\b", "so"),
        (r"(?i)\bdemonstrate\b", "show"),
        (r"(?i)\butilize\b", "use"),
    ])
});

fn compile_substitutions(pairs: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    pairs
        .iter()
        .map(|&(pattern, replacement)| {
            (
                Regex::new(pattern).expect("substitution pattern is valid"),
                replacement,
            )
        })
        .collect()
}

/// One plain-language rendition per age band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationalContent {
    pub children: String,
    pub teens: String,
    pub adults: String,
}

/// Broad subject bucket used to pick the framing text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Environment,
    Technology,
    Health,
    Politics,
    Business,
    General,
}

/// Rewrite content for children, teens, and adults
///
/// Terms are detected against the combined title and body, so a term that
/// only appears in the title still lands in the adult glossary.
pub fn generate_rewrite(content: &str, title: &str) -> GenerationalContent {
    let full_text = format!("{title} {content}").to_lowercase();

    let found_terms: Vec<&TermPattern> = TERMS
        .iter()
        .filter(|entry| full_text.contains(&entry.lower))
        .collect();

    let topic = detect_topic(&full_text);

    GenerationalContent {
        children: children_version(content, title, &found_terms, topic),
        teens: teen_version(content, title, &found_terms, topic),
        adults: adult_version(content, title, &found_terms, topic),
    }
}

// Markers are substring matches, not whole words
fn detect_topic(text: &str) -> Topic {
    if text.contains("climate") || text.contains("environment") {
        Topic::Environment
    } else if text.contains("ai") || text.contains("technology") {
        Topic::Technology
    } else if text.contains("health") || text.contains("medical") {
        Topic::Health
    } else if text.contains("politics") || text.contains("government") {
        Topic::Politics
    } else if text.contains("economy") || text.contains("business") {
        Topic::Business
    } else {
        Topic::General
    }
}

fn children_version(
    content: &str,
    title: &str,
    terms: &[&TermPattern],
    topic: Topic,
) -> String {
    let base = first_non_empty(content, title, "News story");
    let mut simplified = clip_to_boundary(base, CHILDREN_LIMIT).to_string();

    if simplified.trim().is_empty() {
        simplified = "This is a news story that reporters have checked for accuracy".to_string();
    }

    // Replace terms outright; children get the gloss alone
    for entry in terms {
        simplified = entry
            .anywhere
            .replace_all(&simplified, entry.simple)
            .into_owned();
    }

    for (pattern, replacement) in CHILD_SUBSTITUTIONS.iter() {
        simplified = pattern.replace_all(&simplified, *replacement).into_owned();
    }

    format!(
        "{} {}... This news helps us understand what's happening in our world. \
         The reporters checked the facts to make sure the information is correct and fair.",
        children_context(topic),
        simplified
    )
}

fn children_context(topic: Topic) -> &'static str {
    match topic {
        Topic::Environment => "This story is about taking care of our planet:",
        Topic::Technology => "This story is about new inventions and computers:",
        Topic::Health => "This story is about staying healthy and medicine:",
        Topic::Politics => "This story is about how our country is run:",
        Topic::Business => "This story is about how people buy and sell things:",
        Topic::General => "This story is about:",
    }
}

fn teen_version(content: &str, title: &str, terms: &[&TermPattern], topic: Topic) -> String {
    let base = first_non_empty(content, title, "News article");
    let mut simplified = clip_to_boundary(base, TEEN_LIMIT).to_string();

    if simplified.trim().is_empty() {
        simplified =
            "This is a news article that has been fact-checked and analyzed for reliability"
                .to_string();
    }

    // Annotate rather than erase: keep the original term next to its gloss
    for entry in terms {
        let annotated = format!("{} ({})", entry.simple, entry.term);
        simplified = entry
            .word
            .replace_all(&simplified, annotated.as_str())
            .into_owned();
    }

    for (pattern, replacement) in TEEN_SUBSTITUTIONS.iter() {
        simplified = pattern.replace_all(&simplified, *replacement).into_owned();
    }

    format!(
        "{} {}... This article discusses current events with factual reporting. The analysis \
         shows how reliable the information is and whether it presents different viewpoints \
         fairly. Understanding media literacy helps you make informed decisions about what \
         you read and share.",
        teen_context(topic),
        simplified
    )
}

fn teen_context(topic: Topic) -> &'static str {
    match topic {
        Topic::Environment => "Here's the climate/environment update:",
        Topic::Technology => "Here's what's happening in tech:",
        Topic::Health => "Here's the health/medical news:",
        Topic::Politics => "Here's the political situation:",
        Topic::Business => "Here's what's happening in business/economy:",
        Topic::General => "Here's what's happening:",
    }
}

fn adult_version(content: &str, title: &str, terms: &[&TermPattern], topic: Topic) -> String {
    let base = first_non_empty(content, title, "Media content");
    let mut enhanced = clip_to_boundary(base, ADULT_LIMIT).to_string();

    if enhanced.trim().is_empty() {
        enhanced =
            "This media content has been analyzed for credibility, bias, and factual accuracy"
                .to_string();
    }

    // Adults keep the original wording and get a glossary instead
    if !terms.is_empty() {
        let glossary = terms
            .iter()
            .map(|entry| format!("{} ({})", entry.term, entry.simple))
            .collect::<Vec<_>>()
            .join(", ");
        enhanced.push_str(&format!("\n\nKey terms in this article: {glossary}"));
    }

    format!(
        "{}... {} This comprehensive analysis evaluates source credibility, fact-checking \
         standards, potential bias, editorial balance, and provides contextual information \
         for informed media consumption and critical thinking.",
        enhanced,
        adult_context(topic)
    )
}

fn adult_context(topic: Topic) -> &'static str {
    match topic {
        Topic::Environment => {
            "Environmental reporting requires careful analysis of scientific data, peer review \
             processes, and potential conflicts of interest."
        }
        Topic::Technology => {
            "Technology reporting should be evaluated for technical accuracy, industry \
             expertise, and potential corporate influence."
        }
        Topic::Health => {
            "Medical reporting requires verification against peer-reviewed research, medical \
             authority sources, and expert consensus."
        }
        Topic::Politics => {
            "Political reporting demands assessment of partisan bias, source diversity, \
             factual accuracy, and contextual balance."
        }
        Topic::Business => {
            "Business reporting should be analyzed for financial conflicts of interest, \
             market impact, and data source reliability."
        }
        Topic::General => {
            "Critical media analysis involves evaluating multiple perspectives, source \
             reliability, and factual verification."
        }
    }
}

/// First non-empty choice among content, title, and a canned fallback
fn first_non_empty<'a>(content: &'a str, title: &'a str, fallback: &'a str) -> &'a str {
    if !content.is_empty() {
        content
    } else if !title.is_empty() {
        title
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_version_replaces_terms_and_formal_words() {
        let rewrite = generate_rewrite(
            "The authorities will implement cryptocurrency rules.",
            "Economy update",
        );

        assert!(rewrite
            .children
            .starts_with("This story is about how people buy and sell things:"));
        assert!(rewrite
            .children
            .contains("people in charge will do digital money rules"));
        assert!(rewrite.children.contains("The reporters checked the facts"));
    }

    #[test]
    fn teen_version_annotates_terms_with_their_gloss() {
        let rewrite = generate_rewrite("The GDP grew this quarter.", "Economy report");

        assert!(rewrite
            .teens
            .starts_with("Here's what's happening in business/economy:"));
        assert!(rewrite
            .teens
            .contains("how much money a country makes (GDP) grew"));
        assert!(rewrite.teens.contains("Understanding media literacy"));
    }

    #[test]
    fn adult_version_appends_a_key_terms_glossary() {
        let rewrite = generate_rewrite("The GDP grew this quarter.", "Economy report");

        assert!(rewrite.adults.contains("The GDP grew this quarter."));
        assert!(rewrite
            .adults
            .contains("Key terms in this article: GDP (how much money a country makes)"));
        assert!(rewrite.adults.contains("This comprehensive analysis"));
    }

    #[test]
    fn empty_content_falls_back_to_the_title() {
        let rewrite = generate_rewrite("", "Town hall reopens");

        assert!(rewrite.children.contains("Town hall reopens"));
        assert!(rewrite.children.starts_with("This story is about:"));
    }

    #[test]
    fn whitespace_only_content_gets_the_canned_text() {
        let rewrite = generate_rewrite("   ", "");

        assert!(rewrite
            .children
            .contains("This is a news story that reporters have checked for accuracy"));
        assert!(rewrite
            .teens
            .contains("This is a news article that has been fact-checked"));
        assert!(rewrite
            .adults
            .contains("This media content has been analyzed for credibility"));
    }

    #[test]
    fn each_audience_gets_its_own_prefix_budget() {
        let content = "x".repeat(500);
        let rewrite = generate_rewrite(&content, "");

        assert!(rewrite.children.contains(&"x".repeat(200)));
        assert!(!rewrite.children.contains(&"x".repeat(201)));
        assert!(rewrite.teens.contains(&"x".repeat(300)));
        assert!(!rewrite.teens.contains(&"x".repeat(301)));
        assert!(rewrite.adults.contains(&"x".repeat(400)));
        assert!(!rewrite.adults.contains(&"x".repeat(401)));
    }

    #[test]
    fn topic_detection_checks_markers_in_order() {
        assert_eq!(detect_topic("new climate policy"), Topic::Environment);
        assert_eq!(detect_topic("quantum technology race"), Topic::Technology);
        assert_eq!(detect_topic("medical study results"), Topic::Health);
        assert_eq!(detect_topic("government shutdown looms"), Topic::Politics);
        assert_eq!(detect_topic("small business owners"), Topic::Business);
        assert_eq!(detect_topic("town hall reopens"), Topic::General);
    }

    #[test]
    fn topic_markers_are_substring_matches() {
        // "campaign" contains "ai", so it lands in the technology bucket
        assert_eq!(detect_topic("campaign finance reform"), Topic::Technology);
    }
}
