use super::text::{contains_phrase, count_occurrences, sentences, word_count, PlainText};
use super::{category_score, Analysis, Assessment, Category, Rating};

const TITLE_MIN: usize = 30;
const TITLE_MAX: usize = 60;
const META_MIN: usize = 120;
const META_MAX: usize = 160;
const CONTENT_GOOD_CHARS: usize = 300;
const CONTENT_OK_CHARS: usize = 100;
const DENSITY_MIN: f64 = 0.5;
const DENSITY_MAX: f64 = 2.5;
const SENTENCE_GOOD_WORDS: f64 = 20.0;
const SENTENCE_OK_WORDS: f64 = 25.0;
const PARAGRAPH_GOOD_WORDS: f64 = 150.0;
const PARAGRAPH_OK_WORDS: f64 = 200.0;
const SUBHEADING_WORDS: usize = 300;

const TRANSITION_WORDS: &[&str] = &[
    "also", "although", "because", "besides", "consequently", "finally", "first", "for example",
    "for instance", "furthermore", "however", "in addition", "in conclusion", "indeed", "instead",
    "likewise", "meanwhile", "moreover", "nevertheless", "next", "otherwise", "second", "similarly",
    "so", "then", "therefore", "thus", "ultimately",
];

fn assess(identifier: &str, score: Rating, text: String, category: Category, priority: u8) -> Assessment {
    Assessment {
        identifier: identifier.to_string(),
        score,
        text,
        category,
        priority,
    }
}

/// Score a draft against the fixed SEO and readability rules.
///
/// Markup is stripped from `content` before measuring. Keyword rules are
/// only run when `focus_keyword` is non-blank.
pub fn analyze(title: &str, content: &str, focus_keyword: &str, meta_description: &str) -> Analysis {
    let title = title.trim();
    let meta = meta_description.trim();
    let keyword = focus_keyword.trim();
    let doc = PlainText::parse(content);
    let plain = doc.text.as_str();
    let words = word_count(plain);

    let mut out = vec![
        title_length(title),
        meta_length(meta),
        content_length(plain.trim()),
    ];

    if keyword.is_empty() {
        out.push(assess(
            "focusKeyword",
            Rating::Bad,
            "No focus keyword was set for this page.".into(),
            Category::Seo,
            1,
        ));
    } else {
        out.push(keyword_in(
            "keywordInTitle",
            "SEO title",
            contains_phrase(title, keyword),
            Rating::Bad,
            2,
        ));
        out.push(keyword_in(
            "keywordInMetaDescription",
            "meta description",
            contains_phrase(meta, keyword),
            Rating::Bad,
            4,
        ));
        let intro = doc.paragraphs.first().map_or("", String::as_str);
        out.push(keyword_in(
            "keywordInIntroduction",
            "first paragraph",
            contains_phrase(intro, keyword),
            Rating::Ok,
            5,
        ));
        out.push(keyword_density(plain, keyword, words));
    }

    out.push(sentence_length(plain));
    out.push(paragraph_length(&doc.paragraphs));
    out.push(subheadings(doc.has_heading(), words));
    out.push(transition_words(plain));

    out.sort_by(|a, b| a.score.cmp(&b.score).then(a.priority.cmp(&b.priority)));

    Analysis {
        seo_score: category_score(&out, Category::Seo),
        readability_score: category_score(&out, Category::Readability),
        assessments: out,
    }
}

fn title_length(title: &str) -> Assessment {
    let len = title.chars().count();
    let (score, text) = if len < TITLE_MIN {
        (
            Rating::Bad,
            format!("The SEO title is too short ({len} characters); use at least {TITLE_MIN}."),
        )
    } else if len <= TITLE_MAX {
        (Rating::Good, format!("The SEO title has a good length ({len} characters)."))
    } else {
        (
            Rating::Ok,
            format!("The SEO title is longer than {TITLE_MAX} characters and may be cut off."),
        )
    };
    assess("titleLength", score, text, Category::Seo, 2)
}

fn meta_length(meta: &str) -> Assessment {
    let len = meta.chars().count();
    let (score, text) = if len == 0 {
        (Rating::Bad, "No meta description has been specified.".to_string())
    } else if (META_MIN..=META_MAX).contains(&len) {
        (Rating::Good, format!("The meta description has a good length ({len} characters)."))
    } else if len < META_MIN {
        (
            Rating::Ok,
            format!("The meta description is short ({len} characters); aim for {META_MIN}-{META_MAX}."),
        )
    } else {
        (
            Rating::Ok,
            format!("The meta description is over {META_MAX} characters and may be truncated."),
        )
    };
    assess("metaDescription", score, text, Category::Seo, 3)
}

fn content_length(plain: &str) -> Assessment {
    let len = plain.chars().count();
    let (score, text) = if len >= CONTENT_GOOD_CHARS {
        (Rating::Good, format!("The text contains {len} characters. Good job!"))
    } else if len >= CONTENT_OK_CHARS {
        (
            Rating::Ok,
            format!("The text contains {len} characters; add more to reach {CONTENT_GOOD_CHARS}."),
        )
    } else {
        (Rating::Bad, format!("The text contains only {len} characters."))
    };
    assess("contentLength", score, text, Category::Seo, 3)
}

fn keyword_in(identifier: &str, place: &str, found: bool, missing: Rating, priority: u8) -> Assessment {
    let (score, text) = if found {
        (Rating::Good, format!("The focus keyword appears in the {place}."))
    } else {
        (missing, format!("The focus keyword does not appear in the {place}."))
    };
    assess(identifier, score, text, Category::Seo, priority)
}

fn keyword_density(plain: &str, keyword: &str, words: usize) -> Assessment {
    let hits = count_occurrences(plain, keyword);
    let density = if words == 0 {
        0.0
    } else {
        hits as f64 / words as f64 * 100.0
    };
    let (score, text) = if hits == 0 {
        (Rating::Bad, "The focus keyword was not found in the text.".to_string())
    } else if density < DENSITY_MIN {
        (
            Rating::Ok,
            format!("Keyword density is {density:.1}%, below the recommended {DENSITY_MIN}%."),
        )
    } else if density <= DENSITY_MAX {
        (Rating::Good, format!("Keyword density is {density:.1}%. Good job!"))
    } else {
        (
            Rating::Bad,
            format!("Keyword density is {density:.1}%, above the recommended {DENSITY_MAX}%."),
        )
    };
    assess("keywordDensity", score, text, Category::Seo, 4)
}

fn sentence_length(plain: &str) -> Assessment {
    let all = sentences(plain);
    let (score, text) = if all.is_empty() {
        (Rating::Bad, "The text has no sentences yet.".to_string())
    } else {
        let avg = all.iter().map(|s| word_count(s)).sum::<usize>() as f64 / all.len() as f64;
        if avg <= SENTENCE_GOOD_WORDS {
            (Rating::Good, format!("Sentences average {avg:.1} words. Good job!"))
        } else if avg <= SENTENCE_OK_WORDS {
            (Rating::Ok, format!("Sentences average {avg:.1} words; try to shorten some."))
        } else {
            (Rating::Bad, format!("Sentences average {avg:.1} words, which is too long."))
        }
    };
    assess("sentenceLength", score, text, Category::Readability, 2)
}

fn paragraph_length(all: &[String]) -> Assessment {
    let avg = if all.is_empty() {
        0.0
    } else {
        all.iter().map(|p| word_count(p)).sum::<usize>() as f64 / all.len() as f64
    };
    let (score, text) = if avg <= PARAGRAPH_GOOD_WORDS {
        (Rating::Good, "Paragraphs have a comfortable length.".to_string())
    } else if avg <= PARAGRAPH_OK_WORDS {
        (Rating::Ok, format!("Paragraphs average {avg:.0} words; consider splitting."))
    } else {
        (Rating::Bad, format!("Paragraphs average {avg:.0} words, which is too long."))
    };
    assess("paragraphLength", score, text, Category::Readability, 3)
}

fn subheadings(has_heading: bool, words: usize) -> Assessment {
    let (score, text) = if words < SUBHEADING_WORDS {
        (Rating::Good, "The text is short enough not to need subheadings.".to_string())
    } else if has_heading {
        (Rating::Good, "The text is broken up by subheadings.".to_string())
    } else {
        (Rating::Bad, "Long text without subheadings; add some to guide readers.".to_string())
    };
    assess("subheadings", score, text, Category::Readability, 4)
}

fn transition_words(plain: &str) -> Assessment {
    let all = sentences(plain);
    let share = if all.is_empty() {
        0.0
    } else {
        let with = all
            .iter()
            .filter(|s| TRANSITION_WORDS.iter().any(|w| contains_phrase(s, w)))
            .count();
        with as f64 / all.len() as f64 * 100.0
    };
    let (score, text) = if share >= 30.0 {
        (Rating::Good, format!("{share:.0}% of sentences contain transition words. Good job!"))
    } else if share >= 20.0 {
        (Rating::Ok, format!("{share:.0}% of sentences contain transition words; aim for 30%."))
    } else {
        (Rating::Bad, format!("Only {share:.0}% of sentences contain transition words."))
    };
    assess("transitionWords", score, text, Category::Readability, 5)
}
