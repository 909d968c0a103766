use crate::models::candidate::ExtractedMcq;
use crate::models::question::{mark_answer, QuestionOption, OPTION_COUNT};
use regex::Regex;
use std::sync::OnceLock;

const OPTION_KEYS: [char; OPTION_COUNT] = ['a', 'b', 'c', 'd'];

// Question numbers at line start, bold or plain: `**8.**`, `9.`
fn split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*(?:\*\*)?\d+\.(?:\*\*[ \t]*|[ \t]+)").expect("valid split regex"))
}

fn number_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\*\*)?\d+\.(?:\*\*\s*|\s+)").expect("valid prefix regex"))
}

fn option_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:^|\s)\(([a-d])\)").expect("valid option regex"))
}

fn answer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)answer[^\n(\[]*[(\[]([a-d])[\])]").expect("valid answer regex"))
}

/// Turns the extraction service's markdown into question records.
///
/// Options may sit on their own lines or follow the stem inline. Text before
/// the first numbered item and blocks without any `(a)`..`(d)` marker are
/// dropped. Missing options come back as empty text.
pub fn parse_mcq_markdown(markdown: &str) -> Vec<ExtractedMcq> {
    if markdown.trim().is_empty() {
        return Vec::new();
    }
    let text = format!("\n{}", markdown.replace("\r\n", "\n"));
    split_re().split(&text).filter_map(parse_block).collect()
}

fn parse_block(block: &str) -> Option<ExtractedMcq> {
    let block = number_prefix_re().replace(block.trim(), "");
    if block.is_empty() {
        return None;
    }

    // The answer key follows the options; an "answer" in the stem is not one.
    let answer = answer_re().captures_iter(&block).last().filter(|caps| {
        caps.get(0)
            .is_some_and(|m| option_marker_re().is_match(&block[..m.start()]))
    });
    let body = match &answer {
        Some(caps) => &block[..caps.get(0).map_or(block.len(), |m| m.start())],
        None => &block[..],
    };

    // First occurrence of each letter, as (letter index, marker start, text start).
    let mut markers: Vec<(usize, usize, usize)> = Vec::new();
    for caps in option_marker_re().captures_iter(body) {
        let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let key = letter.as_str().to_ascii_lowercase().chars().next();
        let Some(idx) = OPTION_KEYS.iter().position(|k| Some(*k) == key) else {
            continue;
        };
        if markers.iter().all(|(i, _, _)| *i != idx) {
            markers.push((idx, whole.start(), whole.end()));
        }
    }
    if markers.is_empty() {
        return None;
    }
    markers.sort_by_key(|(_, start, _)| *start);

    let question = collapse_lines(&body[..markers[0].1]);
    let mut options = vec![QuestionOption::default(); OPTION_COUNT];
    for (pos, (idx, _, text_start)) in markers.iter().enumerate() {
        let text_end = markers.get(pos + 1).map_or(body.len(), |(_, start, _)| *start);
        options[*idx].option_text = collapse_lines(&body[*text_start..text_end]);
    }

    if let Some(letter) = answer.as_ref().and_then(|caps| caps.get(1)) {
        mark_answer(&mut options, letter.as_str());
    }

    Some(ExtractedMcq { question, options })
}

fn collapse_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.trim_matches('*').is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
