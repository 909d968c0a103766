use exam_portal_admin::dto::ai_dto::ExtractResponse;
use exam_portal_admin::models::question::correct_index;
use exam_portal_admin::services::ai_service::normalize_extraction;
use exam_portal_admin::utils::mcq_markdown::parse_mcq_markdown;
use serde_json::json;

#[test]
fn bold_numbered_question_with_answer_marks_option_b() {
    let markdown = "**3.** Which gas is most abundant in air?\n\
                    (a) Oxygen\n\
                    (b) Nitrogen\n\
                    (c) Argon\n\
                    (d) Carbon dioxide\n\
                    Answer: (b)";

    let mcqs = parse_mcq_markdown(markdown);

    assert_eq!(mcqs.len(), 1);
    let mcq = &mcqs[0];
    assert_eq!(mcq.question, "Which gas is most abundant in air?");
    let texts: Vec<&str> = mcq.options.iter().map(|o| o.option_text.as_str()).collect();
    assert_eq!(texts, ["Oxygen", "Nitrogen", "Argon", "Carbon dioxide"]);
    let flags: Vec<bool> = mcq.options.iter().map(|o| o.is_correct).collect();
    assert_eq!(flags, [false, true, false, false]);
}

#[test]
fn the_word_answer_in_an_inline_stem_is_not_the_answer_key() {
    let markdown = "**1.** Which of these is the correct answer? (a) 5 (b) 6 (c) 7 (d) 8 Answer: (c)\n\
                    2. Pick the right answer (a) up (b) down (c) left (d) right";

    let mcqs = parse_mcq_markdown(markdown);

    assert_eq!(mcqs.len(), 2);
    assert_eq!(mcqs[0].question, "Which of these is the correct answer?");
    let texts: Vec<&str> = mcqs[0].options.iter().map(|o| o.option_text.as_str()).collect();
    assert_eq!(texts, ["5", "6", "7", "8"]);
    assert_eq!(correct_index(&mcqs[0].options), Some(2));

    assert_eq!(mcqs[1].question, "Pick the right answer");
    assert_eq!(mcqs[1].options[0].option_text, "up");
    assert_eq!(mcqs[1].options[3].option_text, "right");
    assert_eq!(correct_index(&mcqs[1].options), None);
}

#[test]
fn several_questions_split_on_plain_and_bold_numbers() {
    let markdown = "Here are the questions from the page:\n\n\
                    **8.** A body moves 12.5 m in 2 s. Its speed is\n\
                    (a) 6.25 m/s (b) 10 m/s (c) 25 m/s (d) 2 m/s\n\
                    **Answer: [a]**\n\
                    9. The SI unit of charge is\n\
                    (a) ampere\n(b) coulomb\n(c) volt\n(d) ohm\n";

    let mcqs = parse_mcq_markdown(markdown);

    assert_eq!(mcqs.len(), 2);
    assert_eq!(mcqs[0].question, "A body moves 12.5 m in 2 s. Its speed is");
    assert_eq!(mcqs[0].options[0].option_text, "6.25 m/s");
    assert_eq!(mcqs[0].options[3].option_text, "2 m/s");
    assert_eq!(correct_index(&mcqs[0].options), Some(0));

    assert_eq!(mcqs[1].question, "The SI unit of charge is");
    assert_eq!(mcqs[1].options[1].option_text, "coulomb");
    assert_eq!(correct_index(&mcqs[1].options), None);
}

#[test]
fn missing_options_come_back_empty_and_blocks_without_markers_are_dropped() {
    let markdown = "1. Pick one\n(a) yes\n(c) maybe\n\n2. This line has no options at all\n";

    let mcqs = parse_mcq_markdown(markdown);

    assert_eq!(mcqs.len(), 1);
    assert_eq!(mcqs[0].options.len(), 4);
    assert_eq!(mcqs[0].options[0].option_text, "yes");
    assert_eq!(mcqs[0].options[1].option_text, "");
    assert_eq!(mcqs[0].options[2].option_text, "maybe");
}

#[test]
fn empty_markdown_yields_nothing() {
    assert!(parse_mcq_markdown("").is_empty());
    assert!(parse_mcq_markdown("   \n  ").is_empty());
}

#[test]
fn structured_mcqs_win_over_markdown() {
    let response: ExtractResponse = serde_json::from_value(json!({
        "mcqs": [{
            "question": " What is 2 + 2? ",
            "options": ["3", "4", "5", "22"],
            "answer": "B"
        }],
        "mcq_markdown": "1. ignored\n(a) x\n(b) y"
    }))
    .unwrap();

    let mcqs = normalize_extraction(response);

    assert_eq!(mcqs.len(), 1);
    assert_eq!(mcqs[0].question, "What is 2 + 2?");
    assert_eq!(correct_index(&mcqs[0].options), Some(1));
}

#[test]
fn lettered_and_detailed_option_shapes_are_accepted() {
    let response: ExtractResponse = serde_json::from_value(json!({
        "mcqs": [
            { "question": "Q1", "options": { "a": "one", "b": "two", "c": "three", "d": "four" } },
            { "question": "Q2", "options": [
                { "option_text": "x", "is_correct": false },
                { "option_text": "y", "is_correct": true }
            ] }
        ]
    }))
    .unwrap();

    let mcqs = normalize_extraction(response);

    assert_eq!(mcqs[0].options[2].option_text, "three");
    assert_eq!(mcqs[1].options.len(), 4);
    assert_eq!(correct_index(&mcqs[1].options), Some(1));
}

#[test]
fn markdown_is_used_when_mcqs_are_empty() {
    let response: ExtractResponse = serde_json::from_value(json!({
        "mcqs": [],
        "mcq_markdown": "**1.** Q\n(a) p\n(b) q\n(c) r\n(d) s\nAnswer: (d)"
    }))
    .unwrap();

    let mcqs = normalize_extraction(response);

    assert_eq!(mcqs.len(), 1);
    assert_eq!(correct_index(&mcqs[0].options), Some(3));
}
