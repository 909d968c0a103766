use chrono::{Duration, TimeZone, Utc};
use exam_portal_admin::error::Error;
use exam_portal_admin::models::admin::{AdminAccount, AdminStatus};
use exam_portal_admin::models::candidate::{Candidate, CandidateStatus, ExtractedMcq};
use exam_portal_admin::models::question::{
    blank_options, correct_index, mark_answer, render_mcq_text, set_correct, Difficulty,
    QuestionOption,
};
use exam_portal_admin::utils::time::{parse_portal_date, to_input_date};
use exam_portal_admin::utils::token::{generate_admin_id, generate_password, PASSWORD_LENGTH};
use exam_portal_admin::utils::validation::{is_valid_email, phone_digits};

fn options(texts: [&str; 4]) -> Vec<QuestionOption> {
    texts.into_iter().map(QuestionOption::new).collect()
}

#[test]
fn marking_one_option_correct_clears_the_other_three() {
    for chosen in 0..4 {
        let mut opts = options(["a", "b", "c", "d"]);
        for o in opts.iter_mut() {
            o.is_correct = true;
        }
        set_correct(&mut opts, chosen, true);
        for (i, o) in opts.iter().enumerate() {
            assert_eq!(o.is_correct, i == chosen, "option {} after choosing {}", i, chosen);
        }
        assert_eq!(correct_index(&opts), Some(chosen));
    }
}

#[test]
fn clearing_an_option_leaves_the_rest_alone() {
    let mut opts = blank_options();
    set_correct(&mut opts, 2, true);
    set_correct(&mut opts, 0, false);
    assert!(opts[2].is_correct);
    set_correct(&mut opts, 2, false);
    assert_eq!(correct_index(&opts), None);
}

#[test]
fn answer_letters_mark_exactly_one_option() {
    let mut opts = options(["1", "2", "3", "4"]);
    assert_eq!(mark_answer(&mut opts, "(C)"), Some(2));
    assert_eq!(correct_index(&opts), Some(2));
    assert!(opts.iter().filter(|o| o.is_correct).count() == 1);

    // Unknown letters leave the previous choice in place.
    assert_eq!(mark_answer(&mut opts, "e"), None);
    assert_eq!(correct_index(&opts), Some(2));
}

#[test]
fn assessment_difficulty_words_map_onto_levels() {
    assert_eq!(Difficulty::from_assessment("Easy"), Some(Difficulty::Simple));
    assert_eq!(Difficulty::from_assessment("moderate"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::from_assessment("HARD"), Some(Difficulty::Hard));
    assert_eq!(Difficulty::from_assessment("impossible"), None);
    assert_eq!("simple".parse::<Difficulty>(), Ok(Difficulty::Simple));
}

#[test]
fn mcq_text_lists_lettered_options_under_the_stem() {
    let text = render_mcq_text("Unit of force?", ["Newton", "Joule", "Watt", "Pascal"]);
    assert_eq!(text, "Unit of force?\nA. Newton\nB. Joule\nC. Watt\nD. Pascal");
}

#[test]
fn status_is_active_only_while_expiry_is_in_the_future() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let at = |t: chrono::DateTime<Utc>| t.to_rfc3339();

    assert_eq!(
        AdminStatus::compute(Some(&at(now + Duration::seconds(1))), now),
        AdminStatus::Active
    );
    assert_eq!(AdminStatus::compute(Some(&at(now)), now), AdminStatus::Expired);
    assert_eq!(
        AdminStatus::compute(Some(&at(now - Duration::seconds(1))), now),
        AdminStatus::Expired
    );
    assert_eq!(AdminStatus::compute(None, now), AdminStatus::NoExpiry);
    assert_eq!(AdminStatus::compute(Some("not a date"), now), AdminStatus::Expired);

    assert_eq!(AdminStatus::Active.to_string(), "Active");
    assert_eq!(AdminStatus::NoExpiry.to_string(), "No Expiry");
}

#[test]
fn blank_expiry_counts_as_no_expiry() {
    let now = Utc::now();
    let account = AdminAccount {
        expiry_date: Some("  ".to_string()),
        ..AdminAccount::default()
    };
    assert_eq!(account.status_at(now), AdminStatus::NoExpiry);
    assert_eq!(account.days_left(now), None);
}

#[test]
fn days_left_rounds_partial_days_up() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let account = |expiry: &str| AdminAccount {
        expiry_date: Some(expiry.to_string()),
        ..AdminAccount::default()
    };
    assert_eq!(account("2025-06-03").days_left(now), Some(2));
    assert_eq!(account("2025-06-02T12:00:00Z").days_left(now), Some(1));
    assert_eq!(account("2025-06-01").days_left(now), Some(0));
    assert_eq!(account("2025-05-30T12:00:00Z").days_left(now), Some(-2));
}

#[test]
fn merge_overlays_only_present_fields() {
    let mut stored = AdminAccount {
        admin_id: "ADM1".into(),
        name: Some("Old".into()),
        email: Some("old@example.com".into()),
        created_by_admin_id: Some(4),
        ..AdminAccount::default()
    };
    stored.merge(AdminAccount {
        name: Some("New".into()),
        ..AdminAccount::default()
    });
    assert_eq!(stored.admin_id, "ADM1");
    assert_eq!(stored.name.as_deref(), Some("New"));
    assert_eq!(stored.email.as_deref(), Some("old@example.com"));
    assert_eq!(stored.created_by_admin_id, Some(4));
    assert!(!stored.is_root());
}

#[test]
fn admin_records_read_backend_field_names() {
    let raw = serde_json::json!({
        "id": 7,
        "AdminId": "ADM123456XYZ",
        "Email": "a@b.co",
        "ExpiryDate": "2030-01-01",
        "mobileNumber": "9876543210",
        "created_by_admin_id": null
    });
    let account: AdminAccount = serde_json::from_value(raw).unwrap();
    assert_eq!(account.id, Some(7));
    assert_eq!(account.admin_id, "ADM123456XYZ");
    assert_eq!(account.email.as_deref(), Some("a@b.co"));
    assert!(account.is_root());
}

#[test]
fn candidates_start_as_drafts_with_four_options() {
    let candidate = Candidate::from_extracted(ExtractedMcq {
        question: "Q".into(),
        options: vec![QuestionOption::new("only")],
    });
    assert_eq!(candidate.options.len(), 4);
    assert_eq!(candidate.status, CandidateStatus::Draft);
    assert!(candidate.status.can_evaluate());
}

#[test]
fn candidate_status_guards_in_flight_and_submitted() {
    let evaluating = CandidateStatus::Evaluating { evaluated: true };
    assert!(evaluating.is_in_flight());
    assert!(!evaluating.can_evaluate());
    assert!(!evaluating.can_submit());
    assert!(evaluating.is_evaluated());

    assert!(!CandidateStatus::Submitted.can_submit());
    assert!(!CandidateStatus::Submitted.can_evaluate());

    let failed = CandidateStatus::Failed {
        reason: "boom".into(),
        evaluated: false,
    };
    assert!(failed.can_submit());
    assert!(!failed.is_evaluated());
}

#[test]
fn failed_candidates_show_the_state_they_fell_back_to() {
    let after_evaluation = CandidateStatus::Failed {
        reason: "Backend returned 500: smtp down".into(),
        evaluated: true,
    };
    assert_eq!(after_evaluation.label(), "Evaluated");
    assert_eq!(
        after_evaluation.failure_reason(),
        Some("Backend returned 500: smtp down")
    );

    let before_evaluation = CandidateStatus::Failed {
        reason: "no pdf id".into(),
        evaluated: false,
    };
    assert_eq!(before_evaluation.label(), "Draft");
    assert_eq!(before_evaluation.failure_reason(), Some("no pdf id"));

    assert_eq!(CandidateStatus::Evaluated.failure_reason(), None);
}

#[test]
fn portal_dates_accept_the_backend_formats() {
    assert!(parse_portal_date("2025-01-02T03:04:05.000Z").is_some());
    assert!(parse_portal_date("2025-01-02 03:04:05").is_some());
    assert!(parse_portal_date("2025-01-02").is_some());
    assert!(parse_portal_date("").is_none());
    assert_eq!(to_input_date(Some("2025-01-02T03:04:05Z")), "2025-01-02");
    assert_eq!(to_input_date(None), "");
}

#[test]
fn generated_admin_ids_follow_the_adm_pattern() {
    let now = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
    let id = generate_admin_id(now);
    assert_eq!(id.len(), 12);
    assert!(id.starts_with("ADM123456"));
    assert!(id[9..]
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[test]
fn generated_passwords_mix_every_character_class() {
    for _ in 0..50 {
        let password = generate_password();
        assert_eq!(password.chars().count(), PASSWORD_LENGTH);
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| "!@#$%^&*".contains(c)));
    }
}

#[test]
fn phone_inputs_keep_at_most_ten_digits() {
    assert_eq!(phone_digits("+91 (987) 654-3210 99"), "9198765432");
    assert_eq!(phone_digits("abc"), "");
    assert!(is_valid_email("someone@example.com"));
    assert!(!is_valid_email("someone@example"));
    assert!(!is_valid_email("some one@example.com"));
}

#[test]
fn user_message_prefers_the_server_message() {
    let api = Error::Api {
        status: 422,
        message: Some("AdminId already exists".into()),
    };
    assert_eq!(api.user_message("Something went wrong."), "AdminId already exists");

    let silent = Error::Api {
        status: 500,
        message: None,
    };
    assert_eq!(silent.user_message("Something went wrong."), "Something went wrong.");

    let parse = Error::Json(serde_json::from_str::<u32>("x").unwrap_err());
    assert_eq!(parse.user_message("Fallback"), "Fallback");

    let busy = Error::Busy("Question 1 is Evaluating...".into());
    assert_eq!(busy.user_message("Fallback"), "Question 1 is Evaluating...");
}
