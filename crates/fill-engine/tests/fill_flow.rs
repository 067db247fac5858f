//! End-to-end fill passes against the in-memory page.

use std::collections::HashMap;
use std::sync::Arc;

use fill_engine::{ExecCtx, FillEngine, FillParams, NullTempo, Reason, Subject};
use formpilot_core_types::{
    DynamicRule, FieldKey, Mapping, MappingKind, MappingMeta, Prefs, Profile,
};
use page_port::fake::{ElementSpec, FakePage};
use page_port::{DomEvent, DomPort};

fn engine_for(page: &Arc<FakePage>) -> FillEngine {
    FillEngine::builder()
        .with_dom(page.clone())
        .with_overlay(page.clone())
        .with_tempo(Arc::new(NullTempo))
        .build()
}

fn profile() -> Profile {
    Profile {
        full_name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        phone: "555-0100".into(),
        city: "London".into(),
        country: "United Kingdom".into(),
        ..Profile::default()
    }
}

fn params() -> FillParams {
    FillParams {
        profile: profile(),
        prefs: Prefs::default(),
        mappings: HashMap::new(),
        rules: Vec::new(),
    }
}

#[tokio::test]
async fn autocomplete_token_fills_first_name() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let first = page.add(ElementSpec::input("text").autocomplete("given-name"));
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &params()).await.unwrap();

    assert_eq!(page.value_of(first), "Ada");
    assert_eq!(summary.highlight_count, 1);
    let outcome = &summary.report.heuristic_text[0];
    assert_eq!(
        outcome.subject,
        Subject::Key {
            key: FieldKey::FirstName
        }
    );
    assert_eq!(outcome.why, Reason::Filled);
}

#[tokio::test]
async fn placeholder_select_is_replaced_and_real_selection_kept() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let open = page.add(
        ElementSpec::select_with_values(&[
            ("", "— Please select —"),
            ("uk", "United Kingdom"),
            ("us", "United States"),
        ])
        .label("Country"),
    );
    let answered = page.add(
        ElementSpec::select_with_values(&[
            ("", "— Please select —"),
            ("uk", "United Kingdom"),
            ("us", "United States"),
        ])
        .label("Country")
        .selected(2),
    );
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &params()).await.unwrap();

    assert_eq!(page.selected_of(open), Some(1));
    assert_eq!(page.selected_of(answered), Some(2));
    let kept = summary
        .report
        .heuristic_select
        .iter()
        .find(|o| !o.changed)
        .unwrap();
    assert_eq!(kept.why, Reason::AlreadySelected);
}

#[tokio::test]
async fn dynamic_rule_answers_radio_group() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    // Group hint is the shared name plus the member labels.
    let prefer = page.add(ElementSpec::radio("sexual-orientation").label("Prefer not to say"));
    let straight = page.add(ElementSpec::radio("sexual-orientation").label("Heterosexual"));

    let mut p = params();
    p.prefs.sexual_orientation = "Prefer not to say".into();
    p.rules = vec![DynamicRule::pref(
        "sexual orientation",
        FieldKey::SexualOrientation,
    )];
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();

    assert!(page.is_checked(prefer).await.unwrap());
    assert!(!page.is_checked(straight).await.unwrap());
    assert_eq!(summary.report.rules[0].why, Reason::Clicked);
}

#[tokio::test]
async fn non_empty_fields_are_never_overwritten() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let taken = page.add(
        ElementSpec::input("email")
            .label("Email")
            .with_value("already@there.com"),
    );
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &params()).await.unwrap();

    assert_eq!(page.value_of(taken), "already@there.com");
    assert_eq!(
        summary.report.heuristic_text[0].why,
        Reason::AlreadyHasValue
    );
    assert_eq!(summary.highlight_count, 0);
}

#[tokio::test]
async fn mapping_wins_over_rule_and_heuristic() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    // Heuristics and rules would both pick the labeled field; the mapping
    // points somewhere else entirely.
    let labeled = page.add(ElementSpec::input("text").label("Email Address"));
    let mapped = page.add(ElementSpec::input("text").id("contact"));

    let mut p = params();
    p.mappings.insert(
        FieldKey::Email,
        Mapping {
            selector: "#contact".into(),
            kind: MappingKind::Input,
            meta: MappingMeta::default(),
        },
    );
    p.rules = vec![DynamicRule::pref("email", FieldKey::Email)];
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();

    assert_eq!(page.value_of(mapped), "ada@example.com");
    assert_eq!(summary.report.mapped[0].why, Reason::Filled);
    // The labeled field still classifies as email, so the heuristic tier
    // reports it as handled by the mapping and leaves it empty.
    assert_eq!(page.value_of(labeled), "");
    let skipped = summary
        .report
        .heuristic_text
        .iter()
        .find(|o| {
            o.subject
                == Subject::Key {
                    key: FieldKey::Email,
                }
        })
        .unwrap();
    assert_eq!(skipped.why, Reason::Skipped);
}

#[tokio::test]
async fn mapping_without_a_value_reports_no_value() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let _linkedin = page.add(ElementSpec::input("text").id("linkedin"));

    let mut p = params();
    p.mappings.insert(
        FieldKey::Linkedin,
        Mapping {
            selector: "#linkedin".into(),
            kind: MappingKind::Input,
            meta: MappingMeta::default(),
        },
    );
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();
    assert_eq!(summary.report.mapped[0].why, Reason::NoValue);
    assert!(!summary.report.mapped[0].changed);
}

#[tokio::test]
async fn mapping_fills_by_the_resolved_kind_not_the_stored_one() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    // The page turned the country field into a select since capture; the
    // mapping still says it was a plain input.
    let country = page.add(
        ElementSpec::select_with_values(&[
            ("", "-- Select --"),
            ("uk", "United Kingdom"),
            ("us", "United States"),
        ])
        .id("country"),
    );

    let mut p = params();
    p.mappings.insert(
        FieldKey::Country,
        Mapping {
            selector: "#country".into(),
            kind: MappingKind::Input,
            meta: MappingMeta::default(),
        },
    );
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();

    assert_eq!(page.selected_of(country), Some(1));
    assert_eq!(summary.report.mapped[0].why, Reason::Selected);
}

#[tokio::test]
async fn mapped_editable_region_is_filled_once() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let empty = page.add(ElementSpec::editable().id("signature"));
    let taken = page.add(ElementSpec::editable().id("pitch").text("already written"));

    let mut p = params();
    p.mappings.insert(
        FieldKey::FullName,
        Mapping {
            selector: "#signature".into(),
            kind: MappingKind::Editable,
            meta: MappingMeta::default(),
        },
    );
    p.mappings.insert(
        FieldKey::Email,
        Mapping {
            selector: "#pitch".into(),
            kind: MappingKind::Editable,
            meta: MappingMeta::default(),
        },
    );
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();

    assert_eq!(page.text_of(empty), "Ada Lovelace");
    // Editable regions only get an input notification, no change event.
    assert_eq!(page.events(empty), vec![DomEvent::Input]);
    assert_eq!(summary.report.mapped[0].why, Reason::Filled);

    assert_eq!(page.text_of(taken), "already written");
    assert_eq!(summary.report.mapped[1].why, Reason::AlreadyHasValue);
}

#[tokio::test]
async fn stale_mapping_selector_reports_not_found() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let mut p = params();
    p.mappings.insert(
        FieldKey::Email,
        Mapping {
            selector: "#long-gone".into(),
            kind: MappingKind::Input,
            meta: MappingMeta::default(),
        },
    );
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();
    assert_eq!(summary.report.mapped[0].why, Reason::NotFound);
}

#[tokio::test]
async fn rule_without_answer_falls_through_to_next_rule() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let notice = page.add(ElementSpec::input("text").label("Notice period"));

    let mut p = params();
    // First rule matches but resolves to an empty preference; the second
    // matches the same field and carries a literal answer.
    p.rules = vec![
        DynamicRule::pref("notice", FieldKey::Veteran),
        DynamicRule::literal("notice period", "2 weeks"),
    ];
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &p).await.unwrap();

    assert_eq!(page.value_of(notice), "2 weeks");
    assert_eq!(summary.report.rules.len(), 2);
    assert_eq!(summary.report.rules[0].why, Reason::NoAnswer);
    assert_eq!(summary.report.rules[1].why, Reason::Filled);
}

#[tokio::test]
async fn hidden_fields_are_reported_not_filled() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let hidden = page.add(ElementSpec::input("text").label("Email").hidden());
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &params()).await.unwrap();

    assert_eq!(page.value_of(hidden), "");
    assert_eq!(summary.report.heuristic_text[0].why, Reason::NotVisible);
}

#[tokio::test]
async fn changed_fields_are_highlighted_in_policy_color() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let email = page.add(ElementSpec::input("text").label("Email"));
    let engine = engine_for(&page);

    engine.fill(&ExecCtx::new(), &params()).await.unwrap();

    assert_eq!(page.highlight_color(email).as_deref(), Some("#22c55e"));

    engine.clear_highlights().await;
    assert!(page.highlighted().is_empty());
}

#[tokio::test]
async fn cancelled_context_stops_the_pass() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    let email = page.add(ElementSpec::input("text").label("Email"));
    let engine = engine_for(&page);

    let ctx = ExecCtx::new();
    ctx.cancel.cancel();
    let err = engine.fill(&ctx, &params()).await.unwrap_err();
    assert!(matches!(err, fill_engine::FillError::Cancelled));
    assert_eq!(page.value_of(email), "");
}

#[tokio::test]
async fn report_totals_count_candidates() {
    let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
    page.add(ElementSpec::input("text").label("Email"));
    page.add(ElementSpec::input("text").label("Phone"));
    page.add(ElementSpec::textarea().label("Cover letter"));
    page.add(ElementSpec::select(&["A", "B"]).label("Country"));
    page.add(ElementSpec::radio("veteran").label("Yes"));
    page.add(ElementSpec::radio("veteran").label("No"));
    let engine = engine_for(&page);

    let summary = engine.fill(&ExecCtx::new(), &params()).await.unwrap();
    let totals = summary.report.totals;
    assert_eq!(totals.inputs, 2);
    assert_eq!(totals.textareas, 1);
    assert_eq!(totals.selects, 1);
    assert_eq!(totals.radio_groups, 1);
}
