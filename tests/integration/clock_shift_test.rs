//! Clock-shift flow integration tests.
//!
//! Drive detection, rescheduling, and notification together over mocks.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use opskit::notify::{format_report, format_subject, MockNotifier, Notifier};
use opskit::params::{split_rules, MockParameterStore, ParameterStore};
use opskit::schedule::{reschedule_rules, shift_required, HourShift, MockRuleStore};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_spring_shift_end_to_end() {
    // 2026-03-29 is the last Sunday in March.
    let shift = shift_required(date(2026, 3, 29)).expect("transition day");
    assert_eq!(shift, HourShift::Back);

    let params = MockParameterStore::new().with_parameter(
        "/opskit/clock-shift/rules",
        "nightly-batch,overnight-window",
    );
    let store = MockRuleStore::new()
        .with_rule("nightly-batch", "cron(0 2 * * ? *)")
        .with_rule("overnight-window", "cron(30 19-0,1-3 * * ? *)");
    let notifier = MockNotifier::new();

    let value = params.get("/opskit/clock-shift/rules").await.unwrap();
    let rules = split_rules(&value);
    let outcome = reschedule_rules(&store, &rules, shift).await.unwrap();

    assert_eq!(outcome.updated, rules);
    assert!(outcome.failed.is_empty());
    assert_eq!(
        store.expression("nightly-batch").unwrap(),
        "cron(0 1 * * ? *)"
    );
    assert_eq!(
        store.expression("overnight-window").unwrap(),
        "cron(30 18-23,0-2 * * ? *)"
    );

    let subject = format_subject("prod");
    let message = format_report(&outcome, shift);
    notifier.publish(&subject, &message).await.unwrap();

    let published = notifier.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "Clock adjustment prod");
    assert!(published[0].1.contains("Time adjustment: -1"));
    assert!(published[0]
        .1
        .contains("SUCCESSFUL UPDATES\nnightly-batch\novernight-window\n"));
    assert!(published[0].1.contains("FAILED UPDATES\nNone\n"));
}

#[tokio::test]
async fn test_autumn_shift_with_partial_failure() {
    // 2026-10-25 is the last Sunday in October.
    let shift = shift_required(date(2026, 10, 25)).expect("transition day");
    assert_eq!(shift, HourShift::Forward);

    let store = MockRuleStore::new()
        .with_rule("a", "cron(0 23 * * ? *)")
        .with_rule("b", "cron(0 5 * * ? *)")
        .with_rule("c", "cron(0 12 * * ? *)")
        .with_failing_put("b");
    let notifier = MockNotifier::new();

    let rules = split_rules("a,b,c");
    let outcome = reschedule_rules(&store, &rules, shift).await.unwrap();

    // The outcome lists partition the rule set with ordering preserved.
    assert_eq!(outcome.updated, vec!["a", "c"]);
    assert_eq!(outcome.failed, vec!["b"]);

    // Wrap at the day boundary applied to the updated rules only.
    assert_eq!(store.expression("a").unwrap(), "cron(0 0 * * ? *)");
    assert_eq!(store.expression("b").unwrap(), "cron(0 5 * * ? *)");
    assert_eq!(store.expression("c").unwrap(), "cron(0 13 * * ? *)");

    let message = format_report(&outcome, shift);
    notifier
        .publish(&format_subject("staging"), &message)
        .await
        .unwrap();

    let published = notifier.published();
    assert!(published[0].1.contains("Time adjustment: +1"));
    assert!(published[0].1.contains("SUCCESSFUL UPDATES\na\nc\n"));
    assert!(published[0].1.contains("FAILED UPDATES\nb\n"));
}

#[tokio::test]
async fn test_ordinary_day_requires_no_shift() {
    // A Wednesday in July: nothing to do.
    assert_eq!(shift_required(date(2026, 7, 15)), None);
    // The last Sunday of a non-transition month: still nothing.
    assert_eq!(shift_required(date(2026, 11, 29)), None);
}

#[tokio::test]
async fn test_round_trip_across_both_transitions() {
    let store = MockRuleStore::new().with_rule("window", "cron(15 22-23,0-1 * * ? *)");
    let rules = split_rules("window");

    // Spring: stored hours move back.
    reschedule_rules(&store, &rules, HourShift::Back).await.unwrap();
    assert_eq!(
        store.expression("window").unwrap(),
        "cron(15 21-22,23-0 * * ? *)"
    );

    // Autumn: stored hours move forward again, restoring the original.
    reschedule_rules(&store, &rules, HourShift::Forward).await.unwrap();
    assert_eq!(
        store.expression("window").unwrap(),
        "cron(15 22-23,0-1 * * ? *)"
    );
}
