use chrono::{DateTime, SecondsFormat, TimeDelta, TimeZone, Utc};
use skysweep::domain::{Category, Record, RecordValue, RetentionWindow};
use skysweep::store::RecordStore;
use skysweep::sweep::{RunSummary, SweepError, run_sweep};
use skysweep::telemetry;
use std::sync::OnceLock;

static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        let outcome = if std::env::var("TEST_LOG").is_ok() {
            telemetry::init_subscriber(telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::stdout,
            ))
        } else {
            telemetry::init_subscriber(telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::sink,
            ))
        };
        outcome.expect("Failed to install the test subscriber");
    });
}

/// Fixed clock so ages are exact.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn record(category: Category, rkey: &str, age_days: i64) -> Record {
    Record {
        uri: format!("at://did:plc:tester/{}/{rkey}", category.collection()),
        cid: format!("bafy{rkey}"),
        value: RecordValue {
            created_at: (now() - TimeDelta::days(age_days))
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            text: (category == Category::Post).then(|| format!("post {rkey}")),
        },
    }
}

pub struct SweepOutput {
    pub result: Result<RunSummary, SweepError>,
    pub report: String,
}

pub async fn sweep<S: RecordStore>(
    store: &S,
    categories: &[Category],
    days: u32,
) -> SweepOutput {
    init_tracing();

    let mut out = Vec::new();
    let result = run_sweep(
        store,
        categories,
        RetentionWindow::from_days(days),
        now(),
        &mut out,
    )
    .await;

    SweepOutput {
        result,
        report: String::from_utf8(out).expect("Report is not UTF-8"),
    }
}
