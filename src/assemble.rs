//! Projects parsed `test` records into the presentation-layer shape a
//! caller actually wants: trimmed strings, a real timestamp, durations
//! instead of raw month counts, and a resolved pass/fail.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::sss::{PhysicalTestResult, ResultFlags, TestRecord};

const DAYS_PER_MONTH: i64 = 30;

/// One `test` record, projected for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResultView {
    pub id: String,
    pub venue: String,
    pub location: String,
    pub user: String,
    pub test_type: String,
    pub comments: String,
    /// `None` if the record's `(year, month, day, hour, minute, second)`
    /// fields do not form a valid calendar timestamp.
    pub test_time: Option<NaiveDateTime>,
    pub full_retest_period: Duration,
    pub visual_retest_period: Duration,
    /// Opaque device configuration blob, preserved verbatim.
    pub test_config: Vec<u8>,
    pub result: AssembledResult,
    pub subtests: Vec<Subtest>,
}

impl TestResultView {
    /// `test_config`, hex-encoded for display.
    pub fn test_config_hex(&self) -> String {
        self.test_config.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// The raw flags byte plus the assembler's resolved pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembledResult {
    pub raw: ResultFlags,
    pub passed: bool,
    pub failed: bool,
}

/// One entry in [`TestResultView::subtests`]: either the synthetic visual
/// inspection summary, or one instrumented physical measurement.
#[derive(Debug, Clone, PartialEq)]
pub enum Subtest {
    Visual { passed: bool, failed: bool },
    Physical(PhysicalTestResult),
}

impl Subtest {
    pub fn test_type(&self) -> &str {
        match self {
            Subtest::Visual { .. } => "visual",
            Subtest::Physical(result) => result.type_name(),
        }
    }
}

/// Projects a parsed `test` record into its presentation view.
///
/// `passed` is true iff the record's `pass` flag is set, or the record
/// carries at least one physical test result (treated as overriding
/// evidence of a real measurement run). `failed` is true iff the `fail`
/// flag is set and there are no physical test results. These predicates
/// are independent, not complements of one another: the wire format
/// allows both `pass` and `fail` to be set, and allows neither to apply.
pub fn assemble(record: &TestRecord) -> TestResultView {
    let has_physical_tests = !record.physical_test_results.is_empty();
    let passed = record.result_flags.pass || has_physical_tests;
    let failed = record.result_flags.fail && !has_physical_tests;

    let test_time = NaiveDate::from_ymd_opt(
        record.year as i32,
        u32::from(record.month),
        u32::from(record.day),
    )
    .and_then(|date| {
        date.and_hms_opt(
            u32::from(record.hour),
            u32::from(record.minute),
            u32::from(record.second),
        )
    });

    let mut subtests = Vec::with_capacity(1 + record.physical_test_results.len());
    subtests.push(Subtest::Visual { passed, failed });
    subtests.extend(
        record
            .physical_test_results
            .iter()
            .cloned()
            .map(Subtest::Physical),
    );

    TestResultView {
        id: record.id.clone(),
        venue: record.venue.clone(),
        location: record.location.clone(),
        user: record.user.clone(),
        test_type: record.test_type.clone(),
        comments: record.comments.clone(),
        test_time,
        full_retest_period: Duration::days(
            i64::from(record.full_retest_period_months) * DAYS_PER_MONTH,
        ),
        visual_retest_period: Duration::days(
            i64::from(record.visual_retest_period_months) * DAYS_PER_MONTH,
        ),
        test_config: record.test_config.clone(),
        result: AssembledResult {
            raw: record.result_flags,
            passed,
            failed,
        },
        subtests,
    }
}
