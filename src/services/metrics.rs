//! Derived-metrics engine.
//!
//! Pure functions over an account's transaction history. "Now" is always an
//! argument, and month boundaries are calendar months in the time zone that
//! "now" carries, so callers choose the zone and tests can pin it.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::transaction::{Transaction, TransactionKind};

/// Deposit, withdrawal and net totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyAggregates {
    pub deposits: Decimal,
    pub withdrawals: Decimal,
    pub net: Decimal,
}

/// Granularity used to step over a skipped stretch of local time.
const GAP_STEP_MINUTES: i64 = 15;

/// Midnight on the first of the given month in `tz`, as UTC.
///
/// When local midnight falls in a DST gap, the month starts at the first
/// local time after the gap that exists.
fn month_start<Tz: TimeZone>(tz: &Tz, year: i32, month: u32) -> DateTime<Utc> {
    let midnight = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN);

    (0..24 * 60 / GAP_STEP_MINUTES)
        .map(|step| midnight + TimeDelta::minutes(step * GAP_STEP_MINUTES))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        // No zone skips a whole day at the start of a month.
        .unwrap_or_else(|| midnight.and_utc())
}

/// First instant of the calendar month containing `now`.
pub fn first_day_of_month<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    month_start(&now.timezone(), now.year(), now.month())
}

/// First instant of the calendar month before the one containing `now`.
pub fn first_day_of_prior_month<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let (year, month) = match now.month() {
        1 => (now.year() - 1, 12),
        m => (now.year(), m - 1),
    };
    month_start(&now.timezone(), year, month)
}

fn sum_kind<'a, I>(transactions: I, kind: TransactionKind) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|t| t.kind == kind)
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// Percentage of `monthly_goal` covered by this month's deposits.
///
/// Withdrawals never reduce progress, and there is no upper clamp: 150 means
/// the goal was beaten by half. A goal of zero (or less) yields zero.
pub fn compute_goal_progress<Tz: TimeZone>(
    transactions: &[Transaction],
    monthly_goal: Decimal,
    now: &DateTime<Tz>,
) -> Decimal {
    if monthly_goal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let start = first_day_of_month(now);
    let deposited = sum_kind(
        transactions.iter().filter(|t| t.timestamp >= start),
        TransactionKind::Deposit,
    );

    deposited
        .checked_div(monthly_goal)
        .map(|ratio| ratio.saturating_mul(dec!(100)))
        .unwrap_or(Decimal::MAX)
}

/// Net savings (deposits minus withdrawals) over the previous calendar month.
///
/// The window is half-open: the first instant of the current month belongs
/// to the current month.
pub fn compute_last_month_savings<Tz: TimeZone>(
    transactions: &[Transaction],
    now: &DateTime<Tz>,
) -> Decimal {
    let start = first_day_of_prior_month(now);
    let end = first_day_of_month(now);
    let window: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.timestamp >= start && t.timestamp < end)
        .collect();

    sum_kind(window.iter().copied(), TransactionKind::Deposit)
        .saturating_sub(sum_kind(window.iter().copied(), TransactionKind::Withdraw))
}

/// Totals for the calendar month containing `now` (not a rolling 30 days).
pub fn compute_monthly_aggregates<Tz: TimeZone>(
    transactions: &[Transaction],
    now: &DateTime<Tz>,
) -> MonthlyAggregates {
    let start = first_day_of_month(now);
    let this_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.timestamp >= start)
        .collect();

    let deposits = sum_kind(this_month.iter().copied(), TransactionKind::Deposit);
    let withdrawals = sum_kind(this_month.iter().copied(), TransactionKind::Withdraw);

    MonthlyAggregates {
        deposits,
        withdrawals,
        net: deposits.saturating_sub(withdrawals),
    }
}
