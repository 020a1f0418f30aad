//! End-to-end checkout scenarios for the schedule engine

use chrono::{Duration, NaiveDate};
use installment_core::{
    BillingPlanDefinition, EngineConfig, LineItem, PlanBuilder, PlanRequest, RangeKind, Rates,
    ScheduleSolver, ValidationError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rates() -> Rates {
    Rates {
        fee_percent: dec!(0.07),
        tax_percent: dec!(0.0825),
        single_payment_fee_percent: dec!(0.03),
    }
}

fn builder() -> PlanBuilder {
    PlanBuilder::new(EngineConfig::default())
}

#[test]
fn test_four_by_four_fits_june_event() {
    let today = ymd(2024, 1, 1);
    let items = vec![LineItem::dated("2024-06-01", dec!(150.00), 2)];
    let requests = PlanRequest::parse_list("4,4").unwrap();

    let quote = builder()
        .build_plans(today, "box-office", &items, Some(dec!(0.07)), Some(dec!(0.0825)), &requests)
        .unwrap();

    assert_eq!(quote.total_due, dec!(300.00));
    assert_eq!(quote.schedules.len(), 1);
    let schedule = &quote.schedules[0];
    assert_eq!(schedule.per_cycle_amount, dec!(75.00));
    assert_eq!(schedule.setup_fee, dec!(21.00));
    assert_eq!(schedule.per_cycle_tax, dec!(6.19));
    assert_eq!(schedule.payment_dates.len(), 4);
    assert_eq!(schedule.payment_dates[0], ymd(2024, 1, 2));
    for pair in schedule.payment_dates.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(28));
    }

    let plan = BillingPlanDefinition::from(schedule);
    assert_eq!(plan.amount, "75.00");
    assert_eq!(plan.tax, "6.19");
    assert_eq!(plan.setup_fee, "21.00");
}

#[test]
fn test_four_by_four_rejected_for_near_event() {
    let items = vec![LineItem::dated("2024-01-20", dec!(300.00), 1)];
    let requests = PlanRequest::parse_list("4,4").unwrap();

    let quote = builder()
        .build_plans(ymd(2024, 1, 1), "box-office", &items, None, None, &requests)
        .unwrap();
    assert!(quote.schedules.is_empty());
}

#[test]
fn test_cycle_range_steps_down_to_two() {
    // 40 days out: 3 cycles leave no whole week between payments, 2 cycles fit 1 week apart
    let today = ymd(2024, 1, 1);
    let solver = ScheduleSolver::new(today, ymd(2024, 2, 10), dec!(300.00), rates());
    assert!(solver.solve(3, 0).is_err());

    let schedule = solver.search_range(RangeKind::Cycles, 1, 3).unwrap();
    assert_eq!(schedule.cycles, 2);
    assert_eq!(schedule.per_cycle_amount, dec!(150.00));
}

#[test]
fn test_installments_cover_total_within_cents() {
    let today = ymd(2024, 1, 1);
    let solver = ScheduleSolver::new(today, ymd(2025, 1, 1), dec!(1000.01), rates());

    for cycles in 2..=12 {
        let schedule = solver.solve(cycles, 0).unwrap();
        let overshoot = schedule.installment_total() - dec!(1000.01);
        assert!(overshoot >= Decimal::ZERO);
        assert!(overshoot < Decimal::from(cycles) * dec!(0.01));
        assert_eq!(schedule.payment_dates.len(), cycles as usize);
        assert!(schedule.payment_dates.windows(2).all(|w| w[0] < w[1]));

        let last = schedule.last_payment_date().unwrap();
        assert!(last + Duration::days(29) <= ymd(2025, 1, 1));
    }
}

#[test]
fn test_mixed_cart_with_unscheduled_item() {
    let today = ymd(2024, 3, 1);
    let items = vec![
        LineItem::dated("2024-04-15", dec!(80.00), 1),
        LineItem::unscheduled(dec!(20.00), 3),
    ];
    let quote = builder()
        .build_plans(today, "box-office", &items, None, None, &[])
        .unwrap();

    assert_eq!(quote.event_date, ymd(2024, 9, 1));
    assert_eq!(quote.total_due, dec!(140.00));
    assert!(!quote.schedules.is_empty());
}

#[test]
fn test_yearless_vendor_dates() {
    let mut config = EngineConfig::default();
    config.yearless_vendors.insert("county-fair".into());
    let builder = PlanBuilder::new(config);

    let items = vec![LineItem::dated("February 10", dec!(60.00), 1)];
    let requests = PlanRequest::parse_list("1:3").unwrap();

    let quote = builder
        .build_plans(ymd(2024, 11, 1), "County-Fair", &items, None, None, &requests)
        .unwrap();
    assert_eq!(quote.event_date, ymd(2025, 2, 10));

    let err = PlanBuilder::default()
        .build_plans(ymd(2024, 11, 1), "County-Fair", &items, None, None, &requests)
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDate { .. }));
}
