//! Report service tests: birthday ordering and the financial summary.

mod mocks;

use chrono::NaiveDate;
use ecclesia_mcp_server::error::ApiError;
use ecclesia_mcp_server::models::{
    Birthday, BirthdayPeriod, Contribution, ContributionKind, ReportRange, Tither,
};
use ecclesia_mcp_server::services::{ReportService, ReportServiceImpl};
use mocks::{MockContributionRepository, MockReportRepository, MockTitherRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn birthday(id: i64, name: &str, born: NaiveDate, community_id: i64) -> Birthday {
    Birthday {
        id,
        name: name.to_string(),
        birth_date: born,
        phone: None,
        email: None,
        community_id,
        community_name: "Matriz".to_string(),
        age: None,
        days_until: None,
    }
}

fn contribution(
    id: i64,
    tither_id: Option<i64>,
    kind: ContributionKind,
    amount: Decimal,
    on: NaiveDate,
) -> Contribution {
    Contribution {
        id,
        tither_id,
        community_id: 1,
        kind,
        amount,
        date: on,
        payment_method: None,
        reference_month: None,
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

fn setup(today: NaiveDate) -> (MockReportRepository, ReportServiceImpl) {
    let repo = MockReportRepository::new();
    let service = ReportServiceImpl::new(
        Arc::new(repo.clone()),
        Arc::new(MockTitherRepository::new()),
        Arc::new(MockContributionRepository::new()),
    )
    .with_today(today);
    (repo, service)
}

fn june() -> ReportRange {
    ReportRange {
        start_date: date(2024, 6, 1),
        end_date: date(2024, 6, 30),
        community_id: None,
    }
}

#[tokio::test]
async fn test_birthdays_sorted_soonest_first_with_ages() {
    let (repo, service) = setup(date(2024, 6, 10));
    repo.add_birthday(birthday(1, "Bruno", date(1985, 6, 12), 1));
    repo.add_birthday(birthday(2, "Ana", date(1990, 6, 10), 1));
    repo.add_birthday(birthday(3, "Carla", date(2000, 6, 11), 1));

    let list = service
        .birthdays(BirthdayPeriod::NextSevenDays, None)
        .await
        .unwrap();

    let names: Vec<&str> = list.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Carla", "Bruno"]);
    assert_eq!(list[0].days_until, Some(0));
    assert_eq!(list[0].age, Some(34));
    assert_eq!(list[1].age, Some(24));
    assert_eq!(list[2].days_until, Some(2));
    assert_eq!(list[2].age, Some(39));
    assert_eq!(repo.last_period(), Some(BirthdayPeriod::NextSevenDays));
}

#[tokio::test]
async fn test_birthdays_same_day_ordered_by_name() {
    let (repo, service) = setup(date(2024, 6, 1));
    repo.add_birthday(birthday(1, "Zélia", date(1970, 6, 3), 1));
    repo.add_birthday(birthday(2, "Antônio", date(1980, 6, 3), 1));

    let list = service.birthdays(BirthdayPeriod::Month, None).await.unwrap();
    assert_eq!(list[0].name, "Antônio");
    assert_eq!(list[1].name, "Zélia");
}

#[tokio::test]
async fn test_leap_day_birthday_observed_on_feb_28() {
    let (repo, service) = setup(date(2023, 2, 27));
    repo.add_birthday(birthday(1, "Bissexto", date(2000, 2, 29), 1));

    let list = service.birthdays(BirthdayPeriod::NextSevenDays, None).await.unwrap();
    assert_eq!(list[0].days_until, Some(1));
}

#[tokio::test]
async fn test_birthdays_filtered_by_community() {
    let (repo, service) = setup(date(2024, 6, 1));
    repo.add_birthday(birthday(1, "Ana", date(1990, 6, 10), 1));
    repo.add_birthday(birthday(2, "Bruno", date(1990, 6, 11), 2));

    let list = service.birthdays(BirthdayPeriod::Month, Some(2)).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Bruno");
}

#[tokio::test]
async fn test_financial_summary_combines_both_reports() {
    let (repo, service) = setup(date(2024, 7, 1));
    let (dizimo, oferta) = (ContributionKind::Dizimo, ContributionKind::Oferta);
    repo.add_contribution(contribution(1, Some(7), dizimo, dec!(100.00), date(2024, 6, 5)));
    repo.add_contribution(contribution(2, Some(8), dizimo, dec!(250.50), date(2024, 6, 12)));
    repo.add_contribution(contribution(3, None, oferta, dec!(20.25), date(2024, 6, 30)));
    repo.add_contribution(contribution(4, Some(7), dizimo, dec!(999), date(2024, 7, 1)));

    let summary = service.financial_summary(june()).await.unwrap();

    assert_eq!(summary.period.total, dec!(370.75));
    assert_eq!(summary.period.count, 3);
    assert_eq!(summary.by_kind.total_for(ContributionKind::Dizimo), dec!(350.50));
    assert_eq!(summary.by_kind.total_for(ContributionKind::Oferta), dec!(20.25));
    assert_eq!(summary.by_kind.grand_total(), summary.period.total);
    assert_eq!(repo.get_call_count("total_by_period"), 1);
    assert_eq!(repo.get_call_count("totals_by_kind"), 1);
}

#[tokio::test]
async fn test_inverted_range_rejected_before_fetching() {
    let (repo, service) = setup(date(2024, 7, 1));
    let range = ReportRange {
        start_date: date(2024, 6, 30),
        end_date: date(2024, 6, 1),
        community_id: None,
    };

    assert!(matches!(
        service.financial_summary(range).await,
        Err(ApiError::Validation(_))
    ));
    assert!(service.total_by_period(range).await.is_err());
    assert_eq!(repo.get_call_count("total_by_period"), 0);
}

#[tokio::test]
async fn test_tither_history_totals() {
    let (repo, service) = setup(date(2024, 7, 1));
    repo.add_tither(7, "Maria");
    let dizimo = ContributionKind::Dizimo;
    repo.add_contribution(contribution(1, Some(7), dizimo, dec!(100), date(2024, 5, 5)));
    repo.add_contribution(contribution(2, Some(7), dizimo, dec!(100), date(2024, 6, 5)));
    repo.add_contribution(contribution(3, Some(8), dizimo, dec!(40), date(2024, 6, 5)));

    let history = service.tither_history(7).await.unwrap();
    assert_eq!(history.tither_name, "Maria");
    assert_eq!(history.total, dec!(200));
    assert_eq!(history.count, 2);

    assert!(matches!(service.tither_history(0).await, Err(ApiError::Validation(_))));
    assert!(matches!(service.tither_history(99).await, Err(ApiError::NotFound(_))));
}

fn tither(id: i64, name: &str, active: bool) -> Tither {
    Tither {
        id,
        community_id: 1,
        name: name.to_string(),
        cpf: None,
        phone: None,
        email: None,
        birth_date: None,
        address: None,
        active,
        notes: None,
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn test_dashboard_gathers_counts_month_total_and_todays_birthdays() {
    let reports = MockReportRepository::new();
    let tithers = MockTitherRepository::new();
    let contributions = MockContributionRepository::new();
    let service = ReportServiceImpl::new(
        Arc::new(reports.clone()),
        Arc::new(tithers.clone()),
        Arc::new(contributions.clone()),
    )
    .with_today(date(2024, 6, 10));

    tithers.add_tither(tither(1, "Ana", true));
    tithers.add_tither(tither(2, "Bruno", true));
    tithers.add_tither(tither(3, "Carla", false));

    let dizimo = ContributionKind::Dizimo;
    for (id, on) in [(1, date(2024, 5, 20)), (2, date(2024, 6, 3)), (3, date(2024, 6, 9))] {
        contributions.add_contribution(contribution(id, Some(1), dizimo, dec!(50), on));
    }
    reports.add_contribution(contribution(1, Some(1), dizimo, dec!(50), date(2024, 5, 31)));
    reports.add_contribution(contribution(2, Some(1), dizimo, dec!(80), date(2024, 6, 1)));
    reports.add_contribution(contribution(3, Some(2), dizimo, dec!(45.50), date(2024, 6, 30)));
    reports.add_birthday(birthday(1, "Ana", date(1990, 6, 10), 1));

    let dashboard = service.dashboard().await.unwrap();

    assert_eq!(dashboard.active_tithers, 2);
    assert_eq!(dashboard.contributions, 3);
    assert_eq!(dashboard.month_total.start_date, date(2024, 6, 1));
    assert_eq!(dashboard.month_total.end_date, date(2024, 6, 30));
    assert_eq!(dashboard.month_total.total, dec!(125.50));
    assert_eq!(dashboard.month_total.count, 2);
    assert_eq!(dashboard.birthdays_today.len(), 1);
    assert_eq!(dashboard.birthdays_today[0].days_until, Some(0));
    assert_eq!(reports.last_period(), Some(BirthdayPeriod::Today));

    let filters = tithers.last_filters().unwrap();
    assert_eq!(filters.active, Some(true));
    assert_eq!(filters.page.page_size(), 1);
    assert_eq!(tithers.get_call_count("list"), 1);
    assert_eq!(contributions.get_call_count("list"), 1);
}

#[tokio::test]
async fn test_dashboard_with_empty_sources() {
    let (_, service) = setup(date(2024, 6, 10));
    let dashboard = service.dashboard().await.unwrap();
    assert_eq!(dashboard.active_tithers, 0);
    assert_eq!(dashboard.month_total.total, Decimal::ZERO);
    assert!(dashboard.birthdays_today.is_empty());
}
