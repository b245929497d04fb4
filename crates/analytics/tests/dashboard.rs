use analytics::{AnalyticsError, ChartView, Measure, MetricDeriver, Session};
use core_types::{Column, FilterSet, UrgencyBand, YearRange};

const DATASET: &str = "\
Years_to_50_Percent_Obsolescence,Skill_Category,AI_Adoption_Rate,Skill_Depreciation_Rate,Industry,Reskilling_Time_Months,Year,Country
1.2,Programming,82,0.41,Technology,9,2021,USA
1.8,Programming,78,0.38,Finance,14,2022,India
4.5,Data Analysis,64,0.22,Finance,6,2021,Germany
2.0,Data Analysis,70,0.27,Technology,30,2023,USA
7.5,Design,45,0.12,Media,12,2022,Germany
11.0,Management,30,0.05,Finance,18,2023,India
oops,Design,50,0.10,Media,10,2022,USA
";

fn session(csv: &str) -> Session {
    let raw = loader::load_bytes(csv.as_bytes()).expect("csv parses");
    Session::load(&raw, MetricDeriver::new()).expect("dataset validates")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn aliases_are_normalised_and_bad_rows_reported() {
    let session = session(DATASET);

    assert_eq!(session.table().len(), 6);
    assert!(session.table().has(Column::Sector));
    assert!(session.table().has(Column::Region));
    assert_eq!(session.report().dropped_rows, 1);
    assert_eq!(session.report().dropped_by_field[&Column::ObsolescenceYears], 1);
    assert!(session.report().absent_optional.is_empty());

    let options = session.options();
    assert_eq!(options.sectors, vec!["Finance", "Media", "Technology"]);
    assert_eq!(options.regions, vec!["Germany", "India", "USA"]);
    assert_eq!(options.year_span, Some((2021, 2023)));
}

#[test]
fn unfiltered_dashboard() {
    let aggregates = session(DATASET).aggregates(&FilterSet::new());

    assert_eq!(aggregates.matched_rows, 6);
    assert_eq!(aggregates.kpis.median_half_life_years, Measure::Value(3.25));
    assert!(close(*aggregates.kpis.critical_share.value().unwrap(), 2.0 / 6.0));
    // Only Data Analysis / 2.0 years (24 months vs 30) fails to pay off.
    assert!(close(*aggregates.kpis.reskilling_viable_share.value().unwrap(), 5.0 / 6.0));

    let bands: Vec<(UrgencyBand, usize)> = aggregates
        .urgency
        .iter()
        .map(|b| (b.band, b.count))
        .collect();
    assert_eq!(
        bands,
        vec![
            (UrgencyBand::Critical, 2),
            (UrgencyBand::High, 2),
            (UrgencyBand::Moderate, 1),
            (UrgencyBand::Low, 1),
        ]
    );

    let trend = aggregates.adoption_vs_depreciation.trend.value().unwrap();
    assert!(trend.slope > 0.0);
    assert!(trend.correlation.unwrap() > 0.9);
    assert_eq!(trend.points, 6);

    assert_eq!(aggregates.temporal_trend.len(), 3);
    assert_eq!(aggregates.risk_profile.len(), 6);
    assert!(aggregates.disabled_views.is_empty());
}

#[test]
fn filtered_kpis_match_filtered_aggregates() {
    let session = session(DATASET);
    let filters = FilterSet::new()
        .with_sector("Finance")
        .with_years(YearRange::new(2021, 2022).unwrap());

    let kpis = session.kpis(&filters);
    let aggregates = session.aggregates(&filters);

    assert_eq!(kpis, aggregates.kpis);
    assert_eq!(kpis.records, 2);
    assert_eq!(kpis.median_half_life_years, Measure::Value(3.15));
    assert_eq!(aggregates.total_rows, 6);
}

#[test]
fn unknown_category_renders_no_data() {
    let aggregates = session(DATASET).aggregates(&FilterSet::new().with_category("Astrology"));

    assert!(aggregates.is_empty());
    assert_eq!(aggregates.kpis.median_half_life_years, Measure::NoData);
    assert_eq!(aggregates.kpis.critical_share, Measure::NotApplicable);
    assert!(aggregates.urgency.is_empty());
    assert!(aggregates.category_distribution.is_empty());
    assert!(aggregates.temporal_trend.is_empty());
}

#[test]
fn required_columns_alone_still_produce_kpis() {
    let csv = "\
Years_to_50_Percent_Obsolescence,Skill_Category,AI_Adoption_Rate,Skill_Depreciation_Rate
1,Programming,80,0.4
2,Programming,60,0.3
3,Design,40,0.2
4,Design,20,0.1
";
    let session = session(csv);
    let aggregates = session.aggregates(&FilterSet::new());

    assert_eq!(aggregates.kpis.median_half_life_years, Measure::Value(2.5));
    assert!(aggregates.is_disabled(ChartView::TemporalTrend));
    assert!(aggregates.is_disabled(ChartView::RiskProfile));
    assert!(aggregates.temporal_trend.is_empty());
    assert_eq!(aggregates.kpis.reskilling_viable_share, Measure::NotApplicable);
    assert_eq!(session.report().absent_optional, Column::OPTIONAL.to_vec());
}

#[test]
fn missing_half_life_column_is_a_schema_error() {
    let csv = "Skill_Category,AI_Adoption_Rate,Skill_Depreciation_Rate\nDesign,40,0.2\n";
    let raw = loader::load_bytes(csv.as_bytes()).unwrap();

    match Session::load(&raw, MetricDeriver::new()) {
        Err(AnalyticsError::Schema { missing }) => {
            assert_eq!(missing, vec![Column::ObsolescenceYears]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn aggregates_serialize_for_the_renderer() {
    let aggregates = session(DATASET).aggregates(&FilterSet::new().with_category("Design"));
    let json = serde_json::to_value(&aggregates).unwrap();

    assert_eq!(json["matched_rows"], 1);
    assert_eq!(json["adoption_vs_depreciation"]["trend"]["status"], "no_trend");
    assert_eq!(json["kpis"]["median_half_life_years"]["value"], 7.5);
    assert_eq!(json["urgency"][2]["band"], "Moderate");
}
