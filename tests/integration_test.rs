// Integration tests for cartX
use cartx::prelude::*;
use chrono::NaiveDate;

fn grocery_catalog() -> Vec<Product> {
    vec![
        Product::new("chk-1", "Fresh Chicken Breast 500g", "Poultry", 8.50)
            .with_value(1.70, 1.4)
            .with_location("Springfield", "IL"),
        Product::new("chk-2", "Chicken Thighs Family Pack", "Poultry", 6.00)
            .with_value(0.75, 2.1)
            .with_discount(0.15)
            .with_location("Shelbyville", "IL"),
        Product::new("chk-3", "Organic Chicken Breast", "Poultry", 24.00)
            .with_value(4.80, 0.4)
            .with_location("Springfield", "IL"),
        Product::new("fsh-1", "Frozen Fish Fillets", "Seafood", 9.00)
            .with_value(1.80, 1.1)
            .with_location("Springfield", "IL"),
        Product::new("mlk-1", "Whole Milk 2L", "Dairy", 3.20)
            .with_value(0.16, 1.0)
            .with_location("Springfield", "IL"),
        Product::new("brd-1", "Artisan Sourdough Bread", "Bakery", 35.00)
            .with_value(5.0, 0.2)
            .with_location("Springfield", "IL"),
    ]
}

fn build_engine() -> RecommendationEngine {
    // Lexical mode keeps token matching deterministic across runs.
    let mut index = RetrievalIndex::new(IndexConfig {
        prefer_lexical: true,
        ..IndexConfig::default()
    });
    index.build(grocery_catalog());
    RecommendationEngine::new(index, ValueRanker::default())
}

#[test]
fn test_recommend_end_to_end() {
    let engine = build_engine();
    let recs = engine
        .recommend("chicken breast", 15.0, None, None, 5)
        .unwrap();

    assert!(!recs.is_empty());
    // Budget cutoff excludes the organic breast at 24.00
    assert!(recs.iter().all(|r| r.package_price <= 15.0));
    assert!(recs.iter().all(|r| r.sku != "chk-3"));
    // The closest lexical match leads
    assert_eq!(recs[0].sku, "chk-1");
}

#[test]
fn test_recommend_irrelevant_products_stay_out() {
    let engine = build_engine();
    let recs = engine.recommend("chicken", 15.0, None, None, 5).unwrap();
    // Milk and bread share no query tokens and fail the relevance guard
    assert!(recs.iter().all(|r| r.sku.starts_with("chk")));
}

#[test]
fn test_recommend_location_filter_is_soft() {
    let engine = build_engine();

    let matched = engine
        .recommend("chicken", 15.0, Some("Shelbyville"), None, 5)
        .unwrap();
    assert!(matched.iter().all(|r| r.city == "Shelbyville"));

    // An unknown city must not empty the result set
    let unmatched = engine
        .recommend("chicken", 15.0, Some("Capital City"), None, 5)
        .unwrap();
    assert!(!unmatched.is_empty());
}

#[test]
fn test_recommend_rejects_bad_budget() {
    let engine = build_engine();
    assert!(matches!(
        engine.recommend("chicken", 0.0, None, None, 5),
        Err(Error::InvalidBudget(_))
    ));
}

#[test]
fn test_basket_end_to_end() {
    let engine = build_engine();
    let planner = BasketPlanner::new(&engine);

    let items = vec![
        "chicken".to_string(),
        "milk".to_string(),
        "bread".to_string(),
    ];
    let basket = planner.plan(&items, 40.0, None, None).unwrap();

    assert_eq!(basket.lines.len(), 3);
    assert!(basket.lines[0].best_match.is_some());
    assert!(basket.lines[1].best_match.is_some());

    // Bread costs 35.00, above the 13.33 per-item share; the planner
    // retries at the full budget and the basket overruns.
    let bread = &basket.lines[2];
    assert_eq!(
        bread.best_match.as_ref().map(|r| r.sku.as_str()),
        Some("brd-1")
    );
    assert!(!basket.within_budget);

    let summed: f64 = basket.lines.iter().map(|l| l.estimated_cost).sum();
    assert!((basket.estimated_total - summed).abs() < 1e-9);
}

#[test]
fn test_basket_rejects_empty_list() {
    let engine = build_engine();
    let planner = BasketPlanner::new(&engine);
    assert!(matches!(
        planner.plan(&[], 40.0, None, None),
        Err(Error::EmptyItemList)
    ));
}

#[test]
fn test_index_roundtrip_through_engine() {
    let dir = tempfile::tempdir().unwrap();

    let mut index = RetrievalIndex::new(IndexConfig {
        prefer_lexical: true,
        ..IndexConfig::default()
    });
    index.build(grocery_catalog());
    index.save(dir.path()).unwrap();

    let reloaded = RetrievalIndex::load(dir.path(), IndexConfig::default()).unwrap();
    let engine = RecommendationEngine::new(reloaded, ValueRanker::default());
    let recs = engine
        .recommend("chicken breast", 15.0, None, None, 5)
        .unwrap();
    assert_eq!(recs[0].sku, "chk-1");
}

#[test]
fn test_forecast_fallback_and_history() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
    let history = vec![
        PriceObservation::new("mlk-1", day(15), 3.30),
        PriceObservation::new("mlk-1", day(1), 3.20),
        PriceObservation::new("mlk-1", day(8), 3.10),
    ];

    let forecaster = PriceForecaster::default();
    let forecast = forecaster.predict_next(&history, "mlk-1").unwrap();
    assert_eq!(forecast.predicted_price, 3.30);
    assert_eq!(forecast.trend, Trend::Stable);
    assert_eq!(forecast.confidence, Confidence::Low);

    let points = PriceForecaster::get_history(&history, "mlk-1").unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].price, 3.20); // sorted by date

    assert!(matches!(
        forecaster.predict_next(&history, "unknown"),
        Err(Error::SkuNotFound(_))
    ));
}
