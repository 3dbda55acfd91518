//! Reference-price resolution per region: live market feed, time-bounded
//! cache, static fallback.
//!
//! The resolver is the only stateful piece of the engine. Its cache is
//! keyed by region with a fixed TTL; concurrent refreshes for the same
//! region converge last-writer-wins. A failed feed call falls back to the
//! static zone price immediately, with no retries.

pub mod esios;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{Region, TariffKind};

pub use esios::EsiosFeed;

/// A single indicator record from the market feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub geo_id: u32,
    /// €/MWh; records without a value are skipped.
    pub value: Option<f64>,
}

/// Source of raw market-price records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> anyhow::Result<Vec<PriceSample>>;
}

/// Time source, injectable so cache expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A resolved reference price for one region.
///
/// `source_label` is populated only when the price came from the live
/// feed; a fallback price carries `None` so callers can annotate the
/// result as an estimate.
#[derive(Debug, Clone, Serialize)]
pub struct RegionPriceInfo {
    pub region: Region,
    pub price_eur_kwh: f64,
    pub source_label: Option<String>,
    pub resolved_at: DateTime<FixedOffset>,
}

/// Knobs for turning raw feed values into a residential €/kWh figure.
#[derive(Debug, Clone)]
pub struct ResolverParams {
    pub cache_ttl: Duration,
    /// Below this €/kWh the feed is assumed to be quoting the wholesale
    /// energy-only component.
    pub wholesale_floor_eur_kwh: f64,
    /// Multiplier approximating the all-in residential price from the
    /// energy-only component. Empirical, carried over from the CNMC
    /// comparison data; do not re-derive.
    pub wholesale_uplift: f64,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::minutes(60),
            wholesale_floor_eur_kwh: 0.12,
            wholesale_uplift: 2.2,
        }
    }
}

/// Averages the feed records for one geographic zone into €/kWh.
///
/// Returns `None` when no record matches the zone; non-positive averages
/// are the caller's signal to fall back.
pub fn average_eur_per_kwh(samples: &[PriceSample], geo_id: u32, params: &ResolverParams) -> Option<f64> {
    let mut total = 0.0;
    let mut count = 0usize;
    for sample in samples {
        if sample.geo_id != geo_id {
            continue;
        }
        let Some(eur_per_mwh) = sample.value else {
            continue;
        };
        total += eur_per_mwh / 1000.0;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let mut avg = total / count as f64;
    if avg < params.wholesale_floor_eur_kwh {
        avg *= params.wholesale_uplift;
    }
    Some((avg * 10_000.0).round() / 10_000.0)
}

struct CachedPrice {
    info: RegionPriceInfo,
}

/// Resolves a region's reference €/kWh price with live/cache/fallback
/// layering.
pub struct PriceResolver {
    feed: Arc<dyn PriceFeed>,
    clock: Arc<dyn Clock>,
    params: ResolverParams,
    cache: RwLock<HashMap<Region, CachedPrice>>,
}

impl PriceResolver {
    pub fn new(feed: Arc<dyn PriceFeed>, clock: Arc<dyn Clock>, params: ResolverParams) -> Self {
        Self {
            feed,
            clock,
            params,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves the reference price for `region`.
    ///
    /// Order: fresh cache entry, then live feed, then the static zone
    /// fallback. Never fails and never returns a non-positive price; only
    /// live results are cached.
    pub async fn resolve(&self, region: Region) -> RegionPriceInfo {
        let now = self.clock.now();

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&region) {
                if now - entry.info.resolved_at < self.params.cache_ttl {
                    debug!(%region, price = entry.info.price_eur_kwh, "price cache hit");
                    return entry.info.clone();
                }
            }
        }

        // Yesterday 00:00 through now, in case today's values are not
        // published yet.
        let end = now.naive_local();
        let start = (now.date_naive() - Duration::days(1)).and_time(NaiveTime::MIN);

        let geo_id = region.price_zone().geo_id();
        match self.feed.fetch(start, end).await {
            Ok(samples) => {
                if let Some(price) = average_eur_per_kwh(&samples, geo_id, &self.params) {
                    if price > 0.0 {
                        let label =
                            format!("PVPC (actualitzat {})", now.format("%d/%m/%Y %H:%M"));
                        let info = RegionPriceInfo {
                            region,
                            price_eur_kwh: price,
                            source_label: Some(label),
                            resolved_at: now,
                        };
                        let mut cache = self.cache.write().await;
                        cache.insert(region, CachedPrice { info: info.clone() });
                        return info;
                    }
                }
                warn!(%region, "price feed returned no usable values, using static fallback");
            }
            Err(err) => {
                warn!(%region, error = %err, "price feed unavailable, using static fallback");
            }
        }

        RegionPriceInfo {
            region,
            price_eur_kwh: region.price_zone().fallback_price_eur_kwh(),
            source_label: None,
            resolved_at: now,
        }
    }

    /// Effective €/kWh for a named tariff: reference price times the
    /// tariff factor; unknown names get the regulated baseline.
    pub async fn effective_price(&self, region: Region, tariff_name: &str) -> f64 {
        self.resolve(region).await.price_eur_kwh * TariffKind::factor_for(tariff_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<DateTime<FixedOffset>>,
    }

    impl ManualClock {
        fn at(now: DateTime<FixedOffset>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.now.lock().unwrap()
        }
    }

    fn t0() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .unwrap()
    }

    fn peninsula_samples(eur_per_mwh: f64) -> Vec<PriceSample> {
        vec![
            PriceSample { geo_id: 8741, value: Some(eur_per_mwh) },
            PriceSample { geo_id: 8743, value: Some(999.0) },
        ]
    }

    #[test]
    fn averaging_filters_by_zone_and_converts_units() {
        let params = ResolverParams::default();
        let samples = vec![
            PriceSample { geo_id: 8741, value: Some(200.0) },
            PriceSample { geo_id: 8741, value: Some(300.0) },
            PriceSample { geo_id: 8743, value: Some(900.0) },
            PriceSample { geo_id: 8741, value: None },
        ];
        // (0.200 + 0.300) / 2 = 0.25 €/kWh, above the wholesale floor.
        assert_eq!(average_eur_per_kwh(&samples, 8741, &params), Some(0.25));
    }

    #[test]
    fn low_averages_are_scaled_to_residential_levels() {
        let params = ResolverParams::default();
        let samples = vec![PriceSample { geo_id: 8741, value: Some(80.0) }];
        // 0.08 €/kWh < 0.12 floor → × 2.2 = 0.176
        assert_eq!(average_eur_per_kwh(&samples, 8741, &params), Some(0.176));
    }

    #[test]
    fn no_matching_zone_yields_none() {
        let params = ResolverParams::default();
        let samples = vec![PriceSample { geo_id: 8743, value: Some(200.0) }];
        assert_eq!(average_eur_per_kwh(&samples, 8741, &params), None);
    }

    #[tokio::test]
    async fn live_price_is_cached_within_ttl() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch()
            .times(1)
            .returning(|_, _| Ok(peninsula_samples(210.0)));

        let clock = Arc::new(ManualClock::at(t0()));
        let resolver = PriceResolver::new(
            Arc::new(feed),
            clock.clone(),
            ResolverParams::default(),
        );

        let first = resolver.resolve(Region::Madrid).await;
        assert_eq!(first.price_eur_kwh, 0.21);
        assert!(first.source_label.as_deref().unwrap().starts_with("PVPC"));

        clock.advance(Duration::minutes(30));
        let second = resolver.resolve(Region::Madrid).await;
        assert_eq!(second.price_eur_kwh, first.price_eur_kwh);
        assert_eq!(second.resolved_at, first.resolved_at);
    }

    #[tokio::test]
    async fn cache_expires_after_ttl() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch()
            .times(2)
            .returning(|_, _| Ok(peninsula_samples(210.0)));

        let clock = Arc::new(ManualClock::at(t0()));
        let resolver = PriceResolver::new(
            Arc::new(feed),
            clock.clone(),
            ResolverParams::default(),
        );

        let first = resolver.resolve(Region::Madrid).await;
        clock.advance(Duration::minutes(61));
        let second = resolver.resolve(Region::Madrid).await;
        assert!(second.resolved_at > first.resolved_at);
    }

    #[tokio::test]
    async fn feed_failure_falls_back_to_static_zone_price() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch()
            .times(2)
            .returning(|_, _| Err(anyhow::anyhow!("connection refused")));

        let clock = Arc::new(ManualClock::at(t0()));
        let resolver = PriceResolver::new(
            Arc::new(feed),
            clock.clone(),
            ResolverParams::default(),
        );

        // Two calls inside the TTL window: identical price, no source
        // label, and the fallback is never cached (the feed is hit twice).
        let first = resolver.resolve(Region::Canaries).await;
        let second = resolver.resolve(Region::Canaries).await;
        assert_eq!(first.price_eur_kwh, 0.18);
        assert_eq!(second.price_eur_kwh, 0.18);
        assert!(first.source_label.is_none());
        assert!(second.source_label.is_none());
    }

    #[tokio::test]
    async fn empty_feed_result_falls_back() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch().returning(|_, _| Ok(vec![]));

        let resolver = PriceResolver::new(
            Arc::new(feed),
            Arc::new(ManualClock::at(t0())),
            ResolverParams::default(),
        );

        let info = resolver.resolve(Region::Balears).await;
        assert_eq!(info.price_eur_kwh, 0.24);
        assert!(info.source_label.is_none());
    }

    #[tokio::test]
    async fn islands_resolve_through_their_own_geo_id() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch().returning(|_, _| {
            Ok(vec![
                PriceSample { geo_id: 8741, value: Some(210.0) },
                PriceSample { geo_id: 8743, value: Some(260.0) },
            ])
        });

        let resolver = PriceResolver::new(
            Arc::new(feed),
            Arc::new(ManualClock::at(t0())),
            ResolverParams::default(),
        );

        let info = resolver.resolve(Region::Balears).await;
        assert_eq!(info.price_eur_kwh, 0.26);
    }

    #[tokio::test]
    async fn unknown_region_uses_peninsula_pricing() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch()
            .returning(|_, _| Err(anyhow::anyhow!("down")));

        let resolver = PriceResolver::new(
            Arc::new(feed),
            Arc::new(ManualClock::at(t0())),
            ResolverParams::default(),
        );

        let info = resolver.resolve(Region::from_name("Narnia")).await;
        assert_eq!(info.price_eur_kwh, 0.21);
    }

    #[tokio::test]
    async fn effective_price_applies_the_tariff_factor() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch()
            .returning(|_, _| Ok(peninsula_samples(200.0)));

        let resolver = PriceResolver::new(
            Arc::new(feed),
            Arc::new(ManualClock::at(t0())),
            ResolverParams::default(),
        );

        let pvpc = resolver
            .effective_price(Region::Madrid, "PVPC (tarifa regulada)")
            .await;
        let fixed = resolver
            .effective_price(Region::Madrid, "Mercat lliure - Tarifa fixa (mitjana)")
            .await;
        assert!((pvpc - 0.20).abs() < 1e-9);
        assert!((fixed - 0.20 * 1.15).abs() < 1e-9);
    }

    #[tokio::test]
    async fn fetch_window_spans_yesterday_midnight_to_now() {
        let mut feed = MockPriceFeed::new();
        feed.expect_fetch()
            .withf(|start, end| {
                start.to_string() == "2025-06-14 00:00:00"
                    && end.to_string() == "2025-06-15 12:00:00"
            })
            .returning(|_, _| Ok(peninsula_samples(210.0)));

        let resolver = PriceResolver::new(
            Arc::new(feed),
            Arc::new(ManualClock::at(t0())),
            ResolverParams::default(),
        );
        resolver.resolve(Region::Madrid).await;
    }
}
