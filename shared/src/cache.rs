//! Time-boxed memoisation with an injectable clock

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use crate::models::WeatherObservation;
use crate::providers::WeatherProvider;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and replays
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Expiry-checked map. Entries are replaced on refresh and never evicted, so
/// it suits small key sets such as queried locations.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: HashMap<K, (DateTime<Utc>, V)>,
}

impl<K: Eq + Hash, V: Clone, C: Clock> TtlCache<K, V, C> {
    pub fn new(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A value stored less than `ttl` ago
    pub fn get(&self, key: &K) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        if self.clock.now() - *stored_at < self.ttl {
            Some(value.clone())
        } else {
            None
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let now = self.clock.now();
        self.entries.insert(key, (now, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Weather provider that reuses observations for a fixed time-to-live.
///
/// Absent observations are not cached, so the next call retries the source.
pub struct CachedWeatherProvider<P, C = SystemClock> {
    inner: P,
    cache: Mutex<TtlCache<String, WeatherObservation, C>>,
}

impl<P: WeatherProvider> CachedWeatherProvider<P, SystemClock> {
    pub const DEFAULT_TTL_SECONDS: i64 = 3600;

    pub fn new(inner: P) -> Self {
        Self::with_clock(inner, Duration::seconds(Self::DEFAULT_TTL_SECONDS), SystemClock)
    }
}

impl<P: WeatherProvider, C: Clock> CachedWeatherProvider<P, C> {
    pub fn with_clock(inner: P, ttl: Duration, clock: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(TtlCache::new(ttl, clock)),
        }
    }
}

impl<P: WeatherProvider, C: Clock> WeatherProvider for CachedWeatherProvider<P, C> {
    fn current_weather(&self, location: &str) -> Option<WeatherObservation> {
        let key = location.trim().to_lowercase();
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                tracing::debug!(location = %location, "Weather cache hit");
                return Some(hit);
            }
        }

        let fresh = self.inner.current_weather(location)?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, fresh.clone());
        }
        Some(fresh)
    }
}
