// tests/limiter/refill_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use std::thread;
    use std::time::Duration;
    use token_bucket_limiter::{TokenBucketConfig, TokenBucketLimiter};

    fn limiter(permits_per_second: u64, clock: &TestClock) -> TokenBucketLimiter<TestClock> {
        TokenBucketLimiter::with_config(TokenBucketConfig::new(permits_per_second), clock.clone())
            .unwrap()
    }

    #[test]
    fn full_bucket_allows_burst_then_denies() {
        let clock = TestClock::new();
        let limiter = limiter(8, &clock);

        for _ in 0..8 {
            assert!(limiter.acquire());
        }
        assert!(!limiter.acquire());
    }

    #[test]
    fn one_interval_after_denial_regenerates_one_permit() {
        let clock = TestClock::new();
        let limiter = limiter(4, &clock); // 250ms interval

        for _ in 0..4 {
            assert!(limiter.acquire());
        }
        assert!(!limiter.acquire());

        clock.advance_nanos(250_000_001);
        assert!(limiter.acquire());
        assert!(!limiter.acquire());
    }

    #[test]
    fn capacity_five_scenario() {
        let clock = TestClock::new();
        let limiter = limiter(5, &clock);

        let burst: Vec<bool> = (0..5).map(|_| limiter.acquire()).collect();
        assert_eq!(burst, vec![true; 5]);
        assert!(!limiter.acquire());

        clock.advance_millis(201);
        assert!(limiter.acquire());
        assert!(!limiter.acquire());
    }

    #[test]
    fn capacity_five_scenario_with_real_clock() {
        let limiter = TokenBucketLimiter::new(5).unwrap();

        let burst: Vec<bool> = (0..5).map(|_| limiter.acquire()).collect();
        assert_eq!(burst, vec![true; 5]);
        assert!(!limiter.acquire());

        thread::sleep(Duration::from_millis(200));
        assert!(limiter.acquire());
        assert!(!limiter.acquire());
    }

    #[test]
    fn fractional_remainder_carries_forward() {
        let clock = TestClock::new();
        let limiter = limiter(5, &clock); // 200ms interval

        for _ in 0..5 {
            assert!(limiter.acquire());
        }

        // t=300ms: one permit, timestamp advanced to 200ms (100ms carried)
        clock.advance_millis(300);
        assert!(limiter.acquire());
        assert_eq!(limiter.last_refill_nanos(), 200_000_000);
        assert!(!limiter.acquire());

        // t=450ms: 250ms since the carried timestamp, so another permit is due
        clock.advance_millis(150);
        assert!(limiter.acquire());
        assert_eq!(limiter.last_refill_nanos(), 400_000_000);
        assert!(!limiter.acquire());
    }

    #[test]
    fn saturation_resets_timestamp_to_now() {
        let clock = TestClock::new();
        let limiter = limiter(5, &clock);
        assert!(limiter.acquire());

        clock.advance_millis(5_030);
        assert!(limiter.acquire());
        assert_eq!(limiter.last_refill_nanos(), clock.now_nanos());
        assert_eq!(limiter.available_permits(), 4);

        // no stale remainder: 190ms after the reset nothing is due yet
        clock.advance_millis(190);
        for _ in 0..4 {
            assert!(limiter.acquire());
        }
        assert!(!limiter.acquire());
    }

    #[test]
    fn long_idle_never_overfills() {
        let clock = TestClock::new();
        let limiter = limiter(3, &clock);
        assert!(limiter.acquire());

        clock.advance_millis(60 * 60 * 1_000);
        for _ in 0..3 {
            assert!(limiter.acquire());
        }
        assert!(!limiter.acquire());
        assert_eq!(limiter.available_permits(), 0);
    }

    #[test]
    fn timestamp_never_moves_backward() {
        let clock = TestClock::new();
        clock.set_millis(1_000);
        let limiter = limiter(5, &clock);
        for _ in 0..5 {
            assert!(limiter.acquire());
        }

        clock.set_millis(1_450);
        assert!(limiter.acquire());
        assert!(limiter.acquire());
        let after_refill = limiter.last_refill_nanos();
        assert_eq!(after_refill, 1_400_000_000);

        // a clock reading from the past grants nothing and leaves the timestamp alone
        clock.set_millis(100);
        assert!(!limiter.acquire());
        assert_eq!(limiter.last_refill_nanos(), after_refill);
    }
}
