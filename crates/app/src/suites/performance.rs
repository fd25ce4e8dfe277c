//! Latency, concurrency and throughput.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use apiprobe_application::TestDataManager;
use apiprobe_domain::{Headers, RequestSpec, Service, Tag, TestMeta};
use apiprobe_infrastructure::testing::assertions::{assert_response_time, assert_status_code};
use futures::{StreamExt, stream};
use serde_json::json;
use tokio::time::Instant;

use super::{CaseFuture, SuiteContext, TestCase, ensure};

const CONCURRENT_REQUESTS: usize = 10;
const CONCURRENT_CEILING: Duration = Duration::from_secs(3);

const PAGES: [u32; 3] = [1, 2, 5];
const PAGE_SIZE: u32 = 20;
const PAGE_VARIATION: f64 = 1.5;

const STRESS_REQUESTS: u32 = 50;
const STRESS_WORKERS: usize = 5;
const STRESS_PACING: Duration = Duration::from_millis(600);
const STRESS_PAYLOAD_LEN: usize = 1000;
const STRESS_MIN_SUCCESS_RATE: f64 = 95.0;
const STRESS_MAX_AVG_MS: f64 = 5000.0;

pub(super) fn cases() -> Vec<TestCase> {
    let perf = |id: &str, title: &str| TestMeta::new(id, title).tagged(Tag::Performance);
    vec![
        TestCase::new(
            perf("TC_PERF_001", "Response time validation"),
            Service::FakeRest,
            response_time_validation,
        ),
        TestCase::new(
            perf("TC_PERF_002", "Concurrent request handling"),
            Service::Echo,
            concurrent_requests,
        ),
        TestCase::new(
            perf("TC_PERF_003", "Pagination performance"),
            Service::FakeRest,
            pagination_performance,
        ),
        TestCase::new(
            perf("TC_PERF_004", "Stress test"),
            Service::Echo,
            stress_test,
        ),
    ]
}

fn response_time_validation<'a>(
    ctx: &'a SuiteContext,
    data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let single = "TC_PERF_001_single";
        let response = ctx
            .client
            .get(ctx.url(Service::FakeRest, "posts/1"), Headers::new(), single)
            .await?;
        assert_status_code(&response, 200, Some(single))?;
        assert_response_time(&response, 500, Some(single))?;

        let collection = "TC_PERF_001_collection";
        let response = ctx
            .client
            .get(ctx.url(Service::FakeRest, "posts"), Headers::new(), collection)
            .await?;
        assert_status_code(&response, 200, Some(collection))?;
        assert_response_time(&response, 1000, Some(collection))?;

        let create = "TC_PERF_001_post";
        let post = data.generate_post_data(serde_json::Map::new());
        let response = ctx
            .client
            .post(ctx.url(Service::FakeRest, "posts"), post, Headers::new(), create)
            .await?;
        assert_status_code(&response, 201, Some(create))?;
        assert_response_time(&response, 1000, Some(create))?;
        Ok(())
    })
}

fn concurrent_requests<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_PERF_002";
        let url = ctx.url(Service::Echo, "delay/1");

        let started = Instant::now();
        let responses: Vec<_> = stream::iter(0..CONCURRENT_REQUESTS)
            .map(|_| ctx.client.get(url.clone(), Headers::new(), tc))
            .buffer_unordered(CONCURRENT_REQUESTS)
            .collect()
            .await;
        let total = started.elapsed();

        ensure(responses.len() == CONCURRENT_REQUESTS, || {
            format!("{tc} - Expected {CONCURRENT_REQUESTS} responses")
        })?;
        for response in responses {
            assert_status_code(&response?, 200, Some(tc))?;
        }
        ensure(total < CONCURRENT_CEILING, || {
            format!(
                "{tc} - Concurrent requests took too long: {:.2}s",
                total.as_secs_f64()
            )
        })
    })
}

fn pagination_performance<'a>(
    ctx: &'a SuiteContext,
    _data: &'a mut TestDataManager,
) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_PERF_003";
        let mut times = Vec::with_capacity(PAGES.len());

        for page in PAGES {
            let page_case = format!("{tc}_page_{page}");
            let request = RequestSpec::get(ctx.url(Service::FakeRest, "posts"))
                .with_query("_page", page.to_string())
                .with_query("_limit", PAGE_SIZE.to_string())
                .with_test_case(&page_case);

            let response = ctx.client.request(&request).await?;
            assert_status_code(&response, 200, Some(&page_case))?;
            times.push(response.elapsed_ms());
        }

        let max = times.iter().copied().fold(f64::MIN, f64::max);
        let min = times.iter().copied().fold(f64::MAX, f64::min);
        ensure(max <= min * PAGE_VARIATION, || {
            format!("{tc} - Performance degradation detected. Times: {times:?}")
        })
    })
}

fn stress_test<'a>(ctx: &'a SuiteContext, data: &'a mut TestDataManager) -> CaseFuture<'a> {
    Box::pin(async move {
        let tc = "TC_PERF_004";
        let url = ctx.url(Service::Echo, "post");
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64());
        let payload = json!({
            "data": data.generate_long_string(STRESS_PAYLOAD_LEN),
            "timestamp": timestamp
        });

        // Request i is released at start + i * pacing, at most STRESS_WORKERS in flight.
        let start = Instant::now();
        let outcomes: Vec<Option<f64>> = stream::iter(0..STRESS_REQUESTS)
            .map(|i| {
                let url = url.clone();
                let payload = payload.clone();
                async move {
                    tokio::time::sleep_until(start + STRESS_PACING * i).await;
                    match ctx.client.post(url, payload, Headers::new(), tc).await {
                        Ok(response) if response.status == 200 => Some(response.elapsed_ms()),
                        Ok(response) => {
                            tracing::warn!(
                                test_case = tc,
                                status = response.status,
                                "Stress request rejected"
                            );
                            None
                        }
                        Err(error) => {
                            tracing::warn!(test_case = tc, %error, "Stress request failed");
                            None
                        }
                    }
                }
            })
            .buffer_unordered(STRESS_WORKERS)
            .collect()
            .await;

        let times: Vec<f64> = outcomes.iter().flatten().copied().collect();
        #[allow(clippy::cast_precision_loss)]
        let success_rate = if outcomes.is_empty() {
            0.0
        } else {
            times.len() as f64 / outcomes.len() as f64 * 100.0
        };

        ensure(success_rate >= STRESS_MIN_SUCCESS_RATE, || {
            format!(
                "{tc} - Success rate {success_rate:.1}% below {STRESS_MIN_SUCCESS_RATE}% threshold"
            )
        })?;

        if !times.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let average = times.iter().sum::<f64>() / times.len() as f64;
            ensure(average <= STRESS_MAX_AVG_MS, || {
                format!("{tc} - Average response time {average:.2}ms too high")
            })?;
        }
        Ok(())
    })
}
