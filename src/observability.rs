use biometrics::{Collector, Counter, Moments};

pub(crate) static QUERY_REQUESTS: Counter = Counter::new("healthchat.client.query_requests");
pub(crate) static QUERY_ERRORS: Counter = Counter::new("healthchat.client.query_errors");
pub(crate) static QUERY_DURATION: Moments =
    Moments::new("healthchat.client.query_duration_seconds");

pub(crate) static STATS_REQUESTS: Counter = Counter::new("healthchat.client.stats_requests");
pub(crate) static STATS_ERRORS: Counter = Counter::new("healthchat.client.stats_errors");
pub(crate) static STATS_DURATION: Moments =
    Moments::new("healthchat.client.stats_duration_seconds");

pub(crate) static HISTORY_REQUESTS: Counter = Counter::new("healthchat.client.history_requests");
pub(crate) static PING_REQUESTS: Counter = Counter::new("healthchat.client.ping_requests");

pub(crate) static SUBMISSIONS_ACCEPTED: Counter =
    Counter::new("healthchat.session.submissions_accepted");
pub(crate) static SUBMISSIONS_REJECTED: Counter =
    Counter::new("healthchat.session.submissions_rejected");
pub(crate) static SUBMISSIONS_FAILED: Counter =
    Counter::new("healthchat.session.submissions_failed");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&QUERY_REQUESTS);
    collector.register_counter(&QUERY_ERRORS);
    collector.register_moments(&QUERY_DURATION);

    collector.register_counter(&STATS_REQUESTS);
    collector.register_counter(&STATS_ERRORS);
    collector.register_moments(&STATS_DURATION);

    collector.register_counter(&HISTORY_REQUESTS);
    collector.register_counter(&PING_REQUESTS);

    collector.register_counter(&SUBMISSIONS_ACCEPTED);
    collector.register_counter(&SUBMISSIONS_REJECTED);
    collector.register_counter(&SUBMISSIONS_FAILED);
}
