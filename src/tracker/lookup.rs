use super::{
    address::Address,
    state::{Outcome, ViewState},
};

/// First half of a submit: resets the error and validates the field.
/// Returns the address to look up, or `None` when the input was rejected.
pub fn begin(state: &mut ViewState, field: &str) -> Option<Address> {
    state.clear_error();
    match Address::parse(field) {
        Some(address) => Some(address),
        None => {
            debug!("rejected input {:?}", field);
            state.reject_input();
            None
        }
    }
}

/// Second half of a submit: lands a finished lookup on the view.
/// Called once per resolved request, in completion order.
pub fn complete(state: &mut ViewState, outcome: Outcome) {
    if let Outcome::Failed(message) = &outcome {
        debug!("lookup failed: {:?}", message);
    }
    state.apply(outcome);
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, time::Duration};

    use futures_util::{StreamExt, stream::FuturesUnordered};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tracker::{
        geolocation::{Geolocate, GeolocationClient},
        http_client::HttpClient,
        parser::IpifyParser,
        state::{INVALID_ADDRESS, LOOKUP_FAILED, LookupResult},
    };

    async fn submit<G: Geolocate>(state: &mut ViewState, geolocator: &G, field: &str) {
        if let Some(address) = begin(state, field) {
            let outcome = geolocator.locate(&address).await;
            complete(state, outcome);
        }
    }

    struct Scripted {
        outcome: Outcome,
        calls: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: RefCell::new(vec![]),
            }
        }
    }

    impl Geolocate for Scripted {
        async fn locate(&self, address: &Address) -> Outcome {
            self.calls.borrow_mut().push(address.to_string());
            self.outcome.clone()
        }
    }

    fn google() -> LookupResult {
        LookupResult {
            ip: "8.8.8.8".into(),
            isp: "Google".into(),
            region: "Mountain View".into(),
            timezone: "UTC-08:00".into(),
            lat: 37.4,
            lng: -122.1,
        }
    }

    fn body(ip: &str, city: &str) -> serde_json::Value {
        serde_json::json!({
            "ip": ip,
            "isp": "Example",
            "location": { "city": city, "timezone": "+01:00", "lat": 1.5, "lng": 2.5 }
        })
    }

    #[tokio::test]
    async fn invalid_input_makes_no_request() {
        let geolocator = Scripted::new(Outcome::Located(google()));
        let mut state = ViewState::default();

        for field in ["4.4.4", "4.4.4.4.4", "", "..."] {
            submit(&mut state, &geolocator, field).await;
            assert_eq!(state.error_message(), Some(INVALID_ADDRESS));
            assert_eq!(state.result(), &LookupResult::default());
        }
        assert!(geolocator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn success_replaces_result() {
        let geolocator = Scripted::new(Outcome::Located(google()));
        let mut state = ViewState::default();
        state.reject_input();

        submit(&mut state, &geolocator, "8.8.8.8").await;

        assert_eq!(state.result(), &google());
        assert_eq!(state.error_message(), None);
        assert_eq!(*geolocator.calls.borrow(), vec!["8.8.8.8".to_string()]);
    }

    #[tokio::test]
    async fn repeated_success_is_idempotent() {
        let geolocator = Scripted::new(Outcome::Located(google()));
        let mut once = ViewState::default();
        submit(&mut once, &geolocator, "8.8.8.8").await;

        let mut twice = ViewState::default();
        submit(&mut twice, &geolocator, "8.8.8.8").await;
        submit(&mut twice, &geolocator, "8.8.8.8").await;

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let mut state = ViewState::default();
        submit(&mut state, &Scripted::new(Outcome::Located(google())), "8.8.8.8").await;

        let failing = Scripted::new(Outcome::Failed("invalid IP address".into()));
        submit(&mut state, &failing, "999.999.999.999").await;

        assert_eq!(state.result(), &google());
        assert_eq!(state.error_message(), Some("invalid IP address"));
    }

    #[tokio::test]
    async fn new_submit_clears_previous_error() {
        let mut state = ViewState::default();
        submit(&mut state, &Scripted::new(Outcome::Failed(String::new())), "1.1.1.1").await;
        assert_eq!(state.error_message(), Some(LOOKUP_FAILED));

        submit(&mut state, &Scripted::new(Outcome::Located(google())), "8.8.8.8").await;
        assert_eq!(state.error_message(), None);
    }

    #[tokio::test]
    async fn api_rejection_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({ "messages": "invalid IP address" })),
            )
            .mount(&server)
            .await;
        let client = GeolocationClient::new(
            HttpClient::new().unwrap(),
            format!("{}/api/v2/country,city", server.uri()),
            "key".into(),
            IpifyParser,
        );

        let mut state = ViewState::default();
        submit(&mut state, &client, "4.4.4.4").await;

        assert_eq!(state.error_message(), Some("invalid IP address"));
        assert_eq!(state.result(), &LookupResult::default());
    }

    #[tokio::test]
    async fn unreadable_error_page_is_described() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;
        let client = GeolocationClient::new(
            HttpClient::new().unwrap(),
            format!("{}/api/v2/country,city", server.uri()),
            "key".into(),
            IpifyParser,
        );

        let mut state = ViewState::default();
        submit(&mut state, &client, "4.4.4.4").await;

        let message = state.error_message().unwrap();
        assert_ne!(message, LOOKUP_FAILED);
        assert!(message.starts_with("Malformed response body"));
        assert_eq!(state.result(), &LookupResult::default());
    }

    #[tokio::test]
    async fn connection_refused_sets_fallback() {
        let client = GeolocationClient::new(
            HttpClient::new().unwrap(),
            "http://127.0.0.1:9/api".into(),
            "key".into(),
            IpifyParser,
        );

        let mut state = ViewState::default();
        submit(&mut state, &client, "4.4.4.4").await;

        assert!(state.error_message().is_some_and(|m| !m.is_empty()));
        assert_eq!(state.result(), &LookupResult::default());
    }

    // Overlapping submits are not cancelled: whichever response arrives last
    // is what stays on screen, even if it answers the older submit.
    #[tokio::test]
    async fn slower_stale_response_overwrites_newer_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("ipAddress", "1.1.1.1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body("1.1.1.1", "Slow City"))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("ipAddress", "2.2.2.2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body("2.2.2.2", "Fast City")))
            .mount(&server)
            .await;
        let client = GeolocationClient::new(
            HttpClient::new().unwrap(),
            format!("{}/api/v2/country,city", server.uri()),
            "key".into(),
            IpifyParser,
        );

        let mut state = ViewState::default();
        let mut in_flight = FuturesUnordered::new();
        for field in ["1.1.1.1", "2.2.2.2"] {
            if let Some(address) = begin(&mut state, field) {
                let client = &client;
                in_flight.push(async move { client.locate(&address).await });
            }
        }

        let mut seen = vec![];
        while let Some(outcome) = in_flight.next().await {
            if let Outcome::Located(result) = &outcome {
                seen.push(result.region.clone());
            }
            complete(&mut state, outcome);
        }

        assert_eq!(seen, vec!["Fast City", "Slow City"]);
        assert_eq!(state.result().ip, "1.1.1.1");
    }
}
