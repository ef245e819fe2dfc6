mod asset_status;
mod financial_news;
mod news;
mod social;

pub use asset_status::AssetStatusSource;
pub use financial_news::FinancialNewsSource;
pub use news::NewsSearchSource;
pub use social::{SocialSearchSource, MAX_MAX_RESULTS, MIN_MAX_RESULTS};

#[cfg(test)]
pub(crate) mod test_support {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

    /// Replays one canned outcome and records every request it receives.
    #[derive(Debug)]
    pub struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        pub fn replying(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse::new(status, body)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(HttpError::new(message)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }
}
