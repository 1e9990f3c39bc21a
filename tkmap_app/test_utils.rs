#[cfg(any(test, feature = "test-utils"))]
#[cfg(not(tarpaulin_include))]
pub mod tests {
    use async_trait::async_trait;
    use serde_json::{Map, Value, json};
    use std::{
        collections::{HashMap, VecDeque},
        sync::{Arc, Mutex},
    };

    use tkmap_types::errors::{ApplicationError, TransportError};

    use crate::transport::{CacheRequest, MapTransport, RegionRequest};

    /// In-memory stand-in for the game API.
    ///
    /// Region calls pop a queued result first. Otherwise they answer with the
    /// canned response, verbatim or (after `serve_world`) cut down to the
    /// regions the request asked for. Every request is recorded.
    #[derive(Default, Clone)]
    pub struct MockTransport {
        region_response: Arc<Mutex<Option<Value>>>,
        filter_regions: Arc<Mutex<bool>>,
        queued: Arc<Mutex<VecDeque<Result<Value, TransportError>>>>,
        cache: Arc<Mutex<HashMap<String, Value>>>,
        region_requests: Arc<Mutex<Vec<RegionRequest>>>,
        cache_requests: Arc<Mutex<Vec<CacheRequest>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer every region call with `response` as is.
        pub fn set_region_response(&self, response: Value) {
            *self.region_response.lock().unwrap() = Some(response);
            *self.filter_regions.lock().unwrap() = false;
        }

        /// Answer region calls like the server would: only requested regions
        /// of `response` are sent back.
        pub fn serve_world(&self, response: Value) {
            *self.region_response.lock().unwrap() = Some(response);
            *self.filter_regions.lock().unwrap() = true;
        }

        /// Answer for the next region call only.
        pub fn push_region_result(&self, result: Result<Value, TransportError>) {
            self.queued.lock().unwrap().push_back(result);
        }

        pub fn set_cache_entry(&self, name: &str, data: Value) {
            self.cache.lock().unwrap().insert(name.to_string(), data);
        }

        pub fn region_requests(&self) -> Vec<RegionRequest> {
            self.region_requests.lock().unwrap().clone()
        }

        pub fn cache_requests(&self) -> Vec<CacheRequest> {
            self.cache_requests.lock().unwrap().clone()
        }

        fn filtered_response(&self, request: &RegionRequest) -> Value {
            let Some(mut response) = self.region_response.lock().unwrap().clone() else {
                return json!({"response": {}});
            };
            if !*self.filter_regions.lock().unwrap() {
                return response;
            }
            let wanted: Vec<String> = request.region_ids().map(|id| id.to_string()).collect();

            if let Some(groups) = response.get_mut("response").and_then(Value::as_object_mut) {
                for group in groups.values_mut() {
                    if let Some(regions) = group.get_mut("region").and_then(Value::as_object_mut) {
                        let kept: Map<String, Value> = std::mem::take(regions)
                            .into_iter()
                            .filter(|(key, _)| wanted.contains(key))
                            .collect();
                        *regions = kept;
                    }
                }
            }
            response
        }
    }

    #[async_trait]
    impl MapTransport for MockTransport {
        async fn get_by_region_ids(&self, request: &RegionRequest) -> Result<Value, ApplicationError> {
            self.region_requests.lock().unwrap().push(request.clone());

            if let Some(result) = self.queued.lock().unwrap().pop_front() {
                return Ok(result?);
            }
            Ok(self.filtered_response(request))
        }

        async fn get_cache(&self, request: &CacheRequest) -> Result<Value, ApplicationError> {
            self.cache_requests.lock().unwrap().push(request.clone());

            let cache = self.cache.lock().unwrap();
            let mut entries = Vec::with_capacity(request.names.len());
            for name in &request.names {
                let data = cache
                    .get(name)
                    .cloned()
                    .ok_or_else(|| TransportError::Api(format!("unknown cache entry {name}")))?;
                entries.push(json!({"name": name, "data": data}));
            }
            Ok(json!({"cache": entries}))
        }
    }
}
