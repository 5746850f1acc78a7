use crossdoc_channel::{Endpoint, Envelope};

/// A value broadcast into an execution context, together with the channel
/// endpoints transferred along with it.
pub struct BroadcastEvent {
    data: Envelope,
    endpoints: Vec<Endpoint>,
}

impl BroadcastEvent {
    /// Build an event carrying `data` and the given transfer list.
    pub fn new(data: Envelope, endpoints: Vec<Endpoint>) -> Self {
        Self { data, endpoints }
    }

    /// The posted value. Listeners may read it but the connectors never
    /// interpret it.
    pub fn data(&self) -> &Envelope {
        &self.data
    }

    /// Take ownership of the first remaining transferred endpoint.
    ///
    /// Each endpoint can be taken exactly once; later callers see the rest of
    /// the transfer list, then `None`.
    pub fn take_endpoint(&mut self) -> Option<Endpoint> {
        if self.endpoints.is_empty() {
            None
        } else {
            Some(self.endpoints.remove(0))
        }
    }

    /// Whether any transferred endpoints remain unclaimed.
    pub fn has_endpoints(&self) -> bool {
        !self.endpoints.is_empty()
    }
}

impl std::fmt::Debug for BroadcastEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastEvent")
            .field("data", &self.data)
            .field("endpoints", &self.endpoints.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crossdoc_queue::Scheduler;
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoints_are_taken_in_transfer_order_and_once() {
        let scheduler = Scheduler::new();
        let (first, _keep_first) = Endpoint::pair(&scheduler);
        let (second, _keep_second) = Endpoint::pair(&scheduler);

        let mut event = BroadcastEvent::new(json!("connect"), vec![first, second]);
        assert!(event.has_endpoints());

        assert!(event.take_endpoint().is_some());
        assert!(event.take_endpoint().is_some());
        assert!(event.take_endpoint().is_none());
        assert!(!event.has_endpoints());
    }

    #[test]
    fn data_is_readable_without_consuming() {
        let event = BroadcastEvent::new(json!("connect"), Vec::new());
        assert_eq!(event.data(), &json!("connect"));
        assert!(!event.has_endpoints());
    }
}
