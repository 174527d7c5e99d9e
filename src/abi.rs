//! Contract surface description
//!
//! Declares the methods a bound contract exposes, split by read and
//! write capability, plus the events it emits. Bindings validate every
//! method name against this surface before anything goes over the wire,
//! so a typo fails locally instead of as an opaque node error.

/// Declared surface of a chain contract
///
/// Method names are compared exactly (contract ABIs are case-sensitive).
#[derive(Clone, Debug)]
pub struct ContractInterface {
    reads: Vec<String>,
    writes: Vec<String>,
    events: Vec<String>,
}

impl ContractInterface {
    /// Describe a contract surface from its method and event names
    pub fn new(
        reads: Vec<String>,
        writes: Vec<String>,
        events: Vec<String>,
    ) -> Self {
        Self {
            reads,
            writes,
            events,
        }
    }

    /// The LostAndFound contract surface
    ///
    /// Three reads, four writes, two events. This is the canonical
    /// reward-bearing deployment; older reward-less deployments are a
    /// strict subset and still satisfy the read surface.
    pub fn lost_and_found() -> Self {
        Self::new(
            vec![
                "getItemCount".to_string(),
                "getLostItem".to_string(),
                "getUserNotifications".to_string(),
            ],
            vec![
                "reportLostItem".to_string(),
                "markItemAsFound".to_string(),
                "markNotificationAsRead".to_string(),
                "claimReward".to_string(),
            ],
            vec!["ItemFound".to_string(), "NotificationCreated".to_string()],
        )
    }

    /// Whether `method` is a declared read
    pub fn declares_read(&self, method: &str) -> bool {
        self.reads.iter().any(|m| m == method)
    }

    /// Whether `method` is a declared write
    pub fn declares_write(&self, method: &str) -> bool {
        self.writes.iter().any(|m| m == method)
    }

    /// Whether `name` is a declared event
    pub fn declares_event(&self, name: &str) -> bool {
        self.events.iter().any(|e| e == name)
    }

    pub fn reads(&self) -> &[String] {
        &self.reads
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_and_found_surface() {
        let interface = ContractInterface::lost_and_found();

        assert!(interface.declares_read("getItemCount"));
        assert!(interface.declares_read("getLostItem"));
        assert!(interface.declares_read("getUserNotifications"));

        assert!(interface.declares_write("reportLostItem"));
        assert!(interface.declares_write("markItemAsFound"));
        assert!(interface.declares_write("markNotificationAsRead"));
        assert!(interface.declares_write("claimReward"));

        assert!(interface.declares_event("ItemFound"));
        assert!(interface.declares_event("NotificationCreated"));
    }

    #[test]
    fn test_reads_and_writes_do_not_cross() {
        let interface = ContractInterface::lost_and_found();
        assert!(!interface.declares_write("getItemCount"));
        assert!(!interface.declares_read("claimReward"));
    }

    #[test]
    fn test_method_names_are_case_sensitive() {
        let interface = ContractInterface::lost_and_found();
        assert!(!interface.declares_read("getitemcount"));
        assert!(!interface.declares_write("ClaimReward"));
    }
}
