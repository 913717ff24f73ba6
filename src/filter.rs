//! Condition filters for weir
//!
//! A condition filter is a pure predicate over an event, deciding whether the
//! event reaches a given output. Filters are shared read-only between the
//! output boxes that reference them and must be safe to invoke concurrently.
//!
//! The condition *expression language* lives outside this crate: the pipeline
//! builder accepts a filter-builder collaborator that turns the reserved `if`
//! config key into a filter (see
//! [`PipelineBuilder::filter_builder`](crate::pipeline::PipelineBuilder::filter_builder)).

use crate::event::Event;

/// Condition filter trait - a pure predicate over an event
pub trait ConditionFilter: Send + Sync {
    /// Whether `event` should reach the output guarded by this filter
    fn pass(&self, event: &Event) -> bool;
}

/// Filter that passes every event
///
/// This is what an output gets when its config block carries no condition.
pub struct AlwaysPass;

impl ConditionFilter for AlwaysPass {
    fn pass(&self, _event: &Event) -> bool {
        true
    }
}

/// Predicate-backed filter
///
/// # Example
///
/// ```
/// use weir::filter::{ConditionFilter, FnFilter};
///
/// let filter = FnFilter::new(|event| event.contains_key("level"));
/// assert!(!filter.pass(&weir::event::Event::new()));
/// ```
pub struct FnFilter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    predicate: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    /// Create a filter from the given predicate
    ///
    /// Events for which the predicate returns `true` pass through.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> ConditionFilter for FnFilter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn pass(&self, event: &Event) -> bool {
        (self.predicate)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::text_event;

    #[test]
    fn test_always_pass() {
        assert!(AlwaysPass.pass(&Event::new()));
        assert!(AlwaysPass.pass(&text_event("anything")));
    }

    #[test]
    fn test_fn_filter() {
        let filter = FnFilter::new(|event: &Event| {
            event
                .get("level")
                .and_then(|v| v.as_str())
                .map(|level| level == "error")
                .unwrap_or(false)
        });

        let mut event = Event::new();
        event.insert("level".into(), "error".into());
        assert!(filter.pass(&event));

        event.insert("level".into(), "info".into());
        assert!(!filter.pass(&event));

        assert!(!filter.pass(&Event::new()));
    }
}
