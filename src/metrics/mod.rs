use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated across layout and render calls.
#[derive(Debug, Default, Clone)]
pub struct PlanMetrics {
    layouts_built: u64,
    layout_failures: u64,
    doors_resolved: u64,
    doors_skipped: u64,
    renders: u64,
    render_failures: u64,
    draw_ops: u64,
}

impl PlanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_layout(&mut self, doors: usize, skipped: usize) {
        self.layouts_built = self.layouts_built.saturating_add(1);
        self.doors_resolved = self.doors_resolved.saturating_add(doors as u64);
        self.doors_skipped = self.doors_skipped.saturating_add(skipped as u64);
    }

    pub fn record_layout_failure(&mut self) {
        self.layout_failures = self.layout_failures.saturating_add(1);
    }

    pub fn record_render(&mut self, op_count: usize) {
        self.renders = self.renders.saturating_add(1);
        self.draw_ops = self.draw_ops.saturating_add(op_count as u64);
    }

    pub fn record_render_failure(&mut self) {
        self.render_failures = self.render_failures.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            layouts_built: self.layouts_built,
            layout_failures: self.layout_failures,
            doors_resolved: self.doors_resolved,
            doors_skipped: self.doors_skipped,
            renders: self.renders,
            render_failures: self.render_failures,
            draw_ops: self.draw_ops,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub layouts_built: u64,
    pub layout_failures: u64,
    pub doors_resolved: u64,
    pub doors_skipped: u64,
    pub renders: u64,
    pub render_failures: u64,
    pub draw_ops: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "plan_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("layouts_built".to_string(), json!(self.layouts_built));
        map.insert("layout_failures".to_string(), json!(self.layout_failures));
        map.insert("doors_resolved".to_string(), json!(self.doors_resolved));
        map.insert("doors_skipped".to_string(), json!(self.doors_skipped));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("render_failures".to_string(), json!(self.render_failures));
        map.insert("draw_ops".to_string(), json!(self.draw_ops));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let mut metrics = PlanMetrics::new();
        metrics.record_layout(6, 1);
        metrics.record_layout_failure();
        metrics.record_render(40);
        metrics.record_render(40);
        metrics.record_render_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.layouts_built, 1);
        assert_eq!(snapshot.doors_resolved, 6);
        assert_eq!(snapshot.doors_skipped, 1);
        assert_eq!(snapshot.renders, 2);
        assert_eq!(snapshot.draw_ops, 80);

        let event = snapshot.to_log_event("floorplan::metrics");
        assert_eq!(event.message, "plan_metrics");
        assert_eq!(event.field("render_failures"), Some(&json!(1)));
    }
}
