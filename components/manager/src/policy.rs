use syfilter_client::FilterBuilder;
use syfilter_common::DEFAULT_EVENT_TYPES;

use crate::category::RequestCategory;

pub type FilterPolicyRef = std::sync::Arc<dyn FilterPolicy>;

/// Decides what the filter of each request category contains.
pub trait FilterPolicy: Send + Sync + 'static {
    fn apply(&self, category: RequestCategory, builder: &mut FilterBuilder);
}

impl<F> FilterPolicy for F
where
    F: Fn(RequestCategory, &mut FilterBuilder) + Send + Sync + 'static,
{
    fn apply(&self, category: RequestCategory, builder: &mut FilterBuilder) {
        self(category, builder)
    }
}

/// Gives every category the same event type patterns.
#[derive(Debug, Clone)]
pub struct UniformPolicy {
    event_types: Vec<String>,
}

impl UniformPolicy {
    pub fn new<I, S>(event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            event_types: event_types.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for UniformPolicy {
    fn default() -> Self { Self::new([DEFAULT_EVENT_TYPES]) }
}

impl FilterPolicy for UniformPolicy {
    fn apply(&self, category: RequestCategory, builder: &mut FilterBuilder) {
        // sync and scrollback share one shape for now
        match category {
            RequestCategory::Sync | RequestCategory::Scrollback => {
                for t in &self.event_types {
                    builder.include_types(t);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_default() {
        let policy = UniformPolicy::default();
        for c in RequestCategory::all() {
            let mut b = FilterBuilder::default();
            policy.apply(c, &mut b);
            assert_eq!(b.build().types, Some(vec!["m.*".to_string()]));
        }
    }

    #[test]
    fn closure_policy_diverges() {
        let policy = |c: RequestCategory, b: &mut FilterBuilder| {
            b.include_types("m.*");
            if c == RequestCategory::Scrollback {
                b.limit(50);
            }
        };
        let mut sync = FilterBuilder::default();
        policy.apply(RequestCategory::Sync, &mut sync);
        let mut scrollback = FilterBuilder::default();
        policy.apply(RequestCategory::Scrollback, &mut scrollback);
        assert_eq!(sync.build().limit, None);
        assert_eq!(scrollback.build().limit, Some(50));
    }
}
