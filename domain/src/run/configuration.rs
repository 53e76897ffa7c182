//! Run configuration entity

use crate::run::workload::WorkloadArgs;
use crate::service::endpoint::EndpointPair;
use crate::service::spec::ServiceSpec;
use crate::strategy::evaluation::EvaluationStrategy;
use crate::version::build_tag::BuildTag;
use serde::{Deserialize, Serialize};

/// Everything one run needs, resolved up front and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    workload: WorkloadArgs,
    strategy: EvaluationStrategy,
    seed: u64,
    other_tag: BuildTag,
    endpoints: EndpointPair,
}

impl RunConfiguration {
    pub fn new(
        workload: WorkloadArgs,
        strategy: EvaluationStrategy,
        seed: u64,
        other_tag: BuildTag,
        endpoints: EndpointPair,
    ) -> Self {
        Self {
            workload,
            strategy,
            seed,
            other_tag,
            endpoints,
        }
    }

    pub fn workload(&self) -> &WorkloadArgs {
        &self.workload
    }

    pub fn strategy(&self) -> EvaluationStrategy {
        self.strategy
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn other_tag(&self) -> &BuildTag {
        &self.other_tag
    }

    pub fn endpoints(&self) -> &EndpointPair {
        &self.endpoints
    }

    /// Override specs for both instances, "this" first.
    pub fn service_specs(&self, image_repository: &str) -> Vec<ServiceSpec> {
        vec![
            ServiceSpec::local(self.endpoints.this.clone()),
            ServiceSpec::from_image(
                self.endpoints.other.clone(),
                self.other_tag.image(image_repository),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::endpoint::EndpointLayout;

    fn config() -> RunConfiguration {
        RunConfiguration::new(
            WorkloadArgs::default(),
            EvaluationStrategy::Sequential,
            42,
            BuildTag::Release("1.4.0".parse().unwrap()),
            EndpointLayout::default().assign().unwrap(),
        )
    }

    #[test]
    fn test_service_specs() {
        let specs = config().service_specs("materialize/materialized");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name(), "mz_this");
        assert!(specs[0].image.is_none());
        assert_eq!(specs[1].name(), "mz_other");
        assert_eq!(
            specs[1].image.as_deref(),
            Some("materialize/materialized:v1.4.0")
        );
    }

    #[test]
    fn test_serializes_for_run_log() {
        let json = serde_json::to_value(config()).unwrap();
        assert_eq!(json["strategy"], "sequential");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["endpoints"]["other"]["host_port"], 16875);
    }
}
