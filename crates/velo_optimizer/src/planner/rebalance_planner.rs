use futures::future::join_all;
use tracing::{info, instrument};
use velo_samplers::sampler::Sampler;

use crate::{
    error::RebalanceError,
    planner::{
        depot::Depot,
        planner_params::{LagrangeStrategy, PlannerParams, TagSource},
        rebalance_plan::{Dispatch, RebalancePlan},
    },
    qubo::qubo_builder,
    route::route_decoder::RouteDecoder,
    solver::qubo_solver::QuboSolver,
    threshold::threshold_analyzer::ThresholdAnalyzer,
};

/// Runs threshold analysis, QUBO construction, sampling and decoding for
/// depots.
pub struct RebalancePlanner<S> {
    analyzer: ThresholdAnalyzer,
    lagrange: LagrangeStrategy,
    tagging: TagSource,
    solver: QuboSolver<S>,
    decoder: RouteDecoder,
}

impl<S: Sampler> RebalancePlanner<S> {
    pub fn new(sampler: S, params: PlannerParams) -> Self {
        RebalancePlanner {
            analyzer: ThresholdAnalyzer::new(params.thresholds),
            lagrange: params.lagrange,
            tagging: params.tagging,
            solver: QuboSolver::new(sampler, params.solver),
            decoder: RouteDecoder::new(params.conflict_policy),
        }
    }

    /// Plans a dispatch for one depot. The sampler is not called when every
    /// station is within thresholds.
    #[instrument(skip_all, fields(depot = depot.id().unwrap_or_default()))]
    pub async fn plan(&self, depot: &Depot) -> Result<RebalancePlan, RebalanceError> {
        let report = self.analyzer.analyze(depot.snapshot())?;
        if !report.violated {
            info!("No rebalancing required");
            return Ok(RebalancePlan::NotRequired);
        }

        let graph = self.tagging.apply(depot.graph(), &report.needs);
        let lagrange = self.lagrange.resolve(&graph);
        let (qubo, offset) = qubo_builder::build(&graph, lagrange)?;

        let solution = self.solver.solve(&qubo, offset).await?;
        let route = self
            .decoder
            .decode(&solution.sample, graph.len(), depot.canonical_start())?;
        let travel_cost = route.travel_cost(&graph)?;

        info!(
            stations = route.len(),
            travel_cost,
            energy = solution.energy,
            "Planned dispatch"
        );

        Ok(RebalancePlan::Dispatch(Dispatch {
            target: report.target,
            needs: report.needs,
            route: route.station_ids(&graph).cloned().collect(),
            energy: solution.energy,
            travel_cost,
        }))
    }

    /// Plans every depot concurrently. A failing depot does not stop the
    /// others; results come back in input order.
    pub async fn plan_all(&self, depots: &[Depot]) -> Vec<Result<RebalancePlan, RebalanceError>> {
        join_all(depots.iter().map(|depot| self.plan(depot))).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use velo_samplers::{
        error::SamplerError, exhaustive::ExhaustiveSampler, sample_request::SampleRequest,
        sample_set::SampleSet,
    };

    use crate::{
        error::ErrorKind,
        problem::station::{StationId, StationTag},
        solver::solver_params::SolverParams,
        test_utils,
        threshold::bike_count_snapshot::BikeCountSnapshot,
    };

    use super::*;

    #[derive(Default)]
    struct CountingSampler {
        calls: AtomicUsize,
    }

    impl Sampler for CountingSampler {
        async fn sample(&self, request: SampleRequest) -> Result<SampleSet, SamplerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ExhaustiveSampler::default().sample(request).await
        }
    }

    fn snapshot(counts: &[(i64, u32)]) -> BikeCountSnapshot {
        counts
            .iter()
            .map(|&(id, count)| (StationId::Number(id), count))
            .collect()
    }

    fn params() -> PlannerParams {
        PlannerParams {
            lagrange: LagrangeStrategy::Fixed(4000.0),
            solver: SolverParams {
                num_reads: 1,
                ..SolverParams::default()
            },
            ..PlannerParams::default()
        }
    }

    #[tokio::test]
    async fn test_no_violation_skips_sampler() {
        let depot = Depot::new(
            test_utils::create_reference_graph(),
            snapshot(&[(0, 8), (1, 10), (2, 5), (3, 15)]),
        )
        .unwrap();
        let planner = RebalancePlanner::new(CountingSampler::default(), params());

        let plan = planner.plan(&depot).await.unwrap();

        assert_eq!(plan, RebalancePlan::NotRequired);
        assert_eq!(planner.solver.sampler().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_plan_dispatch() {
        // Target is 10: stations 1 and 2 hold a surplus, 3 is empty and 0
        // is balanced.
        let depot = Depot::new(
            test_utils::create_reference_graph(),
            snapshot(&[(0, 10), (1, 18), (2, 12), (3, 0)]),
        )
        .unwrap();
        let planner = RebalancePlanner::new(CountingSampler::default(), params());

        let plan = planner.plan(&depot).await.unwrap();
        let dispatch = plan.dispatch().unwrap();

        assert_eq!(dispatch.target, Some(10));
        assert_eq!(dispatch.needs.get(&StationId::Number(3)), Some(10));
        assert_eq!(
            dispatch.route,
            vec![
                StationId::Number(2),
                StationId::Number(1),
                StationId::Number(0),
                StationId::Number(3)
            ]
        );
        assert_eq!(dispatch.travel_cost, 20.0);
        assert_eq!(dispatch.energy, 1020.0);
        assert_eq!(planner.solver.sampler().calls.load(Ordering::SeqCst), 1);
    }

    async fn plan_with_tagging(tagging: TagSource) -> Dispatch {
        // Station 0 is explicitly a demand station and 3 a supply station,
        // the counts say the opposite about 3.
        let graph = test_utils::create_tagged_graph([
            StationTag::Demand(5),
            StationTag::Neutral,
            StationTag::Neutral,
            StationTag::Supply(5),
        ]);
        let depot = Depot::new(graph, snapshot(&[(0, 10), (1, 18), (2, 12), (3, 0)])).unwrap();
        let planner = RebalancePlanner::new(
            CountingSampler::default(),
            PlannerParams {
                tagging,
                ..params()
            },
        );

        let plan = planner.plan(&depot).await.unwrap();
        plan.dispatch().unwrap().clone()
    }

    #[tokio::test]
    async fn test_tagging_from_needs_overrides_explicit_tags() {
        let dispatch = plan_with_tagging(TagSource::Needs).await;

        assert_eq!(
            dispatch.route,
            vec![
                StationId::Number(2),
                StationId::Number(1),
                StationId::Number(0),
                StationId::Number(3)
            ]
        );
        assert_eq!(dispatch.energy, 1020.0);
    }

    #[tokio::test]
    async fn test_explicit_tagging_keeps_depot_tags() {
        let dispatch = plan_with_tagging(TagSource::Explicit).await;

        assert_eq!(
            dispatch.route,
            vec![
                StationId::Number(3),
                StationId::Number(2),
                StationId::Number(1),
                StationId::Number(0)
            ]
        );
        assert_eq!(dispatch.travel_cost, 20.0);
        assert_eq!(dispatch.energy, 20.0);
    }

    #[tokio::test]
    async fn test_tagging_for_untagged_keeps_depot_tags() {
        // 1 and 2 become supply stations next to the tagged 3, so the demand
        // station 0 closes the route. Both directions through 1 and 2 cost 20.
        let dispatch = plan_with_tagging(TagSource::NeedsForUntagged).await;

        assert_eq!(dispatch.route.last(), Some(&StationId::Number(0)));
        assert_eq!(dispatch.travel_cost, 20.0);
        assert_eq!(dispatch.energy, 3020.0);
    }

    #[tokio::test]
    async fn test_plan_all_keeps_going_after_failure() {
        let empty = Depot::new(test_utils::create_reference_graph(), snapshot(&[])).unwrap();
        let balanced = Depot::new(
            test_utils::create_reference_graph(),
            snapshot(&[(0, 8), (1, 8)]),
        )
        .unwrap();
        let planner = RebalancePlanner::new(CountingSampler::default(), params());

        let results = planner.plan_all(&[empty, balanced]).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap_err().kind(), ErrorKind::Input);
        assert_eq!(results[1].as_ref().unwrap(), &RebalancePlan::NotRequired);
    }
}
