use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::simulation::{PlaySummary, SimulationPlan, run_plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (plan: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.kind.label(),
                    seed
                );
            }

            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, performance_data) =
            self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let summary = run_plan(plan, iteration_seed);

            if let Some(err) = evaluate_expectations(plan, &summary) {
                failures.push(format!(
                    "Iteration {} (plan {}, seed {}): {} | {}",
                    i + 1,
                    plan.kind.label(),
                    summary.seed,
                    err,
                    summarize_play(&summary)
                ));

                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) {}",
                        i + 1,
                        iterations,
                        summarize_play(&summary)
                    );
                }
            }
        }

        (successes, failures, performance_data)
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &PlaySummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation(summary).err())
        .map(|err| format!("{err:#}"))
}

fn summarize_play(summary: &PlaySummary) -> String {
    let unlocked = if summary.unlocked.is_empty() {
        "-".to_string()
    } else {
        summary.unlocked.join(",")
    };
    format!(
        "games {} wins {} best streak {} rejections {} unlocked {}",
        summary.stats.total_games,
        summary.stats.total_wins,
        summary.stats.best_streak,
        summary.rejections.len(),
        unlocked
    )
}

/// Durations travel as whole milliseconds.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::millis(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        durations: &[Duration],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(durations.iter().map(|d| super::millis(*d)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Duration>, D::Error> {
        let millis = Vec::<u64>::deserialize(deserializer)?;
        Ok(millis.into_iter().map(Duration::from_millis).collect())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::PlanKind;

    fn scenario(plan: SimulationPlan) -> TestScenario {
        TestScenario::simulation("probe", "probe scenario", plan)
    }

    fn always_fails(_summary: &PlaySummary) -> anyhow::Result<()> {
        anyhow::bail!("nope")
    }

    #[test]
    fn one_result_per_seed() {
        let tester = LogicTester::new(false);
        let plan = SimulationPlan::new(PlanKind::Blackjack, 1);
        let results = tester.run_scenario(&scenario(plan), &[1, 2, 3], 2);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed && r.successful_iterations == 2));
        assert_eq!(results[1].seed, 2);
    }

    #[test]
    fn failing_expectation_is_reported_with_seed() {
        let tester = LogicTester::new(false);
        let plan = SimulationPlan::new(PlanKind::Tools, 1).with_expectation(always_fails);
        let results = tester.run_scenario(&scenario(plan), &[40], 2);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[1].contains("seed 41"));
        assert!(result.failures[0].contains("nope"));
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: "probe".to_string(),
            seed: 7,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.average_duration, Duration::from_millis(12));
    }
}
