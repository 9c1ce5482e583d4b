pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::catalog_scenarios;

/// A named simulation plan the CLI can run.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(
        name: impl Into<String>,
        description: impl Into<String>,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            plan,
        }
    }
}

/// Keys accepted by `--scenarios`, in catalog order.
pub const SCENARIO_KEYS: [&str; 8] = [
    "smoke",
    "number-guess",
    "memory",
    "odd-even",
    "reaction",
    "blackjack",
    "tools",
    "tour",
];

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    let key = match key.to_lowercase().as_str() {
        "guess" => "number-guess".to_string(),
        "parity" => "odd-even".to_string(),
        "persistence" => "tour".to_string(),
        other => other.to_string(),
    };
    let index = SCENARIO_KEYS.iter().position(|k| *k == key)?;
    catalog_scenarios().into_iter().nth(index)
}

pub fn list_scenarios() -> Vec<(&'static str, String)> {
    SCENARIO_KEYS
        .iter()
        .copied()
        .zip(catalog_scenarios().into_iter().map(|s| s.description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_resolves() {
        for key in SCENARIO_KEYS {
            assert!(get_scenario(key).is_some(), "{key} missing");
        }
        assert_eq!(catalog_scenarios().len(), SCENARIO_KEYS.len());
    }

    #[test]
    fn aliases_resolve_to_catalog_entries() {
        let tour = get_scenario("Persistence").unwrap();
        assert_eq!(tour.name, "Tour");
        assert_eq!(get_scenario("parity").unwrap().name, "Odd or Even");
        assert!(get_scenario("hangman").is_none());
    }

    #[test]
    fn listing_pairs_keys_with_descriptions() {
        let listed = list_scenarios();
        assert_eq!(listed[0].0, "smoke");
        assert!(listed.iter().all(|(_, description)| !description.is_empty()));
    }
}
