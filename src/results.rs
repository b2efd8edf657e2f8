use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use zobench_core::Result;

/// JSON has no representation for non finite numbers: they are written as `null`
/// and read back as infinity.
mod non_finite {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Objective value reached by a solver with a given budget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSample {
    pub solver_name: String,
    pub data_name: String,
    pub objective_name: String,
    /// Iteration count or tolerance of the budget
    #[serde(with = "non_finite")]
    pub stop_val: f64,
    /// Wall time of the solver run in seconds
    pub time: f64,
    #[serde(with = "non_finite")]
    pub objective_value: f64,
    pub repetition: usize,
}

/// A combination which ended with an error
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub solver_name: String,
    pub data_name: String,
    pub objective_name: String,
    pub repetition: usize,
    pub error: String,
}

/// A combination the solver declined to run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skipped {
    pub solver_name: String,
    pub data_name: String,
    pub reason: String,
}

/// Outcome of a benchmark
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchResults {
    pub samples: Vec<ResultSample>,
    pub failures: Vec<Failure>,
    pub skipped: Vec<Skipped>,
}

impl BenchResults {
    pub fn merge(&mut self, other: BenchResults) {
        self.samples.extend(other.samples);
        self.failures.extend(other.failures);
        self.skipped.extend(other.skipped);
    }

    /// Sample with the lowest objective value for each (solver, dataset, objective)
    pub fn best_per_combination(&self) -> Vec<ResultSample> {
        let mut best: BTreeMap<(&str, &str, &str), &ResultSample> = BTreeMap::new();
        for sample in &self.samples {
            let key = (
                sample.solver_name.as_str(),
                sample.data_name.as_str(),
                sample.objective_name.as_str(),
            );
            best.entry(key)
                .and_modify(|current| {
                    if current.objective_value.is_nan()
                        || sample.objective_value < current.objective_value
                    {
                        *current = sample;
                    }
                })
                .or_insert(sample);
        }
        best.into_values().cloned().collect()
    }
}

/// Write the results as pretty JSON
pub fn save_results<P: AsRef<Path>>(path: P, results: &BenchResults) -> Result<()> {
    let out_json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, out_json)?;
    Ok(())
}

pub fn load_results<P: AsRef<Path>>(path: P) -> Result<BenchResults> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn sample(solver: &str, stop_val: f64, objective_value: f64) -> ResultSample {
        ResultSample {
            solver_name: solver.to_string(),
            data_name: "square[dimension=1]".to_string(),
            objective_name: "Zero-order test functions".to_string(),
            stop_val,
            time: 0.001,
            objective_value,
            repetition: 0,
        }
    }

    #[test]
    fn test_best_per_combination() {
        let results = BenchResults {
            samples: vec![
                sample("b", 0., 3.),
                sample("a", 0., 2.),
                sample("a", 1., 1.),
                sample("a", 2., 1.5),
                sample("b", 1., f64::NAN),
            ],
            ..BenchResults::default()
        };
        let best = results.best_per_combination();
        assert_eq!(best.len(), 2);
        assert_eq!(best[0], sample("a", 1., 1.));
        assert_eq!(best[1], sample("b", 0., 3.));
    }

    #[test]
    #[serial]
    fn test_save_load_results() {
        let results = BenchResults {
            samples: vec![sample("local[method=L-BFGS,strategy=tolerance]", f64::INFINITY, 0.5)],
            failures: vec![Failure {
                solver_name: "blackbox[method=CMA,seed=42]".to_string(),
                data_name: "simulated[dimension=2]".to_string(),
                objective_name: "Zero-order test functions".to_string(),
                repetition: 0,
                error: "Missing bounds".to_string(),
            }],
            skipped: vec![Skipped {
                solver_name: "Bisector[min0=-10,max0=10]".to_string(),
                data_name: "square[dimension=2]".to_string(),
                reason: "Bisection only runs for 1D problems".to_string(),
            }],
        };
        let path = std::env::temp_dir().join("zobench_test_results.json");
        save_results(&path, &results).unwrap();
        let loaded = load_results(&path).unwrap();
        assert_eq!(loaded, results);
        std::fs::remove_file(&path).ok();
    }
}
