use serde::{Deserialize, Serialize};
use zobench_core::{Dataset, Result};

use crate::{FcnDataset, SimulatedDataset, SquareDataset, TestFunction};

/// Resolved dataset setup, from which a fresh dataset is built for each benchmark run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum DatasetKind {
    #[serde(rename = "FCN")]
    Fcn {
        function: TestFunction,
        dimension: usize,
    },
    #[serde(rename = "simulated")]
    Simulated {
        dimension: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
    #[serde(rename = "square")]
    Square { dimension: usize },
}

impl DatasetKind {
    pub fn build(&self) -> Result<Box<dyn Dataset>> {
        let dataset: Box<dyn Dataset> = match *self {
            DatasetKind::Fcn {
                function,
                dimension,
            } => Box::new(FcnDataset::from_function(function, dimension)?),
            DatasetKind::Simulated { dimension, seed } => {
                Box::new(SimulatedDataset::new(dimension).seed(seed))
            }
            DatasetKind::Square { dimension } => Box::new(SquareDataset::new(dimension)),
        };
        Ok(dataset)
    }

    pub fn dimension(&self) -> usize {
        match *self {
            DatasetKind::Fcn { dimension, .. }
            | DatasetKind::Simulated { dimension, .. }
            | DatasetKind::Square { dimension } => dimension,
        }
    }
}
