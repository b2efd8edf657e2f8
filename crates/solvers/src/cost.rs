use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;
use ndarray::Array1;
use zobench_core::ObjFunc;

/// Objective function seen by argmin solvers working on `Array1<f64>`
#[derive(Clone, Debug)]
pub(crate) struct ArrayCost {
    fun: ObjFunc,
}

impl ArrayCost {
    pub fn new(fun: &ObjFunc) -> Self {
        ArrayCost { fun: fun.clone() }
    }
}

impl CostFunction for ArrayCost {
    type Param = Array1<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.fun.eval(&x.view()))
    }
}

/// Objective function seen by argmin builtin solvers working on `Vec<f64>`.
/// The gradient is approximated by central finite differences.
#[derive(Clone, Debug)]
pub(crate) struct VecCost {
    fun: ObjFunc,
}

impl VecCost {
    pub fn new(fun: &ObjFunc) -> Self {
        VecCost { fun: fun.clone() }
    }
}

impl CostFunction for VecCost {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.fun.eval_slice(x))
    }
}

impl Gradient for VecCost {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(x.central_diff(&|x: &Vec<f64>| self.fun.eval_slice(x)))
    }
}
