//! Derivative-free minimisation with the Nelder-Mead simplex method

/// Outcome of a minimisation
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best point found
    pub solution: Vec<f64>,
    /// Objective at `solution`
    pub function_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether both tolerances were met before the iteration limit
    pub converged: bool,
}

/// Nelder-Mead simplex minimiser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    /// Edge length of the initial simplex
    pub initial_step: f64,
    /// Largest coordinate spread of the simplex at convergence
    pub xtol: f64,
    /// Largest objective spread of the simplex at convergence
    pub ftol: f64,
    pub max_iterations: usize,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            initial_step: 0.25,
            xtol: 1e-4,
            ftol: 1e-8,
            max_iterations: 5_000,
        }
    }
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    /// Minimise `objective` starting from `start`
    ///
    /// Non-finite objective values are treated as `+∞`.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> OptimizationResult
    where
        F: Fn(&[f64]) -> f64,
    {
        let eval = |x: &[f64]| {
            let value = objective(x);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        let dim = start.len();
        if dim == 0 {
            return OptimizationResult {
                solution: Vec::new(),
                function_value: eval(start),
                iterations: 0,
                converged: true,
            };
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        simplex.push(start.to_vec());
        for i in 0..dim {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            sort_simplex(&mut simplex, &mut values);

            let x_spread = simplex[1..]
                .iter()
                .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            let f_spread = values[1..]
                .iter()
                .map(|f| (f - values[0]).abs())
                .fold(0.0, f64::max);
            if x_spread <= self.xtol && f_spread <= self.ftol {
                converged = true;
                break;
            }
            iterations += 1;

            let worst = dim;
            let centroid: Vec<f64> = (0..dim)
                .map(|j| simplex[..dim].iter().map(|v| v[j]).sum::<f64>() / dim as f64)
                .collect();
            let towards = |coef: f64, from: &[f64]| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(from)
                    .map(|(c, x)| c + coef * (x - c))
                    .collect()
            };

            let reflected = towards(-REFLECTION, &simplex[worst]);
            let f_reflected = eval(&reflected);

            if f_reflected < values[0] {
                let expanded = towards(EXPANSION, &reflected);
                let f_expanded = eval(&expanded);
                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    values[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[dim - 1] {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
                continue;
            }

            let (contracted, f_contracted, accept) = if f_reflected < values[worst] {
                let outside = towards(CONTRACTION, &reflected);
                let f = eval(&outside);
                (outside, f, f <= f_reflected)
            } else {
                let inside = towards(CONTRACTION, &simplex[worst]);
                let f = eval(&inside);
                (inside, f, f < values[worst])
            };

            if accept {
                simplex[worst] = contracted;
                values[worst] = f_contracted;
            } else {
                let best = simplex[0].clone();
                for i in 1..=dim {
                    for (x, b) in simplex[i].iter_mut().zip(&best) {
                        *x = b + SHRINK * (*x - b);
                    }
                    values[i] = eval(&simplex[i]);
                }
            }
        }

        sort_simplex(&mut simplex, &mut values);
        OptimizationResult {
            solution: simplex.swap_remove(0),
            function_value: values[0],
            iterations,
            converged,
        }
    }
}

/// Order vertices by objective value, best first
fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}
