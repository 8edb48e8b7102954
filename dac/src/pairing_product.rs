//! Batch evaluator for products of pairings. Both the prover and the verifier
//! of the credential chain enqueue one product per commitment slot and
//! evaluate them together, so the Fiat-Shamir transcript sees bit-identical
//! inputs on both sides.

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{CurveGroup, Group};
use ark_ff::{PrimeField, Zero};
use ark_std::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Config;
use crate::error::DacError;
use crate::point::CurvePoint;

/// One `e(a, b)^exp` factor; `exp = None` means exponent 1. The arguments may
/// come in either group order but must span both source groups.
#[derive(Debug, PartialEq, Eq)]
pub struct PairingTerm<E: Pairing> {
    pub a: CurvePoint<E>,
    pub b: CurvePoint<E>,
    pub exp: Option<E::ScalarField>,
}

impl<E: Pairing> Clone for PairingTerm<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Pairing> Copy for PairingTerm<E> {}

impl<E: Pairing> PairingTerm<E> {
    pub fn new(a: CurvePoint<E>, b: CurvePoint<E>, exp: Option<E::ScalarField>) -> Self {
        Self { a, b, exp }
    }

    fn oriented(&self) -> Result<(E::G1Affine, E::G2Affine), DacError> {
        match (&self.a, &self.b) {
            (CurvePoint::G1(a), CurvePoint::G2(b)) => Ok((*a, *b)),
            (CurvePoint::G2(b), CurvePoint::G1(a)) => Ok((*a, *b)),
            _ => Err(DacError::MismatchedGroups("pairing")),
        }
    }
}

/// A single pairing whose arguments may come in either group order.
pub fn ate<E: Pairing>(
    a: &CurvePoint<E>,
    b: &CurvePoint<E>,
) -> Result<PairingOutput<E>, DacError> {
    let (g1, g2) = PairingTerm::new(*a, *b, None).oriented()?;
    Ok(E::pairing(g1, g2))
}

/// Evaluate `prod_k e(a_k, b_k)^{c_k}`.
///
/// With `optimize_tate` the scalars are absorbed into the G1 arguments, all
/// Miller loops are fused and a single final exponentiation is run; otherwise
/// every pairing is finalized separately and exponentiated in the target
/// group. The two strategies agree on the result.
pub fn eval_pairing_product<E: Pairing>(
    terms: &[PairingTerm<E>],
    optimize_tate: bool,
) -> Result<PairingOutput<E>, DacError> {
    if optimize_tate {
        let mut g1 = Vec::with_capacity(terms.len());
        let mut g2 = Vec::with_capacity(terms.len());
        for term in terms {
            let (mut a, b) = term.oriented()?;
            if let Some(exp) = term.exp {
                a = (a * exp).into_affine();
            }
            g1.push(a);
            g2.push(b);
        }
        Ok(E::multi_pairing(g1, g2))
    } else {
        let mut result = PairingOutput::<E>::zero();
        for term in terms {
            let (a, b) = term.oriented()?;
            let mut factor = E::pairing(a, b);
            if let Some(exp) = &term.exp {
                factor = factor.mul_bigint(exp.into_bigint());
            }
            result += factor;
        }
        Ok(result)
    }
}

struct QueuedProduct<E: Pairing> {
    i: usize,
    j: usize,
    terms: Vec<PairingTerm<E>>,
}

/// Collects pairing products keyed by `(i, j)` and evaluates them into a
/// matrix. Worker scheduling follows [`Config`]: one task per product, fully
/// sequential, or a round-robin split over a fixed number of workers. Cells
/// that were never enqueued stay `None` and the matrix indexing makes the
/// completion order irrelevant.
pub struct PairingProductComputer<E: Pairing> {
    queue: Vec<QueuedProduct<E>>,
}

impl<E: Pairing> PairingProductComputer<E> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Vec::with_capacity(capacity),
        }
    }

    pub fn enqueue(&mut self, i: usize, j: usize, terms: Vec<PairingTerm<E>>) {
        self.queue.push(QueuedProduct { i, j, terms });
    }

    pub fn compute(
        self,
        config: &Config,
    ) -> Result<Vec<Vec<Option<PairingOutput<E>>>>, DacError> {
        let max_i = self.queue.iter().map(|q| q.i).max().unwrap_or(0);
        let max_j = self.queue.iter().map(|q| q.j).max().unwrap_or(0);
        let mut results = vec![vec![None; max_j + 1]; max_i + 1];

        for (i, j, value) in Self::evaluate(&self.queue, config) {
            results[i][j] = Some(value.map_err(|_| DacError::PairingEval(i, j))?);
        }
        Ok(results)
    }

    #[cfg(feature = "parallel")]
    fn evaluate(
        queue: &[QueuedProduct<E>],
        config: &Config,
    ) -> Vec<(usize, usize, Result<PairingOutput<E>, DacError>)> {
        let optimize_tate = config.optimize_tate;
        let eval_one = move |q: &QueuedProduct<E>| {
            (q.i, q.j, eval_pairing_product(&q.terms, optimize_tate))
        };

        if !config.parallel || config.workers == 1 {
            queue.iter().map(eval_one).collect()
        } else if config.workers == 0 {
            queue.par_iter().map(eval_one).collect()
        } else {
            let workers = config.workers.min(queue.len().max(1));
            (0..workers)
                .into_par_iter()
                .flat_map_iter(|worker| queue.iter().skip(worker).step_by(workers).map(eval_one))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate(
        queue: &[QueuedProduct<E>],
        config: &Config,
    ) -> Vec<(usize, usize, Result<PairingOutput<E>, DacError>)> {
        let optimize_tate = config.optimize_tate;
        queue
            .iter()
            .map(|q| (q.i, q.j, eval_pairing_product(&q.terms, optimize_tate)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::UniformRand;

    type Point = CurvePoint<Bn254>;

    fn random_term(rng: &mut StdRng, with_exp: bool) -> PairingTerm<Bn254> {
        PairingTerm::new(
            Point::generator(true).mul(&Fr::rand(rng)),
            Point::generator(false).mul(&Fr::rand(rng)),
            with_exp.then(|| Fr::rand(rng)),
        )
    }

    #[test]
    fn both_strategies_agree() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for count in [1usize, 2, 3, 5] {
            let terms: Vec<_> = (0..count)
                .map(|k| random_term(&mut rng, k % 2 == 0))
                .collect();
            let fused = eval_pairing_product(&terms, true).unwrap();
            let plain = eval_pairing_product(&terms, false).unwrap();
            assert_eq!(fused, plain);
        }
    }

    #[test]
    fn exponent_can_move_between_arguments() {
        // e(a, b)^r == e(a * r, b)
        let mut rng = StdRng::seed_from_u64(0u64);
        let a = Point::generator(true).mul(&Fr::rand(&mut rng));
        let b = Point::generator(false).mul(&Fr::rand(&mut rng));
        let r = Fr::rand(&mut rng);

        let with_exp =
            eval_pairing_product(&[PairingTerm::new(a, b, Some(r))], false).unwrap();
        let absorbed =
            eval_pairing_product(&[PairingTerm::new(a.mul(&r), b, None)], false).unwrap();
        assert_eq!(with_exp, absorbed);
    }

    #[test]
    fn argument_order_does_not_matter() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let a = Point::generator(true).mul(&Fr::rand(&mut rng));
        let b = Point::generator(false).mul(&Fr::rand(&mut rng));
        assert_eq!(ate(&a, &b).unwrap(), ate(&b, &a).unwrap());
        assert_eq!(
            ate(&a, &b).unwrap(),
            eval_pairing_product(&[PairingTerm::new(a, b, None)], true).unwrap()
        );
    }

    #[test]
    fn same_group_arguments_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let a = Point::generator(true).mul(&Fr::rand(&mut rng));
        let b = Point::generator(true).mul(&Fr::rand(&mut rng));
        for optimize in [true, false] {
            assert!(eval_pairing_product(&[PairingTerm::new(a, b, None)], optimize).is_err());
        }
    }

    #[test]
    fn computer_fills_matrix_regardless_of_schedule() {
        let mut expected = None;
        for workers in [0usize, 1, 3] {
            for optimize_tate in [true, false] {
                let mut rng_run = StdRng::seed_from_u64(7u64);
                let mut computer = PairingProductComputer::<Bn254>::with_capacity(6);
                for i in 1..=2usize {
                    for j in 0..3usize {
                        let term = random_term(&mut rng_run, true);
                        computer.enqueue(i, j, vec![term]);
                    }
                }
                let config = Config {
                    workers,
                    optimize_tate,
                    parallel: true,
                };
                let coms = computer.compute(&config).unwrap();
                assert_eq!(coms.len(), 3);
                assert!(coms[0].iter().all(Option::is_none));
                assert!(coms[1].iter().all(Option::is_some));
                assert!(coms[2].iter().all(Option::is_some));
                match &expected {
                    None => expected = Some(coms),
                    Some(prior) => assert_eq!(prior, &coms),
                }
            }
        }
    }

    #[test]
    fn computer_reports_failing_slot() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let good = random_term(&mut rng, false);
        let bad = PairingTerm::new(
            Point::generator(true).mul(&Fr::rand(&mut rng)),
            Point::generator(true).mul(&Fr::rand(&mut rng)),
            None,
        );
        let mut computer = PairingProductComputer::<Bn254>::with_capacity(2);
        computer.enqueue(1, 0, vec![good]);
        computer.enqueue(2, 4, vec![bad]);
        let err = computer.compute(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("error occurred in computing coms[2][4]"));
    }
}
