// Conversions between probabilities and tropical costs

/// Cost of an event with probability `prob` (`-ln prob`).
#[inline]
pub fn prob_to_cost(prob: f64) -> f64 {
    // subtract from zero so a certain event costs 0.0, not -0.0
    0.0 - prob.ln()
}

/// Probability of an event with the given cost (`exp(-cost)`).
#[inline]
pub fn cost_to_prob(cost: f64) -> f64 {
    (-cost).exp()
}

/// Cost of each branch when probability mass is split evenly over `n`
/// branches. Returns infinity for `n == 0`.
#[inline]
pub fn uniform_cost(n: usize) -> f64 {
    prob_to_cost(1.0 / n as f64)
}
