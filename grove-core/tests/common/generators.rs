//! Stochastic document generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Expected structure of a document instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Element { gi: String, children: Vec<Shape> },
    Data(String),
    Pi(String),
}

impl Shape {
    pub fn element(gi: &str, children: Vec<Shape>) -> Self {
        Shape::Element { gi: gi.to_string(), children }
    }

    pub fn data(text: &str) -> Self {
        Shape::Data(text.to_string())
    }

    /// The same shape with adjacent data merged, as the builder stores it.
    pub fn coalesced(&self) -> Shape {
        match self {
            Shape::Element { gi, children } => {
                let mut merged: Vec<Shape> = Vec::new();
                for child in children {
                    match (merged.last_mut(), child) {
                        (Some(Shape::Data(prev)), Shape::Data(next)) => prev.push_str(next),
                        _ => merged.push(child.coalesced()),
                    }
                }
                Shape::Element { gi: gi.clone(), children: merged }
            }
            other => other.clone(),
        }
    }

    /// Number of elements in the shape.
    pub fn element_count(&self) -> usize {
        match self {
            Shape::Element { children, .. } => {
                1 + children.iter().map(Shape::element_count).sum::<usize>()
            }
            _ => 0,
        }
    }
}

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("GROVE_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random generic identifier, already in upper case
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.5);
        (0..len).map(|_| self.rng.gen_range(b'A'..=b'Z') as char).collect()
    }

    /// Random non-empty character data
    pub fn text(&mut self) -> String {
        let len = 1 + self.geometric(0.8);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789 .,";
        (0..len).map(|_| chars[self.rng.gen_range(0..chars.len())] as char).collect()
    }

    /// Random element subtree no deeper than `depth`
    pub fn element(&mut self, depth: usize) -> Shape {
        let gi = self.name();
        let mut children = Vec::new();
        if depth > 0 {
            for _ in 0..self.geometric(0.7) {
                let child = if self.chance(0.4) {
                    self.element(depth - 1)
                } else if self.chance(0.85) {
                    Shape::Data(self.text())
                } else {
                    Shape::Pi(self.text())
                };
                children.push(child);
            }
        }
        Shape::Element { gi, children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);
        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.element(3), g2.element(3));
        }
    }

    #[test]
    fn test_coalesced_merges_runs() {
        let shape = Shape::element("A", vec![Shape::data("1"), Shape::data("2"), Shape::element("B", vec![])]);
        assert_eq!(
            shape.coalesced(),
            Shape::element("A", vec![Shape::data("12"), Shape::element("B", vec![])])
        );
    }
}
