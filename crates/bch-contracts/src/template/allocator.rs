//! Collision-free identifier allocation.

use std::collections::HashSet;

use crate::template::format::snake_case;

/// Allocates snake-case identifiers, suffixing a counter on collision.
///
/// The first allocation of a base yields `snake_case(base)`; subsequent
/// allocations of the same base yield `snake_case(base1)`,
/// `snake_case(base2)`, and so on.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        NameAllocator::default()
    }

    /// Allocate a unique identifier for a base name.
    ///
    /// # Arguments
    /// * `base` - The base name, before snake-casing.
    ///
    /// # Returns
    /// A snake-case identifier not returned before by this allocator.
    pub fn allocate(&mut self, base: &str) -> String {
        let mut candidate = snake_case(base);
        let mut counter = 0u32;
        while self.used.contains(&candidate) {
            counter += 1;
            candidate = snake_case(&format!("{base}{counter}"));
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify repeated bases get numeric suffixes.
    #[test]
    fn test_collision_suffixes() {
        let mut allocator = NameAllocator::new();
        assert_eq!(
            allocator.allocate("Mecenas_receiveEvaluateFunction"),
            "mecenas_receive_evaluate_function"
        );
        assert_eq!(
            allocator.allocate("Mecenas_receiveEvaluateFunction"),
            "mecenas_receive_evaluate_function1"
        );
        assert_eq!(
            allocator.allocate("Mecenas_receiveEvaluateFunction"),
            "mecenas_receive_evaluate_function2"
        );
    }

    /// Verify distinct bases do not interfere.
    #[test]
    fn test_distinct_bases() {
        let mut allocator = NameAllocator::new();
        assert_eq!(allocator.allocate("A_spend"), "a_spend");
        assert_eq!(allocator.allocate("B_spend"), "b_spend");
    }
}
