//! Ordered pairs, the elements of Cartesian products.

use std::fmt;

/// An ordered pair `(first, second)`.
///
/// Unlike set membership, pair equality and hashing are positional: two
/// pairs are equal when their first components are equal AND their second
/// components are equal. `(1, 2)` and `(2, 1)` are distinct.
///
/// The component types may differ, so products of sets over different
/// element types stay strongly typed.
///
/// # Examples
///
/// ```rust
/// use xorset::set::OrderedPair;
///
/// let pair = OrderedPair::new(1, "one");
/// assert_eq!(pair.first, 1);
/// assert_eq!(pair.second, "one");
/// assert_eq!(pair.to_string(), "(1, one)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderedPair<A, B> {
    /// The left component.
    pub first: A,
    /// The right component.
    pub second: B,
}

impl<A, B> OrderedPair<A, B> {
    /// Creates a pair from its components.
    #[must_use]
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Swaps the components, returning `(second, first)`.
    #[must_use]
    pub fn swap(self) -> OrderedPair<B, A> {
        OrderedPair::new(self.second, self.first)
    }
}

impl<A, B> From<(A, B)> for OrderedPair<A, B> {
    fn from((first, second): (A, B)) -> Self {
        Self::new(first, second)
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for OrderedPair<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedPair;

    #[test]
    fn equality_is_positional() {
        assert_eq!(OrderedPair::new(1, 2), OrderedPair::new(1, 2));
        assert_ne!(OrderedPair::new(1, 2), OrderedPair::new(2, 1));
    }

    #[test]
    fn swap_reverses_components() {
        let pair = OrderedPair::new(1, "one");
        assert_eq!(pair.swap(), OrderedPair::new("one", 1));
    }

    #[test]
    fn display_renders_parenthesized() {
        assert_eq!(OrderedPair::new("a", "b").to_string(), "(a, b)");
        assert_eq!(OrderedPair::new(1, 2.5).to_string(), "(1, 2.5)");
    }

    #[test]
    fn from_tuple() {
        let pair: OrderedPair<u8, char> = (3, 'x').into();
        assert_eq!(pair, OrderedPair::new(3, 'x'));
    }
}
