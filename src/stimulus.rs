use rand::seq::SliceRandom;
use rand::Rng;

/// The fixed symbol alphabet shown during an assessment. Targets and stimuli
/// are both drawn from this set, so roughly 1 in 8 stimuli matches the target.
pub const ALPHABET: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'X', 'Y', 'Z'];

/// Source of symbols for targets and stimuli.
///
/// Draws are independent; consecutive repeats (including a stimulus equal to
/// the current target) are expected and allowed.
pub trait SymbolSource {
    fn next_symbol(&mut self) -> char;
}

/// Uniform draws from [`ALPHABET`] backed by any [`rand::Rng`].
///
/// Production uses `thread_rng`; tests inject a seeded `StdRng` for
/// reproducible sequences.
pub struct RandomSymbols<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomSymbols<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSymbols<rand::rngs::ThreadRng> {
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> SymbolSource for RandomSymbols<R> {
    fn next_symbol(&mut self) -> char {
        // ALPHABET is non-empty, choose cannot fail
        *ALPHABET.choose(&mut self.rng).unwrap_or(&ALPHABET[0])
    }
}

/// Replays a fixed symbol sequence, cycling when exhausted. Used by tests and
/// headless runs that need a scripted assessment.
pub struct ScriptedSymbols {
    symbols: Vec<char>,
    next: usize,
}

impl ScriptedSymbols {
    pub fn new(symbols: Vec<char>) -> Self {
        assert!(!symbols.is_empty(), "scripted symbol sequence is empty");
        Self { symbols, next: 0 }
    }
}

impl SymbolSource for ScriptedSymbols {
    fn next_symbol(&mut self) -> char {
        let symbol = self.symbols[self.next % self.symbols.len()];
        self.next += 1;
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_draws_stay_in_alphabet() {
        let mut source = RandomSymbols::new(StdRng::seed_from_u64(7));

        for _ in 0..200 {
            let symbol = source.next_symbol();
            assert!(ALPHABET.contains(&symbol), "unexpected symbol {symbol}");
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let mut a = RandomSymbols::new(StdRng::seed_from_u64(42));
        let mut b = RandomSymbols::new(StdRng::seed_from_u64(42));

        let left: Vec<char> = (0..32).map(|_| a.next_symbol()).collect();
        let right: Vec<char> = (0..32).map(|_| b.next_symbol()).collect();

        assert_eq!(left, right);
    }

    #[test]
    fn test_seeded_draws_cover_alphabet() {
        let mut source = RandomSymbols::new(StdRng::seed_from_u64(1));
        let mut seen = std::collections::HashSet::new();

        for _ in 0..500 {
            seen.insert(source.next_symbol());
        }

        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn test_scripted_symbols_cycle() {
        let mut source = ScriptedSymbols::new(vec!['A', 'X']);

        assert_eq!(source.next_symbol(), 'A');
        assert_eq!(source.next_symbol(), 'X');
        assert_eq!(source.next_symbol(), 'A');
    }
}
