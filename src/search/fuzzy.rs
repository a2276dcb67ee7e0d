use fst::Automaton;
use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder, DFA};

/// Levenshtein DFA usable directly as an FST automaton
pub struct FuzzyAutomaton {
    /// Maximum allowed edit distance (typically 1-2)
    max_edit_distance: u8,

    dfa: DFA,
}

impl FuzzyAutomaton {
    pub fn new(term: &str, max_edit_distance: u8) -> Self {
        // Transpositions count as one edit (teh -> the)
        let builder = LevenshteinAutomatonBuilder::new(max_edit_distance, true);

        Self {
            max_edit_distance,
            dfa: builder.build_dfa(term),
        }
    }

    /// Edit distance of `candidate`, or None when it exceeds the maximum
    pub fn distance(&self, candidate: &str) -> Option<u8> {
        let mut state = self.dfa.initial_state();

        for &byte in candidate.as_bytes() {
            state = self.dfa.transition(state, byte);
        }

        match self.dfa.distance(state) {
            Distance::Exact(d) if d <= self.max_edit_distance => Some(d),
            _ => None,
        }
    }
}

impl Automaton for FuzzyAutomaton {
    type State = u32;

    fn start(&self) -> u32 {
        self.dfa.initial_state()
    }

    fn is_match(&self, state: &u32) -> bool {
        matches!(self.dfa.distance(*state), Distance::Exact(d) if d <= self.max_edit_distance)
    }

    fn accept(&self, state: &u32, byte: u8) -> u32 {
        self.dfa.transition(*state, byte)
    }
}
