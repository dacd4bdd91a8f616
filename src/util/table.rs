use crate::util::random::Random;

/// Weighted table that yields exactly one entry per roll.
#[derive(Debug, Clone, Copy)]
pub struct RollOne<T: 'static> {
    pub entries: &'static [(u32, T)],
}

impl<T: 'static> RollOne<T> {
    pub const fn new(entries: &'static [(u32, T)]) -> Self {
        Self { entries }
    }

    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|(w, _)| *w).sum()
    }

    /// Pick one entry with probability proportional to its weight.
    /// `None` only when the table is empty or all weights are zero.
    pub fn roll(&self, random: &Random) -> Option<&T> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        let mut ticket = random.below(total as i32) as u32;
        for (weight, value) in self.entries {
            if ticket < *weight {
                return Some(value);
            }
            ticket -= weight;
        }
        None
    }
}

/// Table whose entries each roll independently against their own percent chance.
#[derive(Debug, Clone, Copy)]
pub struct RollMany<T: 'static> {
    pub entries: &'static [(i32, T)],
}

impl<T: 'static> RollMany<T> {
    pub const fn new(entries: &'static [(i32, T)]) -> Self {
        Self { entries }
    }

    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    pub fn roll(&self, random: &Random) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|(percent, _)| random.chance(*percent))
            .map(|(_, value)| value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static WEIGHTED: RollOne<&str> = RollOne::new(&[(1, "rare"), (9, "common"), (0, "never")]);
    static INDEPENDENT: RollMany<&str> = RollMany::new(&[(100, "always"), (0, "never"), (50, "half")]);

    #[test]
    fn roll_one_follows_weights() {
        let random = Random::new(9);
        let mut common = 0;
        for _ in 0..1000 {
            let v = *WEIGHTED.roll(&random).unwrap();
            assert_ne!(v, "never");
            if v == "common" {
                common += 1;
            }
        }
        assert!(common > 800 && common < 980, "common rolled {} times", common);
    }

    #[test]
    fn roll_one_empty_table() {
        static EMPTY: RollOne<u8> = RollOne::new(&[]);
        assert!(EMPTY.roll(&Random::new(1)).is_none());
    }

    #[test]
    fn roll_many_is_independent() {
        let random = Random::new(4);
        let mut halves = 0;
        for _ in 0..400 {
            let got = INDEPENDENT.roll(&random);
            assert!(got.contains(&&"always"));
            assert!(!got.contains(&&"never"));
            if got.contains(&&"half") {
                halves += 1;
            }
        }
        assert!(halves > 140 && halves < 260, "half rolled {} times", halves);
    }
}
