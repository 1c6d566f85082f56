//! The fixed table of logical inputs, built once at startup.
//!
//! Physical buttons occupy indices `0..physical_count()` and double as bit
//! positions in the debounced mask. Chords follow, ordered by member count
//! (descending, stable), which is also the order they are arbitrated in.

use heapless::Vec;

use crate::arbiter::{Chord, CommitGate};
use crate::config::{
    ActiveLevel, ButtonConstraints, CombinedButtonConfig, MAX_COMBINED, MAX_INPUTS, MAX_SINGLES,
    SingleButtonConfig,
};
use crate::debounce::Debouncer;
use crate::error::ConfigError;
use crate::fsm::StateMachine;

#[derive(Debug, Clone, Copy)]
pub struct PhysicalInput {
    pub active_level: ActiveLevel,
    pub debouncer: Debouncer,
    /// Member of at least one chord that suppresses singles.
    pub suppressible: bool,
    pub commit: CommitGate,
}

#[derive(Debug, Clone, Copy)]
pub enum InputKind {
    Physical(PhysicalInput),
    Combined(Chord),
}

#[derive(Debug, Clone, Copy)]
pub struct LogicalInput {
    pub alias: &'static str,
    pub logic_index: u8,
    pub constraints: ButtonConstraints,
    pub machine: StateMachine,
    pub kind: InputKind,
}

impl LogicalInput {
    pub fn chord(&self) -> Option<&Chord> {
        match &self.kind {
            InputKind::Combined(chord) => Some(chord),
            InputKind::Physical(_) => None,
        }
    }

    pub fn physical(&self) -> Option<&PhysicalInput> {
        match &self.kind {
            InputKind::Physical(p) => Some(p),
            InputKind::Combined(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Registry {
    inputs: Vec<LogicalInput, MAX_INPUTS>,
    physical_count: usize,
}

impl Registry {
    pub fn new(
        singles: &[SingleButtonConfig],
        combined: &[CombinedButtonConfig],
    ) -> Result<Self, ConfigError> {
        if singles.len() > MAX_SINGLES {
            return Err(ConfigError::TooManySingles(singles.len()));
        }
        if combined.len() > MAX_COMBINED {
            return Err(ConfigError::TooManyCombined(combined.len()));
        }

        let aliases = singles.iter().map(|s| s.alias).chain(combined.iter().map(|c| c.alias));
        for (i, alias) in aliases.clone().enumerate() {
            if aliases.clone().skip(i + 1).any(|other| other == alias) {
                return Err(ConfigError::DuplicateAlias(alias));
            }
        }

        let mut chords: Vec<(Chord, &CombinedButtonConfig), MAX_COMBINED> = Vec::new();
        for cfg in combined {
            let chord = resolve_chord(cfg, singles)?;
            // Capacity was checked above.
            let _ = chords.push((chord, cfg));
        }
        // Insertion sort: stable, so equal sizes keep configuration order.
        for i in 1..chords.len() {
            let mut j = i;
            while j > 0 && chords[j - 1].0.key_count < chords[j].0.key_count {
                chords.swap(j - 1, j);
                j -= 1;
            }
        }

        let suppressing = chords
            .iter()
            .filter(|(c, _)| c.suppress_singles)
            .fold(0u32, |acc, (c, _)| acc | c.mask);

        let mut inputs = Vec::new();
        for (i, cfg) in singles.iter().enumerate() {
            let physical = PhysicalInput {
                active_level: cfg.active_level,
                debouncer: Debouncer::new(),
                suppressible: suppressing & (1 << i) != 0,
                commit: CommitGate::new(),
            };
            let _ = inputs.push(LogicalInput {
                alias: cfg.alias,
                logic_index: i as u8,
                constraints: cfg.constraints,
                machine: StateMachine::new(),
                kind: InputKind::Physical(physical),
            });
        }
        for (chord, cfg) in chords {
            let _ = inputs.push(LogicalInput {
                alias: cfg.alias,
                logic_index: inputs.len() as u8,
                constraints: cfg.constraints,
                machine: StateMachine::new(),
                kind: InputKind::Combined(chord),
            });
        }

        info!(
            "button registry: {} physical, {} chords",
            singles.len(),
            combined.len()
        );

        Ok(Self {
            inputs,
            physical_count: singles.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn physical_count(&self) -> usize {
        self.physical_count
    }

    pub fn get(&self, index: u8) -> Option<&LogicalInput> {
        self.inputs.get(index as usize)
    }

    pub fn index_of(&self, alias: &str) -> Option<u8> {
        self.inputs
            .iter()
            .find(|input| input.alias == alias)
            .map(|input| input.logic_index)
    }

    pub fn physical(&self) -> &[LogicalInput] {
        &self.inputs[..self.physical_count]
    }

    pub fn combined(&self) -> &[LogicalInput] {
        &self.inputs[self.physical_count..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogicalInput> {
        self.inputs.iter()
    }

    /// Physical and chord inputs as two disjoint mutable slices.
    pub fn split_mut(&mut self) -> (&mut [LogicalInput], &mut [LogicalInput]) {
        self.inputs.split_at_mut(self.physical_count)
    }
}

fn resolve_chord(
    cfg: &CombinedButtonConfig,
    singles: &[SingleButtonConfig],
) -> Result<Chord, ConfigError> {
    if cfg.members.is_empty() {
        return Err(ConfigError::EmptyChord(cfg.alias));
    }

    let mut mask = 0u32;
    for &member in cfg.members {
        let index = singles
            .iter()
            .position(|s| s.alias == member)
            .ok_or(ConfigError::UnknownAlias {
                chord: cfg.alias,
                member,
            })?;
        if mask & (1 << index) != 0 {
            return Err(ConfigError::DuplicateMember {
                chord: cfg.alias,
                member,
            });
        }
        mask |= 1 << index;
    }

    Ok(Chord {
        mask,
        key_count: mask.count_ones() as u8,
        suppress_singles: cfg.suppress_singles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLES: [SingleButtonConfig; 4] = [
        SingleButtonConfig::new("a", ActiveLevel::Low),
        SingleButtonConfig::new("b", ActiveLevel::Low),
        SingleButtonConfig::new("c", ActiveLevel::High),
        SingleButtonConfig::new("d", ActiveLevel::Low),
    ];

    #[test]
    fn chords_sorted_by_size_stably() {
        let combined = [
            CombinedButtonConfig::new("ab", &["a", "b"], false),
            CombinedButtonConfig::new("abc", &["a", "b", "c"], true),
            CombinedButtonConfig::new("cd", &["c", "d"], false),
        ];
        let reg = Registry::new(&SINGLES, &combined).unwrap();

        assert_eq!(reg.len(), 7);
        let order: [&str; 3] = core::array::from_fn(|i| reg.combined()[i].alias);
        assert_eq!(order, ["abc", "ab", "cd"]);

        for (i, input) in reg.iter().enumerate() {
            assert_eq!(input.logic_index as usize, i);
        }
        assert_eq!(reg.index_of("abc"), Some(4));
        assert_eq!(reg.index_of("cd"), Some(6));
        assert_eq!(reg.get(4).and_then(|i| i.chord()).map(|c| c.mask), Some(0b0111));
    }

    #[test]
    fn suppressible_only_for_suppressing_chords() {
        let combined = [
            CombinedButtonConfig::new("ab", &["a", "b"], true),
            CombinedButtonConfig::new("cd", &["c", "d"], false),
        ];
        let reg = Registry::new(&SINGLES, &combined).unwrap();

        let flags: [bool; 4] =
            core::array::from_fn(|i| reg.physical()[i].physical().unwrap().suppressible);
        assert_eq!(flags, [true, true, false, false]);
    }

    #[test]
    fn rejects_repeated_chord_member() {
        let combined = [CombinedButtonConfig::new("aab", &["a", "a", "b"], true)];
        assert_eq!(
            Registry::new(&SINGLES, &combined).unwrap_err(),
            ConfigError::DuplicateMember {
                chord: "aab",
                member: "a"
            }
        );
    }

    #[test]
    fn rejects_malformed_tables() {
        let unknown = [CombinedButtonConfig::new("ax", &["a", "x"], true)];
        assert_eq!(
            Registry::new(&SINGLES, &unknown).err(),
            Some(ConfigError::UnknownAlias { chord: "ax", member: "x" })
        );

        let empty = [CombinedButtonConfig::new("none", &[], true)];
        assert_eq!(
            Registry::new(&SINGLES, &empty).err(),
            Some(ConfigError::EmptyChord("none"))
        );

        let clash = [CombinedButtonConfig::new("a", &["b", "c"], true)];
        assert_eq!(
            Registry::new(&SINGLES, &clash).err(),
            Some(ConfigError::DuplicateAlias("a"))
        );

        let nested = [
            CombinedButtonConfig::new("ab", &["a", "b"], true),
            CombinedButtonConfig::new("abd", &["ab", "d"], true),
        ];
        assert_eq!(
            Registry::new(&SINGLES, &nested).err(),
            Some(ConfigError::UnknownAlias { chord: "abd", member: "ab" })
        );
    }

    #[test]
    fn rejects_oversized_tables() {
        let many = [SingleButtonConfig::new("x", ActiveLevel::Low); MAX_SINGLES + 1];
        assert_eq!(
            Registry::new(&many, &[]).err(),
            Some(ConfigError::TooManySingles(MAX_SINGLES + 1))
        );

        let chords = [CombinedButtonConfig::new("ab", &["a", "b"], false); MAX_COMBINED + 1];
        assert_eq!(
            Registry::new(&SINGLES, &chords).err(),
            Some(ConfigError::TooManyCombined(MAX_COMBINED + 1))
        );
    }
}
